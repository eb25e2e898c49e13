use anyhow::Result;
use clap::{Parser, Subcommand};
use metric::build::{build_site, create_pages, load_content, SEARCH_INDEX_DIR};
use metric::config::Config;
use metric::search::IndexHandle;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Builds the site from its CMS content")]
struct Cli {
    /// The project directory, or any directory below it
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetches the content and renders every page into the output directory
    Build {
        /// Defaults to `_site` in the project directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Prints the pages a build would register as JSON
    Pages,

    /// Searches a built site's search index
    Search {
        query: String,

        /// The search index directory. Defaults to the one in the project's
        /// `_site`
        #[arg(short, long)]
        index: Option<PathBuf>,
    },
}

fn main() {
    match main_result() {
        Ok(_) => {}
        Err(err) => {
            eprintln!("{:?}", err);
            std::process::exit(1);
        }
    }
}

fn main_result() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { output } => {
            let config = Config::from_directory(&cli.dir, output.as_deref())?;
            build_site(&config)?;
        }

        Commands::Pages => {
            let config = Config::from_directory(&cli.dir, None)?;
            let content = load_content(&config)?;
            println!("{}", create_pages(&config, &content)?.to_manifest()?);
        }

        Commands::Search { query, index } => {
            let path = match index {
                Some(path) => path,
                None => Config::from_directory(&cli.dir, None)?
                    .output_directory
                    .join(SEARCH_INDEX_DIR),
            };
            let handle = IndexHandle::new();
            if let Err(e) = handle.load(&path) {
                log::warn!("search index not ready: {}", e);
            }
            for result in handle.search(&query) {
                println!("{}\t{}\t{}", result.slug, result.title, result.excerpt);
            }
        }
    }
    Ok(())
}
