//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: fetching the content
//! ([`crate::source`]), registering pages ([`crate::generate`]), rendering them
//! ([`crate::write`]), copying the theme's static assets, and writing the page
//! manifest, the Atom feed and the search index.

use crate::config::Config;
use crate::content::Content;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::generate::{Error as GenerateError, Generator};
use crate::page::{Pages, Template};
use crate::search::{Error as SearchError, SearchIndex};
use crate::source::Error as ContentError;
use crate::util::{copy_dir, rmdir};
use crate::write::{Error as WriteError, Templates, Writer};
use gtmpl::Template as Gtmpl;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// The page manifest, relative to the output directory.
pub const MANIFEST_FILE: &str = "pages.json";

/// The search index directory, relative to the output directory.
pub const SEARCH_INDEX_DIR: &str = "search-index";

/// The Atom feed, relative to the output directory.
pub const FEED_FILE: &str = "feed.atom";

/// Fetches the content once and loads it into a [`Content`] graph. A fetch
/// that reports any error aborts the build.
pub fn load_content(config: &Config) -> Result<Content> {
    let source = config.source().map_err(|e| Error::Source(format!("{:#}", e)))?;
    let raw = source.fetch().into_result()?;
    let regions: HashSet<String> = config.regions.iter().cloned().collect();
    Ok(Content::load(raw, &regions, config.missing_pipe))
}

/// Registers every page for `content`.
pub fn create_pages(config: &Config, content: &Content) -> Result<Pages> {
    let mut pages = Pages::default();
    Generator::new(config.page_size, config.regions.clone()).create_pages(content, &mut pages)?;
    log::info!("registered {} pages", pages.len());
    Ok(pages)
}

/// Builds the site from a [`Config`] object.
pub fn build_site(config: &Config) -> Result<()> {
    let content = load_content(config)?;
    let pages = create_pages(config, &content)?;

    // Parse the templates before touching the output directory.
    let mut templates = Templates::new();
    for template in Template::ALL {
        templates.insert(template, parse_template(config.template_files(template).iter())?);
    }

    rmdir(&config.output_directory).map_err(|err| Error::Clean {
        path: config.output_directory.clone(),
        err,
    })?;
    std::fs::create_dir_all(&config.output_directory)?;

    Writer {
        templates: &templates,
        content: &content,
        output_directory: &config.output_directory,
        site_root: &config.site_root,
        site_title: &config.title,
    }
    .write_pages(&pages)?;

    let copied = copy_dir(&config.static_source_directory, &config.static_output_directory)
        .map_err(|e| Error::Source(format!("copying static files: {:#}", e)))?;
    log::debug!("copied {} static files", copied);

    std::fs::write(
        config.output_directory.join(MANIFEST_FILE),
        pages.to_manifest().map_err(Error::Manifest)?,
    )?;

    write_feed(
        &FeedConfig {
            title: config.title.clone(),
            author: config.author.clone(),
            home_page: config.site_root.clone(),
        },
        &content.posts,
        BufWriter::new(File::create(config.output_directory.join(FEED_FILE))?),
    )?;

    SearchIndex::create_in_dir(
        &content.posts,
        &config.output_directory.join(SEARCH_INDEX_DIR),
    )?;

    log::info!("built site into `{}`", config.output_directory.display());
    Ok(())
}

// Loads the template file contents, concatenates them, and parses the result
// into a template.
fn parse_template<P: AsRef<Path>>(template_files: impl Iterator<Item = P>) -> Result<Gtmpl> {
    let mut contents = String::new();
    for template_file in template_files {
        let template_file = template_file.as_ref();
        let text = std::fs::read_to_string(template_file).map_err(|e| Error::OpenTemplateFile {
            path: template_file.to_owned(),
            err: e,
        })?;
        contents.push_str(&text);
        contents.push(' ');
    }

    let mut template = Gtmpl::default();
    template
        .parse(contents)
        .map_err(|e| Error::ParseTemplate(e.to_string()))?;
    Ok(template)
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can come from the content
/// source, page generation, rendering, cleaning the output directory, parsing
/// template files, the manifest, the feed, the search index, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned when the content source can't be set up.
    Source(String),

    /// Returned when the content fetch reported errors.
    Content(ContentError),

    /// Returned for errors registering pages.
    Generate(GenerateError),

    /// Returned for errors rendering pages to disk.
    Write(WriteError),

    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: std::io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate(String),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for errors writing the page manifest.
    Manifest(serde_json::Error),

    /// Returned for errors building the search index.
    Search(SearchError),

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Source(err) => err.fmt(f),
            Error::Content(err) => err.fmt(f),
            Error::Generate(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Manifest(err) => write!(f, "Writing page manifest: {}", err),
            Error::Search(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Source(_) => None,
            Error::Content(err) => Some(err),
            Error::Generate(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate(_) => None,
            Error::Feed(err) => Some(err),
            Error::Manifest(err) => Some(err),
            Error::Search(err) => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ContentError> for Error {
    fn from(err: ContentError) -> Error {
        Error::Content(err)
    }
}

impl From<GenerateError> for Error {
    fn from(err: GenerateError) -> Error {
        Error::Generate(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Error {
        Error::Search(err)
    }
}
