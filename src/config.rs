//! Loads the build configuration. A project is a directory containing a
//! `metric.yaml` project file and a `theme/` directory with a `theme.yaml`:
//!
//! ```yaml
//! # metric.yaml
//! title: The Metric
//! site_root: https://the-metric.example.org/
//! page_size: 12
//! regions: [africa, asia, europe, latin-america, middle-east, north-america]
//! content:
//!   ghost:
//!     url: https://cms.example.org
//!     key: 0123456789abcdef
//! ```
//!
//! ```yaml
//! # theme/theme.yaml
//! author_template: [base.html, author.html]
//! article_template: [base.html, article.html]
//! articles_template: [base.html, listing.html]
//! region_template: [base.html, listing.html]
//! tag_template: [base.html, listing.html]
//! ```

use crate::derive::MissingPipe;
use crate::page::Template;
use crate::source::{ContentSource, FileSource, GhostSource};
use crate::util::open;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the project file.
pub const PROJECT_FILE: &str = "metric.yaml";

/// The output directory, relative to the project directory, when none is
/// given.
pub const DEFAULT_OUTPUT_DIR: &str = "_site";

/// Environment variable consulted when the project file has no Ghost key.
pub const GHOST_KEY_VAR: &str = "GHOST_CONTENT_API_KEY";

#[derive(Deserialize)]
struct PageSize(usize);
impl Default for PageSize {
    fn default() -> Self {
        PageSize(10)
    }
}

#[derive(Deserialize)]
struct Project {
    pub title: String,
    pub site_root: Url,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default)]
    pub regions: Vec<String>,

    #[serde(default)]
    pub missing_pipe: MissingPipe,

    pub content: ContentTable,
}

/// The `content` table of the project file. Exactly one key must be set.
#[derive(Deserialize)]
struct ContentTable {
    #[serde(default)]
    file: Option<PathBuf>,

    #[serde(default)]
    ghost: Option<GhostTable>,
}

#[derive(Deserialize)]
struct GhostTable {
    url: Url,

    #[serde(default)]
    key: Option<String>,
}

#[derive(Deserialize)]
struct Theme {
    author_template: Vec<PathBuf>,
    article_template: Vec<PathBuf>,
    articles_template: Vec<PathBuf>,
    region_template: Vec<PathBuf>,
    tag_template: Vec<PathBuf>,
}

/// The site author named in the feed.
#[derive(Clone, Debug, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

/// Where content comes from.
#[derive(Clone, Debug)]
pub enum ContentSettings {
    /// A JSON snapshot.
    File(PathBuf),

    /// A Ghost Content API. Without a key, the key is read from
    /// [`GHOST_KEY_VAR`].
    Ghost { url: Url, key: Option<String> },
}

pub struct Config {
    pub title: String,
    pub site_root: Url,
    pub author: Option<Author>,
    pub page_size: usize,
    pub regions: Vec<String>,
    pub missing_pipe: MissingPipe,
    pub content: ContentSettings,
    pub author_template: Vec<PathBuf>,
    pub article_template: Vec<PathBuf>,
    pub articles_template: Vec<PathBuf>,
    pub region_template: Vec<PathBuf>,
    pub tag_template: Vec<PathBuf>,
    pub static_source_directory: PathBuf,
    pub output_directory: PathBuf,
    pub static_output_directory: PathBuf,
}

impl Config {
    /// Looks for a project file in `dir` and its parents. Without an explicit
    /// output directory, the site goes to [`DEFAULT_OUTPUT_DIR`] in the project
    /// directory.
    pub fn from_directory(dir: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            match Config::from_project_file(&path, output_directory) {
                Ok(config) => Ok(config),
                Err(e) => Err(anyhow!("Loading configuration: {:?}", e)),
            }
        } else {
            match dir.parent() {
                Some(dir) => Config::from_directory(dir, output_directory),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path, output_directory: Option<&Path>) -> Result<Config> {
        let project: Project = serde_yaml::from_reader(open(path, "project")?)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path
            )
        })?;
        let output_directory = match output_directory {
            Some(dir) => dir.to_owned(),
            None => project_root.join(DEFAULT_OUTPUT_DIR),
        };
        let theme_dir = project_root.join("theme");
        let theme: Theme = serde_yaml::from_reader(open(&theme_dir.join("theme.yaml"), "theme")?)?;
        let in_theme = |relpaths: Vec<PathBuf>| -> Vec<PathBuf> {
            relpaths.iter().map(|relpath| theme_dir.join(relpath)).collect()
        };

        Ok(Config {
            title: project.title,
            site_root: project.site_root,
            author: project.author,
            page_size: project.page_size.0,
            regions: project.regions.iter().map(|r| slug::slugify(r)).collect(),
            missing_pipe: project.missing_pipe,
            content: match project.content {
                ContentTable {
                    file: Some(file),
                    ghost: None,
                } => ContentSettings::File(project_root.join(file)),
                ContentTable {
                    file: None,
                    ghost: Some(GhostTable { url, key }),
                } => ContentSettings::Ghost { url, key },
                _ => {
                    return Err(anyhow!(
                        "`content` must set exactly one of `file` or `ghost`"
                    ))
                }
            },
            author_template: in_theme(theme.author_template),
            article_template: in_theme(theme.article_template),
            articles_template: in_theme(theme.articles_template),
            region_template: in_theme(theme.region_template),
            tag_template: in_theme(theme.tag_template),
            static_source_directory: theme_dir.join("static"),
            static_output_directory: output_directory.join("static"),
            output_directory,
        })
    }

    /// The template files for `template`, in concatenation order.
    pub fn template_files(&self, template: Template) -> &[PathBuf] {
        match template {
            Template::Author => &self.author_template,
            Template::Article => &self.article_template,
            Template::Articles => &self.articles_template,
            Template::Region => &self.region_template,
            Template::Tag => &self.tag_template,
        }
    }

    /// Builds the configured content source.
    pub fn source(&self) -> Result<Box<dyn ContentSource>> {
        match &self.content {
            ContentSettings::File(path) => Ok(Box::new(FileSource::new(path))),
            ContentSettings::Ghost { url, key } => {
                let key = match key {
                    Some(key) => key.clone(),
                    None => std::env::var(GHOST_KEY_VAR).map_err(|_| {
                        anyhow!("No Ghost key in `{}` and `{}` is unset", PROJECT_FILE, GHOST_KEY_VAR)
                    })?,
                };
                Ok(Box::new(GhostSource::new(url, key)?))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn project(dir: &Path, project_yaml: &str) -> std::io::Result<()> {
        fs::write(dir.join(PROJECT_FILE), project_yaml)?;
        fs::create_dir_all(dir.join("theme"))?;
        fs::write(
            dir.join("theme/theme.yaml"),
            "author_template: [base.html, author.html]\n\
             article_template: [article.html]\n\
             articles_template: [listing.html]\n\
             region_template: [listing.html]\n\
             tag_template: [listing.html]\n",
        )
    }

    #[test]
    fn test_from_directory_walks_up() -> Result<()> {
        let dir = tempfile::tempdir()?;
        project(
            dir.path(),
            "title: The Metric\n\
             site_root: https://example.org/\n\
             regions: [Latin America, asia]\n\
             content:\n  file: content.json\n",
        )?;
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested, None)?;
        assert_eq!("The Metric", config.title);
        assert_eq!(dir.path().join(DEFAULT_OUTPUT_DIR), config.output_directory);
        assert_eq!(10, config.page_size);
        assert_eq!(vec!["latin-america".to_owned(), "asia".to_owned()], config.regions);
        assert_eq!(MissingPipe::Empty, config.missing_pipe);
        assert_eq!(
            vec![dir.path().join("theme/base.html"), dir.path().join("theme/author.html")],
            config.template_files(Template::Author)
        );
        match &config.content {
            ContentSettings::File(path) => assert_eq!(&dir.path().join("content.json"), path),
            other => panic!("unexpected content settings: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_ghost_settings() -> Result<()> {
        let dir = tempfile::tempdir()?;
        project(
            dir.path(),
            "title: The Metric\n\
             site_root: https://example.org/\n\
             page_size: 12\n\
             missing_pipe: whole\n\
             content:\n  ghost:\n    url: https://cms.example.org\n    key: abc\n",
        )?;
        let config = Config::from_directory(dir.path(), Some(Path::new("/tmp/out")))?;
        assert_eq!(PathBuf::from("/tmp/out/static"), config.static_output_directory);
        assert_eq!(12, config.page_size);
        assert_eq!(MissingPipe::Whole, config.missing_pipe);
        assert!(config.source().is_ok());
        Ok(())
    }

    #[test]
    fn test_content_needs_exactly_one_source() -> Result<()> {
        let dir = tempfile::tempdir()?;
        project(
            dir.path(),
            "title: The Metric\n\
             site_root: https://example.org/\n\
             content: {}\n",
        )?;
        assert!(Config::from_project_file(&dir.path().join(PROJECT_FILE), Some(Path::new("/tmp/out"))).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_project_file(&dir.path().join(PROJECT_FILE), Some(Path::new("/tmp/out")));
        assert!(err.is_err());
    }
}
