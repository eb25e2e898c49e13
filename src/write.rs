//! Renders registered [`Page`]s to HTML files. Each page's template receives a
//! [`Value::Object`] with the page's own `item`, links to the neighbouring
//! pages (`prev`, `next`) and the site-wide `site_title`, `home_page` and
//! `static_url`.

use crate::content::Content;
use crate::page::{Context, Page, Pages, Pagination, Scope, Template};
use crate::post::{Post, PostSummary};
use crate::value::array;
use gtmpl::Template as Gtmpl;
use gtmpl_value::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// The parsed template for each [`Template`].
pub type Templates = HashMap<Template, Gtmpl>;

/// Responsible for resolving, templating, and writing pages to disk.
pub struct Writer<'a> {
    pub templates: &'a Templates,

    /// The content the pages are resolved against.
    pub content: &'a Content,

    /// The directory pages are written into. A page at `/articles/foo` lands
    /// in `{output_directory}/articles/foo/index.html`.
    pub output_directory: &'a Path,

    /// The URL the output directory is served at. Ends in a slash.
    pub site_root: &'a Url,

    pub site_title: &'a str,
}

impl Writer<'_> {
    /// Renders every page and writes the results to disk.
    pub fn write_pages(&self, pages: &Pages) -> Result<()> {
        let mut seen_dirs: HashSet<PathBuf> = HashSet::new();
        for page in pages.iter() {
            let dir = self.page_directory(page);
            if seen_dirs.insert(dir.clone()) {
                std::fs::create_dir_all(&dir)?;
            }
            self.write_page(page, &dir.join("index.html"))?;
        }
        log::info!("wrote {} pages", pages.len());
        Ok(())
    }

    fn page_directory(&self, page: &Page) -> PathBuf {
        self.output_directory.join(page.path.trim_start_matches('/'))
    }

    /// The absolute URL of the page at `path`.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.site_root.join(path.trim_start_matches('/'))?)
    }

    /// Takes a single [`Page`], templates it, and writes it to `file_path`.
    fn write_page(&self, page: &Page, file_path: &Path) -> Result<()> {
        let template = self
            .templates
            .get(&page.template)
            .ok_or(Error::MissingTemplate(page.template))?;
        let mut value = self.page_value(page)?;
        if let Value::Object(obj) = &mut value {
            obj.insert("path".to_owned(), page.path.as_str().into());
            obj.insert("site_title".to_owned(), self.site_title.into());
            obj.insert("home_page".to_owned(), self.site_root.as_str().into());
            obj.insert(
                "static_url".to_owned(),
                self.url("static/")?.as_str().into(),
            );
        }
        template
            .execute(
                &mut std::fs::File::create(file_path)?,
                &gtmpl::Context::from(value),
            )
            .map_err(|e| Error::Template(format!("{}: {}", page.path, e)))?;
        Ok(())
    }

    /// Resolves the data a page displays and converts it into a [`Value`]
    /// with fields `item`, `prev` and `next`.
    fn page_value(&self, page: &Page) -> Result<Value> {
        let unresolved = |what: &str| Error::Unresolved {
            path: page.path.clone(),
            what: what.to_owned(),
        };
        let (item, prev, next) = match &page.context {
            Context::Author { slug } => {
                let author = self.content.author(slug).ok_or_else(|| unresolved(slug))?;
                let posts: Vec<&Post> = self
                    .content
                    .posts
                    .iter()
                    .filter(|p| p.has_author(slug))
                    .collect();
                let mut item = Value::from(author);
                if let Value::Object(obj) = &mut item {
                    obj.insert("posts".to_owned(), array(posts));
                }
                (item, Value::Nil, Value::Nil)
            }
            Context::Article {
                slug,
                author_slugs,
                next,
                prev,
            } => {
                let post = self.content.post(slug).ok_or_else(|| unresolved(slug))?;
                let mut item = Value::from(post);
                if let Value::Object(obj) = &mut item {
                    // Full profiles where we have them; the embedded author
                    // otherwise.
                    let authors: Vec<Value> = author_slugs
                        .iter()
                        .filter_map(|s| {
                            self.content
                                .author(s)
                                .or_else(|| post.authors.iter().find(|a| &a.slug == s))
                        })
                        .map(Value::from)
                        .collect();
                    obj.insert("authors".to_owned(), Value::Array(authors));
                }
                (item, self.article_link(prev)?, self.article_link(next)?)
            }
            Context::Listing { scope, pagination } => {
                let posts = self.listing_posts(scope, pagination);
                let base_route = scope.base_route();
                let mut item = Value::from(scope);
                if let Value::Object(obj) = &mut item {
                    obj.insert("posts".to_owned(), array(posts));
                    obj.insert("pagination".to_owned(), pagination.into());
                }
                (
                    item,
                    self.route_link(pagination.prev_route(&base_route))?,
                    self.route_link(pagination.next_route(&base_route))?,
                )
            }
        };

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("item".to_owned(), item);
        m.insert("prev".to_owned(), prev);
        m.insert("next".to_owned(), next);
        Ok(Value::Object(m))
    }

    /// The posts shown on one listing page: the scope's posts, newest first,
    /// from `skip` up to `limit` of them.
    fn listing_posts(&self, scope: &Scope, pagination: &Pagination) -> Vec<&'_ Post> {
        self.content
            .posts
            .iter()
            .filter(|p| match scope {
                Scope::All => true,
                Scope::Region(slug) | Scope::Tag(slug) => p.has_tag(slug),
            })
            .skip(pagination.skip)
            .take(pagination.limit)
            .collect()
    }

    /// A neighbouring article's summary with its absolute `url` added.
    fn article_link(&self, summary: &PostSummary) -> Result<Value> {
        let mut value = Value::from(summary);
        if let Value::Object(obj) = &mut value {
            let url = self.url(&format!("/articles/{}", summary.slug))?;
            obj.insert("url".to_owned(), url.as_str().into());
        }
        Ok(value)
    }

    fn route_link(&self, route: Option<String>) -> Result<Value> {
        Ok(match route {
            Some(route) => self.url(&route)?.as_str().into(),
            None => Value::Nil,
        })
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(String),

    /// Returned when no template was loaded for a page's [`Template`].
    MissingTemplate(Template),

    /// Returned when a page refers to content that doesn't exist.
    Unresolved { path: String, what: String },

    /// Returned when a page URL can't be built.
    UrlParse(url::ParseError),

    /// An error writing the output files.
    Io(io::Error),
}

impl From<io::Error> for Error {
    /// Converts an [`io::Error`] into an [`Error`]. This allows us to use the
    /// `?` operator for fallible I/O operations.
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => err.fmt(f),
            Error::MissingTemplate(template) => write!(f, "no `{}` template", template),
            Error::Unresolved { path, what } => {
                write!(f, "page `{}` refers to unknown `{}`", path, what)
            }
            Error::UrlParse(err) => err.fmt(f),
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::content::RawContent;
    use crate::derive::MissingPipe;
    use crate::generate::Generator;

    fn content() -> Content {
        let raw: RawContent = serde_json::from_str(
            r#"{
                "authors": [{"id": "a1", "slug": "jane", "name": "Jane", "location": "Paris | Editor"}],
                "posts": [
                    {"id": "1", "slug": "one", "title": "One", "published_at": "2020-01-01T00:00:00Z",
                     "excerpt": "First | caption", "html": "<p>one</p>",
                     "tags": [{"slug": "asia", "name": "Asia"}],
                     "authors": [{"id": "a1", "slug": "jane", "name": "Jane"}]},
                    {"id": "2", "slug": "two", "title": "Two", "published_at": "2020-02-01T00:00:00Z",
                     "tags": [{"slug": "science", "name": "Science"}],
                     "authors": [{"id": "a1", "slug": "jane", "name": "Jane"}]},
                    {"id": "3", "slug": "three", "title": "Three", "published_at": "2020-03-01T00:00:00Z",
                     "tags": [{"slug": "asia", "name": "Asia"}]}
                ],
                "tags": [
                    {"slug": "asia", "name": "Asia", "count": {"posts": 2}},
                    {"slug": "science", "name": "Science", "count": {"posts": 1}}
                ]
            }"#,
        )
        .unwrap();
        Content::load(raw, &["asia".to_owned()].into_iter().collect(), MissingPipe::Empty)
    }

    fn templates() -> Templates {
        let mut templates = Templates::new();
        for (template, text) in [
            (Template::Author, "{{.item.name}} ({{.item.role}}):{{range .item.posts}} {{.slug}}{{end}}"),
            (Template::Article, "{{.item.title}}|{{.item.subtitle}}|{{.prev.slug}}|{{.next.url}}"),
            (Template::Articles, "{{range .item.posts}}{{.slug}} {{end}}|{{if .next}}{{.next}}{{end}}"),
            (Template::Region, "{{.item.region}}:{{range .item.posts}} {{.slug}}{{end}}"),
            (Template::Tag, "{{.item.tag}}:{{range .item.posts}} {{.slug}}{{end}}"),
        ] {
            let mut t = Gtmpl::default();
            t.parse(text).unwrap();
            templates.insert(template, t);
        }
        templates
    }

    #[test]
    fn test_write_pages() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = content();
        let mut pages = Pages::default();
        Generator::new(2, vec!["asia".to_owned()]).create_pages(&content, &mut pages)?;

        let out = tempfile::tempdir()?;
        let site_root = Url::parse("https://example.org/")?;
        let templates = templates();
        Writer {
            templates: &templates,
            content: &content,
            output_directory: out.path(),
            site_root: &site_root,
            site_title: "The Metric",
        }
        .write_pages(&pages)?;

        let read = |path: &str| std::fs::read_to_string(out.path().join(path).join("index.html"));
        assert_eq!("Jane (Editor): two one", read("authors/jane")?);
        assert_eq!("Cameron Cabo (Web Developer):", read("authors/cameron")?);
        assert_eq!(
            "One|First|three|https://example.org/articles/two",
            read("articles/one")?
        );
        assert_eq!(
            "three two |https://example.org/articles/2",
            read("articles")?
        );
        assert_eq!("one |", read("articles/2")?);
        assert_eq!("asia: three one", read("regions/asia")?);
        assert_eq!("science: two", read("tags/science")?);
        Ok(())
    }

    #[test]
    fn test_missing_template() {
        let content = content();
        let mut pages = Pages::default();
        Generator::new(10, Vec::new()).create_pages(&content, &mut pages).unwrap();

        let out = tempfile::tempdir().unwrap();
        let site_root = Url::parse("https://example.org/").unwrap();
        let templates = Templates::new();
        let err = Writer {
            templates: &templates,
            content: &content,
            output_directory: out.path(),
            site_root: &site_root,
            site_title: "The Metric",
        }
        .write_pages(&pages)
        .unwrap_err();
        assert!(matches!(err, Error::MissingTemplate(Template::Author)));
    }
}
