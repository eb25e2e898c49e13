//! Defines [`Page`], a route registration, and the [`PageSink`] pages are
//! registered into. Registration is write-only: a sink returns nothing, and
//! only the completion of the whole generation step matters.

use crate::post::PostSummary;
use serde::Serialize;
use std::fmt;

/// The template a page is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Template {
    Author,
    Article,
    Articles,
    Region,
    Tag,
}

impl Template {
    pub const ALL: [Template; 5] = [
        Template::Author,
        Template::Article,
        Template::Articles,
        Template::Region,
        Template::Tag,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Template::Author => "Author",
            Template::Article => "Article",
            Template::Articles => "Articles",
            Template::Region => "Region",
            Template::Tag => "Tag",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which posts a listing page draws from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The full archive.
    All,

    /// The posts tagged with a region.
    Region(String),

    /// The posts tagged with a non-region tag.
    Tag(String),
}

impl Scope {
    /// The route of the first listing page.
    pub fn base_route(&self) -> String {
        match self {
            Scope::All => "/articles".to_owned(),
            Scope::Region(region) => format!("/regions/{}", region),
            Scope::Tag(tag) => format!("/tags/{}", tag),
        }
    }

    /// The template listing pages of this scope are rendered with.
    pub fn template(&self) -> Template {
        match self {
            Scope::All => Template::Articles,
            Scope::Region(_) => Template::Region,
            Scope::Tag(_) => Template::Tag,
        }
    }
}

/// The pagination cursor of a listing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The page size.
    pub limit: usize,

    /// The zero-based offset of the page's first item.
    pub skip: usize,

    /// The total number of pages, at least 1.
    pub num_pages: usize,

    /// The one-based page number.
    pub current_page: usize,
}

impl Pagination {
    /// The route of the listing page numbered `page` (one-based).
    pub fn route(base_route: &str, page: usize) -> String {
        match page {
            1 => base_route.to_owned(),
            _ => format!("{}/{}", base_route, page),
        }
    }

    /// The route of the previous listing page, if any.
    pub fn prev_route(&self, base_route: &str) -> Option<String> {
        match self.current_page > 1 {
            true => Some(Pagination::route(base_route, self.current_page - 1)),
            false => None,
        }
    }

    /// The route of the next listing page, if any.
    pub fn next_route(&self, base_route: &str) -> Option<String> {
        match self.current_page < self.num_pages {
            true => Some(Pagination::route(base_route, self.current_page + 1)),
            false => None,
        }
    }
}

/// The payload a page's template receives.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Context {
    Author {
        slug: String,
    },
    Article {
        slug: String,
        #[serde(rename = "authorSlugs")]
        author_slugs: Vec<String>,
        next: Box<PostSummary>,
        prev: Box<PostSummary>,
    },
    Listing {
        scope: Scope,
        #[serde(flatten)]
        pagination: Pagination,
    },
}

/// A registered route.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    pub path: String,
    pub template: Template,
    pub context: Context,
}

/// Receives page registrations.
pub trait PageSink {
    fn create_page(&mut self, page: Page);
}

/// A [`PageSink`] that keeps every registered page in registration order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Pages(pub Vec<Page>);

impl PageSink for Pages {
    fn create_page(&mut self, page: Page) {
        log::trace!("registered {} ({})", page.path, page.template);
        self.0.push(page);
    }
}

impl Pages {
    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn with_template(&self, template: Template) -> impl Iterator<Item = &Page> {
        self.0.iter().filter(move |p| p.template == template)
    }

    /// Serializes the pages as a pretty-printed JSON manifest.
    pub fn to_manifest(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_listing_manifest() -> serde_json::Result<()> {
        let mut pages = Pages::default();
        pages.create_page(Page {
            path: "/regions/asia/2".to_owned(),
            template: Template::Region,
            context: Context::Listing {
                scope: Scope::Region("asia".to_owned()),
                pagination: Pagination {
                    limit: 10,
                    skip: 10,
                    num_pages: 2,
                    current_page: 2,
                },
            },
        });
        let manifest: serde_json::Value = serde_json::from_str(&pages.to_manifest()?)?;
        let context = &manifest[0]["context"];
        assert_eq!("Region", manifest[0]["template"]);
        assert_eq!("asia", context["scope"]["region"]);
        assert_eq!(10, context["skip"]);
        assert_eq!(2, context["numPages"]);
        assert_eq!(2, context["currentPage"]);
        Ok(())
    }

    #[test]
    fn test_pagination_routes() {
        let first = Pagination {
            limit: 10,
            skip: 0,
            num_pages: 3,
            current_page: 1,
        };
        let second = Pagination {
            skip: 10,
            current_page: 2,
            ..first
        };
        let last = Pagination {
            skip: 20,
            current_page: 3,
            ..first
        };
        let base = Scope::Tag("science".to_owned()).base_route();
        assert_eq!(None, first.prev_route(&base));
        assert_eq!(Some("/tags/science/2".to_owned()), first.next_route(&base));
        assert_eq!(Some("/tags/science".to_owned()), second.prev_route(&base));
        assert_eq!(Some("/tags/science/2".to_owned()), last.prev_route(&base));
        assert_eq!(None, last.next_route(&base));
    }

    #[test]
    fn test_author_manifest() -> serde_json::Result<()> {
        let mut pages = Pages::default();
        pages.create_page(Page {
            path: "/authors/jane".to_owned(),
            template: Template::Author,
            context: Context::Author {
                slug: "jane".to_owned(),
            },
        });
        let manifest: serde_json::Value = serde_json::from_str(&pages.to_manifest()?)?;
        assert_eq!("jane", manifest[0]["context"]["slug"]);
        assert_eq!(1, pages.with_template(Template::Author).count());
        Ok(())
    }
}
