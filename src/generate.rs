//! Registers every page of the site into a [`PageSink`]:
//!
//! 1. one page per author (`/authors/{slug}`), seeded authors included;
//! 2. one page per article (`/articles/{slug}`) linking to its neighbours;
//! 3. the paginated archive (`/articles`, `/articles/2`, ...);
//! 4. one paginated listing per configured region (`/regions/{region}`);
//! 5. one paginated listing per remaining tag (`/tags/{tag}`).
//!
//! Listing sizes come from the post counts the CMS reports per tag, so a
//! listing always exists for a configured region even if nothing is tagged
//! with it yet.

use crate::content::Content;
use crate::derive;
use crate::page::{Context, Page, PageSink, Pagination, Scope, Template};
use crate::post::Post;
use std::collections::HashSet;
use std::fmt;

/// Generates pages from a [`Content`] graph.
pub struct Generator {
    /// The number of posts per listing page.
    page_size: usize,

    /// The region slugs in configuration order.
    regions: Vec<String>,

    region_set: HashSet<String>,
}

impl Generator {
    pub fn new(page_size: usize, regions: Vec<String>) -> Generator {
        let region_set = regions.iter().cloned().collect();
        Generator {
            page_size,
            regions,
            region_set,
        }
    }

    /// Registers all pages for `content` into `sink`. Generation is
    /// all-or-nothing: the first error aborts it.
    pub fn create_pages<S: PageSink>(&self, content: &Content, sink: &mut S) -> Result<()> {
        author_pages(content, sink);
        article_pages(&content.posts, sink);

        self.listing(sink, content.posts.len(), Scope::All)?;

        for region in &self.regions {
            self.listing(
                sink,
                content.tag_post_count(region),
                Scope::Region(region.clone()),
            )?;
        }

        for tag in content
            .tags
            .iter()
            .filter(|t| !derive::is_region(&t.slug, &self.region_set))
        {
            self.listing(sink, tag.post_count(), Scope::Tag(tag.slug.clone()))?;
        }
        Ok(())
    }

    fn listing<S, C>(&self, sink: &mut S, count: C, scope: Scope) -> Result<()>
    where
        S: PageSink,
        C: TryInto<usize> + fmt::Display + Copy,
    {
        let base_route = scope.base_route();
        self.paginate(sink, count, &base_route, scope)
    }

    /// Registers the listing pages for `count` items under `base_route`. The
    /// first page lives at `base_route` itself and page `n > 1` at
    /// `{base_route}/{n}`. There is always at least one page, rendered with
    /// the template of `scope`.
    pub fn paginate<S, C>(
        &self,
        sink: &mut S,
        count: C,
        base_route: &str,
        scope: Scope,
    ) -> Result<()>
    where
        S: PageSink,
        C: TryInto<usize> + fmt::Display + Copy,
    {
        let count: usize = count
            .try_into()
            .map_err(|_| Error::InvalidCount(count.to_string()))?;
        if !base_route.starts_with('/') {
            return Err(Error::InvalidBaseRoute(base_route.to_owned()));
        }
        if self.page_size == 0 {
            return Err(Error::InvalidPageSize);
        }

        let template = scope.template();
        let num_pages = count.div_ceil(self.page_size).max(1);
        for i in 0..num_pages {
            sink.create_page(Page {
                path: Pagination::route(base_route, i + 1),
                template,
                context: Context::Listing {
                    scope: scope.clone(),
                    pagination: Pagination {
                        limit: self.page_size,
                        skip: i * self.page_size,
                        num_pages,
                        current_page: i + 1,
                    },
                },
            });
        }
        log::debug!("{}: {} items on {} pages", base_route, count, num_pages);
        Ok(())
    }
}

/// Registers one page per author, CMS authors first.
fn author_pages<S: PageSink>(content: &Content, sink: &mut S) {
    for author in content.all_authors() {
        sink.create_page(Page {
            path: format!("/authors/{}", author.slug),
            template: Template::Author,
            context: Context::Author {
                slug: author.slug.clone(),
            },
        });
    }
}

/// Registers one page per article. `posts` is ordered newest first, so `next`
/// (the newer article) is the previous element and `prev` (the older one) the
/// following element. Navigation wraps around at both ends: the newest
/// article's `next` is the oldest and the oldest article's `prev` is the
/// newest.
fn article_pages<S: PageSink>(posts: &[Post], sink: &mut S) {
    for (i, post) in posts.iter().enumerate() {
        let next = match i {
            0 => &posts[posts.len() - 1],
            _ => &posts[i - 1],
        };
        let prev = match i + 1 >= posts.len() {
            true => &posts[0],
            false => &posts[i + 1],
        };
        sink.create_page(Page {
            path: format!("/articles/{}", post.slug),
            template: Template::Article,
            context: Context::Article {
                slug: post.slug.clone(),
                author_slugs: post.authors.iter().map(|a| a.slug.clone()).collect(),
                next: Box::new(next.summarize()),
                prev: Box::new(prev.summarize()),
            },
        });
    }
}

/// The result of a fallible page-generation operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a misuse of [`Generator::paginate`]. These are programming
/// errors and abort generation.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Returned when the item count isn't a non-negative integer.
    InvalidCount(String),

    /// Returned when the base route doesn't start with `/`.
    InvalidBaseRoute(String),

    /// Returned when the configured page size is zero.
    InvalidPageSize,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidCount(count) => {
                write!(f, "item count must be a non-negative number, got `{}`", count)
            }
            Error::InvalidBaseRoute(route) => write!(
                f,
                "base route should be a route of the form \"/articles\", got `{}`",
                route
            ),
            Error::InvalidPageSize => write!(f, "page size must be at least 1"),
        }
    }
}

impl std::error::Error for Error {}
