//! Support for creating Atom feeds from a list of posts.

use crate::config::Author;
use crate::post::Post;
use atom_syndication::{Category, Entry, Error as AtomError, Feed, Link, Person, Text};
use chrono::Utc;
use std::fmt;
use std::io::Write;
use url::Url;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub author: Option<Author>,
    pub home_page: Url,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s and writes the result to a [`std::io::Write`].
pub fn write_feed<W: Write>(config: &FeedConfig, posts: &[Post], w: W) -> Result<()> {
    feed(config, posts)?.write_to(w)?;
    Ok(())
}

fn feed(config: &FeedConfig, posts: &[Post]) -> Result<Feed> {
    // The newest post dates the feed; an empty feed is as fresh as the build.
    let updated = match posts.first() {
        Some(post) => post.published_at,
        None => Utc::now().into(),
    };
    Ok(Feed {
        title: Text::from(config.title.as_str()),
        id: config.home_page.to_string(),
        updated,
        authors: author_to_people(&config.author),
        links: vec![Link {
            href: config.home_page.to_string(),
            rel: "alternate".to_owned(),
            ..Link::default()
        }],
        entries: feed_entries(config, posts)?,
        ..Feed::default()
    })
}

fn feed_entries(config: &FeedConfig, posts: &[Post]) -> Result<Vec<Entry>> {
    let mut entries: Vec<Entry> = Vec::with_capacity(posts.len());
    for post in posts {
        let url = config.home_page.join(&format!("articles/{}", post.slug))?;
        let authors = match post.authors.is_empty() {
            true => author_to_people(&config.author),
            false => post
                .authors
                .iter()
                .map(|a| Person {
                    name: a.name.clone(),
                    ..Person::default()
                })
                .collect(),
        };

        entries.push(Entry {
            id: url.to_string(),
            title: Text::from(post.title.as_str()),
            updated: post.published_at,
            published: Some(post.published_at),
            authors,
            links: vec![Link {
                href: url.to_string(),
                rel: "alternate".to_owned(),
                ..Link::default()
            }],
            summary: match post.subtitle.is_empty() {
                true => None,
                false => Some(Text::from(post.subtitle.as_str())),
            },
            categories: post
                .tags
                .iter()
                .map(|t| Category {
                    term: t.slug.clone(),
                    label: Some(t.name.clone()),
                    ..Category::default()
                })
                .collect(),
            ..Entry::default()
        })
    }
    Ok(entries)
}

fn author_to_people(author: &Option<Author>) -> Vec<Person> {
    match author {
        Some(author) => vec![Person {
            name: author.name.clone(),
            email: author.email.clone(),
            ..Person::default()
        }],
        None => Vec::new(),
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants inlude I/O, Atom, and
/// URL issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an Atom-related error.
    Atom(AtomError),

    /// Returned when an entry URL can't be built.
    UrlParse(url::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Atom(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Atom(err) => Some(err),
            Error::UrlParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<AtomError> for Error {
    /// Converts [`AtomError`]s into [`Error`]. This allows us to use the `?`
    /// operator in fallible feed operations.
    fn from(err: AtomError) -> Error {
        Error::Atom(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
