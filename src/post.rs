//! Defines the [`Post`] and [`PostSummary`] types. A post's `excerpt` is
//! overloaded as `"{subtitle} | {feature image caption}"`; see
//! [`Post::augment`].

use crate::author::Author;
use crate::derive::{self, MissingPipe};
use crate::tag::Tag;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The format of the human-readable publish date, e.g. `Mar 10, 2020`.
pub const DATE_FORMAT: &str = "%b %d, %Y";

/// A responsive image descriptor produced by an external image pipeline. It
/// is passed through to templates untouched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FluidImage {
    pub src: String,
    #[serde(default)]
    pub src_set: String,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub sizes: String,
    #[serde(default)]
    pub base64: Option<String>,
}

/// Represents a CMS post (an article).
#[derive(Clone, Debug, Deserialize)]
pub struct Post {
    pub id: String,
    pub slug: String,
    pub title: String,

    /// `"{subtitle} | {feature image caption}"`.
    #[serde(default)]
    pub excerpt: Option<String>,

    /// The rendered body markup.
    #[serde(default)]
    pub html: Option<String>,

    pub published_at: DateTime<FixedOffset>,

    /// Estimated reading time in minutes.
    #[serde(default)]
    pub reading_time: u32,

    #[serde(default)]
    pub feature_image: Option<String>,

    #[serde(default, alias = "localImage")]
    pub image: Option<FluidImage>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(default)]
    pub authors: Vec<Author>,

    /// Derived: the text before the pipe in `excerpt`.
    #[serde(skip)]
    pub subtitle: String,

    /// Derived: the text after the pipe in `excerpt`.
    #[serde(skip)]
    pub feature_image_caption: String,
}

impl Post {
    /// Fills in the derived fields of the post and of its embedded authors.
    pub fn augment(&mut self, missing_pipe: MissingPipe) {
        let excerpt = self.excerpt.as_deref().unwrap_or("");
        self.subtitle = derive::before_pipe(excerpt, missing_pipe);
        self.feature_image_caption = derive::after_pipe(excerpt, "");
        for author in self.authors.iter_mut() {
            author.augment(missing_pipe);
        }
    }

    /// The publish date as shown on the site.
    pub fn date(&self) -> String {
        self.published_at.format(DATE_FORMAT).to_string()
    }

    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }

    pub fn has_author(&self, slug: &str) -> bool {
        self.authors.iter().any(|a| a.slug == slug)
    }

    pub fn summarize(&self) -> PostSummary {
        PostSummary::from(self)
    }
}

/// A reference to another author or tag as embedded in a [`PostSummary`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reference {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// The fields of a post that neighbouring article pages link to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub published_at: String,
    pub reading_time: u32,
    pub image: Option<FluidImage>,
    pub tags: Vec<Reference>,
    pub authors: Vec<Reference>,
    pub feature_image: Option<String>,
}

impl From<&Post> for PostSummary {
    fn from(p: &Post) -> PostSummary {
        PostSummary {
            id: p.id.clone(),
            slug: p.slug.clone(),
            title: p.title.clone(),
            subtitle: p.subtitle.clone(),
            published_at: p.date(),
            reading_time: p.reading_time,
            image: p.image.clone(),
            tags: p
                .tags
                .iter()
                .map(|t| Reference {
                    id: t.id.clone(),
                    slug: t.slug.clone(),
                    name: t.name.clone(),
                })
                .collect(),
            authors: p
                .authors
                .iter()
                .map(|a| Reference {
                    id: a.id.clone(),
                    slug: a.slug.clone(),
                    name: a.name.clone(),
                })
                .collect(),
            feature_image: p.feature_image.clone(),
        }
    }
}
