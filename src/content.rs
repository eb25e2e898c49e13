//! Defines [`Content`], the fully resident content graph a build works from,
//! and [`RawContent`], the payload a [`crate::source::ContentSource`] returns.

use crate::author::Author;
use crate::derive::MissingPipe;
use crate::post::Post;
use crate::seed;
use crate::tag::Tag;
use serde::Deserialize;
use std::collections::HashSet;

/// The content as returned by the CMS, before any field is derived.
#[derive(Debug, Default, Deserialize)]
pub struct RawContent {
    #[serde(default)]
    pub authors: Vec<Author>,

    #[serde(default)]
    pub posts: Vec<Post>,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// The content graph with derived fields filled in, posts ordered newest
/// first and the manual author seeded.
#[derive(Debug, Default)]
pub struct Content {
    pub authors: Vec<Author>,
    pub manual_authors: Vec<Author>,
    pub posts: Vec<Post>,
    pub tags: Vec<Tag>,
}

impl Content {
    pub fn load(raw: RawContent, regions: &HashSet<String>, missing_pipe: MissingPipe) -> Content {
        let RawContent {
            mut authors,
            mut posts,
            mut tags,
        } = raw;

        for author in authors.iter_mut() {
            author.augment(missing_pipe);
        }
        for post in posts.iter_mut() {
            post.augment(missing_pipe);
            for tag in post.tags.iter_mut() {
                tag.augment(regions);
            }
        }
        for tag in tags.iter_mut() {
            tag.augment(regions);
        }

        // Sources are asked for this order already; a stable sort keeps
        // same-instant posts in source order.
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let mut content = Content {
            authors,
            manual_authors: Vec::new(),
            posts,
            tags,
        };
        seed::seed(&mut content);
        log::info!(
            "loaded {} authors ({} seeded), {} posts, {} tags",
            content.authors.len() + content.manual_authors.len(),
            content.manual_authors.len(),
            content.posts.len(),
            content.tags.len(),
        );
        content
    }

    /// All authors with a page: CMS authors first, then seeded ones.
    pub fn all_authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter().chain(self.manual_authors.iter())
    }

    pub fn author(&self, slug: &str) -> Option<&Author> {
        self.all_authors().find(|a| a.slug == slug)
    }

    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// The post count the CMS reports for the tag, zero for unknown tags.
    pub fn tag_post_count(&self, slug: &str) -> u64 {
        self.tags
            .iter()
            .find(|t| t.slug == slug)
            .map(Tag::post_count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RAW: &str = r#"{
        "authors": [{"id": "a1", "slug": "jane", "name": "Jane", "location": "Paris | Editor"}],
        "posts": [
            {"id": "p1", "slug": "old", "title": "Old", "published_at": "2020-01-01T00:00:00Z"},
            {"id": "p2", "slug": "new", "title": "New", "published_at": "2020-03-01T00:00:00Z",
             "tags": [{"id": "t1", "slug": "asia", "name": "Asia"}]}
        ],
        "tags": [
            {"id": "t1", "slug": "asia", "name": "Asia", "count": {"posts": 1}},
            {"id": "t2", "slug": "science", "name": "Science"}
        ]
    }"#;

    fn load() -> Content {
        let raw: RawContent = serde_json::from_str(RAW).unwrap();
        let regions = ["asia".to_owned()].into_iter().collect();
        Content::load(raw, &regions, MissingPipe::Empty)
    }

    #[test]
    fn test_load_sorts_newest_first() {
        let content = load();
        let slugs: Vec<&str> = content.posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(vec!["new", "old"], slugs);
    }

    #[test]
    fn test_load_derives_fields() {
        let content = load();
        assert_eq!("Editor", content.authors[0].role);
        assert!(content.tags[0].is_region);
        assert!(!content.tags[1].is_region);
        assert!(content.posts[0].tags[0].is_region);
    }

    #[test]
    fn test_load_seeds_manual_author() {
        let content = load();
        assert!(content.author("cameron").is_some());
        assert_eq!(2, content.all_authors().count());
    }

    #[test]
    fn test_tag_post_count() {
        let content = load();
        assert_eq!(1, content.tag_post_count("asia"));
        assert_eq!(0, content.tag_post_count("science"));
        assert_eq!(0, content.tag_post_count("nowhere"));
    }
}
