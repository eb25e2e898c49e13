//! Seeds the one author the CMS never returns. The content API omits users who
//! have not authored any posts, yet their author page must exist. The record
//! is fixed; its derived fields are written out rather than derived.

use crate::author::Author;
use crate::content::Content;
use sha2::{Digest, Sha256};

/// The CMS-side identity of the seeded author.
pub const GHOST_ID: &str = "cameron";

/// The node type seeded authors are registered under. Part of the digest so
/// the id can't collide with a CMS id.
const NODE_TYPE: &str = "GhostAuthorManual";

/// Derives the stable id the seeded author is registered under.
pub fn node_id(ghost_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(NODE_TYPE.as_bytes());
    hasher.update(b":");
    hasher.update(ghost_id.as_bytes());
    hex::encode(hasher.finalize())
}

/// The seeded author record.
pub fn manual_author() -> Author {
    Author {
        id: node_id(GHOST_ID),
        slug: "cameron".to_owned(),
        name: "Cameron Cabo".to_owned(),
        bio: Some("Driven developer, designer, and product builder.".to_owned()),
        location: Some(String::new()),
        facebook: Some("https://www.facebook.com/cam.cabo".to_owned()),
        twitter: Some("https://www.twitter.com/cameroncabo".to_owned()),
        website: Some("https://www.cameroncabo.com".to_owned()),
        profile_image: Some("https://s3.amazonaws.com/the-metric/2020/03/prof.jpg".to_owned()),
        count: None,
        role: "Web Developer".to_owned(),
        loc: "Los Angeles".to_owned(),
        facebook_username: "cam.cabo".to_owned(),
        twitter_username: "cameroncabo".to_owned(),
    }
}

/// Registers the seeded author into `content`, replacing any earlier seed.
pub fn seed(content: &mut Content) {
    log::debug!("seeding manual author `{}`", GHOST_ID);
    content.manual_authors = vec![manual_author()];
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_node_id_is_stable() {
        assert_eq!(node_id(GHOST_ID), node_id(GHOST_ID));
        assert_ne!(node_id(GHOST_ID), node_id("someone-else"));
        assert_eq!(64, node_id(GHOST_ID).len());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let mut content = Content::default();
        seed(&mut content);
        seed(&mut content);
        assert_eq!(1, content.manual_authors.len());
        assert_eq!("cameron", content.manual_authors[0].slug);
        assert_eq!("Web Developer", content.manual_authors[0].role);
    }
}
