//! Defines the [`Tag`] type, which represents a CMS tag. Tags whose slug is one
//! of the configured regions are listed under `/regions/` instead of `/tags/`.

use crate::derive;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Represents a CMS tag, either from the tag collection or embedded in a
/// [`crate::post::Post`]. Embedded tags carry no post count.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Tag {
    #[serde(default)]
    pub id: String,

    pub slug: String,

    #[serde(default)]
    pub name: String,

    /// The number of posts carrying the tag, as reported by the CMS.
    #[serde(default, skip_serializing)]
    pub count: Option<Count>,

    /// Derived: whether `slug` is one of the configured regions.
    #[serde(default, rename = "isRegion")]
    pub is_region: bool,
}

/// The aggregate counts the CMS attaches to authors and tags.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Count {
    #[serde(default)]
    pub posts: u64,
}

impl Tag {
    /// Fills in the derived fields.
    pub fn augment(&mut self, regions: &HashSet<String>) {
        self.is_region = derive::is_region(&self.slug, regions);
    }

    /// The post count, treating a missing count as zero.
    pub fn post_count(&self) -> u64 {
        self.count.map(|c| c.posts).unwrap_or(0)
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating directly to the `slug`
    /// field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by delegating directly
    /// to the `slug` field.
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
impl Eq for Tag {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_deserialize_cms_tag() -> serde_json::Result<()> {
        let mut tag: Tag = serde_json::from_str(
            r#"{"id": "1", "slug": "asia", "name": "Asia", "count": {"posts": 4}}"#,
        )?;
        tag.augment(&["asia".to_owned()].into_iter().collect());
        assert!(tag.is_region);
        assert_eq!(4, tag.post_count());
        Ok(())
    }

    #[test]
    fn test_missing_count_is_zero() -> serde_json::Result<()> {
        let tag: Tag = serde_json::from_str(r#"{"slug": "science"}"#)?;
        assert_eq!(0, tag.post_count());
        Ok(())
    }

    #[test]
    fn test_non_numeric_count_is_rejected() {
        let result: serde_json::Result<Tag> =
            serde_json::from_str(r#"{"slug": "science", "count": {"posts": "many"}}"#);
        assert!(result.is_err());
    }
}
