//! Derives computed fields from raw CMS text fields. The CMS only offers a
//! handful of free-text fields, so some of them are overloaded: an author's
//! `location` is `"{location} | {role}"` and a post's `excerpt` is
//! `"{subtitle} | {feature image caption}"`. Social links are full URLs from
//! which only the trailing username is displayed.

use serde::Deserialize;
use std::collections::HashSet;

const PIPE: char = '|';

/// What [`before_pipe`] returns when its input has no `|`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPipe {
    /// Returns the empty string. This is what the site has always rendered:
    /// the text before a separator that isn't there is empty.
    Empty,

    /// Returns the whole (trimmed) input.
    Whole,
}

impl Default for MissingPipe {
    fn default() -> Self {
        MissingPipe::Empty
    }
}

/// Returns the trimmed text before the first `|`. Empty input yields `""`;
/// input without a `|` is handled according to `mode`.
pub fn before_pipe(s: &str, mode: MissingPipe) -> String {
    if s.is_empty() {
        return String::new();
    }
    match s.find(PIPE) {
        Some(index) => s[..index].trim().to_owned(),
        None => match mode {
            MissingPipe::Empty => String::new(),
            MissingPipe::Whole => s.trim().to_owned(),
        },
    }
}

/// Returns the trimmed text after the first `|`, or `default` if the input is
/// empty or has no `|`.
pub fn after_pipe(s: &str, default: &str) -> String {
    match s.find(PIPE) {
        Some(index) => s[index + 1..].trim().to_owned(),
        None => default.to_owned(),
    }
}

/// Returns the last path segment of a social link, e.g. `foo` for
/// `https://twitter.com/foo`. Input without a `/` is returned trimmed.
pub fn parse_username(s: &str) -> String {
    match s.rfind('/') {
        Some(index) => s[index + 1..].trim().to_owned(),
        None => s.trim().to_owned(),
    }
}

/// Whether the tag identified by `slug` is one of the configured regions.
pub fn is_region(slug: &str, regions: &HashSet<String>) -> bool {
    regions.contains(slug)
}

/// Role shown for authors whose `location` carries no `| role` suffix.
pub const DEFAULT_ROLE: &str = "Contributor";

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_after_pipe() {
        assert_eq!("b", after_pipe("a|b", ""));
        assert_eq!("Editor", after_pipe("Paris | Editor", DEFAULT_ROLE));
        assert_eq!("default", after_pipe("a", "default"));
        assert_eq!("x", after_pipe("", "x"));
    }

    #[test]
    fn test_after_pipe_only_splits_on_first_pipe() {
        assert_eq!("b | c", after_pipe("a | b | c", ""));
    }

    #[test]
    fn test_before_pipe_with_separator() {
        for mode in [MissingPipe::Empty, MissingPipe::Whole] {
            assert_eq!("Los Angeles", before_pipe(" Los Angeles | Editor", mode));
            assert_eq!("", before_pipe("| caption", mode));
            assert_eq!("", before_pipe("", mode));
        }
    }

    #[test]
    fn test_before_pipe_missing_separator_empty() {
        assert_eq!("", before_pipe("Los Angeles", MissingPipe::Empty));
    }

    #[test]
    fn test_before_pipe_missing_separator_whole() {
        assert_eq!(
            "Los Angeles",
            before_pipe("  Los Angeles ", MissingPipe::Whole)
        );
    }

    #[test]
    fn test_parse_username() {
        assert_eq!("foo", parse_username("https://twitter.com/foo"));
        assert_eq!("foo", parse_username("foo"));
        assert_eq!("", parse_username(""));
        assert_eq!("cam.cabo", parse_username("https://www.facebook.com/cam.cabo "));
        assert_eq!("", parse_username("https://twitter.com/"));
    }

    #[test]
    fn test_is_region() {
        let regions: HashSet<String> = ["asia".to_owned()].into_iter().collect();
        assert!(is_region("asia", &regions));
        assert!(!is_region("politics", &regions));
    }
}
