//! The library code for `metric`, the build step of a news site whose content
//! lives in a headless CMS. A build breaks down into three steps:
//!
//! 1. Loading the content ([`crate::source`], [`crate::content`]): the whole
//!    content set is fetched once, computed fields are derived from the raw
//!    CMS text fields ([`crate::derive`]) and one author the CMS never returns
//!    is seeded ([`crate::seed`]).
//! 2. Registering pages ([`crate::generate`]): one page per author and per
//!    article, plus paginated listings for the archive, each region and each
//!    remaining tag.
//! 3. Rendering ([`crate::write`]): every registered page is templated and
//!    written to disk, alongside an Atom feed ([`crate::feed`]) and a keyword
//!    search index ([`crate::search`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod author;
pub mod build;
pub mod config;
pub mod content;
pub mod derive;
pub mod feed;
pub mod generate;
pub mod page;
pub mod post;
pub mod search;
pub mod seed;
pub mod source;
pub mod tag;
pub mod util;
mod value;
pub mod write;
