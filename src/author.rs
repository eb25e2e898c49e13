//! Defines the [`Author`] type. The CMS stores an author's location and role
//! in the single `location` field (`"Los Angeles | Web Developer"`) and social
//! profiles as full URLs; [`Author::augment`] splits those into display
//! fields.

use crate::derive::{self, MissingPipe, DEFAULT_ROLE};
use crate::tag::Count;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Author {
    pub id: String,
    pub slug: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub bio: Option<String>,

    /// `"{location} | {role}"`; see [`Author::loc`] and [`Author::role`].
    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub facebook: Option<String>,

    #[serde(default)]
    pub twitter: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub profile_image: Option<String>,

    #[serde(default, skip_serializing)]
    pub count: Option<Count>,

    /// Derived: the text after the pipe in `location`.
    #[serde(default)]
    pub role: String,

    /// Derived: the text before the pipe in `location`.
    #[serde(default)]
    pub loc: String,

    /// Derived: the last path segment of `facebook`.
    #[serde(default, rename = "facebookUsername")]
    pub facebook_username: String,

    /// Derived: the last path segment of `twitter`.
    #[serde(default, rename = "twitterUsername")]
    pub twitter_username: String,
}

impl Author {
    /// Fills in the derived fields from the raw CMS fields.
    pub fn augment(&mut self, missing_pipe: MissingPipe) {
        let location = self.location.as_deref().unwrap_or("");
        self.role = derive::after_pipe(location, DEFAULT_ROLE);
        self.loc = derive::before_pipe(location, missing_pipe);
        self.facebook_username = derive::parse_username(self.facebook.as_deref().unwrap_or(""));
        self.twitter_username = derive::parse_username(self.twitter.as_deref().unwrap_or(""));
    }

    pub fn post_count(&self) -> u64 {
        self.count.map(|c| c.posts).unwrap_or(0)
    }
}
