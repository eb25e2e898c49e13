//! Conversions from content types into template [`Value`]s.

use crate::author::Author;
use crate::page::{Pagination, Scope};
use crate::post::{FluidImage, Post, PostSummary, Reference};
use crate::tag::Tag;
use gtmpl_value::Value;
use std::collections::HashMap;

fn object<const N: usize>(fields: [(&str, Value); N]) -> Value {
    let m: HashMap<String, Value> = fields.into_iter().map(|(k, v)| (k.to_owned(), v)).collect();
    Value::Object(m)
}

fn optional<T: Into<Value>>(opt: Option<T>) -> Value {
    match opt {
        Some(v) => v.into(),
        None => Value::Nil,
    }
}

fn optional_str(opt: &Option<String>) -> Value {
    optional(opt.as_deref())
}

pub fn array<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>) -> Value
where
    Value: From<&'a T>,
{
    Value::Array(items.into_iter().map(Value::from).collect())
}

impl From<&Author> for Value {
    fn from(a: &Author) -> Value {
        object([
            ("id", a.id.as_str().into()),
            ("slug", a.slug.as_str().into()),
            ("name", a.name.as_str().into()),
            ("bio", optional_str(&a.bio)),
            ("website", optional_str(&a.website)),
            ("profile_image", optional_str(&a.profile_image)),
            ("facebook", optional_str(&a.facebook)),
            ("twitter", optional_str(&a.twitter)),
            ("postCount", a.post_count().into()),
            ("role", a.role.as_str().into()),
            ("loc", a.loc.as_str().into()),
            ("facebookUsername", a.facebook_username.as_str().into()),
            ("twitterUsername", a.twitter_username.as_str().into()),
        ])
    }
}

impl From<&Tag> for Value {
    fn from(t: &Tag) -> Value {
        object([
            ("id", t.id.as_str().into()),
            ("slug", t.slug.as_str().into()),
            ("name", t.name.as_str().into()),
            ("isRegion", t.is_region.into()),
        ])
    }
}

impl From<&Reference> for Value {
    fn from(r: &Reference) -> Value {
        object([
            ("id", r.id.as_str().into()),
            ("slug", r.slug.as_str().into()),
            ("name", r.name.as_str().into()),
        ])
    }
}

impl From<&FluidImage> for Value {
    fn from(i: &FluidImage) -> Value {
        object([
            ("src", i.src.as_str().into()),
            ("srcSet", i.src_set.as_str().into()),
            ("aspectRatio", i.aspect_ratio.into()),
            ("sizes", i.sizes.as_str().into()),
            ("base64", optional_str(&i.base64)),
        ])
    }
}

impl From<&PostSummary> for Value {
    fn from(p: &PostSummary) -> Value {
        object([
            ("id", p.id.as_str().into()),
            ("slug", p.slug.as_str().into()),
            ("title", p.title.as_str().into()),
            ("subtitle", p.subtitle.as_str().into()),
            ("published_at", p.published_at.as_str().into()),
            ("reading_time", p.reading_time.into()),
            ("image", optional(p.image.as_ref())),
            ("tags", array(&p.tags)),
            ("authors", array(&p.authors)),
            ("feature_image", optional_str(&p.feature_image)),
        ])
    }
}

impl From<&Post> for Value {
    /// Converts a full post for its article page: the summary fields plus the
    /// body, the caption and full author profiles.
    fn from(p: &Post) -> Value {
        object([
            ("id", p.id.as_str().into()),
            ("slug", p.slug.as_str().into()),
            ("title", p.title.as_str().into()),
            ("subtitle", p.subtitle.as_str().into()),
            ("featureImageCaption", p.feature_image_caption.as_str().into()),
            ("excerpt", optional_str(&p.excerpt)),
            ("html", optional_str(&p.html)),
            ("published_at", p.date().into()),
            ("reading_time", p.reading_time.into()),
            ("image", optional(p.image.as_ref())),
            ("tags", array(&p.tags)),
            ("authors", array(&p.authors)),
            ("feature_image", optional_str(&p.feature_image)),
        ])
    }
}

impl From<&Pagination> for Value {
    fn from(p: &Pagination) -> Value {
        object([
            ("limit", (p.limit as u64).into()),
            ("skip", (p.skip as u64).into()),
            ("numPages", (p.num_pages as u64).into()),
            ("currentPage", (p.current_page as u64).into()),
        ])
    }
}

impl From<&Scope> for Value {
    fn from(s: &Scope) -> Value {
        match s {
            Scope::All => object([("kind", "all".into())]),
            Scope::Region(region) => object([("kind", "region".into()), ("region", region.as_str().into())]),
            Scope::Tag(tag) => object([("kind", "tag".into()), ("tag", tag.as_str().into())]),
        }
    }
}
