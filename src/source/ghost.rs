use super::{ContentError, ContentSource, Response};
use crate::content::RawContent;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

const API_PATH: &str = "ghost/api/v3/content/";

/// Fetches content from a Ghost Content API. Authors, posts and tags are
/// requested one after the other; the first failure ends the fetch.
pub struct GhostSource {
    client: reqwest::blocking::Client,
    api_url: Url,
    key: String,
}

impl GhostSource {
    /// `url` is the Ghost site's root URL and `key` its content API key.
    pub fn new(url: &Url, key: impl Into<String>) -> Result<GhostSource, url::ParseError> {
        let mut base = url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(GhostSource {
            client: reqwest::blocking::Client::new(),
            api_url: base.join(API_PATH)?,
            key: key.into(),
        })
    }

    /// Builds the browse URL for `resource`.
    fn resource_url(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, url::ParseError> {
        let mut url = self.api_url.join(&format!("{}/", resource))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("key", &self.key);
            query.append_pair("limit", "all");
            for (k, v) in params {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }

    fn browse<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, ContentError> {
        let url = self
            .resource_url(resource, params)
            .map_err(|e| ContentError::new(format!("building {} url: {}", resource, e)))?;
        log::debug!("GET {}", url.path());
        let text = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.text())
            .map_err(|e| ContentError::new(format!("requesting {}: {}", resource, e)))?;
        parse_envelope(resource, &text)
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    errors: Vec<GhostError>,
}

#[derive(Deserialize)]
struct GhostError {
    message: String,
    #[serde(default)]
    context: Option<String>,
}

/// Parses a Ghost browse response: either `{"<resource>": [...]}` or
/// `{"errors": [...]}`.
fn parse_envelope<T: DeserializeOwned>(resource: &str, text: &str) -> Result<Vec<T>, ContentError> {
    let mut body: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)
        .map_err(|e| ContentError::new(format!("parsing {} response: {}", resource, e)))?;

    if body.contains_key("errors") {
        let envelope: ErrorEnvelope = serde_json::from_value(serde_json::Value::Object(body))
            .map_err(|e| ContentError::new(format!("parsing {} errors: {}", resource, e)))?;
        let messages: Vec<String> = envelope
            .errors
            .into_iter()
            .map(|e| match e.context {
                Some(context) => format!("{} ({})", e.message, context),
                None => e.message,
            })
            .collect();
        return Err(ContentError::new(format!("{}: {}", resource, messages.join("; "))));
    }

    match body.remove(resource) {
        Some(items) => serde_json::from_value(items)
            .map_err(|e| ContentError::new(format!("parsing {}: {}", resource, e))),
        None => Err(ContentError::new(format!("response has no `{}` field", resource))),
    }
}

impl ContentSource for GhostSource {
    fn fetch(&self) -> Response {
        log::info!("fetching content from {}", self.api_url);
        let fetched = (|| -> Result<RawContent, ContentError> {
            Ok(RawContent {
                authors: self.browse("authors", &[("include", "count.posts")])?,
                posts: self.browse(
                    "posts",
                    &[("include", "tags,authors"), ("order", "published_at desc")],
                )?,
                tags: self.browse("tags", &[("include", "count.posts")])?,
            })
        })();
        match fetched {
            Ok(data) => Response::ok(data),
            Err(e) => Response::failed(e),
        }
    }
}
