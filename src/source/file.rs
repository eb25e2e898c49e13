use super::{ContentError, ContentSource, Response};
use crate::content::RawContent;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Reads content from a JSON snapshot of the CMS with top-level `authors`,
/// `posts` and `tags` arrays shaped like the Ghost Content API's.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> FileSource {
        FileSource { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn fetch(&self) -> Response {
        log::info!("reading content snapshot `{}`", self.path.display());
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                return Response::failed(ContentError::new(format!(
                    "opening `{}`: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        match serde_json::from_reader::<_, RawContent>(BufReader::new(file)) {
            Ok(data) => Response::ok(data),
            Err(e) => Response::failed(ContentError::new(format!(
                "parsing `{}`: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
