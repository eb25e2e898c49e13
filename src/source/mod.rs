//! The content source contract. A build fetches the whole content set exactly
//! once; a [`Response`] carries either the data or a list of errors, and any
//! error aborts the build.

mod file;
mod ghost;

pub use file::FileSource;
pub use ghost::GhostSource;

use crate::content::RawContent;
use std::fmt;

/// Something that can produce the site's content.
pub trait ContentSource {
    /// Fetches the whole content set. Failures are reported through
    /// [`Response::errors`], never by panicking.
    fn fetch(&self) -> Response;
}

/// The result of a [`ContentSource::fetch`]. Errors travel in their own
/// channel so a source can report several of them at once.
#[derive(Debug, Default)]
pub struct Response {
    pub data: Option<RawContent>,
    pub errors: Vec<ContentError>,
}

impl Response {
    pub fn ok(data: RawContent) -> Response {
        Response {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failed(error: ContentError) -> Response {
        Response {
            data: None,
            errors: vec![error],
        }
    }

    /// Converts the response into its data, failing if the error channel is
    /// non-empty or no data was returned.
    pub fn into_result(self) -> Result<RawContent, Error> {
        if !self.errors.is_empty() {
            return Err(Error(self.errors));
        }
        match self.data {
            Some(data) => Ok(data),
            None => Err(Error(vec![ContentError::new("source returned no data")])),
        }
    }
}

/// A single problem reported by a content source.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentError {
    pub message: String,
}

impl ContentError {
    pub fn new(message: impl Into<String>) -> ContentError {
        ContentError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(f)
    }
}

/// The error returned when a fetch failed. Holds every reported problem.
#[derive(Debug)]
pub struct Error(pub Vec<ContentError>);

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fetching content:")?;
        for err in &self.0 {
            write!(f, " {};", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_errors_take_precedence_over_data() {
        let response = Response {
            data: Some(RawContent::default()),
            errors: vec![ContentError::new("boom")],
        };
        let err = response.into_result().unwrap_err();
        assert_eq!("fetching content: boom;", err.to_string());
    }

    #[test]
    fn test_missing_data_is_an_error() {
        assert!(Response::default().into_result().is_err());
    }

    #[test]
    fn test_ok() {
        assert!(Response::ok(RawContent::default()).into_result().is_ok());
    }
}
