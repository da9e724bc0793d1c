use std::{fmt, io};
use axum::{http::StatusCode, response::{Html, IntoResponse, Response}};

use crate::components::TemplateComponent;

/// Errors that end a request
#[derive(Debug)]
pub enum ReaderError {
    Io(io::Error),
    /// The request path contained `..` or `//`
    TraversalRejected,
    /// A directory resolved to somewhere outside the root
    OutsideRoot,
    DirectoryUnreadable(io::Error),
    /// The `<path>.md` file that was looked up
    FileNotFound(String),
}

impl ReaderError {
    /// HTTP status sent for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ReaderError::TraversalRejected
            | ReaderError::OutsideRoot
            | ReaderError::DirectoryUnreadable(_) => StatusCode::FORBIDDEN,
            ReaderError::FileNotFound(_) => StatusCode::NOT_FOUND,
            ReaderError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Io(e) => write!(f, "I/O error: {}", e),
            ReaderError::TraversalRejected => write!(f, "Forbidden: Invalid path"),
            ReaderError::OutsideRoot => write!(f, "Forbidden: Invalid directory path"),
            ReaderError::DirectoryUnreadable(e) => {
                write!(f, "Forbidden: Cannot access directory ({})", e)
            }
            ReaderError::FileNotFound(path) => write!(f, "File not found: {}", path),
        }
    }
}

impl std::error::Error for ReaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReaderError::Io(e) | ReaderError::DirectoryUnreadable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReaderError {
    fn from(err: io::Error) -> Self {
        ReaderError::Io(err)
    }
}

impl IntoResponse for ReaderError {
    fn into_response(self) -> Response {
        if let ReaderError::Io(e) = &self {
            log::error!("Unexpected I/O failure while serving request: {}", e);
        }
        let page = TemplateComponent::new().render_error_page(&self);
        (self.status(), Html(page)).into_response()
    }
}
