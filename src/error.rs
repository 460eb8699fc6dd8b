use std::{fmt, io, path::PathBuf};

use reqwest::{header::HeaderMap, StatusCode};
use thiserror::Error;
use url::Url;

use crate::apply::ApplyError;

/// How much of a response body is kept for diagnostics
const BODY_SNIPPET_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to build the HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {}", .response.status)]
    Status { url: Url, response: ResponseContext },

    #[error("Could not find wallpaper URL in {url}")]
    UrlNotFound { url: Url, response: ResponseContext },

    #[error("Invalid wallpaper URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(
        "Received non-image response when downloading {url} (content type: {})",
        .content_type.as_deref().unwrap_or("missing")
    )]
    NotAnImage {
        url: Url,
        content_type: Option<String>,
        response: ResponseContext,
    },

    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to set wallpaper")]
    Apply(#[from] ApplyError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    Filesystem,
    Os,
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Client(_) | Self::Request { .. } | Self::Status { .. } => ErrorKind::Network,
            Self::UrlNotFound { .. } | Self::InvalidUrl { .. } | Self::NotAnImage { .. } => {
                ErrorKind::Validation
            }
            Self::Write { .. } => ErrorKind::Filesystem,
            Self::Apply(_) => ErrorKind::Os,
        }
    }

    /// Extra context worth printing when the run fails: the last HTTP
    /// response, or the output of the wallpaper script
    #[must_use]
    pub fn diagnostic(&self) -> Option<String> {
        match self {
            Self::Status { response, .. }
            | Self::UrlNotFound { response, .. }
            | Self::NotAnImage { response, .. } => Some(response.to_string()),
            Self::Apply(err) => err.diagnostic(),
            _ => None,
        }
    }
}

/// What reqwest throws away on a failed response
#[derive(Debug)]
pub struct ResponseContext {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ResponseContext {
    pub(crate) fn new(status: StatusCode, headers: HeaderMap, body: &str) -> Self {
        Self {
            status,
            headers,
            body: snippet(body, BODY_SNIPPET_LEN).to_string(),
        }
    }
}

impl fmt::Display for ResponseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Response status: {}", self.status)?;
        writeln!(f, "Response headers:")?;
        for (name, value) in &self.headers {
            writeln!(f, "  {name}: {}", String::from_utf8_lossy(value.as_bytes()))?;
        }
        write!(f, "Response content: {}", self.body)
    }
}

fn snippet(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
