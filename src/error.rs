//! Error types for building, sending and reading HTTP requests.
//!
//! Errors fall in two families, mirroring the two halves of a round trip:
//! failures while building or sending a request, and failures while reading
//! or checking the response. [`Error::is_request_error`] and
//! [`Error::is_response_error`] tell them apart.

use crate::response::Response;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that happened building a request, sending it, or reading its
/// response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The URL could not be parsed.
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL uses a scheme other than `http` or `https`.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The method is not a valid HTTP token.
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A header name or value is not valid on the wire.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A multipart part was given a malformed MIME type.
    #[error("invalid MIME type '{mime}' for part '{part}'")]
    InvalidMime { part: String, mime: String },

    /// The request body could not be serialized to JSON.
    #[error("failed to serialize JSON body: {0}")]
    Json(#[source] serde_json::Error),

    /// A local I/O operation failed, e.g. reading a multipart file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request timed out before completion.
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The request could not be sent, e.g. connection refused, DNS failure
    /// or a TLS handshake error.
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// An earlier read of the response body failed, so there is nothing to
    /// return.
    #[error("response body unavailable after a failed read: {0}")]
    BodyUnavailable(String),

    /// The response body could not be decoded as JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response status was not in the 2xx range.
    #[error("received unexpected status '{status}' ({reason})")]
    UnexpectedStatus {
        status: u16,
        reason: String,
        response: Box<Response>,
    },

    /// The client configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Classifies a transport error coming back from `reqwest::RequestBuilder::send`.
    pub(crate) fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err)
        } else {
            Error::Request(err)
        }
    }

    /// Classifies an error raised while reading a response body.
    pub(crate) fn from_body(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err)
        } else {
            Error::Body(err)
        }
    }

    /// Whether this error happened while building or sending the request.
    pub fn is_request_error(&self) -> bool {
        !self.is_response_error() && !matches!(self, Error::Config(_))
    }

    /// Whether this error happened while reading or checking the response.
    pub fn is_response_error(&self) -> bool {
        matches!(
            self,
            Error::Body(_)
                | Error::BodyUnavailable(_)
                | Error::Decode(_)
                | Error::UnexpectedStatus { .. }
        )
    }

    /// Whether the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Status code of an [`Error::UnexpectedStatus`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Takes back the response of an [`Error::UnexpectedStatus`], so its body
    /// can still be inspected.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Error::UnexpectedStatus { response, .. } => Some(*response),
            _ => None,
        }
    }
}
