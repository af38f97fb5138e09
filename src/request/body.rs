use crate::form::{Form, FORM_CONTENT_TYPE};
use crate::multipart::MultipartForm;
use bytes::Bytes;

pub(crate) const TEXT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";
pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// The single body a request may carry.
#[derive(Debug)]
pub(crate) enum Body {
    Bytes(Bytes),
    Text(String),
    Json(Vec<u8>),
    Form(Form),
    Multipart(MultipartForm),
    Stream(reqwest::Body),
}

impl Body {
    /// Content type implied by the body. Multipart bodies get theirs, with
    /// the boundary, from reqwest.
    pub(crate) fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Text(_) => Some(TEXT_CONTENT_TYPE),
            Body::Json(_) => Some(JSON_CONTENT_TYPE),
            Body::Form(_) => Some(FORM_CONTENT_TYPE),
            Body::Bytes(_) | Body::Multipart(_) | Body::Stream(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Body::Bytes(_) => "bytes",
            Body::Text(_) => "text",
            Body::Json(_) => "json",
            Body::Form(_) => "form",
            Body::Multipart(_) => "multipart",
            Body::Stream(_) => "stream",
        }
    }
}
