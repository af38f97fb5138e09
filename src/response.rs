//! HTTP responses.
//!
//! [`Response`] wraps a `reqwest::Response`. Status and headers are
//! available right away; the body is read on first access and kept, so it
//! can be decoded more than once.

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use log::debug;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::{self, Write};
use url::Url;

/// An HTTP response received from a server.
#[derive(Debug)]
pub struct Response {
    request_id: String,
    method: Method,
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: BodyState,
}

/// Where the body is in its lifecycle.
#[derive(Debug)]
enum BodyState {
    Pending(reqwest::Response),
    Buffered(Bytes),
    /// A read failed; holds the reason so later reads report it again.
    Failed(String),
}

impl Response {
    pub(crate) fn new(request_id: String, method: Method, response: reqwest::Response) -> Self {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        debug!("[{}] <- {} {} {}", request_id, status.as_u16(), method, url);

        Self {
            request_id,
            method,
            status,
            url,
            headers,
            body: BodyState::Pending(response),
        }
    }

    /// Identifier of the request that produced this response, as used in
    /// log lines.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The status code, e.g. 200 or 404.
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    /// The status as a typed [`StatusCode`].
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// The canonical reason phrase for the status, e.g. "Not Found".
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("Unknown")
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// The final URL, after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The first value of a header, or `None` if it is absent or not text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All response headers, sorted by (lower-cased) name.
    ///
    /// When a header repeats, the last value wins; use [`Response::header_map`]
    /// to see every value.
    pub fn headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    /// The raw header map, with every value of repeated headers.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// The `Content-Type` header, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Length` header, if set and numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// Whether the response carries a body.
    pub fn has_body(&self) -> bool {
        match &self.body {
            BodyState::Buffered(bytes) => !bytes.is_empty(),
            _ => body_expected(&self.method, self.status, self.content_length()),
        }
    }

    /// Reads the whole body. The bytes are kept, so later calls (and
    /// [`Response::text`] / [`Response::json`]) reuse them.
    ///
    /// If reading fails, the partially read body is discarded and every
    /// later read fails with [`Error::BodyUnavailable`].
    pub async fn bytes(&mut self) -> Result<Bytes> {
        // Left in place if this future is dropped before the read completes.
        let placeholder = BodyState::Failed("body read was cancelled".to_string());
        let pending = match std::mem::replace(&mut self.body, placeholder) {
            BodyState::Pending(response) => response,
            BodyState::Buffered(bytes) => {
                self.body = BodyState::Buffered(bytes.clone());
                return Ok(bytes);
            }
            BodyState::Failed(reason) => {
                self.body = BodyState::Failed(reason.clone());
                return Err(Error::BodyUnavailable(reason));
            }
        };

        match pending.bytes().await {
            Ok(bytes) => {
                debug!("[{}] read {} body bytes", self.request_id, bytes.len());
                self.body = BodyState::Buffered(bytes.clone());
                Ok(bytes)
            }
            Err(err) => {
                debug!("[{}] reading body failed: {}", self.request_id, err);
                self.body = BodyState::Failed(err.to_string());
                Err(Error::from_body(err))
            }
        }
    }

    /// The body as text. Invalid UTF-8 sequences are replaced.
    pub async fn text(&mut self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Decodes the body as JSON.
    pub async fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(Error::Decode)
    }

    /// Decodes the body as an untyped JSON value.
    pub async fn json_value(&mut self) -> Result<serde_json::Value> {
        self.json().await
    }

    /// Streams the body chunk by chunk without buffering it.
    pub fn bytes_stream(self) -> BoxStream<'static, Result<Bytes>> {
        match self.body {
            BodyState::Buffered(bytes) => stream::once(async move { Ok(bytes) }).boxed(),
            BodyState::Pending(response) => response.bytes_stream().map_err(Error::from_body).boxed(),
            BodyState::Failed(reason) => {
                stream::once(async move { Err(Error::BodyUnavailable(reason)) }).boxed()
            }
        }
    }

    /// Writes the status line and sorted headers. Useful for debugging.
    pub fn dump(&self, out: impl Write) -> io::Result<&Self> {
        write_dump(out, self.status(), self.status_text(), &self.headers())?;
        Ok(self)
    }

    /// [`Response::dump`] to standard output.
    pub fn dump_stdout(&self) -> io::Result<&Self> {
        self.dump(io::stdout().lock())
    }
}

/// Whether a response with these properties can carry a body.
fn body_expected(method: &Method, status: StatusCode, content_length: Option<u64>) -> bool {
    if *method == Method::HEAD
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::NOT_MODIFIED
        || status.is_informational()
    {
        return false;
    }
    content_length != Some(0)
}

fn write_dump(
    mut out: impl Write,
    status: u16,
    reason: &str,
    headers: &BTreeMap<String, String>,
) -> io::Result<()> {
    writeln!(out, "HTTP {}: {}", status, reason)?;
    for (name, value) in headers {
        writeln!(out, "{}: {}", name, value)?;
    }
    Ok(())
}
