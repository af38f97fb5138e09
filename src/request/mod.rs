//! Chainable HTTP requests.
//!
//! A [`RequestBuilder`] collects a method, URL, headers, query parameters and
//! at most one body, then dispatches through reqwest. Builder methods never
//! fail; the first invalid input is kept and returned from
//! [`RequestBuilder::send`].

mod body;
pub(crate) mod query;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::factory::Clients;
use crate::form::Form;
use crate::multipart::MultipartForm;
use crate::response::Response;
use body::Body;
use bytes::Bytes;
use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// An HTTP request under construction.
///
/// Obtain one from [`RequestFactory`](crate::RequestFactory) or the
/// top-level functions such as [`please::get`](crate::get).
///
/// ```no_run
/// # async fn example() -> please::Result<()> {
/// let text = please::get("http://example.com/hello.txt")
///     .parameter("lang", "en")
///     .send()
///     .await?
///     .text()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "a request does nothing until it is sent"]
pub struct RequestBuilder {
    id: String,
    clients: Arc<Clients>,
    method: String,
    url: String,
    headers: HeaderMap,
    params: Vec<(String, String)>,
    body: Option<Body>,
    timeout: Option<Duration>,
    verify_certificates: bool,
    error: Option<Error>,
}

impl RequestBuilder {
    pub(crate) fn new(clients: Arc<Clients>, method: &str, url: String) -> Self {
        let verify_certificates = clients.default_verify();
        Self {
            id: Uuid::new_v4().to_string(),
            clients,
            method: method.to_string(),
            url,
            headers: HeaderMap::new(),
            params: Vec::new(),
            body: None,
            timeout: None,
            verify_certificates,
            error: None,
        }
    }

    /// Identifier used for this request in log lines.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The method as given, e.g. `"GET"`.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Headers set so far, including factory defaults.
    pub fn headers_set(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a header set so far, if it is text.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Sets a header, replacing any earlier value under the same
    /// (case-insensitive) name.
    ///
    /// To send a list, join the values with commas yourself.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
            }
            Err(err) => self.record(err),
        }
        self
    }

    /// Sets several headers, as [`RequestBuilder::header`] does.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in headers {
            self = self.header(name.as_ref(), value.as_ref());
        }
        self
    }

    /// Appends a query-string parameter. Duplicates are allowed and order is
    /// kept. The value is formatted with `Display`.
    pub fn parameter(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Appends several query-string parameters.
    pub fn parameters<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        for (key, value) in params {
            self = self.parameter(key, value);
        }
        self
    }

    /// Sets a raw body. No `Content-Type` is implied.
    pub fn body_bytes(mut self, bytes: impl Into<Bytes>) -> Self {
        self.body = Some(Body::Bytes(bytes.into()));
        self
    }

    /// Sets a text body, sent as `text/plain; charset=UTF-8`.
    pub fn body_text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(Body::Text(text.into()));
        self
    }

    /// Sets a streaming body, for uploads that should not be buffered.
    pub fn body_stream<S>(mut self, stream: S) -> Self
    where
        S: futures::stream::TryStream + Send + Sync + 'static,
        S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
        Bytes: From<S::Ok>,
    {
        self.body = Some(Body::Stream(reqwest::Body::wrap_stream(stream)));
        self
    }

    /// Serializes `value` as a JSON body, sent as `application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Some(Body::Json(bytes)),
            Err(err) => self.record(Error::Json(err)),
        }
        self
    }

    /// Sets a url-encoded form body.
    pub fn form(mut self, form: Form) -> Self {
        self.body = Some(Body::Form(form));
        self
    }

    /// Sets a `multipart/form-data` body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(Body::Multipart(form));
        self
    }

    /// Sets the `Authorization` header.
    pub fn auth(mut self, auth: Auth) -> Self {
        match HeaderValue::from_str(&auth.header_value()) {
            Ok(mut value) => {
                value.set_sensitive(true);
                self.headers.insert(AUTHORIZATION, value);
            }
            Err(err) => self.record(Error::InvalidHeader {
                name: AUTHORIZATION.to_string(),
                reason: err.to_string(),
            }),
        }
        self
    }

    /// Sets `Authorization: Basic <base64(username:password)>`.
    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        self.auth(Auth::basic(username, password))
    }

    /// Sets `Authorization: Bearer <token>`.
    pub fn bearer_auth(self, token: &str) -> Self {
        self.auth(Auth::bearer(token))
    }

    /// Overrides the factory timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables TLS certificate verification for this request.
    ///
    /// Defaults to the factory setting, which is enabled unless configured
    /// otherwise. Meant for development only.
    pub fn verify_certificates(mut self, verify: bool) -> Self {
        self.verify_certificates = verify;
        self
    }

    /// The URL the request will be sent to, with query parameters merged.
    pub fn url(&self) -> Result<Url> {
        query::build_url(&self.url, &self.params)
    }

    /// Sends the request.
    ///
    /// Any response status is returned as `Ok`; see
    /// [`RequestBuilder::send_and_verify`] to reject non-2xx statuses.
    pub async fn send(self) -> Result<Response> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| Error::InvalidMethod(self.method.clone()))?;
        let url = query::build_url(&self.url, &self.params)?;
        let client = self.clients.client(self.verify_certificates)?;

        let mut headers = self.headers;
        let mut request = client.request(method.clone(), url.clone());

        if let Some(body) = self.body {
            if let Some(content_type) = body.content_type() {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
            }
            debug!("[{}] attaching {} body", self.id, body.kind());

            request = match body {
                Body::Bytes(bytes) => request.body(bytes),
                Body::Text(text) => request.body(text),
                Body::Json(bytes) => request.body(bytes),
                Body::Form(form) => request.body(form.encode()),
                Body::Multipart(form) => request.multipart(form.into_reqwest().await?),
                Body::Stream(stream) => request.body(stream),
            };
        }

        // Applied after the body so that explicit headers replace the ones
        // reqwest derives from it.
        request = request.headers(headers);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        debug!("[{}] -> {} {}", self.id, method, url);
        let response = request.send().await.map_err(Error::from_send)?;
        Ok(Response::new(self.id, method, response))
    }

    /// Sends the request and fails with [`Error::UnexpectedStatus`] unless
    /// the status is 2xx. The response stays available through the error.
    pub async fn send_and_verify(self) -> Result<Response> {
        let response = self.send().await?;
        if !response.is_ok() {
            return Err(Error::UnexpectedStatus {
                status: response.status(),
                reason: response.status_text().to_string(),
                response: Box::new(response),
            });
        }
        Ok(response)
    }

    /// Keeps the first error only.
    fn record(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| Error::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((header_name, header_value))
}
