//! Request factories.
//!
//! A [`RequestFactory`] carries what a group of requests has in common: a
//! base URL, default headers, and the reqwest clients (and so the
//! connection pools) they are sent through.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::{query, RequestBuilder};
use log::{debug, warn};
use once_cell::sync::OnceCell;
use reqwest::redirect::Policy;
use std::sync::Arc;

/// The reqwest clients behind a factory, built on first use.
#[derive(Debug)]
pub(crate) struct Clients {
    config: ClientConfig,
    verified: OnceCell<reqwest::Client>,
    unverified: OnceCell<reqwest::Client>,
}

impl Clients {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            verified: OnceCell::new(),
            unverified: OnceCell::new(),
        }
    }

    pub(crate) fn default_verify(&self) -> bool {
        self.config.verify_certificates
    }

    /// The client to use, depending on whether certificates are verified.
    pub(crate) fn client(&self, verify_certificates: bool) -> Result<reqwest::Client> {
        let cell = if verify_certificates {
            &self.verified
        } else {
            &self.unverified
        };
        cell.get_or_try_init(|| build_client(&self.config, verify_certificates))
            .cloned()
            .map_err(crate::Error::Request)
    }
}

fn build_client(
    config: &ClientConfig,
    verify_certificates: bool,
) -> std::result::Result<reqwest::Client, reqwest::Error> {
    debug!(
        "building HTTP client (timeout {}ms, verify certificates: {})",
        config.timeout, verify_certificates
    );

    // A limit of 0 hands the 3xx back to the caller instead of failing.
    let redirect = if config.follow_redirects && config.max_redirects > 0 {
        Policy::limited(config.max_redirects as usize)
    } else {
        Policy::none()
    };

    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout_duration())
        .user_agent(config.user_agent.as_str())
        .redirect(redirect);

    if let Some(connect_timeout) = config.connect_timeout_duration() {
        builder = builder.connect_timeout(connect_timeout);
    }

    if !verify_certificates {
        warn!("TLS certificate verification is disabled");
        builder = builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    builder.build()
}

/// Creates [`RequestBuilder`]s sharing a base URL, default headers and
/// connection pools.
///
/// ```no_run
/// use please::RequestFactory;
///
/// # async fn example() -> please::Result<()> {
/// let api = RequestFactory::with_base_url("https://httpbin.org")
///     .add_default_header("X-Test", "test");
///
/// let mut response = api.get("/headers").header("X-Test-Again", "still").send_and_verify().await?;
/// let body: serde_json::Value = response.json().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestFactory {
    clients: Arc<Clients>,
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
}

impl Default for RequestFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFactory {
    /// A factory with default settings and no base URL.
    pub fn new() -> Self {
        Self::from_config(&ClientConfig::default())
    }

    /// A factory that prefixes relative URLs with `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut factory = Self::new();
        factory.base_url = Some(base_url.into());
        factory
    }

    /// A factory using `config` for its clients, base URL and default headers.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            clients: Arc::new(Clients::new(config.clone())),
            base_url: config.base_url.clone(),
            default_headers: config
                .default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// The configuration the clients are built from.
    pub fn config(&self) -> &ClientConfig {
        &self.clients.config
    }

    /// The base URL relative request URLs are joined to, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Adds a header sent with every request from this factory.
    ///
    /// Request-specific headers with the same name take precedence. A later
    /// default with the same name replaces an earlier one.
    pub fn add_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.default_headers.push((name, value.into()));
        self
    }

    /// Starts a request with an arbitrary method, such as `PATCH` or `PROPFIND`.
    ///
    /// Invalid method tokens are reported when the request is sent.
    pub fn request(&self, method: &str, url: &str) -> RequestBuilder {
        let url = query::join_base(self.base_url.as_deref(), url);
        let mut builder = RequestBuilder::new(self.clients.clone(), method, url);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        builder
    }

    /// Starts a `GET` request.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request("GET", url)
    }

    /// Starts a `POST` request.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request("POST", url)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request("PUT", url)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request("DELETE", url)
    }

    /// Starts a `PATCH` request.
    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.request("PATCH", url)
    }

    /// Starts a `HEAD` request.
    pub fn head(&self, url: &str) -> RequestBuilder {
        self.request("HEAD", url)
    }

    /// Starts a `OPTIONS` request.
    pub fn options(&self, url: &str) -> RequestBuilder {
        self.request("OPTIONS", url)
    }
}
