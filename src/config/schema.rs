//! Configuration schema for HTTP clients.
//!
//! This module defines the settings used to build the reqwest clients behind
//! a [`RequestFactory`](crate::RequestFactory), along with their validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Settings shared by every request made through a factory.
///
/// Missing fields fall back to defaults when deserializing, so a settings
/// document only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Request timeout in milliseconds.
    ///
    /// Covers connecting, sending and reading the complete response.
    /// Defaults to 30000ms. Must be greater than 0.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connect timeout in milliseconds. `None` leaves it to `timeout`.
    #[serde(default)]
    pub connect_timeout: Option<u64>,

    /// Whether to follow 3xx redirects. Defaults to true.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,

    /// Maximum number of redirects to follow. Defaults to 10. With 0, a 3xx
    /// response is returned as is.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whether to validate TLS certificates and host names.
    ///
    /// **Warning:** turning this off is meant for development against
    /// self-signed endpoints only.
    #[serde(default = "default_verify_certificates")]
    pub verify_certificates: bool,

    /// Value of the `User-Agent` header.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers added to every request unless the request sets them itself.
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,

    /// Prefix for relative request URLs.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connect_timeout: None,
            follow_redirects: default_follow_redirects(),
            max_redirects: default_max_redirects(),
            verify_certificates: default_verify_certificates(),
            user_agent: default_user_agent(),
            default_headers: BTreeMap::new(),
            base_url: None,
        }
    }
}

impl ClientConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are valid, or `Err` with a descriptive message.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("timeout must be greater than 0".to_string());
        }

        if self.connect_timeout == Some(0) {
            return Err("connectTimeout must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("userAgent must not be empty".to_string());
        }

        if let Some(base) = &self.base_url {
            let parsed = url::Url::parse(base).map_err(|e| format!("baseUrl is invalid: {}", e))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(format!("baseUrl must be http or https, got: {}", parsed.scheme()));
            }
        }

        // max_redirects can be 0: 3xx responses are returned unfollowed
        Ok(())
    }

    /// The request timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// The connect timeout as a `Duration`, if one is set.
    pub fn connect_timeout_duration(&self) -> Option<Duration> {
        self.connect_timeout.map(Duration::from_millis)
    }

    /// Merges this configuration with another, using values from `other`.
    ///
    /// Default headers are combined, with `other` winning on equal names.
    pub fn merge(&self, other: &ClientConfig) -> Self {
        let mut default_headers = self.default_headers.clone();
        default_headers.extend(
            other
                .default_headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        Self {
            timeout: other.timeout,
            connect_timeout: other.connect_timeout.or(self.connect_timeout),
            follow_redirects: other.follow_redirects,
            max_redirects: other.max_redirects,
            verify_certificates: other.verify_certificates,
            user_agent: other.user_agent.clone(),
            default_headers,
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
        }
    }
}

fn default_timeout() -> u64 {
    30000
}

fn default_follow_redirects() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_verify_certificates() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("please/", env!("CARGO_PKG_VERSION")).to_string()
}
