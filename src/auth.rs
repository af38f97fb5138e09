//! `Authorization` header values.
//!
//! Supports the Basic (RFC 7617) and Bearer (RFC 6750) schemes. Values built
//! here are set on a request through
//! [`RequestBuilder::auth`](crate::RequestBuilder::auth) or its shortcuts.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// Credentials for the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP Basic authentication.
    Basic { username: String, password: String },
    /// Bearer token authentication.
    Bearer { token: String },
}

impl Auth {
    /// Basic credentials, sent base64-encoded.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// A bearer token, sent as is.
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer {
            token: token.into(),
        }
    }

    /// Parses `user:password` into Basic credentials.
    ///
    /// Everything after the first colon is the password. A missing colon
    /// means an empty password.
    pub fn from_user_pass(pair: &str) -> Self {
        match pair.split_once(':') {
            Some((user, pass)) => Auth::basic(user, pass),
            None => Auth::basic(pair, ""),
        }
    }

    /// The value to send in the `Authorization` header.
    pub fn header_value(&self) -> String {
        match self {
            Auth::Basic { username, password } => basic_auth(username, password),
            Auth::Bearer { token } => bearer_auth(token),
        }
    }
}

// Credentials stay out of logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Auth::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Encodes a username and password into a Basic `Authorization` value.
///
/// # Examples
///
/// ```
/// use please::auth::basic_auth;
///
/// assert_eq!(basic_auth("user", "pass123"), "Basic dXNlcjpwYXNzMTIz");
/// ```
pub fn basic_auth(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
}

/// Decodes a Basic `Authorization` value into `(username, password)`.
///
/// Returns `None` if the value is not Basic, is not valid base64 or UTF-8,
/// or has no colon.
///
/// # Examples
///
/// ```
/// use please::auth::parse_basic_auth_header;
///
/// let result = parse_basic_auth_header("Basic dXNlcjpwYXNzMTIz");
/// assert_eq!(result, Some(("user".to_string(), "pass123".to_string())));
/// assert_eq!(parse_basic_auth_header("Bearer token123"), None);
/// ```
pub fn parse_basic_auth_header(header: &str) -> Option<(String, String)> {
    let encoded = header.trim().strip_prefix("Basic ")?.trim();
    let decoded = String::from_utf8(STANDARD.decode(encoded).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Formats a token into a Bearer `Authorization` value.
pub fn bearer_auth(token: &str) -> String {
    format!("Bearer {}", token)
}
