//! Building the final request URL.
//!
//! Query pairs already present in the user-provided URL are kept, builder
//! parameters are appended after them, and the query is re-encoded as UTF-8
//! `application/x-www-form-urlencoded`. Scheme, user info, host, port, path
//! and fragment are left untouched.

use crate::error::{Error, Result};
use log::trace;
use url::Url;

/// Prefixes `url` with `base` unless `url` is already absolute.
///
/// Exactly one `/` separates the two halves, whatever either side ends or
/// starts with.
pub(crate) fn join_base(base: Option<&str>, url: &str) -> String {
    let base = match base {
        Some(base) if Url::parse(url).is_err() => base,
        _ => return url.to_string(),
    };

    let path = url.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// Parses `raw` and merges `params` into its query string.
pub(crate) fn build_url(raw: &str, params: &[(String, String)]) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|source| Error::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(Error::UnsupportedScheme(other.to_string())),
    }

    if !params.is_empty() {
        let existing: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(existing)
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    trace!("built URL {}", url);
    Ok(url)
}
