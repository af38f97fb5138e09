//! Top-level entry points that need no factory.
//!
//! These share one process-wide [`RequestFactory`] built from the global
//! configuration (see [`crate::config`]). The factory, and its connection
//! pools, is rebuilt when that configuration changes.

use crate::config::{get_config, ClientConfig};
use crate::factory::RequestFactory;
use crate::request::RequestBuilder;
use log::debug;
use once_cell::sync::Lazy;
use std::sync::Mutex;

static SHARED: Lazy<Mutex<Option<(ClientConfig, RequestFactory)>>> = Lazy::new(|| Mutex::new(None));

/// The shared factory for the current global configuration.
pub fn shared_factory() -> RequestFactory {
    let config = get_config();
    let mut shared = SHARED.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    match shared.as_ref() {
        Some((cached, factory)) if *cached == config => factory.clone(),
        _ => {
            debug!("building shared request factory");
            let factory = RequestFactory::from_config(&config);
            *shared = Some((config, factory.clone()));
            factory
        }
    }
}

/// Starts a request with an arbitrary method, such as `PATCH` or `HEAD`.
///
/// Methods that are not valid HTTP tokens fail when the request is sent.
pub fn request(method: &str, url: &str) -> RequestBuilder {
    shared_factory().request(method, url)
}

/// Starts a `GET` request.
pub fn get(url: &str) -> RequestBuilder {
    shared_factory().get(url)
}

/// Starts a `POST` request.
pub fn post(url: &str) -> RequestBuilder {
    shared_factory().post(url)
}

/// Starts a `PUT` request.
pub fn put(url: &str) -> RequestBuilder {
    shared_factory().put(url)
}

/// Starts a `DELETE` request.
pub fn delete(url: &str) -> RequestBuilder {
    shared_factory().delete(url)
}

/// Starts a `PATCH` request.
pub fn patch(url: &str) -> RequestBuilder {
    shared_factory().patch(url)
}

/// Starts a `HEAD` request.
pub fn head(url: &str) -> RequestBuilder {
    shared_factory().head(url)
}
