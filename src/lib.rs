//! A fluent request builder on top of reqwest.
//!
//! `please` wraps reqwest with chainable calls for the common round trip:
//! pick a method and URL, add headers, query parameters and a body, send, and
//! read the response.
//!
//! # Architecture
//!
//! - **request**: [`RequestBuilder`], the chainable request, and URL/query merging
//! - **form** / **multipart**: url-encoded and `multipart/form-data` bodies
//! - **response**: [`Response`], with status, headers and a buffered or streamed body
//! - **factory**: [`RequestFactory`], for a base URL, default headers and shared pools
//! - **config**: [`ClientConfig`] and the global configuration used by the facade
//! - **auth**: Basic and Bearer `Authorization` values
//! - **error**: [`Error`] and the [`Result`] alias
//!
//! TLS, connection pooling, redirects and HTTP parsing are left to reqwest.
//!
//! # Usage
//!
//! ```no_run
//! use please::{Form, MultipartForm};
//!
//! # async fn example() -> please::Result<()> {
//! // Query parameters merge with those already in the URL.
//! let mut response = please::get("https://httpbin.org/get?a=b")
//!     .parameter("c", "d")
//!     .header("Accept", "application/json")
//!     .send_and_verify()
//!     .await?;
//! let args: serde_json::Value = response.json().await?;
//!
//! please::post("https://httpbin.org/post")
//!     .form(Form::new().add("time", "money").add_values("k", ["a", "b", "c"]))
//!     .send_and_verify()
//!     .await?;
//!
//! please::post("https://httpbin.org/post")
//!     .multipart(MultipartForm::new().field("x", "y").file("file", "notes.txt"))
//!     .send_and_verify()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! Requests and responses are logged through the `log` facade at `debug`
//! level, tagged with a per-request id.

pub mod auth;
pub mod config;
pub mod error;
pub mod facade;
pub mod factory;
pub mod form;
pub mod multipart;
pub mod request;
pub mod response;

pub use auth::Auth;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use facade::{delete, get, head, patch, post, put, request, shared_factory};
pub use factory::RequestFactory;
pub use form::Form;
pub use multipart::MultipartForm;
pub use request::RequestBuilder;
pub use response::Response;

pub use reqwest::{Method, StatusCode};
