//! Core components for talking to the CofE CMS API.
//!
//! This crate provides the foundational types shared by the cofecms ecosystem:
//! the error type, the [`Context`] that carries pluggable collaborators, and
//! small utilities used while signing requests.
//!
//! ## Overview
//!
//! - **Context**: A container that holds implementations for HTTP sending and environment access
//! - **Traits**: [`HttpSend`] performs one blocking HTTP exchange, [`Env`] reads the environment
//! - **Errors**: [`Error`] with an [`ErrorKind`] that callers can match on
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use cofecms_core::{Context, HttpSend, Result, StaticEnv};
//!
//! #[derive(Debug)]
//! struct AlwaysOk;
//!
//! impl HttpSend for AlwaysOk {
//!     fn http_send(&self, _req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
//!         Ok(http::Response::new(Bytes::from_static(b"[]")))
//!     }
//! }
//!
//! let ctx = Context::new()
//!     .with_http_send(AlwaysOk)
//!     .with_env(StaticEnv::default());
//!
//! let req = http::Request::get("https://example.com").body(Bytes::new()).unwrap();
//! let resp = ctx.http_send(req).unwrap();
//! assert_eq!(resp.body().as_ref(), b"[]");
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: HMAC helpers
//! - [`time`]: Date formatting
//! - [`utils`]: Data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};

mod error;
pub use error::{Error, ErrorKind, Result};
