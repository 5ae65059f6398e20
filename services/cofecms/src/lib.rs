//! Client for the Church of England CMS contacts API.
//!
//! This crate signs, sends and paginates requests against the CofE CMS API.
//!
//! ## Overview
//!
//! Every request carries the caller's `api_id`, a JSON `data` parameter holding
//! the search criteria and an HMAC-SHA256 `sig` computed over all parameters with
//! the shared `api_key`. Every request is scoped to a diocese, either passed per
//! call or set as a default on the [`Client`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use cofecms::{Client, Config, Fields, Query};
//! use cofecms_core::{Context, OsEnv, Result};
//! use cofecms_http_send_reqwest::ReqwestHttpSend;
//!
//! fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads COFECMS_API_ID, COFECMS_API_KEY and COFECMS_DIOCESE_ID.
//!     let config = Config::new().from_env(&ctx);
//!     let client = Client::from_config(ctx, &config)?;
//!
//!     let query = Query::new()
//!         .with_search("keyword", "smith")
//!         .with_fields(Fields::new().with("contact", ["forenames", "surname"]))
//!         .with_limit(10);
//!
//!     let page = client.get_contacts(&query)?;
//!     println!("{} contacts in {} pages", page.total_count(), page.total_pages());
//!
//!     for record in page.all()? {
//!         println!("{record:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! export COFECMS_API_ID=your-api-id
//! export COFECMS_API_KEY=your-api-key
//! export COFECMS_DIOCESE_ID=123              # Optional, default diocese
//! export COFECMS_ENDPOINT=http://localhost   # Optional, defaults to the public API
//! ```
//!
//! ## Pagination
//!
//! Paginated calls return a [`PageResult`]. [`PageResult::pages`] walks the pages
//! lazily, one request per page, and [`PageResult::all`] collects every record.
//! Nothing is cached, so walking the pages twice sends the requests twice.

mod constants;

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod params;
pub use params::{
    encode_json, prepare_basic_params, prepare_search_params, BasicParams, Fields, ParamValue,
    Query, SearchParams,
};

mod sign_request;
pub use sign_request::{RequestSigner, SignedRequest};

mod response;
pub use response::{RateLimit, Record, Records};

mod page;
pub use page::{PageResult, Pages};

mod client;
pub use client::Client;
