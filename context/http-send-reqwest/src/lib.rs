//! Blocking [`HttpSend`] implementation backed by `reqwest`.

use bytes::Bytes;
use cofecms_core::{Error, HttpSend, Result};
use log::debug;
use once_cell::sync::OnceCell;
use reqwest::blocking::{Client, Request};

/// HttpSend built on [`reqwest::blocking::Client`].
///
/// The client is created on first use and reused by every request after that,
/// so connections are pooled for the life of this value.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: OnceCell<Client>,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a pre-built reqwest::blocking::Client.
    pub fn new(client: Client) -> Self {
        Self {
            client: OnceCell::with_value(client),
        }
    }

    /// Check if the underlying client has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| {
            debug!("creating reqwest blocking client");
            Client::builder()
                .build()
                .map_err(|e| Error::unexpected("failed to build http client").with_source(e))
        })
    }
}

impl HttpSend for ReqwestHttpSend {
    fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req.map(|body| body.to_vec()))
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;

        let resp = self
            .client()?
            .execute(req)
            .map_err(|e| Error::unexpected("failed to execute request").with_source(e))?;

        let mut builder = http::Response::builder()
            .status(resp.status())
            .version(resp.version());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(resp.headers().clone());
        }

        let body = resp
            .bytes()
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(builder.body(body)?)
    }
}
