use cofecms_core::{Context, Error, Result};
use log::debug;

use super::config::Config;
use super::constants::*;
use super::credential::Credential;
use super::page::PageResult;
use super::params::Query;
use super::response::{header_u64, Records};
use super::sign_request::{RequestSigner, SignedRequest};

/// Client for the CofE CMS API.
///
/// Cloning is cheap, clones share the transport of the [`Context`].
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    signer: RequestSigner,
    endpoint: String,
    diocese_id: Option<u64>,
}

impl Client {
    /// Create a client against the public API.
    pub fn new(ctx: Context, credential: Credential) -> Self {
        Self {
            ctx,
            signer: RequestSigner::new(credential),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            diocese_id: None,
        }
    }

    /// Create a client from config.
    ///
    /// Fails with [`ErrorKind::ConfigInvalid`](cofecms_core::ErrorKind::ConfigInvalid)
    /// if the credential is incomplete.
    pub fn from_config(ctx: Context, config: &Config) -> Result<Self> {
        let mut client = Self::new(ctx, config.credential()?);
        if let Some(endpoint) = &config.endpoint {
            client = client.with_endpoint(endpoint);
        }
        client.diocese_id = config.diocese_id;
        Ok(client)
    }

    /// Set the default diocese for calls that don't pass one.
    pub fn with_diocese_id(mut self, diocese_id: u64) -> Self {
        self.diocese_id = Some(diocese_id);
        self
    }

    /// Set the default diocese in place.
    pub fn set_diocese_id(&mut self, diocese_id: u64) {
        self.diocese_id = Some(diocese_id);
    }

    /// Default diocese, if any.
    pub fn diocese_id(&self) -> Option<u64> {
        self.diocese_id
    }

    /// Override the base url of the API.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Full url of an API path, like `/v2/contacts`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Signer used by this client.
    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Pick the diocese for a call: the explicit one, else the default.
    pub fn resolve_diocese_id(&self, diocese_id: Option<u64>) -> Result<u64> {
        diocese_id.or(self.diocese_id).ok_or_else(|| {
            Error::config_invalid("diocese_id is not set, pass one or set a default on the client")
        })
    }

    /// Build the signed request for `query` without sending it.
    pub fn signed_request(&self, endpoint_url: &str, query: &Query) -> Result<SignedRequest> {
        let diocese_id = self.resolve_diocese_id(query.diocese_id)?;
        self.signer
            .build(endpoint_url, diocese_id, &query.search, &query.params)
    }

    fn send(&self, req: &SignedRequest) -> Result<Records> {
        debug!("sending request to {}", req.endpoint_url());
        let resp = self.ctx.http_send(req.to_http_request()?)?;

        let status = resp.status();
        if !status.is_success() {
            let body = String::from_utf8_lossy(resp.body());
            return Err(Error::http_status(
                status,
                format!("{} responded {status}: {body}", req.endpoint_url()),
            ));
        }

        let records = Records::from_response(resp)?;
        let rate_limit = records.rate_limit();
        debug!(
            "rate limit for {}: {} of {} remaining",
            req.endpoint_url(),
            rate_limit.remaining,
            rate_limit.limit
        );
        Ok(records)
    }

    /// Send one request and return its records.
    pub fn get(&self, endpoint_url: &str, query: &Query) -> Result<Records> {
        let req = self.signed_request(endpoint_url, query)?;
        self.send(&req)
    }

    /// Send one request for a paginated endpoint.
    ///
    /// `offset` defaults to 0 and `limit` to 100.
    pub fn paged_get(&self, endpoint_url: &str, query: &Query) -> Result<PageResult> {
        let mut params = query.params.clone();
        let offset = *params.offset.get_or_insert(0);
        let limit = *params.limit.get_or_insert(DEFAULT_LIMIT);
        if limit == 0 {
            return Err(Error::request_invalid("limit must be greater than 0"));
        }

        let diocese_id = self.resolve_diocese_id(query.diocese_id)?;
        let req = self
            .signer
            .build(endpoint_url, diocese_id, &query.search, &params)?;

        debug!("fetching {endpoint_url} at offset {offset} with limit {limit}");
        let records = self.send(&req)?;
        let total_count = header_u64(records.headers(), X_TOTAL_COUNT)?;

        Ok(PageResult {
            client: self.clone(),
            rate_limit: records.rate_limit(),
            headers: records.headers().clone(),
            records: records.into_records(),
            total_count,
            limit,
            offset,
            endpoint_url: endpoint_url.to_string(),
            diocese_id,
            search_params: query.search.clone(),
            basic_params: params.without_paging(),
        })
    }

    /// List contacts, paginated.
    pub fn get_contacts(&self, query: &Query) -> Result<PageResult> {
        self.paged_get(&self.endpoint_url("/v2/contacts"), query)
    }

    /// Get a single contact.
    pub fn get_contact(&self, contact_id: u64, diocese_id: Option<u64>) -> Result<Records> {
        let query = Query {
            diocese_id,
            ..Query::new()
        };
        self.get(&self.endpoint_url(&format!("/v2/contacts/{contact_id}")), &query)
    }

    /// List deleted contacts, paginated.
    pub fn get_deleted_contacts(&self, query: &Query) -> Result<PageResult> {
        self.paged_get(&self.endpoint_url("/v2/contacts/deleted"), query)
    }

    /// List the fields contacts can be requested with.
    pub fn get_contact_fields(&self, diocese_id: Option<u64>) -> Result<Records> {
        let query = Query {
            diocese_id,
            ..Query::new()
        };
        self.get(&self.endpoint_url("/v2/contact-fields"), &query)
    }
}
