//! CofE CMS API request signer
use std::collections::BTreeMap;

use bytes::Bytes;
use cofecms_core::hash::hex_hmac_sha256;
use cofecms_core::{Error, Result};
use log::debug;

use super::constants::*;
use super::credential::Credential;
use super::params::{encode_json, prepare_basic_params, prepare_search_params};
use super::params::{BasicParams, SearchParams};

/// RequestSigner that implements the CMS API signature.
///
/// - [Signing requests](https://cmsapi.cofeportal.org/signing-requests)
/// - [Request parameters](https://cmsapi.cofeportal.org/request-parameters)
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credential: Credential,
}

impl RequestSigner {
    /// Create a signer for this credential.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// The credential requests are signed with.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Compute the hex signature of `json_data` and already normalized basic params.
    pub fn sign(&self, json_data: &str, basic_params: &[(String, String)]) -> String {
        let string_to_sign = string_to_sign(&self.credential.api_id, json_data, basic_params);
        hex_hmac_sha256(
            self.credential.api_key.as_bytes(),
            string_to_sign.as_bytes(),
        )
    }

    /// Build a signed GET for `endpoint_url`.
    ///
    /// Basic params are normalized, search criteria get `diocese_id` appended and
    /// are encoded into `data`, then everything is signed.
    pub fn build(
        &self,
        endpoint_url: &str,
        diocese_id: u64,
        search: &SearchParams,
        params: &BasicParams,
    ) -> Result<SignedRequest> {
        let json_data = encode_json(&prepare_search_params(search, diocese_id)?)?;
        let mut query = prepare_basic_params(params.to_pairs())?;
        let sig = self.sign(&json_data, &query);

        query.push((API_ID.to_string(), self.credential.api_id.clone()));
        query.push((DATA.to_string(), json_data));
        query.push((SIG.to_string(), sig));

        Ok(SignedRequest {
            endpoint_url: endpoint_url.to_string(),
            query,
        })
    }
}

/// Construct string to sign
///
/// ## Format
///
/// Basic params plus `api_id` and `data`, sorted by key, values concatenated
/// without separator:
///
/// ```text
/// api_id + data + end_date + fields + limit + offset + start_date + ...
/// ```
fn string_to_sign(api_id: &str, json_data: &str, basic_params: &[(String, String)]) -> String {
    let mut to_sign: BTreeMap<&str, &str> = basic_params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    to_sign.insert(API_ID, api_id);
    to_sign.insert(DATA, json_data);

    let s: String = to_sign.into_values().collect();
    debug!("string to sign: {}", &s);
    s
}

/// A signed GET request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    endpoint_url: String,
    query: Vec<(String, String)>,
}

impl SignedRequest {
    /// Url the request goes to, without query.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Query params in send order: basic params, `api_id`, `data`, `sig`.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Get a query value by key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full url with the form-urlencoded query string.
    pub fn to_url(&self) -> String {
        let qs = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        let sep = if self.endpoint_url.contains('?') { '&' } else { '?' };
        format!("{}{sep}{qs}", self.endpoint_url)
    }

    /// Convert into an [`http::Request`].
    pub fn to_http_request(&self) -> Result<http::Request<Bytes>> {
        http::Request::get(self.to_url())
            .body(Bytes::new())
            .map_err(|e| {
                Error::request_invalid(format!("invalid endpoint url: {}", self.endpoint_url))
                    .with_source(e)
            })
    }
}
