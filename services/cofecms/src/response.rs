use bytes::Bytes;
use cofecms_core::{Error, Result};
use http::HeaderMap;
use serde_json::{Map, Value};

use super::constants::*;

/// One record returned by the API.
pub type Record = Map<String, Value>;

/// Rate limit counters reported with every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed in the current window, from `X-Rate-Limit`.
    pub limit: u64,
    /// Requests left in the current window, from `X-Rate-Limit-Remaining`.
    pub remaining: u64,
}

impl RateLimit {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Result<Self> {
        Ok(Self {
            limit: header_u64(headers, X_RATE_LIMIT)?,
            remaining: header_u64(headers, X_RATE_LIMIT_REMAINING)?,
        })
    }
}

/// Records of a non-paginated call.
#[derive(Debug, Clone)]
pub struct Records {
    records: Vec<Record>,
    rate_limit: RateLimit,
    headers: HeaderMap,
}

impl Records {
    pub(crate) fn from_response(resp: http::Response<Bytes>) -> Result<Self> {
        let (parts, body) = resp.into_parts();
        Ok(Self {
            records: decode_records(&body)?,
            rate_limit: RateLimit::from_headers(&parts.headers)?,
            headers: parts.headers,
        })
    }

    /// Records in response order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Rate limit counters of this response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// Raw response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl IntoIterator for Records {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Parse a required integer header.
pub(crate) fn header_u64(headers: &HeaderMap, name: &str) -> Result<u64> {
    let value = headers
        .get(name)
        .ok_or_else(|| Error::response_invalid(format!("response header {name} is missing")))?;

    value.to_str()?.trim().parse::<u64>().map_err(|e| {
        Error::response_invalid(format!("response header {name} is not an integer"))
            .with_source(e)
    })
}

/// Decode a body into records.
///
/// A single object is returned as a list of one, so list and detail endpoints
/// read the same way.
pub(crate) fn decode_records(body: &[u8]) -> Result<Vec<Record>> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(record) => Ok(vec![record]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(Error::response_invalid(format!(
                    "expected a json object in response, got {other}"
                ))),
            })
            .collect(),
        other => Err(Error::response_invalid(format!(
            "expected a json object or array in response, got {other}"
        ))),
    }
}
