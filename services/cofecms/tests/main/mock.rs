//! Scripted [`HttpSend`] that records every request it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use cofecms::{Client, Credential};
use cofecms_core::{Context, Error, HttpSend, Result, StaticEnv};
use http::StatusCode;
use serde_json::json;

#[derive(Debug)]
struct Scripted {
    status: StatusCode,
    total_count: Option<u64>,
    rate_limit: bool,
    body: String,
}

#[derive(Debug, Default)]
struct State {
    responses: VecDeque<Scripted>,
    requests: Vec<http::Request<Bytes>>,
}

/// Handles share the same script and request log.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    state: Arc<Mutex<State>>,
}

impl MockHttpSend {
    /// Queue a response. `total_count` becomes the `X-Total-Count` header.
    pub fn respond(&self, status: u16, total_count: Option<u64>, body: impl Into<String>) {
        self.state.lock().unwrap().responses.push_back(Scripted {
            status: StatusCode::from_u16(status).unwrap(),
            total_count,
            rate_limit: true,
            body: body.into(),
        });
    }

    /// Queue a successful response that lacks the rate limit headers.
    pub fn respond_without_rate_limit(&self, total_count: Option<u64>, body: impl Into<String>) {
        self.state.lock().unwrap().responses.push_back(Scripted {
            status: StatusCode::OK,
            total_count,
            rate_limit: false,
            body: body.into(),
        });
    }

    /// Queue a successful page of `n` records with ids starting at `first_id`.
    pub fn respond_page(&self, total_count: u64, first_id: u64, n: u64) {
        let records: Vec<_> = (first_id..first_id + n)
            .map(|id| json!({"id": id, "surname": "Smith"}))
            .collect();
        self.respond(200, Some(total_count), json!(records).to_string());
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Path of the `n`th request.
    pub fn path(&self, n: usize) -> String {
        self.state.lock().unwrap().requests[n].uri().path().to_string()
    }

    /// Decoded query of the `n`th request.
    pub fn query(&self, n: usize) -> Vec<(String, String)> {
        let state = self.state.lock().unwrap();
        let query = state.requests[n].uri().query().unwrap_or_default().to_string();
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Value of `key` in the query of the `n`th request.
    pub fn query_get(&self, n: usize, key: &str) -> Option<String> {
        self.query(n)
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl HttpSend for MockHttpSend {
    fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(req);

        let scripted = state
            .responses
            .pop_front()
            .ok_or_else(|| Error::unexpected("no scripted response left"))?;

        let mut builder = http::Response::builder().status(scripted.status);
        if scripted.rate_limit {
            builder = builder
                .header("X-Rate-Limit", "1000")
                .header("X-Rate-Limit-Remaining", "998");
        }
        if let Some(total) = scripted.total_count {
            builder = builder.header("X-Total-Count", total.to_string());
        }
        Ok(builder.body(Bytes::from(scripted.body))?)
    }
}

/// A client talking to a fresh mock, with no default diocese.
pub fn client() -> (Client, MockHttpSend) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = MockHttpSend::default();
    let ctx = Context::new()
        .with_http_send(mock.clone())
        .with_env(StaticEnv::default());
    let client = Client::new(ctx, Credential::new("test_api_id", "test_api_key"));
    (client, mock)
}
