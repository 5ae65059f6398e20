use cofecms::{Client, Config, Query, RateLimit};
use cofecms_core::{Context, ErrorKind, OsEnv, Result};
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::mock::client;

#[test]
fn test_missing_diocese_fails_before_sending() {
    let (client, mock) = client();

    let err = client.get_contacts(&Query::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    let err = client.get_contact(42, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    let err = client.get_contact_fields(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    assert_eq!(mock.request_count(), 0);
}

#[test]
fn test_explicit_diocese_wins_over_default() -> Result<()> {
    let (client, mock) = client();
    let client = client.with_diocese_id(123);
    mock.respond(200, None, r#"{"id": 42}"#);
    mock.respond(200, None, r#"{"id": 42}"#);

    client.get_contact(42, None)?;
    client.get_contact(42, Some(7))?;

    assert_eq!(
        mock.query_get(0, "data").as_deref(),
        Some(r#"{"diocese_id": 123}"#)
    );
    assert_eq!(
        mock.query_get(1, "data").as_deref(),
        Some(r#"{"diocese_id": 7}"#)
    );
    Ok(())
}

#[test]
fn test_user_diocese_criterion_is_rejected() {
    let (client, mock) = client();

    let err = client
        .get_contacts(
            &Query::new()
                .with_diocese_id(1)
                .with_search("diocese_id", "2"),
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert_eq!(mock.request_count(), 0);
}

#[test]
fn test_get_contact_single_object() -> Result<()> {
    let (client, mock) = client();
    mock.respond(200, None, r#"{"id": 42, "surname": "Smith"}"#);

    let records = client.get_contact(42, Some(1))?;
    assert_eq!(records.len(), 1);
    assert_eq!(records.records()[0].get("surname"), Some(&json!("Smith")));

    assert_eq!(mock.path(0), "/v2/contacts/42");
    // Single-shot calls don't send paging params.
    assert_eq!(mock.query_get(0, "offset"), None);
    assert_eq!(mock.query_get(0, "limit"), None);
    Ok(())
}

#[test]
fn test_get_contact_fields() -> Result<()> {
    let (client, mock) = client();
    mock.respond(
        200,
        None,
        r#"[{"resource": "contact", "fields": ["forenames", "surname"]}]"#,
    );

    let records = client.with_diocese_id(1).get_contact_fields(None)?;
    assert_eq!(records.len(), 1);
    assert_eq!(mock.path(0), "/v2/contact-fields");
    Ok(())
}

#[test]
fn test_rate_limit_is_exposed() -> Result<()> {
    let (client, mock) = client();
    let client = client.with_diocese_id(1);
    mock.respond(200, None, "[]");
    mock.respond_page(0, 0, 0);

    let expected = RateLimit {
        limit: 1000,
        remaining: 998,
    };
    assert_eq!(client.get_contact(1, None)?.rate_limit(), expected);
    assert_eq!(client.get_contacts(&Query::new())?.rate_limit(), expected);
    Ok(())
}

#[test]
fn test_missing_rate_limit_is_rejected() {
    let (client, mock) = client();
    let client = client.with_diocese_id(1);
    mock.respond_without_rate_limit(None, r#"{"id": 1}"#);
    mock.respond_without_rate_limit(Some(1), "[]");

    let err = client.get_contact(1, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseInvalid);
    let err = client.get_contacts(&Query::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseInvalid);
    assert_eq!(mock.request_count(), 2);
}

#[test]
fn test_http_error_carries_status_and_body() {
    let (client, mock) = client();
    mock.respond(403, None, r#"{"error": "invalid signature"}"#);

    let err = client.get_contact(1, Some(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(err.to_string().contains("invalid signature"));
    assert!(!err.is_local());
}

#[test]
fn test_invalid_body_is_rejected() {
    let (client, mock) = client();
    mock.respond(200, None, "<html>maintenance</html>");

    let err = client.get_contact(1, Some(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResponseInvalid);
}

#[test]
fn test_get_any_endpoint() -> Result<()> {
    let (client, mock) = client();
    mock.respond(200, None, "[]");

    let url = client.endpoint_url("/v2/contacts/roles");
    client.get(&url, &Query::new().with_diocese_id(3).with_search("role", "vicar"))?;
    assert_eq!(mock.path(0), "/v2/contacts/roles");
    assert_eq!(
        mock.query_get(0, "data").as_deref(),
        Some(r#"{"role": "vicar", "diocese_id": 3}"#)
    );
    Ok(())
}

#[test]
fn test_client_from_os_env() {
    temp_env::with_vars(
        vec![
            ("COFECMS_API_ID", Some("env_api_id")),
            ("COFECMS_API_KEY", Some("env_api_key")),
            ("COFECMS_DIOCESE_ID", Some("55")),
            ("COFECMS_ENDPOINT", Some("http://127.0.0.1:9000")),
        ],
        || {
            let ctx = Context::new().with_env(OsEnv);
            let config = Config::new().from_env(&ctx);
            let client = Client::from_config(ctx, &config).unwrap();

            assert_eq!(client.diocese_id(), Some(55));
            assert_eq!(client.signer().credential().api_id, "env_api_id");
            assert_eq!(
                client.endpoint_url("/v2/contacts"),
                "http://127.0.0.1:9000/v2/contacts"
            );
        },
    );
}
