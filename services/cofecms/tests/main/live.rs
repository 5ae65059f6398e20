use std::env;

use cofecms::{Client, Config, Fields, Query};
use cofecms_core::{Context, OsEnv, Result};
use cofecms_http_send_reqwest::ReqwestHttpSend;
use log::{debug, warn};

fn init_client() -> Option<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("COFECMS_TEST").is_err() || env::var("COFECMS_TEST").unwrap() != "on" {
        return None;
    }

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx);
    assert!(config.diocese_id.is_some(), "env COFECMS_DIOCESE_ID must set");

    let client = Client::from_config(ctx, &config)
        .expect("env COFECMS_API_ID and COFECMS_API_KEY must set");
    Some(client)
}

#[test]
fn test_live_get_contact_fields() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("COFECMS_TEST is not set, skipped");
        return Ok(());
    };

    let fields = client.get_contact_fields(None)?;
    debug!("got contact fields: {:?}", fields.records());
    assert!(!fields.is_empty());
    Ok(())
}

#[test]
fn test_live_get_contacts() -> Result<()> {
    let Some(client) = init_client() else {
        warn!("COFECMS_TEST is not set, skipped");
        return Ok(());
    };

    let query = Query::new()
        .with_search("keyword", "smith")
        .with_search("keyword_names_only", "on")
        .with_fields(Fields::new().with("contact", ["forenames", "surname"]))
        .with_limit(10);
    let page = client.get_contacts(&query)?;
    debug!(
        "got {} of {} contacts, rate limit {:?}",
        page.records().len(),
        page.total_count(),
        page.rate_limit()
    );
    assert!(page.records().len() as u64 <= page.limit());
    Ok(())
}
