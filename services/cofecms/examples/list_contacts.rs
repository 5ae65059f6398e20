//! List contacts named smith in the configured diocese.
//!
//! ```bash
//! COFECMS_API_ID=... COFECMS_API_KEY=... COFECMS_DIOCESE_ID=... \
//!     cargo run --example list_contacts
//! ```

use anyhow::Result;
use cofecms::{Client, Config, Fields, Query};
use cofecms_core::{Context, OsEnv};
use cofecms_http_send_reqwest::ReqwestHttpSend;

fn main() -> Result<()> {
    env_logger::init();
    let _ = dotenv::dotenv();

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let config = Config::new().from_env(&ctx);
    let client = Client::from_config(ctx, &config)?;

    let query = Query::new()
        .with_search("keyword", "smith")
        .with_search("keyword_names_only", "on")
        .with_fields(Fields::new().with("contact", ["forenames", "surname"]))
        .with_limit(10);

    let page = client.get_contacts(&query)?;
    println!(
        "{} contacts over {} pages",
        page.total_count(),
        page.total_pages()
    );

    for record in page.all()? {
        println!("{}", serde_json::Value::Object(record));
    }

    Ok(())
}
