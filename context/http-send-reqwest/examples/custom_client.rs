use anyhow::Result;
use bytes::Bytes;
use cofecms_core::Context;
use cofecms_http_send_reqwest::ReqwestHttpSend;
use reqwest::blocking::Client;
use std::time::Duration;

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    // Create a custom reqwest client with specific configuration
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .user_agent("cofecms-example/1.0")
        .build()?;

    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let test_url = "https://cmsapi.cofeportal.org/v2/contact-fields";
    println!("GET {test_url}");

    let req = http::Request::builder()
        .method("GET")
        .uri(test_url)
        .body(Bytes::new())?;

    // Unsigned, so the API is expected to refuse it.
    match ctx.http_send(req) {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            for (name, value) in resp.headers() {
                println!("  {name}: {value:?}");
            }
            println!("{}", String::from_utf8_lossy(resp.body()));
        }
        Err(e) => eprintln!("Request failed: {e}"),
    }

    Ok(())
}
