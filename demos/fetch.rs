//! Outbound request: GET a page and print the body.

use microroute_rs::client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let response = client::get("http://example.com").await?;

    println!("{}", response.text());

    Ok(())
}
