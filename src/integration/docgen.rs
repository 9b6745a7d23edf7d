//! Client for the document-render service that lays out and stores the
//! return PDF. The layout itself lives in that service; we only ship the
//! figures.

use dotenv::dotenv;
use once_cell::sync::Lazy;
use serde_derive::{Deserialize, Serialize};
use std::env;

static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

#[derive(Serialize, Debug)]
struct RenderRequest<'a> {
    template: &'a str,
    file_name: String,
    contract_id: i32,
    payload: serde_json::Value,
}

#[derive(Deserialize, Debug)]
struct RenderResponse {
    file_link: String,
}

/// Renders the `"return"` template and returns a link to the stored PDF.
pub async fn generate_return_document(
    contract_id: i32,
    file_name: String,
    payload: serde_json::Value,
) -> anyhow::Result<String> {
    dotenv().ok();
    let base_url = env::var("DOCGEN_URL")?;
    let request = RenderRequest {
        template: "return",
        file_name,
        contract_id,
        payload,
    };
    let response = HTTP
        .post(format!("{}/render", base_url))
        .json(&request)
        .send()
        .await?;
    anyhow::ensure!(
        response.status().is_success(),
        "docgen replied {}",
        response.status()
    );
    Ok(response.json::<RenderResponse>().await?.file_link)
}
