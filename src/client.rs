use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use reqwest::Client;

use crate::config::ClientConfig;

/// Asks the quote server for the current bid. The configured timeout covers
/// the whole exchange, body included.
pub async fn fetch_bid(config: &ClientConfig) -> Result<String> {
    let client = Client::builder()
        .timeout(config.timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let resp = client
        .get(&config.server_url)
        .send()
        .await
        .with_context(|| format!("Quote request to {} failed", config.server_url))?;
    if !resp.status().is_success() {
        bail!("Quote server answered {}", resp.status());
    }

    let text = resp.text().await.context("Failed to read quote response")?;

    Ok(decode_bid(&text))
}

// The server sends a JSON string; anything else is passed through untouched.
fn decode_bid(body: &str) -> String {
    match serde_json::from_str::<String>(body) {
        Ok(bid) => bid,
        Err(e) => {
            debug!("Quote body is not a JSON string ({e}), using it raw");
            body.trim().to_string()
        }
    }
}

pub fn format_line(bid: &str) -> String {
    format!("Dólar: {bid}")
}

/// Replaces the contents of `path` with the formatted quote line.
pub async fn write_bid(path: &Path, bid: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    tokio::fs::write(path, format_line(bid))
        .await
        .with_context(|| format!("Failed to write quote to {}", path.display()))
}

/// Fetch first, write second: a failed fetch never touches the file.
pub async fn run(config: &ClientConfig) -> Result<()> {
    let bid = fetch_bid(config).await?;
    write_bid(&config.output_path, &bid).await?;
    info!("Wrote bid {} to {}", bid, config.output_path.display());
    Ok(())
}
