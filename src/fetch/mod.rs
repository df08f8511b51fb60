//! Downloads of published feed archives.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        bail!("GET {url} returned {}", resp.status());
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Fetches `url` and writes the body to `path`, returning the byte count.
#[tracing::instrument(skip(client, path), fields(path = %path.display()))]
pub async fn download_to<C: HttpClient>(client: &C, url: &str, path: &Path) -> Result<usize> {
    let bytes = fetch_bytes(client, url).await?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
    info!(bytes = bytes.len(), "Feed archive saved");
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl HttpClient for Failing {
        async fn execute(&self, _req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
            panic!("request must not be sent");
        }
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_invalid_url() {
        assert!(fetch_bytes(&Failing, "not a url").await.is_err());
    }
}
