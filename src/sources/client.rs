// Shared HTTP client for JSON sources.
//
// A thin reqwest wrapper with a fixed user agent and a generic JSON GET
// helper. Each source builds its own URL and query parameters.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

const USER_AGENT: &str = concat!("ohm/", env!("CARGO_PKG_VERSION"), " (ocean-hazard-monitoring)");

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// GET a URL and deserialize the JSON body.
    ///
    /// Non-2xx responses become errors carrying the status and body so the
    /// collector's log line says what the upstream actually returned.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
        bearer_token: Option<&str>,
    ) -> Result<T> {
        debug!(url = url, "HTTP GET request");

        let mut request = self.client.get(url).query(params);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{url} returned {status}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse JSON from {url}"))
    }
}
