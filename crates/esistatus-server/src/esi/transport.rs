use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use esistatus_core::config::EsiConfig;
use esistatus_core::{EsiStatusError, Result};

/// Future returned by a transport request.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<serde_json::Value>> + Send + 'a>>;

/// Transport seam for the meta API, so tests can substitute a scripted
/// double for the network.
pub trait MetaTransport: Send + Sync {
    /// GET a URL and decode the body as JSON.
    fn get_json(&self, url: &str) -> TransportFuture<'_>;
}

/// The production transport: reqwest with the configured User-Agent and
/// timeout applied to every request.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &EsiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EsiStatusError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl MetaTransport for ReqwestTransport {
    fn get_json(&self, url: &str) -> TransportFuture<'_> {
        let url = url.to_string();

        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| EsiStatusError::request_failed(&url, e))?;

            let status = response.status();

            if !status.is_success() {
                return Err(EsiStatusError::request_failed(
                    &url,
                    format!(
                        "{} - {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("unknown")
                    ),
                ));
            }

            let body = response
                .text()
                .await
                .map_err(|e| EsiStatusError::request_failed(&url, e))?;

            serde_json::from_str(&body).map_err(|e| EsiStatusError::InvalidJson {
                url: url.clone(),
                reason: e.to_string(),
            })
        })
    }
}
