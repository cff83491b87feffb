use async_trait::async_trait;
use fxboard_domain::{FeedError, QuoteRecord, QuoteSource};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};

/// Dashboard-side client for the gateway's `GET /api/forex` boundary.
pub struct FeedClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl FeedClient {
    pub fn new(base_url: String, timeout_ms: u64) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self { base_url, client })
    }

    async fn fetch_once(&self) -> Result<Vec<QuoteRecord>, FeedError> {
        let endpoint = format!("{}/api/forex", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|err| FeedError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(FeedError::Status {
                code: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<QuoteRecord>>()
            .await
            .map_err(|err| FeedError::Decode(err.to_string()))
    }
}

#[async_trait]
impl QuoteSource for FeedClient {
    async fn fetch_quotes(&self) -> Result<Vec<QuoteRecord>, FeedError> {
        metrics::counter!("fxboard.feed.requests_total").increment(1);
        let start = Instant::now();
        let result = self.fetch_once().await;
        metrics::histogram!("fxboard.feed.request_ms").record(start.elapsed().as_millis() as f64);
        if let Err(err) = &result {
            metrics::counter!("fxboard.feed.errors_total").increment(1);
            tracing::warn!(error = %err, "feed fetch failed");
        }
        result
    }
}
