use async_trait::async_trait;
use fxboard_domain::{FeedError, QuoteRecord, QuoteSource};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Quote Source Adapter for the upstream provider's batched quote endpoint
/// (`GET /v7/finance/quote?symbols=A,B,C`). One request covers the whole
/// symbol list; any failure fails the whole fetch.
pub struct ProviderClient {
    base_url: String,
    symbols: Vec<String>,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteBody,
}

#[derive(Debug, Deserialize)]
struct QuoteBody {
    result: Vec<ProviderQuote>,
    error: Option<serde_json::Value>,
}

/// Raw provider record. All fields are required: a record missing any of
/// them fails the whole request rather than producing a partial row.
#[derive(Debug, Deserialize)]
struct ProviderQuote {
    symbol: String,
    bid: f64,
    ask: f64,
    #[serde(rename = "regularMarketChange")]
    regular_market_change: f64,
    #[serde(rename = "regularMarketChangePercent")]
    regular_market_change_percent: f64,
}

impl ProviderClient {
    pub fn new(base_url: String, timeout_ms: u64, symbols: Vec<String>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            symbols,
            client,
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    async fn fetch_once(&self) -> Result<Vec<QuoteRecord>, FeedError> {
        let endpoint = format!("{}/v7/finance/quote", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&endpoint)
            .query(&[("symbols", self.symbols.join(","))])
            .send()
            .await
            .map_err(|err| FeedError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let envelope: QuoteEnvelope = response
            .json()
            .await
            .map_err(|err| FeedError::Decode(err.to_string()))?;
        if let Some(error) = envelope.quote_response.error {
            return Err(FeedError::Decode(format!("provider error: {error}")));
        }

        // Providers are not trusted to preserve request order; re-key by
        // symbol and emit in configured order, failing on any gap.
        let mut by_symbol: HashMap<String, ProviderQuote> = envelope
            .quote_response
            .result
            .into_iter()
            .map(|quote| (quote.symbol.clone(), quote))
            .collect();

        let mut records = Vec::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let quote = by_symbol
                .remove(symbol)
                .ok_or_else(|| FeedError::MissingSymbol(symbol.clone()))?;
            records.push(QuoteRecord {
                id: symbol.clone(),
                symbol: symbol.clone(),
                bid: quote.bid,
                ask: quote.ask,
                change: quote.regular_market_change,
                change_percent: quote.regular_market_change_percent,
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl QuoteSource for ProviderClient {
    async fn fetch_quotes(&self) -> Result<Vec<QuoteRecord>, FeedError> {
        metrics::counter!("fxboard.provider.requests_total").increment(1);
        let start = Instant::now();
        let result = self.fetch_once().await;
        metrics::histogram!("fxboard.provider.request_ms")
            .record(start.elapsed().as_millis() as f64);
        if let Err(err) = &result {
            metrics::counter!("fxboard.provider.errors_total", "kind" => err_kind(err))
                .increment(1);
            tracing::warn!(error = %err, "provider quote fetch failed");
        }
        result
    }
}

fn err_kind(err: &FeedError) -> &'static str {
    match err {
        FeedError::Transport(_) => "transport",
        FeedError::Status { .. } => "http_status",
        FeedError::Decode(_) => "decode",
        FeedError::MissingSymbol(_) => "missing_symbol",
    }
}
