use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fxboard_domain::QuoteSource;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn QuoteSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/forex", get(forex_handler))
        .with_state(state)
}

/// GET /api/forex: the whole normalized quote set in provider-request
/// order, or 500 with `{"message"}` when the upstream fetch fails.
async fn forex_handler(State(state): State<AppState>) -> Response {
    match state.source.fetch_quotes().await {
        Ok(quotes) => {
            tracing::debug!(rows = quotes.len(), "served quote set");
            (StatusCode::OK, Json(quotes)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "error fetching data from quote provider");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "message": "Error fetching data." })),
            )
                .into_response()
        }
    }
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind {addr}: {err}"))?;
    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|err| format!("server error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fxboard_domain::{FeedError, QuoteRecord};

    struct FixedSource(Vec<QuoteRecord>);

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn fetch_quotes(&self) -> Result<Vec<QuoteRecord>, FeedError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl QuoteSource for FailingSource {
        async fn fetch_quotes(&self) -> Result<Vec<QuoteRecord>, FeedError> {
            Err(FeedError::Transport("connection reset by provider".to_string()))
        }
    }

    fn quote(symbol: &str, bid: f64, ask: f64, change: f64, pct: f64) -> QuoteRecord {
        QuoteRecord {
            id: symbol.to_string(),
            symbol: symbol.to_string(),
            bid,
            ask,
            change,
            change_percent: pct,
        }
    }

    async fn spawn_app(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.expect("serve");
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn forex_endpoint_returns_every_symbol_with_numeric_fields() {
        let rows = vec![
            quote("EURUSD=X", 1.1233, 1.1234, 0.0023, 0.2),
            quote("USDJPY=X", 109.44, 109.45, -0.15, -0.14),
            quote("GBPUSD=X", 1.3788, 1.3789, 0.0045, 0.33),
            quote("USDCNY=X", 6.4566, 6.4567, -0.0123, -0.19),
            quote("USDCAD=X", 1.2344, 1.2345, 0.0012, 0.1),
        ];
        let expected: Vec<String> = rows.iter().map(|r| r.symbol.clone()).collect();
        let base_url = spawn_app(AppState {
            source: Arc::new(FixedSource(rows)),
        })
        .await;

        let response = reqwest::get(format!("{base_url}/api/forex"))
            .await
            .expect("request");
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value = response.json().await.expect("json body");
        let items = body.as_array().expect("array body");
        assert_eq!(items.len(), 5);

        for (item, symbol) in items.iter().zip(&expected) {
            assert_eq!(item["symbol"].as_str(), Some(symbol.as_str()));
            assert_eq!(item["id"].as_str(), Some(symbol.as_str()));
            for field in ["bid", "ask", "change", "changePercent"] {
                assert!(
                    item[field].is_number(),
                    "{symbol}.{field} should be numeric, got {}",
                    item[field]
                );
            }
        }
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_500_with_message_body() {
        let base_url = spawn_app(AppState {
            source: Arc::new(FailingSource),
        })
        .await;

        let response = reqwest::get(format!("{base_url}/api/forex"))
            .await
            .expect("request");
        assert_eq!(response.status().as_u16(), 500);

        let body: serde_json::Value = response.json().await.expect("json body");
        assert_eq!(body["message"].as_str(), Some("Error fetching data."));
    }
}
