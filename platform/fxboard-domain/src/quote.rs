use serde::{Deserialize, Serialize};

/// One currency pair's current market snapshot. Field names on the wire are
/// camelCase to match the `/api/forex` contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub id: String,
    pub symbol: String,
    pub bid: f64,
    pub ask: f64,
    pub change: f64,
    #[serde(rename = "changePercent")]
    pub change_percent: f64,
}

impl QuoteRecord {
    /// Absolute change, fixed to four decimals for display.
    pub fn format_change(&self) -> String {
        format!("{:.4}", self.change)
    }

    /// Percentage change, fixed to two decimals with a trailing percent sign.
    pub fn format_change_percent(&self) -> String {
        format!("{:.2}%", self.change_percent)
    }

    pub fn is_gaining(&self) -> bool {
        self.change > 0.0
    }

    pub fn is_losing(&self) -> bool {
        self.change < 0.0
    }
}
