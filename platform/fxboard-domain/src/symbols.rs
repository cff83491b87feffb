/// Currency pairs requested from the provider when no override is configured.
/// Order is significant: responses are emitted in this order.
pub const DEFAULT_PAIRS: [&str; 6] = [
    "EURUSD=X", "GBPUSD=X", "USDJPY=X", "USDCAD=X", "AUDUSD=X", "NZDUSD=X",
];

pub fn default_pairs() -> Vec<String> {
    DEFAULT_PAIRS.iter().map(|s| s.to_string()).collect()
}

/// A valid pair symbol is six ASCII uppercase letters followed by `=X`.
pub fn is_currency_pair(symbol: &str) -> bool {
    let Some(code) = symbol.strip_suffix("=X") else {
        return false;
    };
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_uppercase())
}
