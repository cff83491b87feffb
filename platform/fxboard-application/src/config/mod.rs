use fxboard_domain::symbols;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_FEED_URL: &str = "http://127.0.0.1:8440";
const DEFAULT_BIND: &str = "127.0.0.1:8440";
const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_REFRESH_SECS: u64 = 60;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub feed: FeedConfig,
    pub gateway: GatewayConfig,
    pub symbols: SymbolsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct FeedConfig {
    /// Base URL of the gateway the dashboard polls.
    pub url: String,
    pub refresh_secs: u64,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct GatewayConfig {
    pub bind: String,
    /// Base URL of the upstream quote provider.
    pub provider_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct SymbolsConfig {
    pub pairs: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            refresh_secs: DEFAULT_REFRESH_SECS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Default for SymbolsConfig {
    fn default() -> Self {
        Self {
            pairs: symbols::default_pairs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            gateway: GatewayConfig::default(),
            symbols: SymbolsConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), String> {
        if self.symbols.pairs.is_empty() {
            return Err("symbols.pairs must not be empty".to_string());
        }
        for pair in &self.symbols.pairs {
            if !symbols::is_currency_pair(pair) {
                return Err(format!("invalid currency pair symbol: {pair}"));
            }
        }
        if self.feed.refresh_secs == 0 {
            return Err("feed.refresh_secs must be positive".to_string());
        }
        if self.gateway.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(format!(
                "gateway.bind is not a valid host:port address: {}",
                self.gateway.bind
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    config.validate()?;
    Ok(config)
}

/// Defaults when no config file is given; `load_config` when one is.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.feed.refresh_secs, 60);
        assert_eq!(config.symbols.pairs.len(), 6);
        assert_eq!(config.symbols.pairs[0], "EURUSD=X");
        config.validate().expect("defaults should validate");
    }

    #[test]
    fn parse_config_rejects_unknown_fields() {
        let err = toml::from_str::<Config>("[feed]\nurl = \"http://x\"\nbogus = 1")
            .expect_err("unknown field should fail");
        assert!(err.to_string().to_lowercase().contains("unknown field"));
    }

    #[test]
    fn validate_rejects_bad_symbol() {
        let config: Config = toml::from_str("[symbols]\npairs = [\"EURUSD\"]").unwrap();
        let err = config.validate().expect_err("bare pair should fail");
        assert!(err.contains("EURUSD"));
    }

    #[test]
    fn validate_rejects_zero_interval() {
        let config: Config = toml::from_str("[feed]\nrefresh_secs = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_full_config() {
        let config: Config = toml::from_str(
            r#"
[feed]
url = "http://10.0.0.2:9000"
refresh_secs = 30
timeout_ms = 5000

[gateway]
bind = "0.0.0.0:9000"
provider_url = "http://127.0.0.1:7001"
timeout_ms = 5000

[symbols]
pairs = ["EURUSD=X", "USDJPY=X"]
"#,
        )
        .expect("config should parse");
        config.validate().expect("config should validate");
        assert_eq!(config.feed.refresh_secs, 30);
        assert_eq!(config.symbols.pairs, vec!["EURUSD=X", "USDJPY=X"]);
    }
}
