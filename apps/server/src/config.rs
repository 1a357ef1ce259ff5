use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub rate_api_url: String,
    pub rate_lookback_days: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let listen_addr: SocketAddr = var("CGT_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid CGT_LISTEN_ADDR")?;
        let db_path = var("CGT_DB_PATH").unwrap_or_else(|| "./data/portfolio.db".into());
        let cors_allow = var("CGT_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("CGT_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".into())
            .parse()
            .context("Invalid CGT_REQUEST_TIMEOUT_MS")?;
        let rate_api_url = var("CGT_RATE_API_URL")
            .unwrap_or_else(|| cgt_market_data::provider::frankfurter::DEFAULT_BASE_URL.into());
        let rate_lookback_days = var("CGT_RATE_LOOKBACK_DAYS")
            .unwrap_or_else(|| "5".into())
            .parse()
            .context("Invalid CGT_RATE_LOOKBACK_DAYS")?;
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            rate_api_url,
            rate_lookback_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.db_path, "./data/portfolio.db");
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_millis(30000));
        assert_eq!(config.rate_api_url, "https://api.frankfurter.app");
        assert_eq!(config.rate_lookback_days, 5);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CGT_REQUEST_TIMEOUT_MS", "1500"),
            ("CGT_CORS_ALLOW_ORIGINS", "http://a.test, http://b.test,"),
            ("CGT_RATE_LOOKBACK_DAYS", "7"),
        ])
        .unwrap();

        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.cors_allow, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.rate_lookback_days, 7);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("CGT_LISTEN_ADDR", "not-an-addr"),
            ("CGT_REQUEST_TIMEOUT_MS", "soon"),
            ("CGT_RATE_LOOKBACK_DAYS", "-1"),
        ] {
            let err = match config_from(&[(key, value)]) {
                Ok(_) => panic!("{key}={value} should be rejected"),
                Err(err) => err,
            };
            assert_eq!(err.to_string(), format!("Invalid {key}"));
        }
    }
}
