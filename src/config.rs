use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::TierTable;
use crate::matching::{LogoResolver, Roster};

const LOCAL_API_URL: &str = "http://127.0.0.1:8000";
const HOSTED_API_URL: &str = "https://pl-prediction-api.onrender.com";

/// Deployment flavour that picks the backend address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn api_url(&self) -> &'static str {
        match self {
            Environment::Development => LOCAL_API_URL,
            Environment::Production => HOSTED_API_URL,
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => anyhow::bail!("unknown environment '{}'", other),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,

    /// Backend base URL, without trailing slash
    pub api_url: String,

    /// Upper bound for every outbound request
    pub request_timeout: Duration,

    /// Confidence tier cutoffs
    pub tiers: TierTable,

    /// Optional crest table file
    pub logo_table_path: Option<PathBuf>,

    /// Optional lab roster file
    pub roster_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment: Environment = lookup("PREDICTOR_ENV")
            .unwrap_or_else(|| "development".to_string())
            .parse()
            .context("PREDICTOR_ENV must be 'development' or 'production'")?;

        let api_url = lookup("PREDICTOR_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| environment.api_url().to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "15".to_string())
            .trim()
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid number")?;

        if timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        let tiers = match lookup("TIER_THRESHOLDS") {
            Some(raw) => raw
                .parse::<TierTable>()
                .context("TIER_THRESHOLDS must be three increasing cutoffs in [0, 1]")?,
            None => TierTable::default(),
        };

        Ok(Config {
            environment,
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            tiers,
            logo_table_path: lookup("LOGO_TABLE_PATH").map(PathBuf::from),
            roster_path: lookup("ROSTER_PATH").map(PathBuf::from),
        })
    }

    /// Crest table from `LOGO_TABLE_PATH`, or the built-in one
    pub fn logo_resolver(&self) -> Result<LogoResolver> {
        match &self.logo_table_path {
            Some(path) => LogoResolver::load_from_file(path),
            None => Ok(LogoResolver::default()),
        }
    }

    /// Lab roster from `ROSTER_PATH`, or the built-in one
    pub fn roster(&self) -> Result<Roster> {
        match &self.roster_path {
            Some(path) => Roster::load_from_file(path),
            None => Ok(Roster::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.tiers, TierTable::default());
        assert!(config.logo_table_path.is_none());
    }

    #[test]
    fn test_production_and_override() {
        let prod = config(&[("PREDICTOR_ENV", "production")]).unwrap();
        assert_eq!(prod.api_url, "https://pl-prediction-api.onrender.com");

        let custom = config(&[
            ("PREDICTOR_ENV", "production"),
            ("PREDICTOR_API_URL", "http://10.0.0.5:9000/"),
        ])
        .unwrap();
        assert_eq!(custom.api_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config(&[("PREDICTOR_ENV", "staging")]).is_err());
        assert!(config(&[("REQUEST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config(&[("REQUEST_TIMEOUT_SECS", "0")]).is_err());
        assert!(config(&[("TIER_THRESHOLDS", "0.7,0.6,0.5")]).is_err());
    }

    #[test]
    fn test_custom_tiers() {
        let config = config(&[("TIER_THRESHOLDS", "0.45,0.50,0.55")]).unwrap();
        assert_eq!(config.tiers, TierTable::from_cutoffs(0.45, 0.50, 0.55).unwrap());
    }
}
