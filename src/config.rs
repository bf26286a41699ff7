//! Environment-driven configuration

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pricing::{PavementMinimum, QuoteSettings};

/// Business details printed in the quote header
#[derive(Debug, Clone)]
pub struct BusinessDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

impl Default for BusinessDetails {
    fn default() -> Self {
        Self {
            name: "ProWashCare".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            website: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_addr: String,

    // Export
    pub export_dir: PathBuf,
    pub logo_path: PathBuf,

    // Sessions
    pub session_idle: Duration,
    pub max_sessions: u64,

    // Pricing behaviour
    pub quote: QuoteSettings,

    pub business: BusinessDetails,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8080".to_string(),
            export_dir: PathBuf::from("exports"),
            logo_path: PathBuf::from("assets/logo.png"),
            session_idle: Duration::from_secs(120 * 60),
            max_sessions: 1000,
            quote: QuoteSettings::default(),
            business: BusinessDetails::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let session_idle_minutes: u64 = parse_var("SESSION_IDLE_MINUTES")?.unwrap_or(120);
        let pavement_minimum: PavementMinimum =
            parse_var("PAVEMENT_MINIMUM")?.unwrap_or_default();

        Ok(Config {
            http_addr: env::var("HTTP_ADDR").unwrap_or(defaults.http_addr),
            export_dir: env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            logo_path: env::var("LOGO_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.logo_path),
            session_idle: idle_from_minutes(session_idle_minutes)?,
            max_sessions: parse_var("MAX_SESSIONS")?.unwrap_or(defaults.max_sessions),
            quote: QuoteSettings {
                auto_transport: parse_var("AUTO_TRANSPORT")?.unwrap_or(false),
                pavement_minimum,
            },
            business: BusinessDetails {
                name: env::var("BUSINESS_NAME").unwrap_or(defaults.business.name),
                address: env::var("BUSINESS_ADDRESS").unwrap_or_default(),
                phone: env::var("BUSINESS_PHONE").unwrap_or_default(),
                email: env::var("BUSINESS_EMAIL").unwrap_or_default(),
                website: env::var("BUSINESS_WEBSITE").unwrap_or_default(),
            },
        })
    }
}

/// Upper bound for `SESSION_IDLE_MINUTES` (one year)
const MAX_SESSION_IDLE_MINUTES: u64 = 365 * 24 * 60;

fn idle_from_minutes(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .filter(|_| minutes <= MAX_SESSION_IDLE_MINUTES)
        .map(Duration::from_secs)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "SESSION_IDLE_MINUTES too large: {} (max {})",
                minutes,
                MAX_SESSION_IDLE_MINUTES
            )
        })
}

/// Read and parse an optional environment variable
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http_addr, "0.0.0.0:8080");
        assert_eq!(config.quote.pavement_minimum, PavementMinimum::CartAggregate);
        assert!(!config.quote.auto_transport);
        assert_eq!(config.business.name, "ProWashCare");
    }

    #[test]
    fn test_idle_from_minutes() {
        assert_eq!(idle_from_minutes(120).unwrap(), Duration::from_secs(7200));
        assert!(idle_from_minutes(MAX_SESSION_IDLE_MINUTES).is_ok());
        assert!(idle_from_minutes(MAX_SESSION_IDLE_MINUTES + 1).is_err());
        assert!(idle_from_minutes(u64::MAX).is_err());
    }

    #[test]
    fn test_parse_var_missing_is_none() {
        let value: Option<u64> = parse_var("PROWASHCARE_TEST_UNSET_VARIABLE").unwrap();
        assert!(value.is_none());
    }
}
