//! Runtime configuration
//!
//! Read once at startup from environment variables. Numeric values that fail
//! to parse are a startup error rather than a silent fallback.

use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub weather_api_key: String,
    pub weather_api_url: String,
    pub overpass_url: String,
    pub port: u16,
    /// Per-request timeout for the weather collaborator
    pub http_timeout: Duration,
    /// Retries after the first attempt, transient failures only
    pub fetch_retries: u32,
    pub shelter_radius_km: f64,
    pub shelter_display_limit: usize,
    pub forecast_points: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let weather_api_key = lookup("OPEN_WEATHER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .context("OPEN_WEATHER_API_KEY must be set")?;

        let timeout_secs: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECS", 15)?;

        Ok(Self {
            weather_api_key,
            weather_api_url: lookup("WEATHER_API_URL").unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
            overpass_url: lookup("OVERPASS_URL").unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string()),
            port: parse_or(&lookup, "PORT", 5000)?,
            http_timeout: Duration::from_secs(timeout_secs),
            fetch_retries: parse_or(&lookup, "FETCH_RETRIES", 2)?,
            shelter_radius_km: parse_or(&lookup, "SHELTER_RADIUS_KM", 10.0)?,
            shelter_display_limit: parse_or(&lookup, "SHELTER_DISPLAY_LIMIT", 5)?,
            forecast_points: parse_or(&lookup, "FORECAST_POINTS", 4)?,
        })
    }

    /// Overpass queries are slower than weather lookups
    pub fn geodata_timeout(&self) -> Duration {
        self.http_timeout * 2
    }

    /// Defaults with a placeholder key, for tests and local tooling
    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            weather_api_key: key.into(),
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            port: 5000,
            http_timeout: Duration::from_secs(15),
            fetch_retries: 2,
            shelter_radius_km: 10.0,
            shelter_display_limit: 5,
            forecast_points: 4,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("OPEN_WEATHER_API_KEY", "abc")])).unwrap();

        assert_eq!(config.weather_api_key, "abc");
        assert_eq!(config.weather_api_url, DEFAULT_WEATHER_API_URL);
        assert_eq!(config.port, 5000);
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.geodata_timeout(), Duration::from_secs(30));
        assert_eq!(config.fetch_retries, 2);
        assert_eq!(config.shelter_display_limit, 5);
        assert_eq!(config.forecast_points, 4);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("OPEN_WEATHER_API_KEY", "abc"),
            ("PORT", "8080"),
            ("SHELTER_RADIUS_KM", "7.5"),
            ("OVERPASS_URL", "http://localhost:9999/api"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.shelter_radius_km, 7.5);
        assert_eq!(config.overpass_url, "http://localhost:9999/api");
    }

    #[test]
    fn test_missing_key_is_error() {
        assert!(AppConfig::from_lookup(lookup(&[])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("OPEN_WEATHER_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_invalid_number_is_error() {
        let err = AppConfig::from_lookup(lookup(&[("OPEN_WEATHER_API_KEY", "abc"), ("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
