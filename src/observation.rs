//! Weather observation records
//!
//! Normalized snapshots produced by the weather collaborator. The scorer only
//! reads these; it never fabricates a missing reading.

use serde::{Deserialize, Serialize};

/// Current conditions for one city (metric units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub city: String,
    /// Air temperature (°C, whole degrees)
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Relative humidity (%)
    pub humidity: f64,
    /// Barometric pressure (hPa)
    pub pressure: f64,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Wind bearing (degrees, 0 when the provider omits it)
    pub wind_deg: f64,
    /// Visibility (km, 0 when the provider omits it)
    pub visibility: f64,
    /// Free-text description, e.g. "light rain"
    pub condition: String,
    /// Coarse category, e.g. "Rain", "Thunderstorm"
    pub main: String,
    /// Provider icon code
    #[serde(default)]
    pub icon: String,
    pub lat: f64,
    pub lon: f64,
}

/// One short-interval forecast point (display only, never scored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Local time, `%I:%M %p`
    pub time: String,
    /// Unix seconds
    pub timestamp: i64,
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub main: String,
    #[serde(default)]
    pub icon: String,
}
