//! OpenWeatherMap client
//!
//! Current weather (`/weather`) and the 3-hourly forecast (`/forecast`), both
//! in metric units.

use super::{fetch_json, RetryPolicy, WeatherSource};
use crate::config::AppConfig;
use crate::error::UpstreamError;
use crate::observation::{ForecastPoint, WeatherObservation};
use crate::registry::CoastalCity;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;
use std::fmt::Display;

const SERVICE: &str = "weather";

/// Forecast entries requested per call
const FORECAST_COUNT: usize = 8;

pub struct OpenWeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl OpenWeatherClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build weather HTTP client")?;

        Ok(Self {
            http,
            base_url: config.weather_api_url.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone(),
            retry: RetryPolicy::new(config.fetch_retries),
        })
    }

    fn request(&self, endpoint: &str, lat: f64, lon: f64, extra: &[(&str, String)]) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {} lat={} lon={}", url, lat, lon);

        let mut query = vec![
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        query.extend(extra.iter().map(|(k, v)| (*k, v.clone())));

        self.http.get(url).query(&query)
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, city: &CoastalCity) -> Result<WeatherObservation, UpstreamError> {
        let payload: CurrentPayload = self
            .retry
            .run(|| fetch_json(SERVICE, self.request("weather", city.lat, city.lon, &[])))
            .await?;

        payload.into_observation(city)
    }

    async fn forecast(&self, lat: f64, lon: f64, points: usize) -> Result<Vec<ForecastPoint>, UpstreamError> {
        let extra = [("cnt", FORECAST_COUNT.to_string())];
        let payload: ForecastPayload = self
            .retry
            .run(|| fetch_json(SERVICE, self.request("forecast", lat, lon, &extra)))
            .await?;

        payload.into_points(points, &Local)
    }
}

// ============================================================================
// Wire payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct MainPayload {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WindPayload {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConditionPayload {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    main: Option<MainPayload>,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
    wind: Option<WindPayload>,
    /// Metres
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: Option<MainPayload>,
    #[serde(default)]
    weather: Vec<ConditionPayload>,
    wind: Option<WindPayload>,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    #[serde(default)]
    list: Vec<ForecastItem>,
}

fn require(value: Option<f64>, field: &str) -> Result<f64, UpstreamError> {
    value.ok_or_else(|| UpstreamError::malformed(SERVICE, format!("missing {}", field)))
}

fn whole_degrees(celsius: f64) -> f64 {
    celsius.round_ties_even()
}

impl CurrentPayload {
    fn into_observation(self, city: &CoastalCity) -> Result<WeatherObservation, UpstreamError> {
        let main = self.main.ok_or_else(|| UpstreamError::malformed(SERVICE, "missing main"))?;
        let wind = self.wind.ok_or_else(|| UpstreamError::malformed(SERVICE, "missing wind"))?;
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::malformed(SERVICE, "missing weather condition"))?;

        let temp = require(main.temp, "main.temp")?;

        Ok(WeatherObservation {
            city: city.name.to_string(),
            temp: whole_degrees(temp),
            feels_like: whole_degrees(require(main.feels_like, "main.feels_like")?),
            temp_min: whole_degrees(main.temp_min.unwrap_or(temp)),
            temp_max: whole_degrees(main.temp_max.unwrap_or(temp)),
            humidity: require(main.humidity, "main.humidity")?,
            pressure: require(main.pressure, "main.pressure")?,
            wind_speed: require(wind.speed, "wind.speed")?,
            wind_deg: wind.deg.unwrap_or(0.0),
            visibility: self.visibility.unwrap_or(0.0) / 1000.0,
            condition: condition.description,
            main: condition.main,
            icon: condition.icon,
            lat: city.lat,
            lon: city.lon,
        })
    }
}

impl ForecastPayload {
    fn into_points<Tz>(self, points: usize, tz: &Tz) -> Result<Vec<ForecastPoint>, UpstreamError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.list
            .into_iter()
            .take(points)
            .map(|item| {
                let main = item.main.ok_or_else(|| UpstreamError::malformed(SERVICE, "forecast item missing main"))?;
                let wind = item.wind.ok_or_else(|| UpstreamError::malformed(SERVICE, "forecast item missing wind"))?;
                let condition = item
                    .weather
                    .into_iter()
                    .next()
                    .ok_or_else(|| UpstreamError::malformed(SERVICE, "forecast item missing weather"))?;
                let when = DateTime::<Utc>::from_timestamp(item.dt, 0)
                    .ok_or_else(|| UpstreamError::malformed(SERVICE, format!("bad forecast timestamp {}", item.dt)))?;

                Ok(ForecastPoint {
                    time: when.with_timezone(tz).format("%I:%M %p").to_string(),
                    timestamp: item.dt,
                    temp: whole_degrees(require(main.temp, "main.temp")?),
                    humidity: require(main.humidity, "main.humidity")?,
                    pressure: require(main.pressure, "main.pressure")?,
                    wind_speed: require(wind.speed, "wind.speed")?,
                    condition: condition.description,
                    main: condition.main,
                    icon: condition.icon,
                })
            })
            .collect()
    }
}
