// Axum API Server Module
//
// Purpose: JSON API over the storm-risk scorer, nearby ranker and shelter finder.
// Weather and geodata come from the collaborator traits in `sources`, so the
// router runs unchanged against live clients or in-memory stubs.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "api")]
use crate::config::AppConfig;

#[cfg(feature = "api")]
use crate::error::AppError;

#[cfg(feature = "api")]
use crate::nearby::rank_nearby;

#[cfg(feature = "api")]
use crate::observation::WeatherObservation;

#[cfg(feature = "api")]
use crate::registry::{CityRegistry, Coast, CoastalCity};

#[cfg(feature = "api")]
use crate::scoring::{compute_storm_risk, compute_storm_risk_at, ScoringStrategy};

#[cfg(feature = "api")]
use crate::shelters::{find_shelters, ShelterCache, ShelterCandidate};

#[cfg(feature = "api")]
use crate::sources::{GeodataSource, OpenWeatherClient, OverpassClient, WeatherSource};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CityRegistry>,
    pub weather: Arc<dyn WeatherSource>,
    pub geodata: Arc<dyn GeodataSource>,
    /// Ranked shelters per (city, coordinate), never evicted
    pub shelter_cache: ShelterCache,
    pub config: Arc<AppConfig>,
}

#[cfg(feature = "api")]
impl AppState {
    /// Production state: OpenWeatherMap + Overpass clients
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing weather client ({})...", config.weather_api_url);
        let weather = Arc::new(OpenWeatherClient::new(&config)?);

        tracing::info!("Initializing geodata client ({})...", config.overpass_url);
        let geodata = Arc::new(OverpassClient::new(&config)?);

        Ok(Self::with_sources(config, weather, geodata))
    }

    /// State over arbitrary collaborators
    pub fn with_sources(
        config: AppConfig,
        weather: Arc<dyn WeatherSource>,
        geodata: Arc<dyn GeodataSource>,
    ) -> Self {
        let registry = Arc::new(CityRegistry::coastal_india());
        tracing::info!("Loaded {} coastal cities", registry.len());

        tracing::info!("Initializing shelter cache...");
        let shelter_cache = ShelterCache::new();

        Self {
            registry,
            weather,
            geodata,
            shelter_cache,
            config: Arc::new(config),
        }
    }

    fn find_city(&self, name: &str) -> Result<CoastalCity, AppError> {
        self.registry
            .find(name)
            .copied()
            .ok_or_else(|| AppError::city_not_found(name))
    }

    /// Current weather for the target city; failure means no data for this request
    async fn current_weather(&self, city: &CoastalCity) -> Result<WeatherObservation, AppError> {
        self.weather.current(city).await.map_err(|e| {
            tracing::warn!("Weather unavailable for {}: {}", city.name, e);
            AppError::from(e)
        })
    }

    /// Nearest shelters for display; geodata failures degrade to an empty list
    async fn nearest_shelters(&self, city: &CoastalCity) -> Vec<ShelterCandidate> {
        let key = ShelterCache::key(city.name, city.lat, city.lon);
        let limit = self.config.shelter_display_limit;

        if let Some(hit) = self.shelter_cache.get(&key).await {
            tracing::debug!("Shelter cache hit: {}", key);
            return hit.iter().take(limit).cloned().collect();
        }

        let geodata = self.geodata.clone();
        let (lat, lon, radius) = (city.lat, city.lon, self.config.shelter_radius_km);
        let load = async move { find_shelters(geodata.as_ref(), lat, lon, radius).await };

        match self.shelter_cache.get_or_load(key, load).await {
            Ok(ranked) => ranked.iter().take(limit).cloned().collect(),
            Err(e) => {
                tracing::warn!("Shelter lookup failed for {}: {}", city.name, e);
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Registry
        .route("/api/cities", get(list_cities))

        // Weather + risk
        .route("/api/weather/:city", get(get_weather))
        .route("/api/risk/:city", get(get_risk))
        .route("/api/storm/:city", get(get_storm_bundle))
        .route("/api/storm/:city/outlook", get(get_outlook))
        .route("/api/overview", get(get_overview))

        // Shelters
        .route("/api/shelters/:city", get(get_shelters))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug, Default, Deserialize)]
pub struct StrategyQuery {
    pub strategy: Option<String>,
}

#[cfg(feature = "api")]
impl StrategyQuery {
    /// Named strategy, coast-calibrated when omitted
    fn resolve(&self) -> Result<ScoringStrategy, AppError> {
        match self.strategy.as_deref() {
            None | Some("") => Ok(ScoringStrategy::CoastCalibrated),
            Some(name) => name.parse().map_err(AppError::BadRequest),
        }
    }
}

#[cfg(feature = "api")]
#[derive(Serialize)]
struct CityWeather<'a> {
    #[serde(flatten)]
    observation: &'a WeatherObservation,
    coast: Coast,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(feature = "api")]
async fn list_cities(State(state): State<AppState>) -> Json<serde_json::Value> {
    let coasts: Vec<serde_json::Value> = Coast::all()
        .iter()
        .map(|coast| {
            let cities: Vec<&CoastalCity> = state.registry.on_coast(*coast).collect();
            serde_json::json!({
                "coast": coast,
                "cities": cities,
            })
        })
        .collect();

    Json(serde_json::json!({
        "coasts": coasts,
        "count": state.registry.len(),
    }))
}

#[cfg(feature = "api")]
async fn get_weather(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = state.find_city(&name)?;
    let observation = state.current_weather(&city).await?;

    let body = CityWeather { observation: &observation, coast: city.coast };
    serde_json::to_value(&body)
        .map(Json)
        .map_err(|e| AppError::Internal(format!("Serialization error: {}", e)))
}

/// Risk verdict under the requested strategy
#[cfg(feature = "api")]
async fn get_risk(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<StrategyQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = state.find_city(&name)?;
    let strategy = params.resolve()?;
    let observation = state.current_weather(&city).await?;

    let risk = compute_storm_risk(&observation, city.coast, strategy);
    tracing::info!("{} [{}]: {}% {}", city.name, strategy.name(), risk.probability, risk.risk_level);

    Ok(Json(serde_json::json!({
        "city": city.name,
        "coast": city.coast,
        "strategy": strategy,
        "risk": risk,
    })))
}

/// Dashboard bundle: weather, additive verdict, forecast and nearby risks
#[cfg(feature = "api")]
async fn get_storm_bundle(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = state.find_city(&name)?;
    let observation = state.current_weather(&city).await?;
    let prediction = compute_storm_risk(&observation, city.coast, ScoringStrategy::Additive);

    let (forecast, nearby) = tokio::join!(
        state.weather.forecast(city.lat, city.lon, state.config.forecast_points),
        rank_nearby(&state.registry, &city, state.weather.as_ref()),
    );

    let forecast = match forecast {
        Ok(points) => Some(points),
        Err(e) => {
            tracing::warn!("Forecast unavailable for {}: {}", city.name, e);
            None
        }
    };

    tracing::info!(
        "{}: {}% {}, {} neighbours ({} failed)",
        city.name,
        prediction.probability,
        prediction.risk_level,
        nearby.entries.len(),
        nearby.failed
    );

    Ok(Json(serde_json::json!({
        "city": city.name,
        "coast": city.coast,
        "current_weather": observation,
        "storm_prediction": prediction,
        "hourly_forecast": forecast,
        "nearby_risks": nearby.entries,
        "nearby_summary": {
            "evaluated": nearby.evaluated,
            "failed": nearby.failed,
        },
    })))
}

/// Coast-calibrated verdict with timeline and nearest shelters
#[cfg(feature = "api")]
async fn get_outlook(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = state.find_city(&name)?;
    let observation = state.current_weather(&city).await?;
    let prediction = compute_storm_risk(&observation, city.coast, ScoringStrategy::CoastCalibrated);
    let shelters = state.nearest_shelters(&city).await;

    Ok(Json(serde_json::json!({
        "city": city.name,
        "coast": city.coast,
        "current_weather": observation,
        "storm_prediction": prediction,
        "shelters": shelters,
    })))
}

#[cfg(feature = "api")]
async fn get_shelters(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let city = state.find_city(&name)?;
    let shelters = state.nearest_shelters(&city).await;

    Ok(Json(serde_json::json!({
        "city": city.name,
        "count": shelters.len(),
        "shelters": shelters,
    })))
}

/// Risk for every registry city
///
/// Weather is fetched concurrently; scoring runs on rayon's pool inside
/// `spawn_blocking`. Cities whose fetch fails are skipped and counted.
#[cfg(feature = "api")]
async fn get_overview(
    State(state): State<AppState>,
    Query(params): Query<StrategyQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    use futures::future::join_all;
    use rayon::prelude::*;

    let strategy = params.resolve()?;
    let start = std::time::Instant::now();

    let cities: Vec<CoastalCity> = state.registry.all().to_vec();
    let evaluated = cities.len();
    let fetched = join_all(cities.iter().map(|city| state.weather.current(city))).await;

    let mut observations = Vec::with_capacity(cities.len());
    let mut failed = 0usize;
    for (city, result) in cities.into_iter().zip(fetched) {
        match result {
            Ok(observation) => observations.push((city, observation)),
            Err(e) => {
                tracing::warn!("Overview: skipping {}: {}", city.name, e);
                failed += 1;
            }
        }
    }

    // One anchor for every timeline in the batch
    let anchor = chrono::Local::now().naive_local();
    let results = tokio::task::spawn_blocking(move || {
        observations
            .par_iter()
            .map(|(city, observation)| {
                let risk = compute_storm_risk_at(observation, city.coast, strategy, anchor);
                serde_json::json!({
                    "city": city.name,
                    "coast": city.coast,
                    "lat": city.lat,
                    "lon": city.lon,
                    "probability": risk.probability,
                    "risk_level": risk.risk_level,
                    "alert_color": risk.alert_color,
                })
            })
            .collect::<Vec<_>>()
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    tracing::info!(
        "Overview [{}]: {} scored, {} failed in {:?}",
        strategy.name(),
        results.len(),
        failed,
        start.elapsed()
    );

    Ok(Json(serde_json::json!({
        "strategy": strategy,
        "evaluated": evaluated,
        "failed": failed,
        "results": results,
    })))
}
