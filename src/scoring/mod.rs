//! Storm-risk scoring
//!
//! Two heuristics classify a single weather snapshot into a risk tier:
//! - `additive`: coast-independent factor scoring (pressure, wind, humidity,
//!   condition, temperature instability, visibility)
//! - `coastal`: coast-calibrated weighted sums with per-coast tier ladders,
//!   plus storm-type / rainfall labels and a projected timeline
//!
//! Both sit behind [`compute_storm_risk`]; callers name the strategy they want.
//! Scoring is pure: no I/O, no hidden state. Only the timeline anchor depends
//! on the clock, and [`compute_storm_risk_at`] takes it explicitly.

pub mod additive;
pub mod coastal;
pub mod rules;
pub mod timeline;

pub use additive::score_additive;
pub use coastal::{rainfall_intensity, score_coastal, storm_type};
pub use timeline::{synthesize_timeline, TimelineEntry};

use crate::observation::WeatherObservation;
use crate::registry::Coast;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordered risk category.
///
/// Additive scoring uses Low..VeryHigh; coast-calibrated scoring uses
/// VeryLow..Critical (East Coast never reaches VeryLow, West Coast never
/// reaches Critical).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
    Critical,
}

impl RiskTier {
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::VeryLow => "Very Low",
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
            RiskTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named scoring heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    /// Coast-independent additive factor scoring
    Additive,
    /// Coast-calibrated weighted scoring
    #[serde(rename = "coastal")]
    CoastCalibrated,
}

impl ScoringStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringStrategy::Additive => "additive",
            ScoringStrategy::CoastCalibrated => "coastal",
        }
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "additive" | "factor" => Ok(ScoringStrategy::Additive),
            "coastal" | "calibrated" | "coast" => Ok(ScoringStrategy::CoastCalibrated),
            other => Err(format!("Unknown scoring strategy '{}' (expected 'additive' or 'coastal')", other)),
        }
    }
}

/// Risk verdict for one snapshot. Computed fresh per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct StormRisk {
    pub strategy: ScoringStrategy,
    /// Integer probability in [0, 100]
    pub probability: u8,
    pub risk_level: RiskTier,
    pub alert_color: &'static str,
    /// Human-readable contributing factors, in evaluation order
    pub factors: Vec<String>,
    pub recommendation: &'static str,
    pub wind_direction: &'static str,
    pub wind_degrees: f64,
    pub wind_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storm_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<TimelineEntry>>,
}

/// Score an observation with the named strategy, anchoring any timeline at now
pub fn compute_storm_risk(
    observation: &WeatherObservation,
    coast: Coast,
    strategy: ScoringStrategy,
) -> StormRisk {
    compute_storm_risk_at(observation, coast, strategy, Local::now().naive_local())
}

/// Score an observation with the named strategy and an explicit timeline anchor
pub fn compute_storm_risk_at(
    observation: &WeatherObservation,
    coast: Coast,
    strategy: ScoringStrategy,
    anchor: NaiveDateTime,
) -> StormRisk {
    match strategy {
        ScoringStrategy::Additive => score_additive(observation),
        ScoringStrategy::CoastCalibrated => score_coastal(observation, coast, anchor),
    }
}

/// Clamp a raw score into the [0, 100] probability range
pub(crate) fn clamp_probability(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u8
}
