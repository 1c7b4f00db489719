//! Coast-calibrated scoring
//!
//! Each coast has its own four-tier ladder. A tier is selected by the first
//! (humidity, wind) threshold pair satisfied, checked most-severe first, and
//! its probability is a capped weighted sum:
//!
//! `min(cap, round(humidity·wh + wind·ww + (1010 − pressure)·wp))`
//!
//! The East Coast ladder has lower thresholds and higher caps (frequent,
//! severe cyclonic activity), so East ≥ West for identical top-tier readings.
//!
//! Also derives a storm-type and a rainfall-intensity label from independent
//! rule tables, and the projected timeline for the resulting probability.

use super::rules::{first_match_or, Rule};
use super::timeline::synthesize_timeline;
use super::{clamp_probability, RiskTier, ScoringStrategy, StormRisk};
use crate::observation::WeatherObservation;
use crate::registry::Coast;
use crate::utils::compass_label;
use chrono::NaiveDateTime;

/// Reference pressure for the deficit term (hPa)
const REFERENCE_PRESSURE: f64 = 1010.0;

/// Readings the calibrated ladders look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoastalReadings {
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
}

impl From<&WeatherObservation> for CoastalReadings {
    fn from(obs: &WeatherObservation) -> Self {
        Self {
            humidity: obs.humidity,
            wind_speed: obs.wind_speed,
            pressure: obs.pressure,
        }
    }
}

/// One rung of a coast's tier ladder
#[derive(Debug, Clone, Copy)]
pub struct CalibratedTier {
    pub min_humidity: f64,
    pub min_wind: f64,
    pub cap: u8,
    pub humidity_weight: f64,
    pub wind_weight: f64,
    pub pressure_weight: f64,
    pub tier: RiskTier,
    pub color: &'static str,
}

impl CalibratedTier {
    fn qualifies(&self, r: &CoastalReadings) -> bool {
        r.humidity >= self.min_humidity && r.wind_speed >= self.min_wind
    }

    fn probability(&self, r: &CoastalReadings) -> u8 {
        let raw = r.humidity * self.humidity_weight
            + r.wind_speed * self.wind_weight
            + (REFERENCE_PRESSURE - r.pressure) * self.pressure_weight;
        // Ties round half-to-even
        clamp_probability(raw.round_ties_even()).min(self.cap)
    }
}

// ============================================================================
// Tier ladders (most severe first; the last rung always qualifies)
// ============================================================================

static EAST_COAST_LADDER: &[CalibratedTier] = &[
    CalibratedTier { min_humidity: 85.0, min_wind: 12.0, cap: 95, humidity_weight: 0.6, wind_weight: 3.5, pressure_weight: 0.5, tier: RiskTier::Critical, color: "#dc2626" },
    CalibratedTier { min_humidity: 75.0, min_wind: 8.0, cap: 70, humidity_weight: 0.4, wind_weight: 2.5, pressure_weight: 0.0, tier: RiskTier::High, color: "#ef4444" },
    CalibratedTier { min_humidity: 65.0, min_wind: 5.0, cap: 45, humidity_weight: 0.3, wind_weight: 1.5, pressure_weight: 0.0, tier: RiskTier::Moderate, color: "#f97316" },
    CalibratedTier { min_humidity: f64::NEG_INFINITY, min_wind: f64::NEG_INFINITY, cap: 25, humidity_weight: 0.2, wind_weight: 0.8, pressure_weight: 0.0, tier: RiskTier::Low, color: "#10b981" },
];

static WEST_COAST_LADDER: &[CalibratedTier] = &[
    CalibratedTier { min_humidity: 90.0, min_wind: 15.0, cap: 85, humidity_weight: 0.5, wind_weight: 3.0, pressure_weight: 0.4, tier: RiskTier::High, color: "#ef4444" },
    CalibratedTier { min_humidity: 80.0, min_wind: 10.0, cap: 60, humidity_weight: 0.35, wind_weight: 2.0, pressure_weight: 0.0, tier: RiskTier::Moderate, color: "#f97316" },
    CalibratedTier { min_humidity: 70.0, min_wind: 6.0, cap: 35, humidity_weight: 0.25, wind_weight: 1.2, pressure_weight: 0.0, tier: RiskTier::Low, color: "#eab308" },
    CalibratedTier { min_humidity: f64::NEG_INFINITY, min_wind: f64::NEG_INFINITY, cap: 15, humidity_weight: 0.15, wind_weight: 0.5, pressure_weight: 0.0, tier: RiskTier::VeryLow, color: "#10b981" },
];

/// Tier ladder for a coast
pub fn ladder(coast: Coast) -> &'static [CalibratedTier] {
    match coast {
        Coast::East => EAST_COAST_LADDER,
        Coast::West => WEST_COAST_LADDER,
    }
}

/// First qualifying rung of the coast's ladder
pub fn select_tier(readings: &CoastalReadings, coast: Coast) -> &'static CalibratedTier {
    let rungs = ladder(coast);
    rungs
        .iter()
        .find(|rung| rung.qualifies(readings))
        .unwrap_or(&rungs[rungs.len() - 1])
}

/// Tier-keyed recommendation text
pub fn recommendation(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Critical => "URGENT: Evacuate coastal areas immediately. Seek shelter inland. Avoid all travel. Severe storm conditions imminent.",
        RiskTier::High | RiskTier::VeryHigh => "Secure all loose objects, avoid coastal areas and sea travel. Stay indoors and monitor emergency updates continuously.",
        RiskTier::Moderate => "Stay alert and avoid unnecessary travel near coast. Keep emergency supplies ready. Monitor weather updates.",
        RiskTier::Low => "Normal precautions. Keep umbrella handy. Avoid prolonged exposure to rain.",
        RiskTier::VeryLow => "No significant precautions needed. Enjoy your day with minimal weather concerns.",
    }
}

// ============================================================================
// Storm type and rainfall intensity
// ============================================================================

static STORM_TYPES: &[Rule<CoastalReadings, &str>] = &[
    Rule { when: |r| r.wind_speed > 25.0 && r.pressure < 990.0, then: "Severe Cyclonic Storm" },
    Rule { when: |r| r.wind_speed > 17.0 && r.pressure < 1000.0, then: "Tropical Storm" },
    Rule { when: |r| r.wind_speed > 12.0 && r.humidity > 85.0, then: "Thunderstorm with Heavy Rain" },
    Rule { when: |r| r.humidity > 80.0 && r.wind_speed > 8.0, then: "Moderate Thunderstorm" },
];

static RAINFALL_BANDS: &[Rule<CoastalReadings, &str>] = &[
    Rule { when: |r| r.humidity > 90.0 && r.wind_speed > 15.0, then: "Heavy to Very Heavy Rain (115-204 mm)" },
    Rule { when: |r| r.humidity > 85.0 && r.wind_speed > 10.0, then: "Heavy Rain (64.5-115.5 mm)" },
    Rule { when: |r| r.humidity > 75.0 && r.wind_speed > 7.0, then: "Moderate Rain (35.5-64.4 mm)" },
    Rule { when: |r| r.humidity > 65.0, then: "Light Rain (2.5-15.5 mm)" },
];

/// Storm-type label, default "Light Rain Showers"
pub fn storm_type(readings: &CoastalReadings) -> &'static str {
    *first_match_or(STORM_TYPES, readings, &"Light Rain Showers")
}

/// Rainfall-intensity label, default "Very Light Rain (<2.5 mm)"
pub fn rainfall_intensity(readings: &CoastalReadings) -> &'static str {
    *first_match_or(RAINFALL_BANDS, readings, &"Very Light Rain (<2.5 mm)")
}

fn humidity_qualifier(humidity: f64) -> &'static str {
    if humidity > 85.0 {
        "(Critical)"
    } else if humidity > 75.0 {
        "(Elevated)"
    } else {
        "(Normal)"
    }
}

fn wind_qualifier(wind_speed: f64) -> &'static str {
    if wind_speed > 12.0 {
        "(Dangerous)"
    } else if wind_speed > 8.0 {
        "(Strong)"
    } else {
        "(Moderate)"
    }
}

fn pressure_qualifier(pressure: f64) -> &'static str {
    if pressure < 995.0 {
        "(Very Low)"
    } else if pressure < 1005.0 {
        "(Low)"
    } else {
        "(Normal)"
    }
}

fn coastal_factors(r: &CoastalReadings, coast: Coast, storm: &str, rainfall: &str) -> Vec<String> {
    vec![
        format!("Humidity: {}% {}", r.humidity, humidity_qualifier(r.humidity)),
        format!("Wind Speed: {} m/s {}", r.wind_speed, wind_qualifier(r.wind_speed)),
        format!("Pressure: {} hPa {}", r.pressure, pressure_qualifier(r.pressure)),
        format!("Coastal Location: {}", coast),
        format!("Storm Type: {}", storm),
        format!("Expected Rainfall: {}", rainfall),
    ]
}

/// Score an observation with coast-calibrated scoring
pub fn score_coastal(observation: &WeatherObservation, coast: Coast, anchor: NaiveDateTime) -> StormRisk {
    let readings = CoastalReadings::from(observation);
    let rung = select_tier(&readings, coast);
    let probability = rung.probability(&readings);

    let storm = storm_type(&readings);
    let rainfall = rainfall_intensity(&readings);
    let timeline = synthesize_timeline(probability, storm, rainfall, anchor);

    let wind_info = match coast {
        Coast::East => "Strong onshore flow",
        Coast::West => "Moderate sea breeze",
    };

    StormRisk {
        strategy: ScoringStrategy::CoastCalibrated,
        probability,
        risk_level: rung.tier,
        alert_color: rung.color,
        factors: coastal_factors(&readings, coast, storm, rainfall),
        recommendation: recommendation(rung.tier),
        wind_direction: compass_label(observation.wind_deg),
        wind_degrees: observation.wind_deg,
        wind_info: wind_info.to_string(),
        storm_type: Some(storm),
        rainfall_type: Some(rainfall),
        timeline: Some(timeline),
    }
}
