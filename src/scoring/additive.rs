//! Additive factor scoring (coast-independent)
//!
//! Six factors each contribute points from a band table checked most-severe
//! first; only the first matching band of a factor counts. Bands are never
//! summed within a factor.
//!
//! | Factor | Bands (points) |
//! |--------|----------------|
//! | Pressure (hPa) | <980 (50), <995 (35), <1005 (20), <1010 (8) |
//! | Wind (m/s) | >20 (40), >15 (25), >10 (12), >7 (5) |
//! | Humidity | >90 with pressure <1005 (20), >85 (10), >75 (5) |
//! | Condition | thunderstorm (45), storm (35), rain + wind >10 (18), rain (8) |
//! | Instability \|temp − feels_like\| | >8 (15), >5 (8) |
//! | Visibility (km) | <2 (12), <5 (6) |
//!
//! The total is clamped to [0, 100] and mapped to Low / Moderate / High / Very High.

use super::rules::{first_match, Rule};
use super::{clamp_probability, RiskTier, ScoringStrategy, StormRisk};
use crate::observation::WeatherObservation;
use crate::utils::compass_label;

/// Points and explanation for one matched band
pub struct Contribution {
    pub points: u8,
    pub message: fn(&WeatherObservation) -> String,
}

type FactorTable = [Rule<WeatherObservation, Contribution>];

// ============================================================================
// Factor band tables (most severe first)
// ============================================================================

static PRESSURE_BANDS: &FactorTable = &[
    Rule {
        when: |o| o.pressure < 980.0,
        then: Contribution { points: 50, message: |_| "CRITICAL: Extremely low pressure - severe storm system".to_string() },
    },
    Rule {
        when: |o| o.pressure < 995.0,
        then: Contribution { points: 35, message: |_| "Very low atmospheric pressure - strong storm possible".to_string() },
    },
    Rule {
        when: |o| o.pressure < 1005.0,
        then: Contribution { points: 20, message: |_| "Low pressure system detected".to_string() },
    },
    Rule {
        when: |o| o.pressure < 1010.0,
        then: Contribution { points: 8, message: |_| "Below normal pressure".to_string() },
    },
];

static WIND_BANDS: &FactorTable = &[
    Rule {
        when: |o| o.wind_speed > 20.0,
        then: Contribution { points: 40, message: |o| format!("Very strong winds - {} m/s (Potential cyclonic)", o.wind_speed) },
    },
    Rule {
        when: |o| o.wind_speed > 15.0,
        then: Contribution { points: 25, message: |o| format!("Strong winds - {} m/s", o.wind_speed) },
    },
    Rule {
        when: |o| o.wind_speed > 10.0,
        then: Contribution { points: 12, message: |o| format!("Moderate to strong winds - {} m/s", o.wind_speed) },
    },
    Rule {
        when: |o| o.wind_speed > 7.0,
        then: Contribution { points: 5, message: |o| format!("Moderate winds - {} m/s", o.wind_speed) },
    },
];

static HUMIDITY_BANDS: &FactorTable = &[
    Rule {
        when: |o| o.humidity > 90.0 && o.pressure < 1005.0,
        then: Contribution { points: 20, message: |_| "High humidity with low pressure - storm conditions".to_string() },
    },
    Rule {
        when: |o| o.humidity > 85.0,
        then: Contribution { points: 10, message: |o| format!("Very high humidity - {}%", o.humidity) },
    },
    Rule {
        when: |o| o.humidity > 75.0,
        then: Contribution { points: 5, message: |o| format!("High humidity - {}%", o.humidity) },
    },
];

static CONDITION_BANDS: &FactorTable = &[
    Rule {
        when: |o| o.main.to_lowercase().contains("thunderstorm"),
        then: Contribution { points: 45, message: |_| "ACTIVE THUNDERSTORM in progress".to_string() },
    },
    Rule {
        when: |o| o.main.to_lowercase().contains("storm"),
        then: Contribution { points: 35, message: |_| "Storm conditions present".to_string() },
    },
    Rule {
        // Description, not category: "light rain" under a "Drizzle" category still counts
        when: |o| o.condition.to_lowercase().contains("rain") && o.wind_speed > 10.0,
        then: Contribution { points: 18, message: |_| "Heavy rain with strong winds".to_string() },
    },
    Rule {
        when: |o| o.main.to_lowercase().contains("rain"),
        then: Contribution { points: 8, message: |_| "Rainy conditions".to_string() },
    },
];

static INSTABILITY_BANDS: &FactorTable = &[
    Rule {
        when: |o| (o.temp - o.feels_like).abs() > 8.0,
        then: Contribution { points: 15, message: |_| "Large temperature variation - unstable atmosphere".to_string() },
    },
    Rule {
        when: |o| (o.temp - o.feels_like).abs() > 5.0,
        then: Contribution { points: 8, message: |_| "Temperature variation detected".to_string() },
    },
];

static VISIBILITY_BANDS: &FactorTable = &[
    Rule {
        when: |o| o.visibility < 2.0,
        then: Contribution { points: 12, message: |o| format!("Poor visibility - {} km", o.visibility) },
    },
    Rule {
        when: |o| o.visibility < 5.0,
        then: Contribution { points: 6, message: |o| format!("Reduced visibility - {} km", o.visibility) },
    },
];

/// Factors in evaluation order (also the order of the factor list)
static FACTORS: [&FactorTable; 6] = [
    PRESSURE_BANDS,
    WIND_BANDS,
    HUMIDITY_BANDS,
    CONDITION_BANDS,
    INSTABILITY_BANDS,
    VISIBILITY_BANDS,
];

// ============================================================================
// Tier ladder
// ============================================================================

struct AdditiveTier {
    /// Exclusive upper bound on probability; None for the top tier
    below: Option<u8>,
    tier: RiskTier,
    color: &'static str,
    recommendation: &'static str,
}

static TIERS: &[AdditiveTier] = &[
    AdditiveTier {
        below: Some(15),
        tier: RiskTier::Low,
        color: "#10b981",
        recommendation: "Weather conditions are favorable. Normal coastal activities can proceed safely.",
    },
    AdditiveTier {
        below: Some(35),
        tier: RiskTier::Moderate,
        color: "#f59e0b",
        recommendation: "Monitor weather updates regularly. Exercise caution near coastal areas.",
    },
    AdditiveTier {
        below: Some(60),
        tier: RiskTier::High,
        color: "#ef4444",
        recommendation: "Storm conditions developing. Avoid coastal areas, secure property, and stay indoors.",
    },
    AdditiveTier {
        below: None,
        tier: RiskTier::VeryHigh,
        color: "#dc2626",
        recommendation: "SEVERE STORM ALERT: Immediate action required. Stay indoors, avoid all coastal areas, emergency supplies ready.",
    },
];

fn tier_for(probability: u8) -> &'static AdditiveTier {
    TIERS
        .iter()
        .find(|t| t.below.map_or(true, |limit| probability < limit))
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

/// Raw additive score and factor messages (before clamping)
pub fn additive_score(observation: &WeatherObservation) -> (u32, Vec<String>) {
    let mut score = 0u32;
    let mut factors = Vec::new();

    for table in FACTORS {
        if let Some(contribution) = first_match(table, observation) {
            score += u32::from(contribution.points);
            factors.push((contribution.message)(observation));
        }
    }

    (score, factors)
}

/// Score an observation with additive factor scoring
pub fn score_additive(observation: &WeatherObservation) -> StormRisk {
    let (score, factors) = additive_score(observation);
    let probability = clamp_probability(f64::from(score));
    let band = tier_for(probability);

    let wind_direction = compass_label(observation.wind_deg);

    StormRisk {
        strategy: ScoringStrategy::Additive,
        probability,
        risk_level: band.tier,
        alert_color: band.color,
        factors,
        recommendation: band.recommendation,
        wind_direction,
        wind_degrees: observation.wind_deg,
        wind_info: format!("Winds from {} ({}°)", wind_direction, observation.wind_deg),
        storm_type: None,
        rainfall_type: None,
        timeline: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::fixtures;

    #[test]
    fn test_calm_conditions_score_zero() {
        let risk = score_additive(&fixtures::calm("Goa"));
        assert_eq!(risk.probability, 0);
        assert_eq!(risk.risk_level, RiskTier::Low);
        assert_eq!(risk.alert_color, "#10b981");
        assert!(risk.factors.is_empty());
        assert_eq!(risk.wind_direction, "S");
        assert_eq!(risk.wind_info, "Winds from S (180°)");
    }

    #[test]
    fn test_severe_snapshot_clamps_to_100() {
        let mut obs = fixtures::calm("Chennai");
        obs.pressure = 970.0;
        obs.wind_speed = 22.0;
        obs.humidity = 92.0;
        obs.main = "Thunderstorm".to_string();
        obs.condition = "thunderstorm with heavy rain".to_string();
        obs.temp = 30.0;
        obs.feels_like = 33.0;
        obs.visibility = 1.5;

        // 50 + 40 + 20 + 45 + 0 + 12 = 167
        assert_eq!(additive_score(&obs).0, 167);

        let risk = score_additive(&obs);
        assert_eq!(risk.probability, 100);
        assert_eq!(risk.risk_level, RiskTier::VeryHigh);
        assert_eq!(risk.alert_color, "#dc2626");
        assert!(risk.recommendation.starts_with("SEVERE STORM ALERT"));
        assert_eq!(risk.factors.len(), 5);
        assert_eq!(risk.factors[0], "CRITICAL: Extremely low pressure - severe storm system");
        assert_eq!(risk.factors[1], "Very strong winds - 22 m/s (Potential cyclonic)");
        assert_eq!(risk.factors[4], "Poor visibility - 1.5 km");
    }

    #[test]
    fn test_only_first_band_per_factor() {
        let mut obs = fixtures::calm("Puri");
        // Satisfies every pressure band; only the <980 band applies
        obs.pressure = 975.0;
        let (score, factors) = additive_score(&obs);
        assert_eq!(score, 50);
        assert_eq!(factors.len(), 1);
    }

    #[test]
    fn test_condition_bands() {
        let mut obs = fixtures::calm("Kochi");

        obs.main = "Rain".to_string();
        obs.condition = "moderate rain".to_string();
        assert_eq!(additive_score(&obs).0, 8);

        // Rain with strong wind: 18 for condition + 12 for wind
        obs.wind_speed = 11.0;
        assert_eq!(additive_score(&obs).0, 30);

        obs.wind_speed = 3.0;
        obs.main = "Storm".to_string();
        assert_eq!(additive_score(&obs).0, 35);

        obs.main = "THUNDERSTORM".to_string();
        assert_eq!(additive_score(&obs).0, 45);
    }

    #[test]
    fn test_humidity_combines_with_pressure() {
        let mut obs = fixtures::calm("Digha");
        obs.humidity = 95.0;
        // High pressure: falls through to the >85 band
        assert_eq!(additive_score(&obs).0, 10);

        // Low pressure: 20 (pressure) + 20 (humidity with low pressure)
        obs.pressure = 1000.0;
        assert_eq!(additive_score(&obs).0, 40);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for(0).tier, RiskTier::Low);
        assert_eq!(tier_for(14).tier, RiskTier::Low);
        assert_eq!(tier_for(15).tier, RiskTier::Moderate);
        assert_eq!(tier_for(34).tier, RiskTier::Moderate);
        assert_eq!(tier_for(35).tier, RiskTier::High);
        assert_eq!(tier_for(59).tier, RiskTier::High);
        assert_eq!(tier_for(60).tier, RiskTier::VeryHigh);
        assert_eq!(tier_for(100).tier, RiskTier::VeryHigh);
    }

    #[test]
    fn test_probability_bounded_for_extreme_inputs() {
        let mut obs = fixtures::calm("Surat");
        for &(pressure, wind, humidity, vis) in &[
            (-1000.0, 1e6, 1e4, -50.0),
            (5000.0, -20.0, -30.0, 1e9),
            (0.0, 0.0, 0.0, 0.0),
        ] {
            obs.pressure = pressure;
            obs.wind_speed = wind;
            obs.humidity = humidity;
            obs.visibility = vis;
            let risk = score_additive(&obs);
            assert!(risk.probability <= 100);
        }
    }

    #[test]
    fn test_monotonic_in_wind_and_pressure_deficit() {
        let base = fixtures::calm("Balasore");

        let mut last = 0;
        for step in 0..60 {
            let mut obs = base.clone();
            obs.wind_speed = step as f64 * 0.5;
            obs.main = "Rain".to_string();
            obs.condition = "light rain".to_string();
            let p = score_additive(&obs).probability;
            assert!(p >= last, "wind {} dropped probability {} -> {}", obs.wind_speed, last, p);
            last = p;
        }

        let mut last = 0;
        for step in 0..80 {
            let mut obs = base.clone();
            obs.humidity = 95.0;
            // Deficit (1010 - pressure) grows with each step
            obs.pressure = 1030.0 - step as f64;
            let p = score_additive(&obs).probability;
            assert!(p >= last, "pressure {} dropped probability {} -> {}", obs.pressure, last, p);
            last = p;
        }
    }
}
