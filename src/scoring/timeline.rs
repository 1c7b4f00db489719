//! Forecast timeline synthesis
//!
//! Deterministic lookup, not a simulation: the probability selects one of four
//! fixed templates (>70, >45, >25, else). Only the anchor time is runtime
//! dependent. In the three stormy templates the first entry echoes the current
//! storm-type and rainfall labels.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One projected event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Wall-clock time of the event, `HH:MM`
    pub time: String,
    /// Hours after the anchor
    pub offset_hours: i64,
    pub event: String,
    pub rainfall: String,
}

#[derive(Clone, Copy)]
enum Label {
    Fixed(&'static str),
    /// Current storm-type label
    StormType,
    /// Current rainfall-intensity label
    CurrentRainfall,
}

struct Step {
    offset_hours: i64,
    event: Label,
    rainfall: Label,
}

const fn step(offset_hours: i64, event: Label, rainfall: Label) -> Step {
    Step { offset_hours, event, rainfall }
}

use Label::{CurrentRainfall, Fixed, StormType};

static SEVERE: &[Step] = &[
    step(0, StormType, CurrentRainfall),
    step(3, Fixed("Peak Storm Activity"), Fixed("Extremely Heavy Rain (>205 mm)")),
    step(6, Fixed("Gradual Weakening"), Fixed("Heavy Rain (64.5-115.5 mm)")),
    step(12, Fixed("Storm Subsiding"), Fixed("Moderate Rain (35.5-64.4 mm)")),
    step(24, Fixed("Clear Conditions Expected"), Fixed("Light Drizzle")),
];

static ELEVATED: &[Step] = &[
    step(0, StormType, CurrentRainfall),
    step(2, Fixed("Intensifying Conditions"), Fixed("Heavy Rain (64.5-115.5 mm)")),
    step(6, Fixed("Peak Wind Activity"), Fixed("Moderate to Heavy Rain")),
    step(12, Fixed("Conditions Improving"), Fixed("Light Rain (2.5-15.5 mm)")),
    step(18, Fixed("Clearing Up"), Fixed("Scattered Showers")),
];

static UNSETTLED: &[Step] = &[
    step(0, StormType, CurrentRainfall),
    step(3, Fixed("Possible Thunderstorms"), Fixed("Moderate Rain (35.5-64.4 mm)")),
    step(8, Fixed("Weather Stabilizing"), Fixed("Light Rain (2.5-15.5 mm)")),
    step(16, Fixed("Mostly Clear"), Fixed("Isolated Showers")),
];

static CALM: &[Step] = &[
    step(0, Fixed("Calm Conditions"), Fixed("No Significant Rain")),
    step(6, Fixed("Partly Cloudy"), Fixed("Very Light Rain (<2.5 mm)")),
    step(12, Fixed("Stable Weather"), Fixed("No Rain Expected")),
    step(24, Fixed("Clear Skies"), Fixed("Dry Conditions")),
];

fn template(probability: u8) -> &'static [Step] {
    match probability {
        p if p > 70 => SEVERE,
        p if p > 45 => ELEVATED,
        p if p > 25 => UNSETTLED,
        _ => CALM,
    }
}

/// Projected timeline for a coast-calibrated probability
pub fn synthesize_timeline(
    probability: u8,
    storm_type: &str,
    rainfall: &str,
    anchor: NaiveDateTime,
) -> Vec<TimelineEntry> {
    let resolve = |label: Label| match label {
        Fixed(text) => text.to_string(),
        StormType => storm_type.to_string(),
        CurrentRainfall => rainfall.to_string(),
    };

    template(probability)
        .iter()
        .map(|s| TimelineEntry {
            time: (anchor + Duration::hours(s.offset_hours)).format("%H:%M").to_string(),
            offset_hours: s.offset_hours,
            event: resolve(s.event),
            rainfall: resolve(s.rainfall),
        })
        .collect()
}
