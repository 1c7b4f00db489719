//! Wind Direction Labels
//!
//! Maps a bearing (degrees clockwise from true north) to one of 16 compass points.

/// 16-point compass rose, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Degrees covered by each compass sector
const SECTOR_DEGREES: f64 = 22.5;

/// Compass label for a bearing in degrees.
///
/// Algorithm: `round(degrees / 22.5) mod 16`, with a Euclidean modulo so
/// negative and >360 bearings wrap the same way. Exact sector boundaries
/// (e.g. 11.25°) round half-to-even.
pub fn compass_label(degrees: f64) -> &'static str {
    let sector = (degrees / SECTOR_DEGREES).round_ties_even() as i64;
    COMPASS_POINTS[sector.rem_euclid(16) as usize]
}
