//! Utility modules shared across scoring and shelter ranking
//!
//! - Geo: Haversine + planar distance, bounding boxes
//! - Compass: bearing to 16-point label

pub mod compass;
pub mod geo;

// Re-export commonly used functions
pub use compass::compass_label;
pub use geo::{haversine_km, planar_approx_km, BoundingBox};
