//! Metrics module for zones and power stream processing.

pub mod smoothing;
pub mod zones;

pub use smoothing::{assess_power_quality, PowerDataQuality, RollingAverage};
pub use zones::{target_zone, HRZones, PowerZones, ZoneRange};
