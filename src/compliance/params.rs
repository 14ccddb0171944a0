//! Adaptive algorithm parameters.
//!
//! The shortest planned segment drives the tuning; short efforts get short
//! smoothing windows.

use serde::{Deserialize, Serialize};

use crate::workouts::types::PlannedSegment;

/// Tuning knobs for smoothing and block detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveParameters {
    /// Trailing rolling-average window in seconds
    pub smoothing_window_sec: u32,
    /// Lookahead used to confirm a zone change
    pub min_segment_duration_sec: u32,
    /// Time a new effort level must hold to count as a boundary
    pub boundary_stability_sec: u32,
}

impl Default for AdaptiveParameters {
    /// Long-interval parameters.
    fn default() -> Self {
        Self {
            smoothing_window_sec: 30,
            min_segment_duration_sec: 30,
            boundary_stability_sec: 20,
        }
    }
}

impl AdaptiveParameters {
    /// Select parameters from the shortest planned segment.
    pub fn select(segments: &[PlannedSegment]) -> Self {
        let Some(shortest) = segments.iter().map(|s| s.duration_sec).min() else {
            return Self::default();
        };

        let params = match shortest {
            0..=15 => Self::new(3, 5, 3),
            16..=30 => Self::new(5, 10, 5),
            31..=60 => Self::new(10, 15, 10),
            61..=180 => Self::new(15, 20, 15),
            _ => Self::default(),
        };

        tracing::debug!(
            "Shortest segment {}s -> smoothing {}s, min segment {}s",
            shortest,
            params.smoothing_window_sec,
            params.min_segment_duration_sec
        );
        params
    }

    const fn new(smoothing: u32, min_segment: u32, stability: u32) -> Self {
        Self {
            smoothing_window_sec: smoothing,
            min_segment_duration_sec: min_segment,
            boundary_stability_sec: stability,
        }
    }
}
