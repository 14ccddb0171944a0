//! Effort block detection.
//!
//! Splits a recorded power stream into blocks of sustained effort. A zone
//! change only opens a new block when the new zone holds for most of the
//! following lookahead window; short spikes and coasting stay inside the
//! surrounding block.

use crate::compliance::params::AdaptiveParameters;
use crate::compliance::types::{zone_counts, DetectedBlock, ZoneDistribution};
use crate::metrics::smoothing::{smooth, timeline};
use crate::metrics::zones::PowerZones;

/// Default share of the lookahead window the new zone must hold.
pub const DEFAULT_BOUNDARY_DOMINANCE: f64 = 0.70;

/// Effort block detector.
#[derive(Debug, Clone)]
pub struct EffortBlockDetector {
    /// Required share of the new zone in the lookahead window (0-1].
    dominance: f64,
}

impl EffortBlockDetector {
    /// Create with the default 70% dominance rule.
    pub fn new() -> Self {
        Self::with_dominance(DEFAULT_BOUNDARY_DOMINANCE)
    }

    /// Create with a custom dominance share.
    pub fn with_dominance(dominance: f64) -> Self {
        Self { dominance }
    }

    /// Detect effort blocks in a 1 Hz power stream.
    ///
    /// Returns an empty list for an empty stream.
    pub fn detect(
        &self,
        raw_power: &[f64],
        zones: &PowerZones,
        params: &AdaptiveParameters,
    ) -> Vec<DetectedBlock> {
        if raw_power.is_empty() {
            return Vec::new();
        }

        let smoothed = smooth(raw_power, params.smoothing_window_sec as usize);
        let zone_timeline = timeline(&smoothed, zones);
        let lookahead = (params.min_segment_duration_sec as usize).max(1);
        let n = zone_timeline.len();

        let mut blocks = Vec::new();
        let mut start = 0;
        let mut current_zone = zone_timeline[0];

        for i in 1..n {
            let zone = zone_timeline[i];
            if zone == current_zone {
                continue;
            }

            let window = &zone_timeline[i..(i + lookahead).min(n)];
            if self.is_sustained(window, zone) {
                blocks.push(build_block(raw_power, &zone_timeline, start, i));
                start = i;
                current_zone = zone;
            }
        }
        blocks.push(build_block(raw_power, &zone_timeline, start, n));

        tracing::debug!(
            "Detected {} effort blocks in {}s of data",
            blocks.len(),
            raw_power.len()
        );
        blocks
    }

    /// Whether `zone` dominates the lookahead window.
    fn is_sustained(&self, window: &[u8], zone: u8) -> bool {
        if window.is_empty() {
            return false;
        }
        let hits = window.iter().filter(|&&z| z == zone).count();
        hits as f64 / window.len() as f64 >= self.dominance
    }
}

impl Default for EffortBlockDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Summarize `raw[start..end]` as a detected block.
fn build_block(raw: &[f64], zone_timeline: &[u8], start: usize, end: usize) -> DetectedBlock {
    let samples = &raw[start..end];
    let zones = &zone_timeline[start..end];

    let sum: f64 = samples.iter().sum();
    let max_power = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_power = samples.iter().copied().fold(f64::INFINITY, f64::min);

    DetectedBlock {
        start_sec: start as u32,
        end_sec: end as u32,
        duration_sec: (end - start) as u32,
        dominant_zone: dominant_zone(zones),
        avg_power: sum / samples.len() as f64,
        max_power,
        min_power,
        zone_distribution: ZoneDistribution::from_timeline(zones),
    }
}

/// Most frequent zone; ties go to the lower zone.
fn dominant_zone(zones: &[u8]) -> u8 {
    let counts = zone_counts(zones);
    let mut best = 0;
    for idx in 1..counts.len() {
        if counts[idx] > counts[best] {
            best = idx;
        }
    }
    best as u8 + 1
}
