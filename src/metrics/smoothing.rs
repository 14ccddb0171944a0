//! Power stream smoothing, zone classification and data-quality checks.
//!
//! Smoothing is a trailing rolling average so that effort boundaries are
//! never pulled forward in time: sample `i` only sees samples `..=i`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::metrics::zones::PowerZones;

/// Rolling average over the last `window_size` samples.
#[derive(Debug)]
pub struct RollingAverage {
    /// Buffer of recent values
    buffer: VecDeque<f64>,
    /// Window size in samples
    window_size: usize,
    /// Running sum for efficient calculation
    sum: f64,
}

impl RollingAverage {
    /// Create a new rolling average with the given window size.
    ///
    /// A window of 0 behaves like a window of 1.
    pub fn new(window_size: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            buffer: VecDeque::with_capacity(window_size),
            window_size,
            sum: 0.0,
        }
    }

    /// Add a new value and return the current average.
    pub fn add(&mut self, value: f64) -> f64 {
        self.buffer.push_back(value);
        self.sum += value;

        if self.buffer.len() > self.window_size {
            if let Some(old) = self.buffer.pop_front() {
                self.sum -= old;
            }
        }

        self.sum / self.buffer.len() as f64
    }
}

/// Smooth a 1 Hz power stream with a trailing rolling average.
///
/// Before the window fills, every sample seen so far is averaged.
pub fn smooth(power: &[f64], window_sec: usize) -> Vec<f64> {
    if window_sec <= 1 {
        return power.to_vec();
    }

    let mut avg = RollingAverage::new(window_sec);
    power.iter().map(|&p| avg.add(p)).collect()
}

/// Classify a single power value into a zone (1-5).
pub fn classify(power: f64, zones: &PowerZones) -> u8 {
    zones.zone_for(power)
}

/// Zone timeline of an (already smoothed) power stream.
pub fn timeline(power: &[f64], zones: &PowerZones) -> Vec<u8> {
    power.iter().map(|&p| classify(p, zones)).collect()
}

/// Replace negative and non-finite samples with 0W.
pub fn sanitize(power: &[f64]) -> Vec<f64> {
    power
        .iter()
        .map(|&p| if p.is_finite() { p.max(0.0) } else { 0.0 })
        .collect()
}

/// Coarse quality rating of a recorded power stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerDataQuality {
    /// Few or no dropouts
    Good,
    /// A noticeable share of samples are dropouts
    Partial,
    /// No usable power data
    Missing,
}

impl std::fmt::Display for PowerDataQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerDataQuality::Good => write!(f, "good"),
            PowerDataQuality::Partial => write!(f, "partial"),
            PowerDataQuality::Missing => write!(f, "missing"),
        }
    }
}

/// A sample is a dropout when it is zero, negative or not a number.
pub fn is_dropout(power: f64) -> bool {
    !(power.is_finite() && power > 0.0)
}

/// Fraction of dropout samples (1.0 for an empty stream).
pub fn dropout_ratio(power: &[f64]) -> f64 {
    if power.is_empty() {
        return 1.0;
    }
    let dropouts = power.iter().filter(|&&p| is_dropout(p)).count();
    dropouts as f64 / power.len() as f64
}

/// Rate a power stream.
///
/// An empty or all-dropout stream is `Missing`; a dropout share at or above
/// `partial_ratio` is `Partial`.
pub fn assess_power_quality(power: &[f64], partial_ratio: f64) -> PowerDataQuality {
    let ratio = dropout_ratio(power);
    if ratio >= 1.0 {
        PowerDataQuality::Missing
    } else if ratio >= partial_ratio {
        PowerDataQuality::Partial
    } else {
        PowerDataQuality::Good
    }
}
