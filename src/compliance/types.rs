//! Compliance analysis data model.
//!
//! Everything here is created fresh by one analysis call and handed back to
//! the caller as a plain serializable value.

use serde::{Deserialize, Serialize};

use crate::compliance::params::AdaptiveParameters;
use crate::compliance::scoring::{ComplianceScore, Grade, MatchQuality};
use crate::metrics::smoothing::PowerDataQuality;
use crate::workouts::types::SegmentType;

/// Fraction of time spent in each zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDistribution {
    pub z1: f64,
    pub z2: f64,
    pub z3: f64,
    pub z4: f64,
    pub z5: f64,
}

impl ZoneDistribution {
    /// Build from a zone timeline slice.
    pub fn from_timeline(zones: &[u8]) -> Self {
        if zones.is_empty() {
            return Self::default();
        }
        let counts = zone_counts(zones);
        let total = zones.len() as f64;
        Self {
            z1: counts[0] as f64 / total,
            z2: counts[1] as f64 / total,
            z3: counts[2] as f64 / total,
            z4: counts[3] as f64 / total,
            z5: counts[4] as f64 / total,
        }
    }

    /// Fraction for a zone (1-5); 0 for anything else.
    pub fn get(&self, zone: u8) -> f64 {
        match zone {
            1 => self.z1,
            2 => self.z2,
            3 => self.z3,
            4 => self.z4,
            5 => self.z5,
            _ => 0.0,
        }
    }

    /// Sum of all fractions (1.0 for a non-empty block).
    pub fn total(&self) -> f64 {
        self.z1 + self.z2 + self.z3 + self.z4 + self.z5
    }
}

/// Per-zone sample counts; out-of-range zones are clamped into 1-5.
pub(crate) fn zone_counts(zones: &[u8]) -> [usize; 5] {
    let mut counts = [0usize; 5];
    for &zone in zones {
        let idx = zone.clamp(1, 5) as usize - 1;
        counts[idx] += 1;
    }
    counts
}

/// A contiguous span of the recording classified as one sustained effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedBlock {
    /// First sample (inclusive)
    pub start_sec: u32,
    /// Last sample (exclusive)
    pub end_sec: u32,
    pub duration_sec: u32,
    /// Most frequent zone in the block
    pub dominant_zone: u8,
    pub avg_power: f64,
    pub max_power: f64,
    pub min_power: f64,
    pub zone_distribution: ZoneDistribution,
}

/// Alignment of one planned segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMatch {
    pub planned_index: usize,
    /// Matched detected block, `None` when skipped
    pub detected_index: Option<usize>,
    /// Similarity of the chosen block (0 when skipped)
    pub similarity_score: f64,
    pub skipped: bool,
}

/// What the athlete actually did during a matched segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualEffort {
    /// Index of the detected block
    pub block_index: usize,
    pub start_sec: u32,
    pub duration_sec: u32,
    pub avg_power: f64,
    pub max_power: f64,
    pub min_power: f64,
    pub dominant_zone: u8,
    pub zone_distribution: ZoneDistribution,
}

impl From<(usize, &DetectedBlock)> for ActualEffort {
    fn from((block_index, block): (usize, &DetectedBlock)) -> Self {
        Self {
            block_index,
            start_sec: block.start_sec,
            duration_sec: block.duration_sec,
            avg_power: block.avg_power,
            max_power: block.max_power,
            min_power: block.min_power,
            dominant_zone: block.dominant_zone,
            zone_distribution: block.zone_distribution,
        }
    }
}

/// Scored record for one planned segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub segment_index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub planned_duration_sec: u32,
    pub target_power_low: u32,
    pub target_power_high: u32,
    pub target_zone: u8,
    /// Observed effort, `None` when skipped
    pub actual: Option<ActualEffort>,
    pub similarity_score: f64,
    pub power_compliance: ComplianceScore,
    pub zone_compliance: ComplianceScore,
    pub duration_compliance: ComplianceScore,
    /// Weighted blend of the three sub-scores
    pub segment_score: f64,
    pub match_quality: MatchQuality,
    pub skipped: bool,
}

/// Workout-level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallCompliance {
    /// 0-100
    pub score: f64,
    pub grade: Grade,
    pub segments_completed: usize,
    pub segments_skipped: usize,
    pub segments_total: usize,
}

/// How the analysis was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub algorithm_version: String,
    pub power_data_quality: PowerDataQuality,
    pub adaptive_parameters: AdaptiveParameters,
    /// Share of zero/invalid samples in the recording
    pub dropout_ratio: f64,
    /// Number of effort blocks found in the recording
    pub detected_blocks: usize,
    /// Detected blocks no planned segment claimed
    pub extra_blocks: usize,
    pub planned_duration_sec: u32,
    pub recorded_duration_sec: u32,
}

/// Result of one compliance analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutComplianceAnalysis {
    pub overall: OverallCompliance,
    pub segments: Vec<SegmentAnalysis>,
    pub metadata: AnalysisMetadata,
}
