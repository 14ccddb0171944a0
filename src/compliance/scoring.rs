//! Compliance scoring.
//!
//! Sub-scores for power, zone and duration, the per-type weight table that
//! blends them, and the duration-weighted workout aggregate.

use serde::{Deserialize, Serialize};

use crate::compliance::types::{OverallCompliance, SegmentAnalysis, ZoneDistribution};
use crate::workouts::types::SegmentType;

/// A 0-100 sub-score with a short human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceScore {
    pub score: f64,
    pub assessment: String,
}

impl ComplianceScore {
    pub fn new(score: f64, assessment: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            assessment: assessment.into(),
        }
    }

    /// Zero score for a segment with no matched effort.
    pub fn skipped() -> Self {
        Self::new(0.0, "Segment skipped")
    }
}

/// Score average power against a target range.
///
/// Falling short costs 2 points per percent of the range midpoint, overshooting
/// costs 1 point per percent.
pub fn power_compliance(avg_power: f64, low: u32, high: u32) -> ComplianceScore {
    let (low, high) = (f64::from(low), f64::from(high));
    let midpoint = (low + high) / 2.0;

    if avg_power >= low && avg_power <= high {
        return ComplianceScore::new(100.0, "Within target range");
    }
    if midpoint <= 0.0 {
        return ComplianceScore::new(0.0, "No power target");
    }

    if avg_power < low {
        let pct = (low - avg_power) / midpoint * 100.0;
        ComplianceScore::new(100.0 - 2.0 * pct, format!("{:.0}% below target", pct))
    } else {
        let pct = (avg_power - high) / midpoint * 100.0;
        ComplianceScore::new(100.0 - pct, format!("{:.0}% above target", pct))
    }
}

/// Score the share of time spent in the target zone.
pub fn zone_compliance(distribution: &ZoneDistribution, target_zone: u8) -> ComplianceScore {
    let pct = distribution.get(target_zone) * 100.0;
    let assessment = match pct {
        p if p >= 90.0 => format!("Held zone {} throughout", target_zone),
        p if p >= 70.0 => format!("Mostly in zone {} ({:.0}%)", target_zone, p),
        p if p >= 40.0 => format!("Partly in zone {} ({:.0}%)", target_zone, p),
        p => format!("Rarely in zone {} ({:.0}%)", target_zone, p),
    };
    ComplianceScore::new(pct, assessment)
}

/// Score actual duration against planned duration.
pub fn duration_compliance(actual_sec: u32, planned_sec: u32) -> ComplianceScore {
    if planned_sec == 0 {
        return ComplianceScore::new(0.0, "No planned duration");
    }

    let ratio = f64::from(actual_sec) / f64::from(planned_sec);
    let deviation = (ratio - 1.0).abs();
    let score = duration_score(deviation);

    let assessment = if deviation <= 0.10 {
        "On plan".to_string()
    } else if ratio < 1.0 {
        format!("{:.0}% shorter than planned", deviation * 100.0)
    } else {
        format!("{:.0}% longer than planned", deviation * 100.0)
    };
    ComplianceScore::new(score, assessment)
}

/// Step table for relative duration deviation.
fn duration_score(deviation: f64) -> f64 {
    match deviation {
        d if d <= 0.10 => 100.0,
        d if d <= 0.20 => 85.0,
        d if d <= 0.30 => 70.0,
        d if d <= 0.50 => 50.0,
        d => (50.0 - (d - 0.5) * 100.0).max(0.0),
    }
}

/// Weights blending the three sub-scores; each triple sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub power: f64,
    pub zone: f64,
    pub duration: f64,
}

impl ScoreWeights {
    /// Weight table keyed by segment type.
    pub fn for_type(segment_type: SegmentType) -> Self {
        match segment_type {
            SegmentType::Work => Self::new(0.45, 0.40, 0.15),
            SegmentType::Recovery => Self::new(0.20, 0.30, 0.50),
            SegmentType::Warmup | SegmentType::Cooldown => Self::new(0.30, 0.30, 0.40),
            SegmentType::Steady | SegmentType::Tempo => Self::default(),
        }
    }

    const fn new(power: f64, zone: f64, duration: f64) -> Self {
        Self {
            power,
            zone,
            duration,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::new(0.35, 0.35, 0.30)
    }
}

/// Blend the sub-scores with the weights for `segment_type`.
pub fn segment_score(power: f64, zone: f64, duration: f64, segment_type: SegmentType) -> f64 {
    let w = ScoreWeights::for_type(segment_type);
    (power * w.power + zone * w.zone + duration * w.duration).clamp(0.0, 100.0)
}

/// Qualitative rating of a segment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
    Skipped,
}

impl MatchQuality {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::Good
        } else if score >= 60.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl std::fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchQuality::Excellent => write!(f, "excellent"),
            MatchQuality::Good => write!(f, "good"),
            MatchQuality::Fair => write!(f, "fair"),
            MatchQuality::Poor => write!(f, "poor"),
            MatchQuality::Skipped => write!(f, "skipped"),
        }
    }
}

/// Letter grade for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

/// Aggregate segment scores into the workout score.
///
/// Completed segments are averaged weighted by planned duration, then
/// `skip_penalty` points come off per skipped segment. The result is clamped
/// to 0-100; with nothing completed it is 0.
pub fn overall_compliance(segments: &[SegmentAnalysis], skip_penalty: f64) -> OverallCompliance {
    let segments_total = segments.len();
    let segments_skipped = segments.iter().filter(|s| s.skipped).count();
    let segments_completed = segments_total - segments_skipped;

    let (weighted, total_duration) = segments
        .iter()
        .filter(|s| !s.skipped)
        .fold((0.0, 0.0), |(sum, dur), s| {
            let d = f64::from(s.planned_duration_sec);
            (sum + s.segment_score * d, dur + d)
        });

    let score = if segments_completed == 0 || total_duration <= 0.0 {
        0.0
    } else {
        let mean = weighted / total_duration;
        (mean - skip_penalty * segments_skipped as f64).clamp(0.0, 100.0)
    };

    OverallCompliance {
        score,
        grade: Grade::from_score(score),
        segments_completed,
        segments_skipped,
        segments_total,
    }
}
