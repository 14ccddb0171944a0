//! Flattening of planned workouts into absolute-power segments.
//!
//! Either input shape (legacy list or step/repetition tree) ends up as one
//! ordered `Vec<PlannedSegment>`; indices are assigned by final position.

use crate::error::{ComplianceError, ComplianceResult};
use crate::metrics::zones::target_zone;
use crate::storage::config::WorkoutSettings;
use crate::workouts::types::{
    IntensityClass, IntervalStep, LegacySegment, NodeKind, PlannedSegment, PlannedWorkout,
    SegmentType, StructureNode, WorkoutStructure,
};

/// Fallback lower target (% FTP) when a step declares none.
pub const DEFAULT_POWER_LOW_PCT: f64 = 50.0;
/// Fallback upper target (% FTP) when a step declares none.
pub const DEFAULT_POWER_HIGH_PCT: f64 = 60.0;
/// Longest single segment accepted (24h); longer durations are clamped.
pub const MAX_SEGMENT_DURATION_SEC: u32 = 86_400;

/// Power bounds as declared by the source workout.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TargetBounds {
    /// Percent of FTP
    PercentFtp(f64, f64),
    /// Absolute watts
    Watts(f64, f64),
}

impl TargetBounds {
    fn default_recovery() -> Self {
        TargetBounds::PercentFtp(DEFAULT_POWER_LOW_PCT, DEFAULT_POWER_HIGH_PCT)
    }

    /// Build percent bounds from optional values, falling back to the default range.
    fn percent(low: Option<f64>, high: Option<f64>) -> Self {
        match resolve_pair(low, high) {
            Some((low, high)) => TargetBounds::PercentFtp(low, high),
            None => TargetBounds::default_recovery(),
        }
    }

    /// Convert to `(low_watts, high_watts, target_zone)`.
    fn resolve(self, ftp: f64) -> (u32, u32, u8) {
        let (low_pct, high_pct) = match self {
            TargetBounds::PercentFtp(low, high) => (low, high),
            TargetBounds::Watts(low, high) => (low / ftp * 100.0, high / ftp * 100.0),
        };
        let to_watts = |pct: f64| (ftp * pct / 100.0).round().max(0.0) as u32;
        (to_watts(low_pct), to_watts(high_pct), target_zone(low_pct, high_pct))
    }
}

/// Order a pair of optional bounds, mirroring a lone bound onto the other.
fn resolve_pair(low: Option<f64>, high: Option<f64>) -> Option<(f64, f64)> {
    let low = low.filter(|v| v.is_finite());
    let high = high.filter(|v| v.is_finite());
    let (a, b) = match (low, high) {
        (Some(l), Some(h)) => (l, h),
        (Some(v), None) | (None, Some(v)) => (v, v),
        (None, None) => return None,
    };
    Some((a.min(b), a.max(b)))
}

/// Accumulates flat segments and enforces the segment cap.
struct SegmentBuilder {
    ftp: f64,
    max_segments: usize,
    segments: Vec<PlannedSegment>,
    truncated: bool,
}

impl SegmentBuilder {
    fn new(ftp: f64, max_segments: usize) -> Self {
        Self {
            ftp,
            max_segments,
            segments: Vec::new(),
            truncated: false,
        }
    }

    fn is_full(&self) -> bool {
        self.truncated
    }

    fn push(
        &mut self,
        name: String,
        segment_type: SegmentType,
        duration_sec: u32,
        bounds: TargetBounds,
    ) {
        if self.truncated {
            return;
        }
        if duration_sec == 0 {
            tracing::debug!("Dropping zero-length segment '{}'", name);
            return;
        }
        if self.segments.len() >= self.max_segments {
            tracing::warn!(
                "Workout exceeds {} segments, ignoring the remainder",
                self.max_segments
            );
            self.truncated = true;
            return;
        }
        let duration_sec = if duration_sec > MAX_SEGMENT_DURATION_SEC {
            tracing::warn!(
                "Segment '{}' lasts {}s, clamped to {}s",
                name,
                duration_sec,
                MAX_SEGMENT_DURATION_SEC
            );
            MAX_SEGMENT_DURATION_SEC
        } else {
            duration_sec
        };

        let (power_low, power_high, target_zone) = bounds.resolve(self.ftp);
        self.segments.push(PlannedSegment {
            index: self.segments.len(),
            name,
            segment_type,
            duration_sec,
            power_low,
            power_high,
            target_zone,
        });
    }

    fn finish(self) -> Vec<PlannedSegment> {
        self.segments
    }
}

/// Flatten a planned workout into absolute-power segments.
///
/// A structure, when present, takes precedence over legacy segments.
pub fn flatten(
    legacy: Option<&[LegacySegment]>,
    ftp: f64,
    structure: Option<&WorkoutStructure>,
) -> ComplianceResult<Vec<PlannedSegment>> {
    let settings = WorkoutSettings::default();
    match structure {
        Some(structure) => flatten_structure(structure, ftp, &settings),
        None => flatten_legacy(legacy.unwrap_or_default(), ftp, &settings),
    }
}

/// Flatten either representation with explicit limits.
pub fn flatten_workout(
    workout: &PlannedWorkout,
    ftp: f64,
    settings: &WorkoutSettings,
) -> ComplianceResult<Vec<PlannedSegment>> {
    match workout {
        PlannedWorkout::Legacy(segments) => flatten_legacy(segments, ftp, settings),
        PlannedWorkout::Structured(structure) => flatten_structure(structure, ftp, settings),
    }
}

fn check_ftp(ftp: f64) -> ComplianceResult<()> {
    if ftp.is_finite() && ftp > 0.0 {
        Ok(())
    } else {
        Err(ComplianceError::invalid_ftp(ftp))
    }
}

fn minutes_to_secs(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 {
        (minutes * 60.0).round() as u32
    } else {
        0
    }
}

fn clamp_repetitions(count: u32, settings: &WorkoutSettings) -> u32 {
    if count > settings.max_repetitions {
        tracing::warn!(
            "Repetition count {} clamped to {}",
            count,
            settings.max_repetitions
        );
        settings.max_repetitions
    } else {
        count
    }
}

/// Flatten the legacy segment list.
pub fn flatten_legacy(
    segments: &[LegacySegment],
    ftp: f64,
    settings: &WorkoutSettings,
) -> ComplianceResult<Vec<PlannedSegment>> {
    check_ftp(ftp)?;
    let mut builder = SegmentBuilder::new(ftp, settings.max_segments);

    for segment in segments {
        if builder.is_full() {
            break;
        }

        if let (Some(sets), Some(work)) = (segment.sets, segment.work.as_ref()) {
            push_interval_set(&mut builder, segment, sets, work, settings);
            continue;
        }

        let segment_type = SegmentType::from_label(&segment.segment_type).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown segment type '{}', treating as steady",
                segment.segment_type
            );
            SegmentType::Steady
        });
        let name = segment
            .name
            .clone()
            .unwrap_or_else(|| segment_type.to_string());

        builder.push(
            name,
            segment_type,
            minutes_to_secs(segment.duration_min),
            TargetBounds::percent(segment.power_low_pct, segment.power_high_pct),
        );
    }

    Ok(builder.finish())
}

fn push_interval_set(
    builder: &mut SegmentBuilder,
    segment: &LegacySegment,
    sets: u32,
    work: &IntervalStep,
    settings: &WorkoutSettings,
) {
    let sets = clamp_repetitions(sets, settings);
    let base_name = segment.name.as_deref().unwrap_or("Interval");

    for set in 1..=sets {
        builder.push(
            format!("{} {}", base_name, set),
            SegmentType::Work,
            minutes_to_secs(work.duration_min),
            TargetBounds::percent(work.power_low_pct, work.power_high_pct),
        );
        if let Some(recovery) = &segment.recovery {
            builder.push(
                format!("Recovery {}", set),
                SegmentType::Recovery,
                minutes_to_secs(recovery.duration_min),
                TargetBounds::percent(recovery.power_low_pct, recovery.power_high_pct),
            );
        }
    }
}

/// Traversal state for one list of sibling nodes.
struct Frame<'a> {
    nodes: &'a [StructureNode],
    next: usize,
    remaining: u32,
}

/// Flatten the nested step/repetition structure.
///
/// Uses an explicit stack, so deeply nested input cannot overflow the call stack.
/// Every node visit is charged against a budget of
/// `max_segments * max_repetitions`; the walk stops once it runs out, even
/// when the visited steps produced no segments.
pub fn flatten_structure(
    structure: &WorkoutStructure,
    ftp: f64,
    settings: &WorkoutSettings,
) -> ComplianceResult<Vec<PlannedSegment>> {
    check_ftp(ftp)?;
    let mut builder = SegmentBuilder::new(ftp, settings.max_segments);
    let mut budget = visit_budget(settings);
    let mut stack = vec![Frame {
        nodes: &structure.steps,
        next: 0,
        remaining: 1,
    }];

    while let Some(frame) = stack.last_mut() {
        if builder.is_full() {
            break;
        }
        if budget == 0 {
            tracing::warn!(
                "Workout structure exceeds {} node visits, ignoring the remainder",
                visit_budget(settings)
            );
            break;
        }

        if frame.next >= frame.nodes.len() {
            if frame.remaining > 1 && !frame.nodes.is_empty() {
                frame.remaining -= 1;
                frame.next = 0;
            } else {
                stack.pop();
            }
            continue;
        }

        let nodes = frame.nodes;
        let node = &nodes[frame.next];
        frame.next += 1;
        budget -= 1;

        if !node.steps.is_empty() {
            let repetitions = clamp_repetitions(node.repetitions(), settings);
            if repetitions > 0 {
                stack.push(Frame {
                    nodes: &node.steps,
                    next: 0,
                    remaining: repetitions,
                });
            }
        } else if node.kind == NodeKind::Repetition {
            tracing::warn!("Repetition block without steps ignored");
        } else {
            push_structure_step(&mut builder, node);
        }
    }

    Ok(builder.finish())
}

fn visit_budget(settings: &WorkoutSettings) -> usize {
    settings
        .max_segments
        .max(1)
        .saturating_mul(settings.max_repetitions.max(1) as usize)
}

fn push_structure_step(builder: &mut SegmentBuilder, node: &StructureNode) {
    let intensity = node.intensity_class.unwrap_or(IntensityClass::Other);
    let name = node
        .name
        .clone()
        .unwrap_or_else(|| intensity.default_name().to_string());

    let Some(duration_sec) = node.length.and_then(|l| l.seconds()) else {
        tracing::warn!("Step '{}' has no time-based length, skipping", name);
        return;
    };

    let bounds = match node.power_target() {
        Some(target) => match resolve_pair(target.min_value, target.max_value) {
            Some((low, high)) if target.is_absolute_watts() => TargetBounds::Watts(low, high),
            Some((low, high)) => TargetBounds::PercentFtp(low, high),
            None => {
                tracing::warn!("Step '{}' power target has no values, using default", name);
                TargetBounds::default_recovery()
            }
        },
        None => {
            tracing::warn!("Step '{}' has no power target, using default", name);
            TargetBounds::default_recovery()
        }
    };

    builder.push(name, intensity.segment_type(), duration_sec, bounds);
}
