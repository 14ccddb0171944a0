//! Order-preserving segment matching.
//!
//! Planned segments are walked in order against detected blocks with a
//! forward-only cursor. Each segment looks at a small window of blocks from
//! the cursor and claims the best one above the similarity threshold. A
//! skipped segment leaves the cursor alone so the next segment can still
//! claim the blocks it passed over.

use crate::compliance::scoring::{duration_compliance, power_compliance};
use crate::compliance::types::{DetectedBlock, SegmentMatch};
use crate::workouts::types::PlannedSegment;

/// Default number of candidate blocks per planned segment.
pub const DEFAULT_WINDOW_SIZE: usize = 3;
/// Default minimum similarity for a match.
pub const DEFAULT_MIN_SIMILARITY: f64 = 50.0;

const ZONE_WEIGHT: f64 = 0.4;
const DURATION_WEIGHT: f64 = 0.3;
const POWER_WEIGHT: f64 = 0.3;

/// Similarity (0-100) between a planned segment and a detected block.
pub fn similarity(planned: &PlannedSegment, block: &DetectedBlock) -> f64 {
    let zone = zone_similarity(planned.target_zone, block.dominant_zone);
    let duration = duration_compliance(block.duration_sec, planned.duration_sec).score;
    let power = power_compliance(block.avg_power, planned.power_low, planned.power_high).score;

    ZONE_WEIGHT * zone + DURATION_WEIGHT * duration + POWER_WEIGHT * power
}

/// 100 on the target zone, 30 less per zone of distance, never below 10.
fn zone_similarity(target: u8, actual: u8) -> f64 {
    let distance = f64::from(target.abs_diff(actual));
    (100.0 - 30.0 * distance).max(10.0)
}

/// Match planned segments to detected blocks.
///
/// Returns one `SegmentMatch` per planned segment, in plan order. The cursor
/// (first unclaimed block) is threaded through a fold and only moves forward.
pub fn match_segments(
    planned: &[PlannedSegment],
    detected: &[DetectedBlock],
    window_size: usize,
    min_similarity: f64,
) -> Vec<SegmentMatch> {
    let window_size = window_size.max(1);

    let (_, matches) = planned.iter().fold(
        (0usize, Vec::with_capacity(planned.len())),
        |(cursor, mut matches), segment| {
            let found = best_candidate(segment, detected, cursor, window_size, min_similarity);
            let next_cursor = found.map_or(cursor, |(idx, _)| idx + 1);
            matches.push(segment_match(segment, found, min_similarity));
            (next_cursor, matches)
        },
    );
    matches
}

/// Best block in `detected[cursor..cursor + window_size]` at or above the
/// threshold; ties go to the earliest block.
fn best_candidate(
    segment: &PlannedSegment,
    detected: &[DetectedBlock],
    cursor: usize,
    window_size: usize,
    min_similarity: f64,
) -> Option<(usize, f64)> {
    let end = cursor.saturating_add(window_size).min(detected.len());
    (cursor.min(end)..end)
        .map(|idx| (idx, similarity(segment, &detected[idx])))
        .filter(|&(_, score)| score >= min_similarity)
        .fold(None, |best: Option<(usize, f64)>, candidate| match best {
            Some((_, best_score)) if best_score >= candidate.1 => best,
            _ => Some(candidate),
        })
}

fn segment_match(
    segment: &PlannedSegment,
    found: Option<(usize, f64)>,
    min_similarity: f64,
) -> SegmentMatch {
    match found {
        Some((idx, score)) => SegmentMatch {
            planned_index: segment.index,
            detected_index: Some(idx),
            similarity_score: score,
            skipped: false,
        },
        None => {
            tracing::debug!(
                "No block above {:.0} similarity for segment {} ({})",
                min_similarity,
                segment.index,
                segment.name
            );
            SegmentMatch {
                planned_index: segment.index,
                detected_index: None,
                similarity_score: 0.0,
                skipped: true,
            }
        }
    }
}
