//! Unit tests for compliance scoring.

use rustride_compliance::compliance::scoring::{
    duration_compliance, overall_compliance, power_compliance, segment_score, zone_compliance,
    ComplianceScore, Grade, MatchQuality, ScoreWeights,
};
use rustride_compliance::compliance::types::{SegmentAnalysis, ZoneDistribution};
use rustride_compliance::workouts::types::SegmentType;

fn analysis(duration: u32, score: f64, skipped: bool) -> SegmentAnalysis {
    let sub = if skipped {
        ComplianceScore::skipped()
    } else {
        ComplianceScore::new(score, "test")
    };
    SegmentAnalysis {
        segment_index: 0,
        name: "Segment".to_string(),
        segment_type: SegmentType::Work,
        planned_duration_sec: duration,
        target_power_low: 200,
        target_power_high: 220,
        target_zone: 4,
        actual: None,
        similarity_score: if skipped { 0.0 } else { 90.0 },
        power_compliance: sub.clone(),
        zone_compliance: sub.clone(),
        duration_compliance: sub,
        segment_score: if skipped { 0.0 } else { score },
        match_quality: if skipped {
            MatchQuality::Skipped
        } else {
            MatchQuality::from_score(score)
        },
        skipped,
    }
}

#[test]
fn test_sweet_spot_interval() {
    // "Interval 1": 220-233W in zone 3 for 600s, ridden at 222W with 92% in zone
    let distribution = ZoneDistribution {
        z1: 0.0,
        z2: 0.03,
        z3: 0.92,
        z4: 0.05,
        z5: 0.0,
    };

    let power = power_compliance(222.0, 220, 233);
    let zone = zone_compliance(&distribution, 3);
    let duration = duration_compliance(600, 600);

    assert_eq!(power.score, 100.0);
    assert!((zone.score - 92.0).abs() < 1e-9);
    assert_eq!(duration.score, 100.0);

    let score = segment_score(power.score, zone.score, duration.score, SegmentType::Work);
    assert!((score - 96.8).abs() < 1e-9);
    assert_eq!(MatchQuality::from_score(score), MatchQuality::Excellent);
}

#[test]
fn test_recovery_weights_favor_duration() {
    let w = ScoreWeights::for_type(SegmentType::Recovery);
    assert_eq!(w.duration, 0.50);

    // Full recovery at the wrong intensity still scores well
    let recovery = segment_score(50.0, 50.0, 100.0, SegmentType::Recovery);
    let work = segment_score(50.0, 50.0, 100.0, SegmentType::Work);
    assert!(recovery > work);
}

#[test]
fn test_default_weights_for_steady() {
    assert_eq!(ScoreWeights::for_type(SegmentType::Steady), ScoreWeights::default());
    assert_eq!(ScoreWeights::for_type(SegmentType::Tempo), ScoreWeights::default());
    assert_eq!(ScoreWeights::for_type(SegmentType::Warmup).duration, 0.40);
    assert_eq!(ScoreWeights::for_type(SegmentType::Cooldown).duration, 0.40);
}

#[test]
fn test_overall_is_duration_weighted() {
    let segments = vec![analysis(600, 90.0, false), analysis(200, 50.0, false)];
    let overall = overall_compliance(&segments, 5.0);

    // (90 * 600 + 50 * 200) / 800
    assert!((overall.score - 80.0).abs() < 1e-9);
    assert_eq!(overall.grade, Grade::B);
    assert_eq!(overall.segments_completed, 2);
    assert_eq!(overall.segments_total, 2);
}

#[test]
fn test_skip_penalty() {
    let segments = vec![
        analysis(600, 95.0, false),
        analysis(300, 0.0, true),
        analysis(300, 0.0, true),
    ];
    let overall = overall_compliance(&segments, 5.0);

    assert!((overall.score - 85.0).abs() < 1e-9);
    assert_eq!(overall.segments_skipped, 2);
    assert_eq!(overall.segments_completed, 1);
}

#[test]
fn test_overall_floors_at_zero() {
    let mut segments = vec![analysis(600, 20.0, false)];
    segments.extend((0..10).map(|_| analysis(60, 0.0, true)));

    let overall = overall_compliance(&segments, 5.0);
    assert_eq!(overall.score, 0.0);
    assert_eq!(overall.grade, Grade::F);
}

#[test]
fn test_nothing_completed() {
    let segments = vec![analysis(600, 0.0, true)];
    let overall = overall_compliance(&segments, 5.0);
    assert_eq!(overall.score, 0.0);
    assert_eq!(overall.grade, Grade::F);

    let overall = overall_compliance(&[], 5.0);
    assert_eq!(overall.score, 0.0);
    assert_eq!(overall.segments_total, 0);
}

#[test]
fn test_assessments() {
    assert_eq!(power_compliance(210.0, 200, 220).assessment, "Within target range");
    assert_eq!(power_compliance(190.0, 200, 220).assessment, "5% below target");
    assert_eq!(duration_compliance(300, 600).assessment, "50% shorter than planned");
    assert_eq!(ComplianceScore::skipped().assessment, "Segment skipped");
}
