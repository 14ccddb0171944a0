//! Unit tests for planned workout flattening.

use rustride_compliance::compliance::analyzer::analyze;
use rustride_compliance::storage::config::WorkoutSettings;
use rustride_compliance::workouts::flatten::{flatten, flatten_workout, MAX_SEGMENT_DURATION_SEC};
use rustride_compliance::workouts::types::{
    LegacySegment, PlannedWorkout, SegmentType, WorkoutStructure,
};

fn legacy_from_json(json: &str) -> Vec<LegacySegment> {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_legacy_interval_set_expands_in_order() {
    let legacy = legacy_from_json(
        r#"[
            {"type": "warmup", "duration_min": 10, "power_low_pct": 50, "power_high_pct": 65},
            {"type": "intervals", "sets": 3,
             "work": {"duration_min": 5, "power_low_pct": 105, "power_high_pct": 110},
             "recovery": {"duration_min": 3, "power_low_pct": 50, "power_high_pct": 55}},
            {"type": "cooldown", "duration_min": 10, "power_low_pct": 50, "power_high_pct": 60}
        ]"#,
    );

    let flat = flatten(Some(legacy.as_slice()), 250.0, None).unwrap();
    let names: Vec<&str> = flat.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Warmup",
            "Interval 1",
            "Recovery 1",
            "Interval 2",
            "Recovery 2",
            "Interval 3",
            "Recovery 3",
            "Cooldown"
        ]
    );

    assert!(flat.iter().enumerate().all(|(i, s)| s.index == i));
    assert_eq!(flat[1].segment_type, SegmentType::Work);
    assert_eq!(flat[1].duration_sec, 300);
    assert_eq!(flat[1].power_low, 263); // 262.5 rounds up
    assert_eq!(flat[1].power_high, 275);
    assert_eq!(flat[1].target_zone, 5);
    assert_eq!(flat[2].segment_type, SegmentType::Recovery);
    assert_eq!(flat[2].target_zone, 1);
}

#[test]
fn test_unknown_legacy_type_is_steady() {
    let legacy = legacy_from_json(
        r#"[{"type": "fartlek", "name": "Play", "duration_min": 4, "power_low_pct": 70}]"#,
    );

    let flat = flatten(Some(legacy.as_slice()), 200.0, None).unwrap();
    assert_eq!(flat[0].segment_type, SegmentType::Steady);
    assert_eq!(flat[0].name, "Play");
    // A lone bound is used for both ends
    assert_eq!(flat[0].power_low, 140);
    assert_eq!(flat[0].power_high, 140);
}

#[test]
fn test_zero_duration_segments_dropped() {
    let legacy = legacy_from_json(
        r#"[
            {"type": "warmup", "duration_min": 0, "power_low_pct": 50, "power_high_pct": 60},
            {"type": "steady", "duration_min": 20, "power_low_pct": 70, "power_high_pct": 75}
        ]"#,
    );

    let flat = flatten(Some(legacy.as_slice()), 200.0, None).unwrap();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].index, 0);
    assert_eq!(flat[0].duration_sec, 1200);
}

#[test]
fn test_structure_nested_repetitions() {
    let structure: WorkoutStructure = serde_json::from_str(
        r#"{"steps": [
            {"type": "step", "intensityClass": "warmUp",
             "length": {"unit": "second", "value": 600},
             "targets": [{"type": "power", "minValue": 50, "maxValue": 65, "unit": "percent"}]},
            {"type": "repetition", "length": {"unit": "repetition", "value": 2}, "steps": [
                {"type": "repetition", "length": {"unit": "repetition", "value": 2}, "steps": [
                    {"type": "step", "name": "Sprint", "intensityClass": "active",
                     "length": {"unit": "second", "value": 15},
                     "targets": [{"type": "power", "minValue": 150, "maxValue": 170}]},
                    {"type": "step", "intensityClass": "rest",
                     "length": {"unit": "second", "value": 45},
                     "targets": [{"type": "power", "minValue": 40, "maxValue": 50}]}
                ]},
                {"type": "step", "name": "Float", "intensityClass": "rest",
                 "length": {"unit": "minute", "value": 3},
                 "targets": [{"type": "power", "minValue": 120, "maxValue": 140, "unit": "watts"}]}
            ]}
        ]}"#,
    )
    .unwrap();

    let flat = flatten(None, 200.0, Some(&structure)).unwrap();
    let names: Vec<&str> = flat.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Warm Up", "Sprint", "Rest", "Sprint", "Rest", "Float", "Sprint", "Rest", "Sprint",
            "Rest", "Float"
        ]
    );
    assert_eq!(flat[0].segment_type, SegmentType::Warmup);
    assert_eq!(flat[1].duration_sec, 15);
    assert_eq!(flat[5].duration_sec, 180);
    // Absolute watts pass through unchanged
    assert_eq!(flat[5].power_low, 120);
    assert_eq!(flat[5].power_high, 140);
    assert_eq!(flat[5].target_zone, 2);
}

#[test]
fn test_structure_wins_over_legacy() {
    let legacy = legacy_from_json(r#"[{"type": "steady", "duration_min": 60}]"#);
    let structure: WorkoutStructure = serde_json::from_str(
        r#"{"steps": [{"type": "step", "intensityClass": "active",
            "length": {"unit": "second", "value": 120},
            "targets": [{"type": "power", "minValue": 95, "maxValue": 100}]}]}"#,
    )
    .unwrap();

    let workout = PlannedWorkout::from_parts(Some(legacy), Some(structure));
    let flat = flatten_workout(&workout, 300.0, &WorkoutSettings::default()).unwrap();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].duration_sec, 120);
    assert_eq!(flat[0].segment_type, SegmentType::Work);
}

#[test]
fn test_segment_cap() {
    let legacy = legacy_from_json(
        r#"[{"type": "intervals", "sets": 50,
             "work": {"duration_min": 1, "power_low_pct": 110, "power_high_pct": 120},
             "recovery": {"duration_min": 1, "power_low_pct": 50, "power_high_pct": 55}}]"#,
    );
    let settings = WorkoutSettings {
        max_repetitions: 100,
        max_segments: 10,
    };

    let flat = flatten_workout(&PlannedWorkout::Legacy(legacy), 250.0, &settings).unwrap();
    assert_eq!(flat.len(), 10);
}

#[test]
fn test_empty_plan() {
    let flat = flatten(None, 250.0, None).unwrap();
    assert!(flat.is_empty());
}

/// Five repetition blocks of 100 nested around a single zero-length step.
fn deeply_nested_empty_structure() -> WorkoutStructure {
    let mut node = serde_json::json!({"type": "step", "length": {"unit": "second", "value": 0}});
    for _ in 0..5 {
        node = serde_json::json!({
            "type": "repetition",
            "length": {"unit": "repetition", "value": 100},
            "steps": [node]
        });
    }
    serde_json::from_value(serde_json::json!({ "steps": [node] })).unwrap()
}

#[test]
fn test_nested_zero_length_structure_terminates() {
    let structure = deeply_nested_empty_structure();

    let flat = flatten(None, 250.0, Some(&structure)).unwrap();
    assert!(flat.is_empty());

    let analysis = analyze(&[], &[200.0; 60], 250.0, Some(&structure)).unwrap();
    assert_eq!(analysis.overall.segments_total, 0);
    assert_eq!(analysis.overall.score, 0.0);
}

#[test]
fn test_huge_legacy_durations_are_clamped() {
    let legacy = legacy_from_json(
        r#"[{"type": "steady", "duration_min": 1e9}, {"type": "steady", "duration_min": 1e9}]"#,
    );

    let flat = flatten(Some(legacy.as_slice()), 250.0, None).unwrap();
    assert_eq!(flat.len(), 2);
    assert!(flat.iter().all(|s| s.duration_sec == MAX_SEGMENT_DURATION_SEC));

    let analysis = analyze(&legacy, &[200.0; 600], 250.0, None).unwrap();
    assert_eq!(analysis.metadata.planned_duration_sec, 2 * MAX_SEGMENT_DURATION_SEC);
}

#[test]
fn test_structure_step_without_power_values_uses_default_range() {
    // No targets at all, then a power target with neither bound
    let structure: WorkoutStructure = serde_json::from_str(
        r#"[
            {"type": "step", "name": "Bare", "length": {"unit": "minute", "value": 5}},
            {"type": "step", "name": "Empty", "length": {"unit": "minute", "value": 5},
             "targets": [{"type": "power", "unit": "percent"}]}
        ]"#,
    )
    .unwrap();

    let flat = flatten(None, 200.0, Some(&structure)).unwrap();
    assert_eq!(flat.len(), 2);
    for segment in &flat {
        // 50-60% of 200W
        assert_eq!(segment.power_low, 100);
        assert_eq!(segment.power_high, 120);
        assert_eq!(segment.target_zone, 2);
        assert_eq!(segment.duration_sec, 300);
    }
}
