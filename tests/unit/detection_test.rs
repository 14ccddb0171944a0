//! Unit tests for effort block detection.

use rustride_compliance::compliance::detection::EffortBlockDetector;
use rustride_compliance::compliance::params::AdaptiveParameters;
use rustride_compliance::compliance::types::DetectedBlock;
use rustride_compliance::metrics::zones::PowerZones;

fn zones() -> PowerZones {
    PowerZones::from_ftp(250.0).unwrap()
}

fn detect_default(power: &[f64]) -> Vec<DetectedBlock> {
    EffortBlockDetector::new().detect(power, &zones(), &AdaptiveParameters::default())
}

#[test]
fn test_spike_in_steady_effort_stays_one_block() {
    // 10 minutes at 150W (Z2) with a 5s spike to 300W
    let mut power = vec![150.0; 600];
    for p in power.iter_mut().skip(300).take(5) {
        *p = 300.0;
    }

    let blocks = detect_default(&power);

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].start_sec, 0);
    assert_eq!(blocks[0].end_sec, 600);
    assert_eq!(blocks[0].dominant_zone, 2);
    assert_eq!(blocks[0].max_power, 300.0);
}

#[test]
fn test_short_dropouts_do_not_split() {
    // Coasting for 3s every minute at 260W (Z4)
    let power: Vec<f64> = (0..900)
        .map(|i| if (30..33).contains(&(i % 60)) { 0.0 } else { 260.0 })
        .collect();

    let blocks = detect_default(&power);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].dominant_zone, 4);
    assert_eq!(blocks[0].min_power, 0.0);
}

#[test]
fn test_blocks_are_contiguous_and_cover_stream() {
    let mut power = vec![130.0; 300];
    power.extend(vec![280.0; 240]);
    power.extend(vec![130.0; 300]);

    let blocks = detect_default(&power);

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].start_sec, 0);
    assert_eq!(blocks.last().unwrap().end_sec, 840);
    for pair in blocks.windows(2) {
        assert_eq!(pair[0].end_sec, pair[1].start_sec);
    }
    assert_eq!(blocks[1].dominant_zone, 5);
    for block in &blocks {
        assert_eq!(block.duration_sec, block.end_sec - block.start_sec);
        assert!((block.zone_distribution.total() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_lower_dominance_splits_sooner() {
    // Mixed effort: 20s in Z4, 10s in Z2, repeating
    let power: Vec<f64> = (0..600)
        .map(|i| if i % 30 < 20 { 240.0 } else { 160.0 })
        .collect();
    let params = AdaptiveParameters {
        smoothing_window_sec: 1,
        min_segment_duration_sec: 30,
        boundary_stability_sec: 20,
    };

    let strict = EffortBlockDetector::new().detect(&power, &zones(), &params);
    let loose = EffortBlockDetector::with_dominance(0.3).detect(&power, &zones(), &params);

    assert_eq!(strict.len(), 1);
    assert!(loose.len() > strict.len());
}

#[test]
fn test_empty_stream_returns_no_blocks() {
    let blocks = detect_default(&[]);
    assert!(blocks.is_empty());
}
