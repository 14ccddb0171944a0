//! Compliance analysis orchestration.
//!
//! Runs the full pipeline for one planned workout and one recorded power
//! stream: flatten the plan, pick adaptive parameters, detect effort blocks,
//! match, score and aggregate. The analyzer holds only configuration.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compliance::detection::EffortBlockDetector;
use crate::compliance::matcher::match_segments;
use crate::compliance::params::AdaptiveParameters;
use crate::compliance::scoring::{
    duration_compliance, overall_compliance, power_compliance, segment_score, zone_compliance,
    ComplianceScore, MatchQuality,
};
use crate::compliance::types::{
    ActualEffort, AnalysisMetadata, DetectedBlock, SegmentAnalysis, SegmentMatch,
    WorkoutComplianceAnalysis,
};
use crate::error::{ComplianceError, ComplianceResult};
use crate::metrics::smoothing::{assess_power_quality, dropout_ratio, sanitize, PowerDataQuality};
use crate::metrics::zones::PowerZones;
use crate::storage::config::AnalysisConfig;
use crate::workouts::flatten::flatten_workout;
use crate::workouts::types::{
    total_duration, LegacySegment, PlannedSegment, PlannedWorkout, WorkoutStructure,
};

/// Version tag written into every analysis.
pub const ALGORITHM_VERSION: &str = "2.0.0";

/// One analysis job: athlete thresholds, the recording and the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Functional threshold power in watts
    pub ftp: f64,
    /// Lactate threshold heart rate, used only for reporting HR zones
    #[serde(default)]
    pub lthr: Option<f64>,
    /// 1 Hz power samples in watts
    #[serde(default)]
    pub power_stream: Vec<f64>,
    /// Legacy segment list
    #[serde(default)]
    pub segments: Option<Vec<LegacySegment>>,
    /// Structured workout; wins over `segments` when both are given
    #[serde(default)]
    pub structure: Option<WorkoutStructure>,
}

impl AnalysisRequest {
    /// The plan this request describes.
    pub fn planned_workout(&self) -> PlannedWorkout {
        PlannedWorkout::from_parts(self.segments.clone(), self.structure.clone())
    }
}

/// Workout compliance analyzer.
#[derive(Debug, Clone, Default)]
pub struct ComplianceAnalyzer {
    config: AnalysisConfig,
}

impl ComplianceAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer with custom settings.
    pub fn with_config(config: AnalysisConfig) -> ComplianceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one workout.
    ///
    /// Fails only when `ftp` is not a positive number. An empty plan, an
    /// empty stream or a plan with nothing matched all produce a normal
    /// result with a zero score.
    pub fn analyze(
        &self,
        workout: &PlannedWorkout,
        power_stream: &[f64],
        ftp: f64,
    ) -> ComplianceResult<WorkoutComplianceAnalysis> {
        let zones = PowerZones::from_ftp(ftp)?;
        let planned = flatten_workout(workout, ftp, &self.config.workouts)?;
        let params = AdaptiveParameters::select(&planned);

        let quality =
            assess_power_quality(power_stream, self.config.quality.partial_dropout_ratio);
        let dropouts = dropout_ratio(power_stream);
        let recorded_duration_sec = u32::try_from(power_stream.len()).unwrap_or(u32::MAX);

        if quality == PowerDataQuality::Missing {
            tracing::warn!(
                "No usable power data ({} samples), skipping all {} segments",
                power_stream.len(),
                planned.len()
            );
            let segments: Vec<SegmentAnalysis> = planned.iter().map(skipped_analysis).collect();
            let mut overall = overall_compliance(&segments, self.config.scoring.skip_penalty);
            overall.score = 0.0;
            return Ok(WorkoutComplianceAnalysis {
                overall,
                segments,
                metadata: AnalysisMetadata {
                    algorithm_version: ALGORITHM_VERSION.to_string(),
                    power_data_quality: quality,
                    adaptive_parameters: params,
                    dropout_ratio: dropouts,
                    detected_blocks: 0,
                    extra_blocks: 0,
                    planned_duration_sec: total_duration(&planned),
                    recorded_duration_sec,
                },
            });
        }

        let detector =
            EffortBlockDetector::with_dominance(self.config.detection.boundary_dominance);
        let blocks = detector.detect(&sanitize(power_stream), &zones, &params);
        let matches = match_segments(
            &planned,
            &blocks,
            self.config.matching.window_size,
            self.config.matching.min_similarity,
        );

        let segments: Vec<SegmentAnalysis> = planned
            .iter()
            .zip(&matches)
            .map(|(segment, m)| analyze_segment(segment, m, &blocks))
            .collect();
        let overall = overall_compliance(&segments, self.config.scoring.skip_penalty);

        let matched = matches.iter().filter(|m| !m.skipped).count();
        tracing::info!(
            "Compliance {:.1} ({}): {}/{} segments completed, {} blocks detected",
            overall.score,
            overall.grade,
            overall.segments_completed,
            overall.segments_total,
            blocks.len()
        );

        Ok(WorkoutComplianceAnalysis {
            overall,
            segments,
            metadata: AnalysisMetadata {
                algorithm_version: ALGORITHM_VERSION.to_string(),
                power_data_quality: quality,
                adaptive_parameters: params,
                dropout_ratio: dropouts,
                detected_blocks: blocks.len(),
                extra_blocks: blocks.len().saturating_sub(matched),
                planned_duration_sec: total_duration(&planned),
                recorded_duration_sec,
            },
        })
    }

    /// Analyze a request as submitted.
    pub fn analyze_request(
        &self,
        request: &AnalysisRequest,
    ) -> ComplianceResult<WorkoutComplianceAnalysis> {
        self.analyze(&request.planned_workout(), &request.power_stream, request.ftp)
    }

    /// Analyze many requests in parallel; results keep request order.
    pub fn analyze_batch(
        &self,
        requests: &[AnalysisRequest],
    ) -> Vec<ComplianceResult<WorkoutComplianceAnalysis>> {
        tracing::debug!("Analyzing batch of {} workouts", requests.len());
        requests
            .par_iter()
            .map(|request| self.analyze_request(request))
            .collect()
    }
}

/// Analyze with default settings.
///
/// `structure`, when given, takes precedence over `legacy`.
pub fn analyze(
    legacy: &[LegacySegment],
    power_stream: &[f64],
    ftp: f64,
    structure: Option<&WorkoutStructure>,
) -> ComplianceResult<WorkoutComplianceAnalysis> {
    if !(ftp.is_finite() && ftp > 0.0) {
        return Err(ComplianceError::invalid_ftp(ftp));
    }
    let workout = match structure {
        Some(structure) => PlannedWorkout::Structured(structure.clone()),
        None => PlannedWorkout::Legacy(legacy.to_vec()),
    };
    ComplianceAnalyzer::new().analyze(&workout, power_stream, ftp)
}

fn analyze_segment(
    segment: &PlannedSegment,
    m: &SegmentMatch,
    blocks: &[DetectedBlock],
) -> SegmentAnalysis {
    let Some(block_index) = m.detected_index else {
        return skipped_analysis(segment);
    };
    let Some(block) = blocks.get(block_index) else {
        return skipped_analysis(segment);
    };

    let power = power_compliance(block.avg_power, segment.power_low, segment.power_high);
    let zone = zone_compliance(&block.zone_distribution, segment.target_zone);
    let duration = duration_compliance(block.duration_sec, segment.duration_sec);
    let score = segment_score(power.score, zone.score, duration.score, segment.segment_type);

    SegmentAnalysis {
        segment_index: segment.index,
        name: segment.name.clone(),
        segment_type: segment.segment_type,
        planned_duration_sec: segment.duration_sec,
        target_power_low: segment.power_low,
        target_power_high: segment.power_high,
        target_zone: segment.target_zone,
        actual: Some(ActualEffort::from((block_index, block))),
        similarity_score: m.similarity_score,
        power_compliance: power,
        zone_compliance: zone,
        duration_compliance: duration,
        segment_score: score,
        match_quality: MatchQuality::from_score(score),
        skipped: false,
    }
}

fn skipped_analysis(segment: &PlannedSegment) -> SegmentAnalysis {
    SegmentAnalysis {
        segment_index: segment.index,
        name: segment.name.clone(),
        segment_type: segment.segment_type,
        planned_duration_sec: segment.duration_sec,
        target_power_low: segment.power_low,
        target_power_high: segment.power_high,
        target_zone: segment.target_zone,
        actual: None,
        similarity_score: 0.0,
        power_compliance: ComplianceScore::skipped(),
        zone_compliance: ComplianceScore::skipped(),
        duration_compliance: ComplianceScore::skipped(),
        segment_score: 0.0,
        match_quality: MatchQuality::Skipped,
        skipped: true,
    }
}
