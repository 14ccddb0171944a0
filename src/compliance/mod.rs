//! Workout compliance analysis.
//!
//! Compares a recorded power stream against a planned workout and scores how
//! closely the athlete followed it.

pub mod analyzer;
pub mod detection;
pub mod matcher;
pub mod params;
pub mod scoring;
pub mod types;

pub use analyzer::{analyze, AnalysisRequest, ComplianceAnalyzer, ALGORITHM_VERSION};
pub use detection::EffortBlockDetector;
pub use matcher::{match_segments, similarity};
pub use params::AdaptiveParameters;
pub use scoring::{ComplianceScore, Grade, MatchQuality, ScoreWeights};
pub use types::{
    ActualEffort, AnalysisMetadata, DetectedBlock, OverallCompliance, SegmentAnalysis,
    SegmentMatch, WorkoutComplianceAnalysis, ZoneDistribution,
};
