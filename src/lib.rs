//! RustRide Compliance - Workout Compliance Analysis
//!
//! Scores how closely a recorded ride followed its planned structured
//! workout. Detects sustained effort blocks in a 1 Hz power stream, aligns
//! them with the planned segments and grades power, zone and duration
//! adherence per segment and for the whole workout.

pub mod compliance;
pub mod error;
pub mod metrics;
pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use compliance::{analyze, AnalysisRequest, ComplianceAnalyzer, WorkoutComplianceAnalysis};
pub use error::{ComplianceError, ComplianceResult};
pub use metrics::zones::{HRZones, PowerZones};
pub use storage::config::AnalysisConfig;
pub use workouts::types::{PlannedWorkout, SegmentType};
