//! Workout module for planned training sessions.

pub mod flatten;
pub mod types;

pub use flatten::{flatten, flatten_workout};
pub use types::{
    LegacySegment, PlannedSegment, PlannedWorkout, SegmentType, StructureNode, WorkoutStructure,
};
