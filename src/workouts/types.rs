//! Planned workout types.
//!
//! A planned workout arrives in one of two shapes: the flat legacy segment
//! list or the nested step/repetition structure. Both are resolved once into
//! a flat list of [`PlannedSegment`]s by the flattener.

use serde::{Deserialize, Serialize};

/// Type of planned segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Easy ride-in before the main set
    Warmup,
    /// Main-set effort (interval "on" portion)
    Work,
    /// Easy spinning between efforts
    Recovery,
    /// Easy ride-out after the main set
    Cooldown,
    /// Constant endurance effort
    Steady,
    /// Sustained tempo effort
    Tempo,
}

impl SegmentType {
    /// Parse a free-form segment label from a legacy workout.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "warmup" => Some(SegmentType::Warmup),
            "work" | "interval" | "intervals" | "active" | "threshold" | "vo2max" | "sprint" => {
                Some(SegmentType::Work)
            }
            "recovery" | "rest" => Some(SegmentType::Recovery),
            "cooldown" => Some(SegmentType::Cooldown),
            "steady" | "steadystate" | "endurance" => Some(SegmentType::Steady),
            "tempo" | "sweetspot" => Some(SegmentType::Tempo),
            _ => None,
        }
    }
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentType::Warmup => write!(f, "Warmup"),
            SegmentType::Work => write!(f, "Work"),
            SegmentType::Recovery => write!(f, "Recovery"),
            SegmentType::Cooldown => write!(f, "Cooldown"),
            SegmentType::Steady => write!(f, "Steady"),
            SegmentType::Tempo => write!(f, "Tempo"),
        }
    }
}

/// One atomic target interval after expansion of any repeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSegment {
    /// Position in the flattened workout
    pub index: usize,
    /// Display name
    pub name: String,
    /// Segment type
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Planned duration in seconds
    pub duration_sec: u32,
    /// Lower power target in watts
    pub power_low: u32,
    /// Upper power target in watts
    pub power_high: u32,
    /// Target zone (1-5)
    pub target_zone: u8,
}

/// Total planned duration of a segment list in seconds, saturating at `u32::MAX`.
pub fn total_duration(segments: &[PlannedSegment]) -> u32 {
    segments
        .iter()
        .fold(0u32, |total, s| total.saturating_add(s.duration_sec))
}

/// Work or recovery half of a legacy interval set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalStep {
    /// Duration in minutes
    pub duration_min: f64,
    /// Lower target as percent of FTP
    #[serde(default)]
    pub power_low_pct: Option<f64>,
    /// Upper target as percent of FTP
    #[serde(default)]
    pub power_high_pct: Option<f64>,
}

/// Legacy flat segment description.
///
/// A segment with `sets` and `work` is an interval set that expands into
/// `sets` work/recovery pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySegment {
    /// Free-form segment label ("warmup", "intervals", "cooldown", ...)
    #[serde(rename = "type")]
    pub segment_type: String,
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
    /// Duration in minutes (ignored for interval sets)
    #[serde(default)]
    pub duration_min: f64,
    /// Lower target as percent of FTP
    #[serde(default)]
    pub power_low_pct: Option<f64>,
    /// Upper target as percent of FTP
    #[serde(default)]
    pub power_high_pct: Option<f64>,
    /// Number of repeats for an interval set
    #[serde(default)]
    pub sets: Option<u32>,
    /// Work portion of an interval set
    #[serde(default)]
    pub work: Option<IntervalStep>,
    /// Recovery portion of an interval set
    #[serde(default)]
    pub recovery: Option<IntervalStep>,
}

/// Kind of structure node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Single step (executed once)
    #[default]
    Step,
    /// Repeated block of child steps
    Repetition,
}

/// Declared intensity of a structured step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntensityClass {
    #[serde(alias = "warmup")]
    WarmUp,
    #[serde(alias = "interval")]
    Active,
    #[serde(alias = "recovery")]
    Rest,
    #[serde(alias = "cooldown")]
    CoolDown,
    /// Anything not recognized
    #[serde(other)]
    Other,
}

impl IntensityClass {
    /// Map to the planned segment type.
    pub fn segment_type(self) -> SegmentType {
        match self {
            IntensityClass::WarmUp => SegmentType::Warmup,
            IntensityClass::Active => SegmentType::Work,
            IntensityClass::Rest => SegmentType::Recovery,
            IntensityClass::CoolDown => SegmentType::Cooldown,
            IntensityClass::Other => SegmentType::Steady,
        }
    }

    /// Default step name for this intensity.
    pub fn default_name(self) -> &'static str {
        match self {
            IntensityClass::WarmUp => "Warm Up",
            IntensityClass::Active => "Active",
            IntensityClass::Rest => "Rest",
            IntensityClass::CoolDown => "Cool Down",
            IntensityClass::Other => "Step",
        }
    }
}

/// Unit of a step length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[serde(alias = "seconds")]
    Second,
    #[serde(alias = "minutes")]
    Minute,
    #[serde(alias = "repetitions")]
    Repetition,
    /// Distance or anything else not time based
    #[serde(other)]
    Other,
}

/// Length of a step (time) or a repetition node (count).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepLength {
    pub unit: LengthUnit,
    pub value: f64,
}

impl StepLength {
    /// Length in seconds, if time based.
    pub fn seconds(&self) -> Option<u32> {
        if !(self.value.is_finite() && self.value > 0.0) {
            return None;
        }
        match self.unit {
            LengthUnit::Second => Some(self.value.round() as u32),
            LengthUnit::Minute => Some((self.value * 60.0).round() as u32),
            LengthUnit::Repetition | LengthUnit::Other => None,
        }
    }

    /// Repetition count (1 unless the unit is `repetition`).
    pub fn repetitions(&self) -> u32 {
        match self.unit {
            LengthUnit::Repetition if self.value.is_finite() && self.value >= 1.0 => {
                self.value.round() as u32
            }
            _ => 1,
        }
    }
}

/// Kind of step target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Power,
    Cadence,
    #[serde(other)]
    Other,
}

/// Numeric target attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTarget {
    #[serde(rename = "type")]
    pub kind: TargetType,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    /// Target unit, e.g. "percent" (of FTP) or "watts"
    #[serde(default)]
    pub unit: Option<String>,
}

impl StepTarget {
    /// Whether the values are absolute watts rather than percent of FTP.
    pub fn is_absolute_watts(&self) -> bool {
        matches!(
            self.unit.as_deref().map(|u| u.trim().to_lowercase()).as_deref(),
            Some("watts" | "watt" | "w")
        )
    }
}

/// A node of the structured workout tree.
///
/// A node with child `steps` is a container: a `repetition` node repeats its
/// children `length.value` times, a `step` node runs them once. A node with
/// no children is a leaf step carrying its own length and targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureNode {
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub intensity_class: Option<IntensityClass>,
    #[serde(default)]
    pub length: Option<StepLength>,
    #[serde(default)]
    pub targets: Vec<StepTarget>,
    #[serde(default)]
    pub steps: Vec<StructureNode>,
}

impl StructureNode {
    /// Power target of a leaf step, if any.
    pub fn power_target(&self) -> Option<&StepTarget> {
        self.targets.iter().find(|t| t.kind == TargetType::Power)
    }

    /// Number of times the children of this node run.
    pub fn repetitions(&self) -> u32 {
        match self.kind {
            NodeKind::Step => 1,
            NodeKind::Repetition => self.length.map_or(1, |l| l.repetitions()),
        }
    }
}

/// Structured workout description.
///
/// Deserializes from either `{"steps": [...]}` or a bare array of nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StructureRepr")]
pub struct WorkoutStructure {
    /// Top-level nodes in execution order
    pub steps: Vec<StructureNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StructureRepr {
    Bare(Vec<StructureNode>),
    Wrapped {
        #[serde(default)]
        steps: Vec<StructureNode>,
    },
}

impl From<StructureRepr> for WorkoutStructure {
    fn from(repr: StructureRepr) -> Self {
        match repr {
            StructureRepr::Bare(steps) | StructureRepr::Wrapped { steps } => Self { steps },
        }
    }
}

/// The two accepted planned-workout representations.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedWorkout {
    /// Flat legacy segment list
    Legacy(Vec<LegacySegment>),
    /// Nested step/repetition tree
    Structured(WorkoutStructure),
}

impl PlannedWorkout {
    /// Resolve the representation to use; a structure wins over legacy segments.
    pub fn from_parts(
        legacy: Option<Vec<LegacySegment>>,
        structure: Option<WorkoutStructure>,
    ) -> Self {
        match structure {
            Some(structure) => PlannedWorkout::Structured(structure),
            None => PlannedWorkout::Legacy(legacy.unwrap_or_default()),
        }
    }
}

impl Default for PlannedWorkout {
    fn default() -> Self {
        PlannedWorkout::Legacy(Vec::new())
    }
}
