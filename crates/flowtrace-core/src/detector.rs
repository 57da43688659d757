//! Detector metadata and pipeline stage definitions.
//!
//! Every detection stage is a metadata-carrying struct with associated
//! `compute` functions; the metadata identifies the stage for logging and
//! catalog purposes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage a detector runs in.
///
/// Stages execute in declaration order; each stage's output is the next
/// stage's sole graph input unless documented otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Legitimate-business classification and transaction suppression.
    Prefilter,

    /// Bounded-depth directed cycle enumeration.
    Cycles,

    /// Fan-in / fan-out hub discovery with temporal clustering.
    Smurfing,

    /// Low-degree chain discovery.
    Shell,

    /// Ring assembly, scoring, and projection.
    Assembly,
}

impl PipelineStage {
    /// All stages, in execution order.
    pub const ALL: &'static [PipelineStage] = &[
        PipelineStage::Prefilter,
        PipelineStage::Cycles,
        PipelineStage::Smurfing,
        PipelineStage::Shell,
        PipelineStage::Assembly,
    ];

    /// Returns the stage name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Prefilter => "prefilter",
            PipelineStage::Cycles => "cycles",
            PipelineStage::Smurfing => "smurfing",
            PipelineStage::Shell => "shell",
            PipelineStage::Assembly => "assembly",
        }
    }

    /// Parse a stage from its name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "prefilter" => Some(PipelineStage::Prefilter),
            "cycles" => Some(PipelineStage::Cycles),
            "smurfing" => Some(PipelineStage::Smurfing),
            "shell" => Some(PipelineStage::Shell),
            "assembly" => Some(PipelineStage::Assembly),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detector metadata.
///
/// Contains identification and description for a pipeline detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorMetadata {
    /// Unique detector identifier (e.g., "detect/cycle-routing").
    pub id: String,

    /// Pipeline stage this detector runs in.
    pub stage: PipelineStage,

    /// Human-readable description.
    pub description: String,

    /// Version of the detector implementation.
    pub version: u32,
}

impl DetectorMetadata {
    /// Create new detector metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, stage: PipelineStage) -> Self {
        Self {
            id: id.into(),
            stage,
            description: String::new(),
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

impl Default for DetectorMetadata {
    fn default() -> Self {
        Self::new("unnamed", PipelineStage::Assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_roundtrip() {
        for &stage in PipelineStage::ALL {
            assert_eq!(PipelineStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(PipelineStage::parse("unknown"), None);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::Prefilter.to_string(), "prefilter");
        assert_eq!(PipelineStage::Smurfing.to_string(), "smurfing");
    }

    #[test]
    fn test_metadata_builder() {
        let meta = DetectorMetadata::new("detect/cycle-routing", PipelineStage::Cycles)
            .with_description("Bounded-depth cycle enumeration")
            .with_version(2);

        assert_eq!(meta.id, "detect/cycle-routing");
        assert_eq!(meta.stage, PipelineStage::Cycles);
        assert_eq!(meta.version, 2);
    }
}
