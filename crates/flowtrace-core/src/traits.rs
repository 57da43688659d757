//! Core detector traits.

use crate::detector::{DetectorMetadata, PipelineStage};
use crate::error::Result;
use std::fmt::Debug;

/// Base trait for all pipeline detectors.
///
/// Provides access to detector metadata and configuration validation.
pub trait Detector: Send + Sync + Debug {
    /// Returns the detector metadata.
    fn metadata(&self) -> &DetectorMetadata;

    /// Validate detector configuration.
    ///
    /// Called before the detector runs to ensure configuration is valid.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Returns the detector ID.
    fn id(&self) -> &str {
        &self.metadata().id
    }

    /// Returns the pipeline stage this detector runs in.
    fn stage(&self) -> PipelineStage {
        self.metadata().stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct NullDetector {
        metadata: DetectorMetadata,
    }

    impl Detector for NullDetector {
        fn metadata(&self) -> &DetectorMetadata {
            &self.metadata
        }
    }

    #[test]
    fn test_default_trait_methods() {
        let detector = NullDetector {
            metadata: DetectorMetadata::new("detect/null", PipelineStage::Prefilter),
        };

        assert_eq!(detector.id(), "detect/null");
        assert_eq!(detector.stage(), PipelineStage::Prefilter);
        assert!(detector.validate().is_ok());
    }
}
