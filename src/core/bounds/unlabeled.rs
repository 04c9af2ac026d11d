//! Unlabeled Boundary Detection
//!
//! Asks for one boundary per detected solution, top to bottom, without
//! tying any of them to a label.

use std::sync::Arc;

use crate::core::llm::StructuredGateway;

use super::detect::{page_messages, run_detection};
use super::error::DetectionResult;
use super::instruction::DetectorConfig;
use super::page::PageImage;
use super::types::{BoundaryValue, SolutionUpperBounds};

pub struct UnlabeledBoundaryDetector {
    gateway: Arc<dyn StructuredGateway>,
    config: DetectorConfig,
}

impl UnlabeledBoundaryDetector {
    pub fn new(gateway: Arc<dyn StructuredGateway>) -> Self {
        Self::with_config(gateway, DetectorConfig::unlabeled_boundaries())
    }

    pub fn with_config(gateway: Arc<dyn StructuredGateway>, config: DetectorConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Boundaries in the order the engine reported them.
    pub async fn detect_boundaries(&self, page: &PageImage) -> DetectionResult<Vec<BoundaryValue>> {
        let messages = page_messages(&self.config.instruction, page);
        let result: SolutionUpperBounds =
            run_detection(self.gateway.as_ref(), &self.config, messages).await?;

        log::info!("Detected {} unlabeled boundaries", result.upper_bounds.len());
        Ok(result.upper_bounds)
    }
}
