//! Label Discovery
//!
//! Enumerates the problem and subproblem markings present on a page.

use std::sync::Arc;

use crate::core::llm::StructuredGateway;

use super::detect::{page_messages, run_detection};
use super::error::DetectionResult;
use super::instruction::DetectorConfig;
use super::page::PageImage;
use super::types::{LabelSet, SolutionNumbers};

pub struct LabelDiscovery {
    gateway: Arc<dyn StructuredGateway>,
    config: DetectorConfig,
}

impl LabelDiscovery {
    pub fn new(gateway: Arc<dyn StructuredGateway>) -> Self {
        Self::with_config(gateway, DetectorConfig::label_discovery())
    }

    pub fn with_config(gateway: Arc<dyn StructuredGateway>, config: DetectorConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Labels on `page` in engine order, verbatim.
    pub async fn discover(&self, page: &PageImage) -> DetectionResult<LabelSet> {
        let messages = page_messages(&self.config.instruction, page);
        let result: SolutionNumbers =
            run_detection(self.gateway.as_ref(), &self.config, messages).await?;

        log::info!("Discovered {} labels", result.solution_numbers.len());
        Ok(result.solution_numbers)
    }
}
