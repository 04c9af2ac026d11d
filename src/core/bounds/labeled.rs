//! Labeled Boundary Detection
//!
//! Resolves an explicit list of labels to one boundary each. The
//! instruction text belongs to the caller; the result shape is fixed as a
//! list of `(solution_number, upper_bound)` pairs so labels never have to
//! serve as object keys.
//!
//! The returned labels are not reconciled with the requested ones here.
//! A `-1` entry is a valid answer ("not confidently locatable"); a missing
//! or unexpected label is a contract violation for the caller to handle,
//! see [`check_label_fidelity`](super::fidelity::check_label_fidelity).

use std::sync::Arc;

use crate::core::llm::{MessagePart, StructuredGateway};

use super::detect::{page_messages, run_detection};
use super::error::DetectionResult;
use super::instruction::{DetectionInstruction, DetectorConfig};
use super::page::PageImage;
use super::types::{Label, LabeledBoundary, NumberedSolutionUpperBounds};

pub struct LabeledBoundaryDetector {
    gateway: Arc<dyn StructuredGateway>,
    config: DetectorConfig,
}

impl LabeledBoundaryDetector {
    /// Detector with the built-in instruction on the precise tier.
    pub fn new(gateway: Arc<dyn StructuredGateway>) -> Self {
        Self::with_config(
            gateway,
            DetectorConfig::labeled_boundaries(DetectionInstruction::labeled_boundaries()),
        )
    }

    pub fn with_config(gateway: Arc<dyn StructuredGateway>, config: DetectorConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Resolve `labels` on `page` using the caller's `instruction`.
    pub async fn detect_labeled_boundaries(
        &self,
        page: &PageImage,
        instruction: &DetectionInstruction,
        labels: &[Label],
    ) -> DetectionResult<Vec<LabeledBoundary>> {
        if instruction.is_blank() {
            log::warn!("Labeled detection called with a blank instruction");
        }

        let mut messages = page_messages(instruction, page);
        // user directive sits right before the image
        if let Some(directive) = messages.iter_mut().rev().find(|m| !m.has_image()) {
            directive.parts.push(MessagePart::text(label_directive(labels)));
        }

        log::debug!("Resolving {} labels", labels.len());
        let result: NumberedSolutionUpperBounds =
            run_detection(self.gateway.as_ref(), &self.config, messages).await?;

        let unresolved = result
            .upper_bounds
            .iter()
            .filter(|b| !b.upper_bound.is_found())
            .count();
        log::info!(
            "Resolved {} labeled boundaries ({} not locatable)",
            result.upper_bounds.len(),
            unresolved
        );

        Ok(result.upper_bounds)
    }

    /// Same as [`detect_labeled_boundaries`](Self::detect_labeled_boundaries)
    /// with the instruction held in this detector's configuration.
    pub async fn detect_with_config_instruction(
        &self,
        page: &PageImage,
        labels: &[Label],
    ) -> DetectionResult<Vec<LabeledBoundary>> {
        self.detect_labeled_boundaries(page, &self.config.instruction, labels)
            .await
    }
}

/// Text naming the identifiers the engine must resolve.
pub fn label_directive(labels: &[Label]) -> String {
    let quoted = serde_json::to_string(labels).unwrap_or_else(|_| "[]".to_string());
    format!("The problem identifiers to detect are: {quoted}")
}
