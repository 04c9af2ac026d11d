//! Shared Detection Primitive
//!
//! Every detector funnels through [`run_detection`]: build the request,
//! call the gateway once, validate against the declared schema, then
//! deserialize into the detector's typed result.

use crate::core::llm::{ChatMessage, StructuredGateway, StructuredOutput, StructuredRequest};

use super::error::{DetectionError, DetectionResult};
use super::instruction::{DetectionInstruction, DetectorConfig};
use super::page::PageImage;

/// Messages for one page: system directive, user directive, then the image.
pub fn page_messages(instruction: &DetectionInstruction, page: &PageImage) -> Vec<ChatMessage> {
    let mut messages = instruction.to_messages();
    messages.push(page.to_message());
    messages
}

/// Run one structured detection against `gateway`.
pub async fn run_detection<T: StructuredOutput>(
    gateway: &dyn StructuredGateway,
    config: &DetectorConfig,
    messages: Vec<ChatMessage>,
) -> DetectionResult<T> {
    let schema = T::schema();
    let request = StructuredRequest::new(messages, schema.clone(), config.model_tier)
        .with_temperature(config.temperature);

    let value = gateway.invoke(request).await.map_err(|e| {
        log::warn!("Detection request on {} tier failed: {}", config.model_tier, e);
        DetectionError::from(e)
    })?;

    if let Err(mismatch) = schema.validate(&value) {
        log::warn!("Engine output does not match schema: {}", mismatch);
        return Err(DetectionError::SchemaViolation(mismatch.to_string()));
    }

    serde_json::from_value(value).map_err(|e| {
        log::warn!("Engine output rejected: {}", e);
        DetectionError::SchemaViolation(e.to_string())
    })
}
