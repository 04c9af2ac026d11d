//! Structured Gateway Trait
//!
//! Defines the trait every structured-extraction engine must implement.

use async_trait::async_trait;

use super::error::Result;
use super::types::StructuredRequest;

/// Trait that all structured-extraction gateways must implement
///
/// A gateway sends the request's messages to the engine together with the
/// declared schema, and returns the engine's JSON output. Retry, backoff and
/// timeouts are the gateway's business; callers see a single outcome.
#[async_trait]
pub trait StructuredGateway: Send + Sync {
    /// Run one structured extraction
    async fn invoke(&self, request: StructuredRequest) -> Result<serde_json::Value>;
}
