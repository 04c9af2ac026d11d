//! Structured Extraction Gateway Module
//!
//! Everything needed to hand a multimodal request and a response schema to
//! an extraction engine:
//!
//! - `types`: messages, content parts, model tiers, requests
//! - `schema`: response schema description and validation
//! - `gateway`: the `StructuredGateway` trait
//! - `providers`: engine implementations (Google Gemini)

pub mod error;
pub mod gateway;
pub mod providers;
pub mod schema;
pub mod types;

pub use error::{LLMError, Result};
pub use gateway::StructuredGateway;
pub use providers::GoogleGateway;
pub use schema::{ResponseSchema, SchemaMismatch, StructuredOutput};
pub use types::{ChatMessage, MessagePart, MessageRole, ModelTier, StructuredRequest, TokenUsage};
