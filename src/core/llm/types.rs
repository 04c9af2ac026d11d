//! Gateway Message Types
//!
//! Role-tagged messages, content parts, and the structured request sent to
//! the extraction engine.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::schema::ResponseSchema;

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// One content block inside a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text {
        text: String,
    },
    /// Inline image, base64 encoded for transport
    Image {
        mime_type: String,
        data: String,
    },
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePart::Text { text: text.into() }
    }

    /// Encode raw image bytes into an inline image part.
    pub fn image(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        MessagePart::Image {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessagePart::Text { text } => Some(text),
            MessagePart::Image { .. } => None,
        }
    }
}

/// A single message in a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub parts: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            parts: vec![MessagePart::text(content)],
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![MessagePart::text(content)],
        }
    }

    pub fn user_image(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            role: MessageRole::User,
            parts: vec![MessagePart::image(mime_type, bytes)],
        }
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(MessagePart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_image(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, MessagePart::Image { .. }))
    }
}

// ============================================================================
// Model Tiers
// ============================================================================

/// Named capability/cost level of the engine.
///
/// The gateway decides which concrete model a tier maps to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Cheaper, faster inference for enumeration tasks
    Fast,
    /// Stronger inference for label-conditioned localization
    Precise,
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelTier::Fast => write!(f, "fast"),
            ModelTier::Precise => write!(f, "precise"),
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Request for one structured extraction
#[derive(Debug, Clone, Serialize)]
pub struct StructuredRequest {
    pub messages: Vec<ChatMessage>,
    pub schema: ResponseSchema,
    pub tier: ModelTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl StructuredRequest {
    pub fn new(messages: Vec<ChatMessage>, schema: ResponseSchema, tier: ModelTier) -> Self {
        Self {
            messages,
            schema,
            tier,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temp: Option<f32>) -> Self {
        self.temperature = temp;
        self
    }

    /// Text of every system message, joined in order.
    pub fn system_text(&self) -> Option<String> {
        let text = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(ChatMessage::text)
            .collect::<Vec<_>>()
            .join("\n");
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Token usage reported by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}
