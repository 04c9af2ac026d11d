//! Page Images
//!
//! The encoded page payload handed to the engine. Rendering, resizing and
//! sharpening happen before a `PageImage` exists.

use std::io::Cursor;

use bytes::Bytes;

use super::error::{DetectionError, DetectionResult};
use crate::core::llm::ChatMessage;

/// MIME type assumed when the payload's format cannot be recognized
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// An encoded, single-frame raster page.
///
/// Cloning is cheap; the payload is shared and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    bytes: Bytes,
    mime_type: String,
}

impl PageImage {
    /// Wrap encoded image bytes, sniffing the content type.
    pub fn new(bytes: impl Into<Bytes>) -> DetectionResult<Self> {
        let bytes = bytes.into();
        let mime_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| DEFAULT_MIME_TYPE.to_string());
        Self::with_mime_type(bytes, mime_type)
    }

    /// Wrap encoded image bytes with an explicit content type.
    pub fn with_mime_type(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> DetectionResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(DetectionError::EmptyInput);
        }
        Ok(Self {
            bytes,
            mime_type: mime_type.into(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Pixel height read from the image header, if the format is readable.
    pub fn height(&self) -> Option<u32> {
        image::ImageReader::new(Cursor::new(self.bytes()))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
            .map(|(_, height)| height)
    }

    /// User message carrying the inline image.
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::user_image(&self.mime_type, &self.bytes)
    }
}
