//! Test Fixtures
//!
//! Small encoded pages and canned engine payloads.

use std::io::Cursor;

use serde_json::{json, Value};

use crate::core::bounds::{BoundaryValue, Label, LabeledBoundary, PageImage};

/// A blank grayscale PNG of the given size.
pub fn png_page(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::GrayImage::new(width, height)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .expect("encode fixture png");
    buf
}

/// A tall, narrow page like a rendered letter-size sheet.
pub fn sample_page() -> PageImage {
    PageImage::new(png_page(8, 2200)).expect("fixture page")
}

pub fn labels(raw: &[&str]) -> Vec<Label> {
    raw.iter().map(|s| Label::from(*s)).collect()
}

pub fn pair(label: &str, value: i64) -> LabeledBoundary {
    LabeledBoundary::new(label, BoundaryValue::new(value).expect("fixture boundary"))
}

pub fn bounds(values: &[i64]) -> Vec<BoundaryValue> {
    values
        .iter()
        .map(|v| BoundaryValue::new(*v).expect("fixture boundary"))
        .collect()
}

/// Engine payload for labeled detection.
pub fn labeled_payload(pairs: &[(&str, i64)]) -> Value {
    json!({
        "upper_bounds": pairs
            .iter()
            .map(|(label, value)| json!({ "solution_number": label, "upper_bound": value }))
            .collect::<Vec<_>>()
    })
}

/// Wrap a structured payload the way `generateContent` returns it.
pub fn gemini_envelope(payload: &Value) -> Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": payload.to_string() }],
                "role": "model"
            },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 1290,
            "candidatesTokenCount": 42,
            "totalTokenCount": 1332
        }
    })
}
