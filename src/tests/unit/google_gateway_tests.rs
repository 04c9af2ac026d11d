//! Google Gateway Unit Tests
//!
//! Exercises the Gemini gateway against a wiremock server:
//! - request body (schema, inline image, system instruction, sampling)
//! - tier to model routing
//! - response parsing and failure mapping

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::core::bounds::labeled::label_directive;
use crate::core::bounds::types::{NumberedSolutionUpperBounds, SolutionUpperBounds};
use crate::core::bounds::{
    DetectionError, DetectionInstruction, LabelDiscovery, LabeledBoundaryDetector,
    UnlabeledBoundaryDetector,
};
use crate::core::llm::{
    ChatMessage, GoogleGateway, LLMError, MessagePart, ModelTier, ResponseSchema, StructuredGateway,
    StructuredOutput, StructuredRequest,
};
use crate::tests::common::{bounds, gemini_envelope, labeled_payload, labels, pair, sample_page};

const TEST_KEY: &str = "AIzaTestApiKey";

fn gateway_for(server: &MockServer) -> GoogleGateway {
    GoogleGateway::new(TEST_KEY.to_string(), Duration::from_secs(5))
        .unwrap()
        .with_base_url(server.uri())
}

fn simple_request(tier: ModelTier) -> StructuredRequest {
    StructuredRequest::new(
        vec![ChatMessage::system("sys"), ChatMessage::user("usr")],
        SolutionUpperBounds::schema(),
        tier,
    )
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_new_rejects_malformed_key() {
    let result = GoogleGateway::new("sk-openai-key".to_string(), Duration::from_secs(5));
    assert!(matches!(result, Err(LLMError::NotConfigured(_))));
    assert!(GoogleGateway::new("   ".to_string(), Duration::from_secs(5)).is_err());
}

#[test]
fn test_api_key_format() {
    assert!(GoogleGateway::is_valid_api_key_format("AIzaSyD_abcdefghijklmnop"));
    assert!(GoogleGateway::is_valid_api_key_format("  AIzaValidKey  "));
    assert!(!GoogleGateway::is_valid_api_key_format("aiza-lowercase"));
    assert!(!GoogleGateway::is_valid_api_key_format(""));
}

#[test]
fn test_tier_routing() {
    let gateway = GoogleGateway::new(TEST_KEY.to_string(), Duration::from_secs(5))
        .unwrap()
        .with_models("fast-model", "precise-model");
    assert_eq!(gateway.model_for(ModelTier::Fast), "fast-model");
    assert_eq!(gateway.model_for(ModelTier::Precise), "precise-model");
}

// =============================================================================
// Request Formatting (pure)
// =============================================================================

#[test]
fn test_build_body_shape() {
    let page = sample_page();
    let mut messages = DetectionInstruction::new("system text", "user text").to_messages();
    messages.push(page.to_message());
    let request = StructuredRequest::new(messages, SolutionUpperBounds::schema(), ModelTier::Fast)
        .with_temperature(Some(0.0));

    let body = GoogleGateway::build_body(&request);

    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "system text");

    // system messages never appear in contents
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], "user text");
    let inline = &contents[1]["parts"][0]["inlineData"];
    assert_eq!(inline["mimeType"], "image/png");
    assert!(!inline["data"].as_str().unwrap().is_empty());

    let gen = &body["generationConfig"];
    assert_eq!(gen["responseMimeType"], "application/json");
    assert_eq!(gen["responseSchema"], SolutionUpperBounds::schema().to_json());
    assert_eq!(gen["temperature"], json!(0.0));
}

#[test]
fn test_build_body_omits_unset_temperature() {
    let body = GoogleGateway::build_body(&simple_request(ModelTier::Precise));
    assert!(body["generationConfig"].get("temperature").is_none());
}

#[test]
fn test_build_body_drops_blank_text_parts() {
    let page = sample_page();
    let labels = labels(&[]);
    let mut messages = DetectionInstruction::new("   ", "").to_messages();
    messages.push(page.to_message());
    messages[1]
        .parts
        .push(MessagePart::text(label_directive(&labels)));
    let request =
        StructuredRequest::new(messages, NumberedSolutionUpperBounds::schema(), ModelTier::Precise);

    let body = GoogleGateway::build_body(&request);

    assert!(body.get("systemInstruction").is_none());
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(
        contents[0]["parts"],
        json!([{ "text": "The problem identifiers to detect are: []" }])
    );
    assert!(contents[1]["parts"][0].get("inlineData").is_some());
}

#[test]
fn test_build_body_skips_messages_left_empty() {
    let request = StructuredRequest::new(
        vec![ChatMessage::user(" \n "), ChatMessage::user("kept")],
        SolutionUpperBounds::schema(),
        ModelTier::Fast,
    );
    let body = GoogleGateway::build_body(&request);
    assert_eq!(body["contents"], json!([{ "role": "user", "parts": [{ "text": "kept" }] }]));
}

// =============================================================================
// Response Parsing (pure)
// =============================================================================

#[test]
fn test_parse_response_extracts_json_and_usage() {
    let envelope = gemini_envelope(&json!({ "upper_bounds": [10, 20] }));
    let (value, usage) = GoogleGateway::parse_response(&envelope).unwrap();
    assert_eq!(value, json!({ "upper_bounds": [10, 20] }));
    let usage = usage.unwrap();
    assert_eq!(usage.input_tokens, 1290);
    assert_eq!(usage.total(), 1332);
}

#[test]
fn test_parse_response_saturates_oversized_usage() {
    let mut envelope = gemini_envelope(&json!({ "upper_bounds": [] }));
    envelope["usageMetadata"]["promptTokenCount"] = json!(u64::from(u32::MAX) + 5);
    envelope["usageMetadata"]["candidatesTokenCount"] = json!(u64::MAX);

    let (_, usage) = GoogleGateway::parse_response(&envelope).unwrap();
    let usage = usage.unwrap();
    assert_eq!(usage.input_tokens, u32::MAX);
    assert_eq!(usage.output_tokens, u32::MAX);
    assert_eq!(usage.total(), u32::MAX);
}

#[test]
fn test_parse_response_without_candidates() {
    let err = GoogleGateway::parse_response(&json!({ "candidates": [] })).unwrap_err();
    assert!(matches!(err, LLMError::InvalidResponse(_)));
}

#[test]
fn test_parse_response_safety_block() {
    let envelope = json!({ "candidates": [{ "finishReason": "SAFETY" }] });
    match GoogleGateway::parse_response(&envelope).unwrap_err() {
        LLMError::InvalidResponse(msg) => assert!(msg.contains("SAFETY")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_parse_response_non_json_text() {
    let envelope = json!({
        "candidates": [{ "content": { "parts": [{ "text": "The bounds are 120 and 340." }] } }]
    });
    let err = GoogleGateway::parse_response(&envelope).unwrap_err();
    assert!(matches!(err, LLMError::SerializationError(_)));
}

// =============================================================================
// HTTP Round Trips
// =============================================================================

#[tokio::test]
async fn test_invoke_posts_to_fast_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", TEST_KEY))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "sys" }] },
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_envelope(&json!({ "upper_bounds": [5] }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let value = gateway_for(&server)
        .invoke(simple_request(ModelTier::Fast))
        .await
        .unwrap();
    assert_eq!(value, json!({ "upper_bounds": [5] }));
}

#[tokio::test]
async fn test_invoke_routes_precise_tier() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_envelope(&json!({ "upper_bounds": [] }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server)
        .invoke(simple_request(ModelTier::Precise))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invoke_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .invoke(simple_request(ModelTier::Fast))
        .await
        .unwrap_err();
    match err {
        LLMError::ApiError { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "quota exhausted");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_invoke_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_envelope(&json!({ "upper_bounds": [] })))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let gateway = GoogleGateway::new(TEST_KEY.to_string(), Duration::from_millis(50))
        .unwrap()
        .with_base_url(server.uri());
    let err = gateway
        .invoke(simple_request(ModelTier::Fast))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::Timeout));
}

// =============================================================================
// Detectors Over HTTP
// =============================================================================

#[tokio::test]
async fn test_labeled_detection_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseSchema": {
                    "type": "OBJECT",
                    "required": ["upper_bounds"]
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_envelope(
            &labeled_payload(&[("1", 120), ("2a", -1), ("2b", 340)]),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let detector = LabeledBoundaryDetector::new(Arc::new(gateway_for(&server)));
    let resolved = detector
        .detect_with_config_instruction(&sample_page(), &labels(&["1", "2a", "2b"]))
        .await
        .unwrap();

    assert_eq!(resolved, vec![pair("1", 120), pair("2a", -1), pair("2b", 340)]);
}

#[tokio::test]
async fn test_unlabeled_detection_sends_zero_temperature() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(json!({ "generationConfig": { "temperature": 0.0 } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_envelope(&json!({ "upper_bounds": [80, 410, 760] }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let found = UnlabeledBoundaryDetector::new(Arc::new(gateway_for(&server)))
        .detect_boundaries(&sample_page())
        .await
        .unwrap();
    assert_eq!(found, bounds(&[80, 410, 760]));
}

#[tokio::test]
async fn test_prose_answer_is_schema_violation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "1, 2a, 2b" }] } }]
        })))
        .mount(&server)
        .await;

    let err = LabelDiscovery::new(Arc::new(gateway_for(&server)))
        .discover(&sample_page())
        .await
        .unwrap_err();
    assert!(matches!(err, DetectionError::SchemaViolation(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let gateway = GoogleGateway::new(TEST_KEY.to_string(), Duration::from_secs(2))
        .unwrap()
        .with_base_url(uri);
    let err = UnlabeledBoundaryDetector::new(Arc::new(gateway))
        .detect_boundaries(&sample_page())
        .await
        .unwrap_err();
    assert!(matches!(err, DetectionError::Transport(_)));
}

#[test]
fn test_schema_helper_matches_declared_type() {
    // the gateway forwards whatever schema the request carries
    let request = StructuredRequest::new(
        vec![],
        ResponseSchema::array_of(ResponseSchema::integer()),
        ModelTier::Fast,
    );
    let body = GoogleGateway::build_body(&request);
    assert_eq!(body["generationConfig"]["responseSchema"]["items"]["type"], "INTEGER");
    assert!(body.get("systemInstruction").is_none());
}
