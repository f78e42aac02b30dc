use billbot::ai::{GatewayError, GeminiGateway, ModelGateway, PromptPart};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/test:generateContent";

#[tokio::test]
async fn returns_candidate_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"candidates":[{"content":{"parts":[{"text":"Total is 315"}]}}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let gw = GeminiGateway::new("k", Some(&server.uri()), 128);
    let text = gw
        .call(&[PromptPart::text("what is the total?")], "test")
        .await
        .unwrap();
    assert_eq!(text, "Total is 315");
    server.verify().await;
}

#[tokio::test]
async fn sends_parts_in_order_with_thinking_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(serde_json::json!({
            "contents": [{"parts": [
                {"text": "prompt"},
                {"inlineData": {"mimeType": "image/jpeg", "data": "aW1n"}},
                {"text": "User: total?"}
            ]}],
            "generationConfig": {"thinkingConfig": {"thinkingBudget": 64}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let gw = GeminiGateway::new("k", Some(&server.uri()), 64);
    let parts = [
        PromptPart::text("prompt"),
        PromptPart::image(b"img".to_vec(), "image/jpeg"),
        PromptPart::text("User: total?"),
    ];
    assert_eq!(gw.call(&parts, "test").await.unwrap(), "ok");
    server.verify().await;
}

#[tokio::test]
async fn quota_exhaustion_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .expect(1)
        .mount(&server)
        .await;

    let gw = GeminiGateway::new("k", Some(&server.uri()), 128);
    let err = gw.call(&[PromptPart::text("x")], "test").await.unwrap_err();
    assert!(err.is_rate_limited());
    match err {
        GatewayError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "RESOURCE_EXHAUSTED");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn blank_reply_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let gw = GeminiGateway::new("k", Some(&server.uri()), 128);
    let err = gw.call(&[PromptPart::text("x")], "test").await.unwrap_err();
    assert!(matches!(err, GatewayError::EmptyResponse));
}
