//! Gemini client behaviour against a mock HTTP server.

use std::sync::Arc;

use grammar_tutor::gemini::{GenerateRequest, LanguageModel, ModelError};
use grammar_tutor::locale::{EXPLANATION_EMPTY, EXPLANATION_UNAVAILABLE};
use grammar_tutor::{
    Difficulty, Explainer, GeminiClient, GenerationError, GrammarPoint, QuestionGenerator,
    QuizFilter, Scope,
};
use mockito::{Matcher, Server};
use serde_json::{Value, json};

const MODEL: &str = "gemini-test";
const PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn client(server: &Server) -> Arc<GeminiClient> {
    Arc::new(GeminiClient::new(
        Some("test-key".to_string()),
        MODEL,
        server.url(),
    ))
}

fn text_response(text: &str) -> String {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

fn question_json(id: &str) -> Value {
    json!({
        "id": id,
        "sentenceBefore": "Hardly had we arrived",
        "sentenceAfter": "it started to rain.",
        "options": ["when", "than", "then", "while"],
        "correctAnswer": "when",
        "difficulty": "Advanced",
        "category": "Inversion",
        "explanation": {
            "rule": "Hardly ... when ...",
            "examples": ["Hardly had I sat down when the phone rang."],
            "commonErrors": "Confusing with no sooner ... than."
        }
    })
}

#[tokio::test]
async fn test_generate_sends_prompt_and_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response("hi there"))
        .create_async()
        .await;

    let text = client(&server)
        .generate(GenerateRequest::text("hello"))
        .await
        .unwrap();

    assert_eq!(text, "hi there");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_status_error_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(403)
        .with_body("API key not valid")
        .create_async()
        .await;

    let err = client(&server)
        .generate(GenerateRequest::text("hello"))
        .await
        .unwrap_err();

    match err {
        ModelError::Status { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "API key not valid");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_candidates_is_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "candidates": [] }).to_string())
        .create_async()
        .await;

    let err = client(&server)
        .generate(GenerateRequest::text("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::EmptyResponse));
}

#[tokio::test]
async fn test_question_batch_over_http() {
    let mut server = Server::new_async().await;
    let batch = Value::Array(vec![question_json("a"), question_json("b")]).to_string();
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response(&batch))
        .create_async()
        .await;

    let generator = QuestionGenerator::new(client(&server), "Chinese");
    let filter = QuizFilter::new(Scope::Only(Difficulty::Advanced), Scope::All);
    let questions = generator.generate(filter, 5).await.unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].category, GrammarPoint::Inversion);
    assert_eq!(questions[1].options[0], "when");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_question_batch_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .create_async()
        .await;

    let generator = QuestionGenerator::new(client(&server), "Chinese");
    let err = generator.generate(QuizFilter::default(), 5).await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Model(ModelError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_explanation_uses_sampling_settings() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "temperature": 0.7 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response("  因为 hardly 与 when 搭配。  "))
        .create_async()
        .await;

    let explainer = Explainer::new(client(&server), "Chinese");
    let text = explainer
        .explain("Hardly had we arrived [___] it started to rain.", "than", "when")
        .await;

    assert_eq!(text, "因为 hardly 与 when 搭配。");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_explanation_falls_back_on_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(503)
        .create_async()
        .await;

    let explainer = Explainer::new(client(&server), "Chinese");
    let text = explainer.explain("A [___] B", "x", "y").await;
    assert_eq!(text, EXPLANATION_UNAVAILABLE);
}

#[tokio::test]
async fn test_explanation_falls_back_on_empty_text() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(text_response("   "))
        .create_async()
        .await;

    let explainer = Explainer::new(client(&server), "Chinese");
    let text = explainer.explain("A [___] B", "x", "y").await;
    assert_eq!(text, EXPLANATION_EMPTY);
}
