use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use sqa_core::{ErrorCategory, Story, TestCaseGenerator};
use sqa_llm::{ChatCompletion, ChatRequest, LlmTestCaseGenerator, OpenAiClient, DEFAULT_MODEL};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

/// Echoes the user prompt back so tests can see what was sent.
async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"message": "Incorrect API key"}})));
    }
    let well_formed = body["model"] == DEFAULT_MODEL
        && body["max_tokens"] == 300
        && body["messages"][0]["role"] == "system"
        && body["messages"][0]["content"] == "You are a QA test case generator."
        && body["messages"][1]["role"] == "user";
    if !well_formed {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": {"message": "bad body"}})));
    }
    let prompt = body["messages"][1]["content"].as_str().unwrap_or_default().to_string();
    (
        StatusCode::OK,
        Json(json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": format!(" {prompt} \n")}}]})),
    )
}

#[tokio::test]
async fn sends_chat_request_with_bearer_auth() {
    let base = serve(Router::new().route("/v1/chat/completions", post(echo))).await;
    let client = OpenAiClient::new(reqwest::Client::new(), base, "sk-test", DEFAULT_MODEL);

    let req = ChatRequest::for_story(&Story::new("S-1", "User can log in"), 300);
    let text = client.complete(&req).await.unwrap();
    assert_eq!(
        text,
        " Generate step-by-step test cases for the following user story: User can log in \n"
    );
}

#[tokio::test]
async fn wrong_key_becomes_per_story_failure() {
    let base = serve(Router::new().route("/v1/chat/completions", post(echo))).await;
    let client = OpenAiClient::new(reqwest::Client::new(), base, "sk-wrong", DEFAULT_MODEL);
    let generator = LlmTestCaseGenerator::new(Arc::new(client));

    let results = generator
        .generate(&[Story::new("S-1", "a"), Story::new("S-2", "b")])
        .await;
    assert_eq!(results.len(), 2);
    for (r, id) in results.iter().zip(["S-1", "S-2"]) {
        let failure = r.as_ref().unwrap_err();
        assert_eq!(failure.story_id, id);
        assert_eq!(failure.category, ErrorCategory::Model);
        assert!(failure.message.contains("401"));
    }
}

#[tokio::test]
async fn generator_trims_model_output() {
    let base = serve(Router::new().route("/v1/chat/completions", post(echo))).await;
    let client = OpenAiClient::new(reqwest::Client::new(), format!("{base}/"), "sk-test", DEFAULT_MODEL);
    let generator = LlmTestCaseGenerator::new(Arc::new(client));

    let results = generator.generate(&[Story::new("S-9", "User can reset password")]).await;
    let case = results[0].as_ref().unwrap();
    assert_eq!(case.story_id, "S-9");
    assert_eq!(
        case.test_case,
        "Generate step-by-step test cases for the following user story: User can reset password"
    );
}
