//! `ChatStoryWriter` against a stub chat-completions server.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use dreamteller::config::LlmConfig;
use dreamteller::error::LlmError;
use dreamteller::llm::{ChatStoryWriter, StoryWriter};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// Replies are consumed in order; the last one repeats.
#[derive(Clone)]
struct Stub {
    replies: Arc<Vec<(u16, Value)>>,
    calls: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    delay: Duration,
}

async fn completions(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let n = stub.calls.fetch_add(1, Ordering::SeqCst);
    *stub.last_body.lock().unwrap() = Some(body);
    *stub.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    tokio::time::sleep(stub.delay).await;

    let (status, reply) = stub.replies[n.min(stub.replies.len() - 1)].clone();
    (StatusCode::from_u16(status).unwrap(), Json(reply))
}

async fn spawn(replies: Vec<(u16, Value)>) -> (Stub, LlmConfig) {
    spawn_slow(replies, Duration::ZERO).await
}

async fn spawn_slow(replies: Vec<(u16, Value)>, delay: Duration) -> (Stub, LlmConfig) {
    let stub = Stub {
        replies: Arc::new(replies),
        calls: Arc::new(AtomicUsize::new(0)),
        last_body: Arc::new(Mutex::new(None)),
        last_auth: Arc::new(Mutex::new(None)),
        delay,
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = LlmConfig {
        api_key: Some("sk-test".to_string()),
        api_url: format!("http://{}/v1/chat/completions", addr),
        model: "story-model".to_string(),
        max_retries: 3,
        timeout_seconds: 5,
        ..LlmConfig::default()
    };
    (stub, config)
}

fn story(content: &str) -> (u16, Value) {
    (
        200,
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
    )
}

fn writer(config: LlmConfig) -> ChatStoryWriter {
    ChatStoryWriter::new(config)
        .unwrap()
        .with_retry_delay(Duration::from_millis(5))
}

#[tokio::test]
async fn returns_trimmed_story_and_sends_prompt() {
    let (stub, config) = spawn(vec![story("  The moon opened like a door.  \n")]).await;

    let text = writer(config)
        .write_story("session-9", "a door on the moon")
        .await
        .unwrap();
    assert_eq!(text, "The moon opened like a door.");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

    let body = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "story-model");
    assert_eq!(body["user"], "session-9");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(
        body["messages"][1]["content"],
        "Transform this dream into a compelling story: a door on the moon"
    );
    assert_eq!(stub.last_auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));
}

#[tokio::test]
async fn retries_server_errors_then_succeeds() {
    let (stub, config) = spawn(vec![
        (503, json!({"error": "busy"})),
        (429, json!({"error": "slow down"})),
        story("Third time lucky."),
    ])
    .await;

    let text = writer(config).write_story("s", "dream").await.unwrap();
    assert_eq!(text, "Third time lucky.");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn gives_up_after_max_retries() {
    let (stub, config) = spawn(vec![(500, json!({"error": "down"}))]).await;

    let err = writer(config).write_story("s", "dream").await.unwrap_err();
    match err {
        LlmError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, LlmError::Server { status: 500, .. }));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn auth_failure_is_not_retried() {
    let (stub, config) = spawn(vec![(401, json!({"error": "bad key"}))]).await;

    let err = writer(config).write_story("s", "dream").await.unwrap_err();
    assert!(matches!(err, LlmError::Unauthorized));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let (stub, config) = spawn(vec![(403, json!({"error": "no access"}))]).await;

    let err = writer(config).write_story("s", "dream").await.unwrap_err();
    assert!(matches!(err, LlmError::Forbidden));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (stub, mut config) =
        spawn_slow(vec![story("too late")], Duration::from_secs(2)).await;
    config.timeout_seconds = 1;
    config.max_retries = 1;

    let err = writer(config).write_story("s", "dream").await.unwrap_err();
    match err {
        LlmError::Exhausted { attempts, last } => {
            assert_eq!(attempts, 1);
            assert!(matches!(*last, LlmError::Timeout), "unexpected {:?}", last);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let (_stub, mut config) = spawn(vec![(200, json!({"choices": []}))]).await;
    config.max_retries = 1;

    let err = writer(config).write_story("s", "dream").await.unwrap_err();
    assert!(matches!(
        err,
        LlmError::Exhausted { attempts: 1, ref last } if matches!(**last, LlmError::EmptyResponse)
    ));
}

#[tokio::test]
async fn client_error_status_is_surfaced() {
    let (_stub, config) = spawn(vec![(400, json!({"error": "bad request"}))]).await;

    let err = writer(config).write_story("s", "dream").await.unwrap_err();
    match err {
        LlmError::Http { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("bad request"));
        }
        other => panic!("unexpected {:?}", other),
    }
}
