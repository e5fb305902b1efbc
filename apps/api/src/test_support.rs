//! In-process stand-ins for the upstream HTTP services used by unit tests.

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;

use crate::config::Config;

/// A request captured by a stub: the `Authorization` header and the JSON body.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

pub struct StubServer {
    pub url: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }
}

/// Spawns a stub that answers every POST with `status` and the raw `body`.
pub async fn spawn_stub(status: u16, body: &str) -> StubServer {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.to_string(),
        captured: captured.clone(),
    };

    let app = Router::new().route("/", post(stub_handler)).with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        url: format!("http://{addr}/"),
        captured,
    }
}

/// An address nothing listens on, for simulating connection failures.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

async fn stub_handler(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    state
        .captured
        .lock()
        .unwrap()
        .push(CapturedRequest { authorization, body });
    (state.status, state.body.clone())
}

/// A configuration pointing at unroutable upstreams, with a small upload cap.
pub fn test_config() -> Config {
    Config {
        similarity_api_url: "http://127.0.0.1:9/similarity".to_string(),
        hf_api_token: "hf-test-token".to_string(),
        groq_api_url: "http://127.0.0.1:9/chat".to_string(),
        groq_api_key: "gsk-test".to_string(),
        groq_model: "llama3-8b-8192".to_string(),
        feedback_temperature: 0.7,
        feedback_max_tokens: 500,
        upstream_timeout_secs: 5,
        max_upload_bytes: 64 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}
