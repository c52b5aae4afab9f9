//! Axum server that plays the bridge and generation endpoints with canned replies.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Answers requests with `responses` in order, whatever the route.
pub struct MockServer {
    address: SocketAddr,
    state: MockState,
}

impl MockServer {
    pub async fn start(responses: Vec<MockResponse>) -> Self {
        let state = MockState {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        };
        let app = Router::new()
            .route("/api/generate", post(reply))
            .route("/chats", get(reply))
            .route("/chats/{chat_id}/history", get(reply))
            .route("/users/{user_id}", get(reply))
            .route("/me", get(reply))
            .route("/close", post(reply))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server listener");
        let address = listener.local_addr().expect("mock listener local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("run mock server");
        });

        Self { address, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }
}

async fn reply(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method,
            path,
            headers,
            body,
        });

    let next = state.responses.lock().expect("responses lock").pop_front();
    match next {
        Some(response) => (
            response.status,
            [(header::CONTENT_TYPE, "application/json")],
            response.body,
        )
            .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "no canned response left").into_response(),
    }
}
