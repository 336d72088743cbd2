//! In-process mock of the Resource API for controller tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use url::Url;

use crate::api::token::TokenPropagator;
use crate::api::JsonClient;

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

/// Canned reply for a method + path.
#[derive(Debug, Clone)]
pub struct MockReply {
    method: &'static str,
    path: String,
    status: u16,
    body: String,
}

impl MockReply {
    pub fn json(method: &'static str, path: &str, status: u16, body: Value) -> Self {
        Self::raw(method, path, status, &body.to_string())
    }

    pub fn raw(method: &'static str, path: &str, status: u16, body: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    replies: Arc<HashMap<(String, String), (u16, String)>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockApi {
    base_url: Url,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockApi {
    pub async fn start(replies: Vec<MockReply>) -> Self {
        let replies = replies
            .into_iter()
            .map(|r| ((r.method.to_string(), r.path), (r.status, r.body)))
            .collect();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            replies: Arc::new(replies),
            recorded: recorded.clone(),
        };

        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            recorded,
        }
    }

    pub fn client(&self, token: Option<&str>) -> JsonClient {
        JsonClient::new(self.base_url.clone(), TokenPropagator::new(token)).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

/// Client for a server that accepts connections and never answers.
pub async fn stalled_client() -> JsonClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let base_url = Url::parse(&format!("http://{addr}")).unwrap();
    JsonClient::new(base_url, TokenPropagator::default()).unwrap()
}

async fn handle(State(state): State<MockState>, method: Method, uri: Uri, body: Bytes) -> Response {
    state.recorded.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    });

    match state
        .replies
        .get(&(method.to_string(), uri.path().to_string()))
    {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            [("content-type", "application/json")],
            body.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, r#"{"detail":"Not Found"}"#).into_response(),
    }
}
