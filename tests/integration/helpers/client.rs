use crate::helpers::mock_server::MockServer;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fellowship_feeds::{
    app,
    state::{AppConfig, AppState},
};
use tower::ServiceExt; // for oneshot

pub struct TestClient {
    pub router: Router,
    // Keeps the upstream mock alive for the lifetime of the client
    _upstream: Option<MockServer>,
}

impl TestClient {
    /// 上流 API のモックを起動して接続する
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let router = app(create_test_state(upstream.base_url()));
        Self {
            router,
            _upstream: Some(upstream),
        }
    }

    /// 上流 API に到達できない構成
    pub fn without_upstream() -> Self {
        let router = app(create_test_state("http://127.0.0.1:9/api".to_string()));
        Self {
            router,
            _upstream: None,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(req).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&body_bytes).to_string()));
        (status, body)
    }
}

fn create_test_state(feed_api_url: String) -> AppState {
    let config = AppConfig {
        feed_api_url,
        port: 0,
    };
    AppState::new(config, reqwest::Client::new())
}
