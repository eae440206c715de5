use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::oneshot;

/// 上流 API (`/api/posts`, `/api/posts/{id}/comments`) のモック
///
/// 投稿は全 14 件。1 ページ目 10 件、2 ページ目 4 件。
pub struct MockServer {
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

pub const TOTAL_POSTS: i64 = 14;
pub const FAILING_POST_ID: i64 = 500;

impl MockServer {
    pub async fn start() -> Self {
        let app = Router::new()
            .route("/api/posts", get(handle_posts))
            .route("/api/posts/:post_id/comments", get(handle_comments));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .unwrap();
        });

        MockServer {
            port,
            shutdown_tx: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn post(id: i64) -> Value {
    match id {
        1 => json!({
            "id": 1,
            "type": "prayer_request",
            "category": "healing",
            "content": "Please pray for my mother",
            "authorId": "u-1",
            "createdAt": "2024-05-01T08:00:00Z",
            "likeCount": 2,
            "commentCount": 1,
        }),
        2 => json!({
            "id": 2,
            "type": "soap",
            "content": "<strong>Scripture</strong>: John 3:16\nFor God so loved...<strong>Observation</strong>: ...🔍",
            "authorId": "u-2",
        }),
        3 => json!({
            "id": 3,
            "title": "Sunday",
            "content": "See you there ![hall](https://cdn.example/hall.png)",
        }),
        _ => json!({
            "id": id,
            "title": format!("Post {}", id),
            "content": format!("Discussion {}", id),
        }),
    }
}

async fn handle_posts(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: i64 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let limit: i64 = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(10);

    let start = (page - 1) * limit + 1;
    let end = (start + limit - 1).min(TOTAL_POSTS);
    let posts: Vec<Value> = (start..=end).map(post).collect();

    Json(json!({ "posts": posts }))
}

async fn handle_comments(Path(post_id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    if post_id == FAILING_POST_ID {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    // Bare array, unlike the posts endpoint
    Ok(Json(json!([
        { "id": 1, "parentId": null, "content": "first", "likeCount": 1, "createdAt": "2024-05-01T08:00:00Z" },
        { "id": 2, "parentId": 1, "content": "reply", "likeCount": 0, "createdAt": "2024-05-01T09:00:00Z" },
        { "id": 3, "parentId": 99, "content": "orphan", "likeCount": 5, "createdAt": "2024-05-01T10:00:00Z" },
    ])))
}
