use crate::error::AppError;
use crate::state::{SharedState, ThreadQuery};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use feed_core::{CommentNode, SortOrder};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadResponse {
    pub post_id: i64,
    pub sort: SortOrder,
    pub total: usize,
    pub comments: Vec<CommentNode>,
}

pub async fn get_comments(
    State(state): State<SharedState>,
    Path(post_id): Path<i64>,
    Query(params): Query<ThreadQuery>,
) -> Result<Json<ThreadResponse>, AppError> {
    if post_id <= 0 {
        return Err(AppError::NotFound(format!("Post {} not found", post_id)));
    }

    let sort = match params.sort.as_deref() {
        None => SortOrder::default(),
        Some(s) => SortOrder::from_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown sort order: {}", s)))?,
    };

    tracing::info!("Received comments request: post={} sort={}", post_id, sort.as_str());

    let comments = timeline::fetch_thread(&state.api, post_id, sort)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(ThreadResponse {
        post_id,
        sort,
        total: threads::thread_size(&comments),
        comments,
    }))
}
