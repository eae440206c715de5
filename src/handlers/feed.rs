use crate::error::AppError;
use crate::state::{FeedQuery, SharedState};
use axum::{
    extract::{Query, State},
    response::Json,
};
use feed_core::Post;
use serde::Serialize;
use timeline::{normalize_page, FeedSource, BULK_PAGE_SIZE, PAGE_SIZE};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPageResponse {
    pub page: usize,
    pub has_more: bool,
    pub posts: Vec<Post>,
}

/// 1 ページ分を取得し、分類・旧 SOAP 抽出済みの投稿として返す
pub async fn get_feed_page(
    State(state): State<SharedState>,
    Query(params): Query<FeedQuery>,
) -> Result<Json<FeedPageResponse>, AppError> {
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(AppError::BadRequest("page must be >= 1".to_string()));
    }

    tracing::info!("Received feed request (page={})", page);

    let raw = state
        .api
        .fetch_page(page, PAGE_SIZE)
        .await
        .map_err(AppError::Upstream)?;

    // Page fullness is judged on what the source returned, before any
    // record is dropped during normalisation.
    let has_more = raw.len() == PAGE_SIZE;
    let posts = normalize_page(&raw);

    Ok(Json(FeedPageResponse {
        page,
        has_more,
        posts,
    }))
}

pub async fn get_feed_all(
    State(state): State<SharedState>,
) -> Result<Json<FeedPageResponse>, AppError> {
    tracing::info!("Received bulk feed request");

    let raw = state
        .api
        .fetch_all(BULK_PAGE_SIZE)
        .await
        .map_err(AppError::Upstream)?;

    Ok(Json(FeedPageResponse {
        page: 1,
        has_more: false,
        posts: normalize_page(&raw),
    }))
}
