pub mod api;
pub mod controller;
pub mod interstitial;
pub mod normalize;
pub mod source;

pub use api::ApiClient;
pub use controller::{Counter, FeedController, LoadOutcome, LoadState, PageTicket, BULK_PAGE_SIZE, PAGE_SIZE};
pub use interstitial::{Interstitial, ReflectionChoice};
pub use normalize::{normalize_page, normalize_post};
pub use source::{CommentSource, FeedSource};

use anyhow::Result;
use feed_core::{CommentNode, SortOrder};

/// 投稿のコメントを取得してスレッドに組み立てる
pub async fn fetch_thread<S: CommentSource + ?Sized>(
    source: &S,
    post_id: i64,
    sort_by: SortOrder,
) -> Result<Vec<CommentNode>> {
    let raw = source.fetch_comments(post_id).await?;
    let comments = threads::comments_from_raw(&raw);
    let thread = threads::build_thread(comments, sort_by);

    tracing::info!(
        "Built thread for post {}: {} roots, {} comments",
        post_id,
        thread.len(),
        threads::thread_size(&thread)
    );
    Ok(thread)
}
