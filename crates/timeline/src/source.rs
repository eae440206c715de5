use anyhow::Result;
use async_trait::async_trait;
use feed_core::{RawComment, RawPost};

/// 投稿一覧の取得元
///
/// 返却済みページの順序は呼び出し間で安定していること、
/// `page_size` より短いページはデータの終端を意味することを前提とする。
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_page(&self, page: usize, page_size: usize) -> Result<Vec<RawPost>>;

    /// Bulk fetch used by "load all".
    async fn fetch_all(&self, page_size: usize) -> Result<Vec<RawPost>>;
}

/// 投稿ごとのコメント（フラット）の取得元
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn fetch_comments(&self, post_id: i64) -> Result<Vec<RawComment>>;
}
