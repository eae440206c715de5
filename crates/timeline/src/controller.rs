//! フィードのページング制御
//!
//! `Idle → Loading → {Appended | Exhausted | Failed}` の状態機械で、
//! 読み込み中は次の読み込みを開始しない（single-flight）。
//! 取得は `begin_*` でチケットを発行し、結果を `complete_*` に渡す 2 段階。
//! リロード等で世代が変わった後に届いた結果は捨てる。

use crate::interstitial::{Interstitial, InterstitialPolicy, ReflectionChoice};
use crate::normalize::normalize_page;
use crate::source::FeedSource;
use anyhow::Result;
use feed_core::{Post, RawPost};
use std::collections::HashSet;

/// 1 ページの件数。これに満たないページはデータの終端。
pub const PAGE_SIZE: usize = 10;
/// 「すべて読み込む」で要求する件数
pub const BULK_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Appended,
    Exhausted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    NextPage,
    All,
}

/// Issued by `begin_*`; identifies the request its result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub page: usize,
    pub page_size: usize,
    kind: LoadKind,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { added: usize },
    Exhausted { added: usize },
    Replaced { total: usize },
    /// Guard refused to start a request.
    Skipped,
    /// Result arrived for a state that no longer exists.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Comments,
}

pub struct FeedController {
    timeline: Vec<Post>,
    ids: HashSet<i64>,
    page: usize,
    has_more: bool,
    state: LoadState,
    generation: u64,
    interstitials: InterstitialPolicy,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    /// Starts empty; nothing can be loaded incrementally until page 1 has
    /// been seeded by `initial_load`.
    pub fn new() -> Self {
        Self {
            timeline: Vec::new(),
            ids: HashSet::new(),
            page: 1,
            has_more: false,
            state: LoadState::Idle,
            generation: 0,
            interstitials: InterstitialPolicy::new(),
        }
    }

    pub fn timeline(&self) -> &[Post] {
        &self.timeline
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading_more(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// 1 ページ目を投入する。タイムラインが空のときだけ有効。
    pub fn initial_load(&mut self, first_page: Vec<RawPost>) -> bool {
        if !self.timeline.is_empty() {
            tracing::debug!("Timeline already seeded; ignoring first page");
            return false;
        }

        let full = first_page.len() == PAGE_SIZE;
        let added = self.append(&first_page);
        self.page = 1;
        self.has_more = full;
        self.state = if full {
            LoadState::Appended
        } else {
            LoadState::Exhausted
        };

        tracing::info!("Seeded timeline with {} posts (has_more={})", added, self.has_more);
        true
    }

    /// Fetches page 1 from `source` and seeds the timeline with it.
    pub async fn load_first_page<S: FeedSource + ?Sized>(&mut self, source: &S) -> Result<LoadOutcome> {
        if !self.timeline.is_empty() {
            return Ok(LoadOutcome::Skipped);
        }

        let first_page = source.fetch_page(1, PAGE_SIZE).await.map_err(|e| {
            tracing::error!("Failed to load first page: {:#}", e);
            e
        })?;

        let full = first_page.len() == PAGE_SIZE;
        self.initial_load(first_page);
        let added = self.timeline.len();

        Ok(if full {
            LoadOutcome::Appended { added }
        } else {
            LoadOutcome::Exhausted { added }
        })
    }

    /// 次ページの読み込みを開始する。読み込み中・終端済みなら `None`。
    pub fn begin_load_more(&mut self) -> Option<PageTicket> {
        if self.state == LoadState::Loading {
            tracing::debug!("load_more ignored: request already in flight");
            return None;
        }
        if !self.has_more {
            tracing::debug!("load_more ignored: no more pages");
            return None;
        }

        self.state = LoadState::Loading;
        Some(PageTicket {
            page: self.page + 1,
            page_size: PAGE_SIZE,
            kind: LoadKind::NextPage,
            generation: self.generation,
        })
    }

    /// Applies a page result. Errors leave `page`/`has_more` and the timeline
    /// untouched and are returned to the caller.
    pub fn complete_load_more(&mut self, ticket: PageTicket, result: Result<Vec<RawPost>>) -> Result<LoadOutcome> {
        if !self.is_current(&ticket, LoadKind::NextPage) {
            return Ok(LoadOutcome::Stale);
        }

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to load page {}: {:#}", ticket.page, e);
                self.state = LoadState::Failed;
                return Err(e.context(format!("Failed to load page {}", ticket.page)));
            }
        };

        if raw.is_empty() {
            self.has_more = false;
            self.state = LoadState::Exhausted;
            tracing::info!("Page {} was empty; feed exhausted", ticket.page);
            return Ok(LoadOutcome::Exhausted { added: 0 });
        }

        let added = self.append(&raw);
        self.page = ticket.page;

        if raw.len() < ticket.page_size {
            self.has_more = false;
            self.state = LoadState::Exhausted;
            tracing::info!("Page {} was short ({} posts); feed exhausted", ticket.page, raw.len());
            Ok(LoadOutcome::Exhausted { added })
        } else {
            self.state = LoadState::Appended;
            tracing::info!("Appended page {} ({} new posts)", ticket.page, added);
            Ok(LoadOutcome::Appended { added })
        }
    }

    /// Safe to call repeatedly from a visibility signal: a second call while
    /// a request is in flight, or after exhaustion, is a no-op.
    pub async fn load_more<S: FeedSource + ?Sized>(&mut self, source: &S) -> Result<LoadOutcome> {
        let Some(ticket) = self.begin_load_more() else {
            return Ok(LoadOutcome::Skipped);
        };
        let result = source.fetch_page(ticket.page, ticket.page_size).await;
        self.complete_load_more(ticket, result)
    }

    /// 一括読み込みを開始する。進行中の次ページ読み込みの結果は破棄される。
    pub fn begin_load_all(&mut self) -> PageTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        PageTicket {
            page: 1,
            page_size: BULK_PAGE_SIZE,
            kind: LoadKind::All,
            generation: self.generation,
        }
    }

    pub fn complete_load_all(&mut self, ticket: PageTicket, result: Result<Vec<RawPost>>) -> Result<LoadOutcome> {
        if !self.is_current(&ticket, LoadKind::All) {
            return Ok(LoadOutcome::Stale);
        }

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to load whole feed: {:#}", e);
                self.state = LoadState::Failed;
                return Err(e.context("Failed to load whole feed"));
            }
        };

        self.timeline.clear();
        self.ids.clear();
        let total = self.append(&raw);
        self.page = 1;
        self.has_more = false;
        self.state = LoadState::Exhausted;

        tracing::info!("Replaced timeline with {} posts", total);
        Ok(LoadOutcome::Replaced { total })
    }

    pub async fn load_all<S: FeedSource + ?Sized>(&mut self, source: &S) -> Result<LoadOutcome> {
        let ticket = self.begin_load_all();
        let result = source.fetch_all(ticket.page_size).await;
        self.complete_load_all(ticket, result)
    }

    /// 明示的なフルリロード。進行中の結果はすべて stale になる。
    pub fn reload(&mut self) {
        self.timeline.clear();
        self.ids.clear();
        self.page = 1;
        self.has_more = false;
        self.state = LoadState::Idle;
        self.generation += 1;
        self.interstitials.reset();
        tracing::info!("Timeline reset (generation {})", self.generation);
    }

    /// Optimistic ±n adjustment after a successful like/comment mutation.
    /// Later pages never overwrite an entry already in the timeline, so the
    /// adjusted value holds until the next full reload.
    pub fn apply_engagement(&mut self, post_id: i64, counter: Counter, delta: i32) -> bool {
        let Some(post) = self.timeline.iter_mut().find(|p| p.id == post_id) else {
            tracing::debug!("Engagement delta for unknown post {}", post_id);
            return false;
        };

        let value = match counter {
            Counter::Likes => &mut post.like_count,
            Counter::Comments => &mut post.comment_count,
        };
        *value = value.saturating_add_signed(delta);
        true
    }

    pub fn record_viewed(&mut self, viewed: usize) {
        self.interstitials.record_viewed(viewed);
    }

    /// Posts remain either upstream or loaded but not yet viewed.
    pub fn interstitial(&self) -> Option<Interstitial> {
        let more_available = self.has_more || self.interstitials.viewed() < self.timeline.len();
        self.interstitials.current(more_available)
    }

    pub fn resolve_reflection_break(&mut self, choice: ReflectionChoice) {
        self.interstitials.resolve(choice);
    }

    fn is_current(&self, ticket: &PageTicket, kind: LoadKind) -> bool {
        if ticket.generation != self.generation || ticket.kind != kind {
            tracing::warn!(
                "Discarding stale result for page {} (generation {} != {})",
                ticket.page,
                ticket.generation,
                self.generation
            );
            return false;
        }
        true
    }

    /// Appends in arrival order, skipping ids already present. Returns the
    /// number of posts actually added.
    fn append(&mut self, raw: &[RawPost]) -> usize {
        let before = self.timeline.len();
        for post in normalize_page(raw) {
            if self.ids.insert(post.id) {
                self.timeline.push(post);
            } else {
                tracing::debug!("Skipping duplicate post {}", post.id);
            }
        }
        self.timeline.len() - before
    }
}
