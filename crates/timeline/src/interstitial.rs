//! フィード途中に挟む「ひと休み」の案内
//!
//! 表示件数だけから導出する表示ヒントで、タイムラインやページング状態は変更しない。

use serde::Serialize;

/// 一度だけ出す「ひと休み」を表示する閲覧件数
pub const REFLECTION_BREAK_AFTER: usize = 15;
/// 軽い案内を出す間隔
pub const MILESTONE_EVERY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interstitial {
    /// Offers to stop or keep scrolling. Shown until resolved.
    ReflectionBreak,
    Milestone { count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionChoice {
    Stop,
    Continue,
}

#[derive(Debug, Clone, Default)]
pub struct InterstitialPolicy {
    viewed: usize,
    resolution: Option<ReflectionChoice>,
}

impl InterstitialPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewed(&self) -> usize {
        self.viewed
    }

    /// Running count only grows; late or repeated visibility signals with a
    /// smaller count are ignored.
    pub fn record_viewed(&mut self, viewed: usize) {
        self.viewed = self.viewed.max(viewed);
    }

    pub fn resolution(&self) -> Option<ReflectionChoice> {
        self.resolution
    }

    pub fn resolve(&mut self, choice: ReflectionChoice) {
        if self.resolution.is_none() {
            tracing::info!("Reflection break resolved: {:?}", choice);
            self.resolution = Some(choice);
        }
    }

    /// 現在表示すべき案内。同じ状態からは常に同じ結果を返す。
    pub fn current(&self, more_available: bool) -> Option<Interstitial> {
        if self.viewed >= REFLECTION_BREAK_AFTER && more_available && self.resolution.is_none() {
            return Some(Interstitial::ReflectionBreak);
        }

        if self.viewed > 0 && self.viewed % MILESTONE_EVERY == 0 {
            return Some(Interstitial::Milestone { count: self.viewed });
        }

        None
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
