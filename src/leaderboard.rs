//! Ranked leaderboard view
//!
//! The top scores are fetched once per load, then revealed as cards: a first
//! batch straight away and further batches whenever the viewer scrolls near the
//! bottom of the page.

use crate::consts::{LEADERBOARD_FETCH_LIMIT, UNKNOWN_LOCATION};
use crate::persistence::{RankingStore, ScoreRecord};

/// Cards revealed as soon as the snapshot arrives
pub const INITIAL_BATCH: usize = 5;
/// Cards revealed per scroll trigger
pub const SCROLL_BATCH: usize = 10;
/// Distance from the bottom of the page that triggers a reveal (px)
pub const SCROLL_THRESHOLD: f64 = 300.0;
/// How long a reveal blocks the next one (ms)
pub const REVEAL_COOLDOWN_MS: i32 = 100;

/// Page scroll position at the time of a scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self) -> bool {
        self.viewport_height + self.scroll_y >= self.content_height - SCROLL_THRESHOLD
    }
}

/// `1ST`, `2ND`, `3RD`, then `#4`, `#5`, ...
pub fn rank_label(rank: usize) -> String {
    match rank {
        1 => "1ST".to_string(),
        2 => "2ND".to_string(),
        3 => "3RD".to_string(),
        n => format!("#{n}"),
    }
}

/// One rendered leaderboard entry
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardCard {
    /// 1-based position in the snapshot
    pub rank: usize,
    pub player: String,
    pub location: String,
    pub score: u64,
    pub special_catches: u32,
}

impl LeaderboardCard {
    fn from_record(rank: usize, record: &ScoreRecord) -> Self {
        let location = if record.location.trim().is_empty() {
            UNKNOWN_LOCATION.to_string()
        } else {
            record.location.clone()
        };
        Self {
            rank,
            player: record.player.clone(),
            location,
            score: record.score,
            special_catches: record.special_catches,
        }
    }

    pub fn rank_label(&self) -> String {
        rank_label(self.rank)
    }

    /// Top three get their own styling
    pub fn podium(&self) -> Option<usize> {
        (1..=3).contains(&self.rank).then_some(self.rank)
    }
}

/// Reveal cursor over a fetched snapshot
#[derive(Debug, Clone, Default)]
pub struct LeaderboardPager {
    records: Vec<ScoreRecord>,
    cursor: usize,
    cooling_down: bool,
}

impl LeaderboardPager {
    /// Snapshot ordered by score, highest first; ties keep their fetched order
    pub fn new(mut records: Vec<ScoreRecord>) -> Self {
        records.sort_by(|a, b| b.score.cmp(&a.score));
        Self {
            records,
            cursor: 0,
            cooling_down: false,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of cards revealed so far
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.records.len()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooling_down
    }

    fn reveal(&mut self, count: usize) -> Vec<LeaderboardCard> {
        let end = (self.cursor + count).min(self.records.len());
        let cards = self.records[self.cursor..end]
            .iter()
            .enumerate()
            .map(|(i, record)| LeaderboardCard::from_record(self.cursor + i + 1, record))
            .collect();
        self.cursor = end;
        cards
    }

    /// First batch. Only does anything on a fresh pager.
    pub fn reveal_initial(&mut self) -> Vec<LeaderboardCard> {
        if self.cursor > 0 {
            return Vec::new();
        }
        self.reveal(INITIAL_BATCH)
    }

    /// Next batch, unless one was just revealed or nothing is left.
    /// Starts the cooldown; the caller ends it with `end_cooldown`.
    pub fn reveal_more(&mut self) -> Vec<LeaderboardCard> {
        if self.cooling_down || self.is_exhausted() {
            return Vec::new();
        }
        let cards = self.reveal(SCROLL_BATCH);
        self.cooling_down = true;
        cards
    }

    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Vec<LeaderboardCard> {
        if !metrics.near_bottom() {
            return Vec::new();
        }
        self.reveal_more()
    }

    pub fn end_cooldown(&mut self) {
        self.cooling_down = false;
    }
}

/// What the leaderboard page shows
#[derive(Debug, Clone)]
pub enum LeaderboardView {
    Loading,
    Empty,
    Failed,
    Ready(LeaderboardPager),
}

impl LeaderboardView {
    /// Placeholder text for states without cards
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LeaderboardView::Loading => Some("Loading..."),
            LeaderboardView::Empty => Some("No scores yet. Be the first!"),
            LeaderboardView::Failed => Some("Error loading leaderboard"),
            LeaderboardView::Ready(_) => None,
        }
    }
}

/// Fetch a fresh snapshot. Refreshing is just loading again.
pub async fn load(store: &dyn RankingStore) -> LeaderboardView {
    match store.fetch_top(LEADERBOARD_FETCH_LIMIT).await {
        Ok(records) if records.is_empty() => LeaderboardView::Empty,
        Ok(records) => {
            log::info!("Leaderboard loaded: {} records", records.len());
            LeaderboardView::Ready(LeaderboardPager::new(records))
        }
        Err(e) => {
            log::error!("Error loading leaderboard: {e}");
            LeaderboardView::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryRankingStore;
    use proptest::prelude::*;

    fn record(player: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            player: player.to_string(),
            score,
            special_catches: 0,
            location: "Unknown".to_string(),
            latitude: None,
            longitude: None,
            timestamp: 0.0,
        }
    }

    fn records(n: usize) -> Vec<ScoreRecord> {
        (0..n)
            .map(|i| record(&format!("p{i}"), (n - i) as u64 * 10))
            .collect()
    }

    fn at_bottom() -> ScrollMetrics {
        ScrollMetrics {
            viewport_height: 800.0,
            scroll_y: 1000.0,
            content_height: 2000.0,
        }
    }

    #[test]
    fn test_twelve_records_reveal_in_two_steps() {
        let mut pager = LeaderboardPager::new(records(12));

        let first = pager.reveal_initial();
        assert_eq!(first.len(), 5);
        assert_eq!(pager.cursor(), 5);

        let more = pager.on_scroll(at_bottom());
        assert_eq!(more.len(), 7);
        assert_eq!(more[0].rank, 6);
        assert_eq!(pager.cursor(), 12);
        assert!(pager.is_exhausted());

        pager.end_cooldown();
        assert!(pager.on_scroll(at_bottom()).is_empty());
        assert_eq!(pager.cursor(), 12);
    }

    #[test]
    fn test_cooldown_coalesces_scrolls() {
        let mut pager = LeaderboardPager::new(records(40));
        pager.reveal_initial();

        assert_eq!(pager.on_scroll(at_bottom()).len(), 10);
        assert!(pager.is_cooling_down());
        assert!(pager.on_scroll(at_bottom()).is_empty());

        pager.end_cooldown();
        assert_eq!(pager.on_scroll(at_bottom()).len(), 10);
        assert_eq!(pager.cursor(), 25);
    }

    #[test]
    fn test_scroll_threshold() {
        let mut pager = LeaderboardPager::new(records(20));
        pager.reveal_initial();

        let short = ScrollMetrics {
            viewport_height: 800.0,
            scroll_y: 899.0,
            content_height: 2000.0,
        };
        assert!(!short.near_bottom());
        assert!(pager.on_scroll(short).is_empty());

        let exact = ScrollMetrics {
            scroll_y: 900.0,
            ..short
        };
        assert!(exact.near_bottom());
        assert_eq!(pager.on_scroll(exact).len(), 10);
    }

    #[test]
    fn test_initial_reveal_only_once() {
        let mut pager = LeaderboardPager::new(records(3));
        assert_eq!(pager.reveal_initial().len(), 3);
        assert!(pager.reveal_initial().is_empty());
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_pager_orders_by_score() {
        let mut pager = LeaderboardPager::new(vec![
            record("low", 5),
            record("high", 500),
            record("mid", 50),
        ]);
        let names: Vec<String> = pager.reveal_initial().into_iter().map(|c| c.player).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_rank_labels_and_podium() {
        let labels: Vec<String> = (1..=5).map(rank_label).collect();
        assert_eq!(labels, vec!["1ST", "2ND", "3RD", "#4", "#5"]);

        let mut pager = LeaderboardPager::new(records(5));
        let podium: Vec<Option<usize>> =
            pager.reveal_initial().iter().map(|c| c.podium()).collect();
        assert_eq!(podium, vec![Some(1), Some(2), Some(3), None, None]);
    }

    #[test]
    fn test_blank_location_shown_as_unknown() {
        let mut blank = record("robin", 10);
        blank.location = String::new();
        let mut pager = LeaderboardPager::new(vec![blank]);
        assert_eq!(pager.reveal_initial()[0].location, "Unknown");
    }

    #[test]
    fn test_load_states() {
        let empty = MemoryRankingStore::new();
        assert!(matches!(pollster::block_on(load(&empty)), LeaderboardView::Empty));

        let failing = MemoryRankingStore::with_records(records(3));
        failing.set_failing(true);
        let view = pollster::block_on(load(&failing));
        assert!(matches!(view, LeaderboardView::Failed));
        assert_eq!(view.message(), Some("Error loading leaderboard"));

        let store = MemoryRankingStore::with_records(records(80));
        match pollster::block_on(load(&store)) {
            LeaderboardView::Ready(pager) => assert_eq!(pager.len(), LEADERBOARD_FETCH_LIMIT),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn prop_reveals_cover_snapshot_in_order(n in 0usize..120, scrolls in 0usize..20) {
            let mut pager = LeaderboardPager::new(records(n));
            let mut ranks: Vec<usize> = pager.reveal_initial().iter().map(|c| c.rank).collect();
            for _ in 0..scrolls {
                ranks.extend(pager.on_scroll(at_bottom()).iter().map(|c| c.rank));
                pager.end_cooldown();
            }
            let expected: Vec<usize> = (1..=pager.cursor()).collect();
            prop_assert_eq!(ranks, expected);
            prop_assert!(pager.cursor() <= n);
            prop_assert_eq!(pager.cursor(), n.min(INITIAL_BATCH + scrolls * SCROLL_BATCH));
        }
    }
}
