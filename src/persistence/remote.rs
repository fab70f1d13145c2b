//! Remote ranking store

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::UNKNOWN_LOCATION;
use crate::error::StoreError;

/// Boxed store operation; single-threaded, so not `Send`
pub type StoreFuture<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>>>>;

/// One finished run as stored remotely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub player: String,
    pub score: u64,
    #[serde(default)]
    pub special_catches: u32,
    #[serde(default = "unknown_location")]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Unix timestamp (ms) of submission
    #[serde(default)]
    pub timestamp: f64,
}

fn unknown_location() -> String {
    UNKNOWN_LOCATION.to_string()
}

impl ScoreRecord {
    pub fn player_key(&self) -> String {
        player_key(&self.player)
    }
}

/// Player name made safe for use as a path segment
pub fn player_key(player: &str) -> String {
    player
        .chars()
        .map(|c| if matches!(c, '.' | '#' | '$' | '[' | ']') { '_' } else { c })
        .collect()
}

/// Per-player totals, overwritten on every game over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    pub player: String,
    pub high_score: u64,
    pub total_special_catches: u64,
    /// Unix timestamp (ms)
    pub last_played: f64,
}

/// Shared leaderboard backend
pub trait RankingStore {
    /// Append a finished run
    fn submit(&self, record: ScoreRecord) -> StoreFuture<()>;
    /// Best `limit` records, highest score first
    fn fetch_top(&self, limit: usize) -> StoreFuture<Vec<ScoreRecord>>;
    /// Replace the progress stored under `player_key(&progress.player)`
    fn save_progress(&self, progress: PlayerProgress) -> StoreFuture<()>;
}

/// Run a store write in the background. Never awaited, never retried; the
/// outcome is only logged.
pub fn detach(label: &'static str, write: StoreFuture<()>) {
    let task = async move {
        match write.await {
            Ok(()) => log::info!("{label} saved"),
            Err(e) => log::error!("Error saving {label}: {e}"),
        }
    };

    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(task);

    // No event loop natively, so the write completes before returning
    #[cfg(not(target_arch = "wasm32"))]
    pollster::block_on(task);
}

/// In-memory ranking store; clones share the same records
#[derive(Debug, Clone, Default)]
pub struct MemoryRankingStore {
    records: Rc<RefCell<Vec<ScoreRecord>>>,
    progress: Rc<RefCell<HashMap<String, PlayerProgress>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryRankingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ScoreRecord>) -> Self {
        let store = Self::new();
        *store.records.borrow_mut() = records;
        store
    }

    /// Make every following operation fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Everything submitted so far, in submission order
    pub fn records(&self) -> Vec<ScoreRecord> {
        self.records.borrow().clone()
    }

    /// Stored progress for a sanitized player key
    pub fn progress(&self, key: &str) -> Option<PlayerProgress> {
        self.progress.borrow().get(key).cloned()
    }
}

impl RankingStore for MemoryRankingStore {
    fn submit(&self, record: ScoreRecord) -> StoreFuture<()> {
        let records = Rc::clone(&self.records);
        let failing = self.failing.get();
        Box::pin(async move {
            if failing {
                return Err(StoreError::Unavailable("memory store offline".to_string()));
            }
            records.borrow_mut().push(record);
            Ok(())
        })
    }

    fn fetch_top(&self, limit: usize) -> StoreFuture<Vec<ScoreRecord>> {
        let records = Rc::clone(&self.records);
        let failing = self.failing.get();
        Box::pin(async move {
            if failing {
                return Err(StoreError::Unavailable("memory store offline".to_string()));
            }
            let mut top = records.borrow().clone();
            top.sort_by(|a, b| b.score.cmp(&a.score));
            top.truncate(limit);
            Ok(top)
        })
    }

    fn save_progress(&self, progress: PlayerProgress) -> StoreFuture<()> {
        let entries = Rc::clone(&self.progress);
        let failing = self.failing.get();
        Box::pin(async move {
            if failing {
                return Err(StoreError::Unavailable("memory store offline".to_string()));
            }
            entries
                .borrow_mut()
                .insert(player_key(&progress.player), progress);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(player: &str, score: u64) -> ScoreRecord {
        ScoreRecord {
            player: player.to_string(),
            score,
            special_catches: 0,
            location: "Lisbon, Portugal".to_string(),
            latitude: Some(38.7),
            longitude: Some(-9.1),
            timestamp: 1_700_000_000_000.0,
        }
    }

    #[test]
    fn test_player_key_sanitized() {
        assert_eq!(record("a.b#c$d[e]f", 0).player_key(), "a_b_c_d_e_f");
        assert_eq!(record("plain", 0).player_key(), "plain");
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(record("robin", 30)).unwrap();
        assert_eq!(json["specialCatches"], 0);
        assert_eq!(json["player"], "robin");
    }

    #[test]
    fn test_sparse_record_gets_defaults() {
        let parsed: ScoreRecord =
            serde_json::from_str(r#"{ "player": "old", "score": 12 }"#).unwrap();
        assert_eq!(parsed.location, "Unknown");
        assert_eq!(parsed.special_catches, 0);
        assert_eq!(parsed.latitude, None);
    }

    #[test]
    fn test_detach_submits_once() {
        let store = MemoryRankingStore::new();
        detach("score", store.submit(record("robin", 30)));
        assert_eq!(store.records(), vec![record("robin", 30)]);
    }

    #[test]
    fn test_detach_swallows_failure() {
        let store = MemoryRankingStore::new();
        store.set_failing(true);
        detach("score", store.submit(record("robin", 30)));
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_progress_overwritten_per_player() {
        let store = MemoryRankingStore::new();
        for high_score in [40, 90] {
            let progress = PlayerProgress {
                player: "r.obin".to_string(),
                high_score,
                total_special_catches: 1,
                last_played: 0.0,
            };
            detach("progress", store.save_progress(progress));
        }
        assert_eq!(store.progress("r_obin").map(|p| p.high_score), Some(90));
        assert_eq!(store.progress("r.obin"), None);
    }

    #[test]
    fn test_fetch_top_orders_and_limits() {
        let store = MemoryRankingStore::with_records(vec![
            record("a", 10),
            record("b", 300),
            record("c", 45),
        ]);
        let top = pollster::block_on(store.fetch_top(2)).unwrap();
        let scores: Vec<u64> = top.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![300, 45]);
    }
}
