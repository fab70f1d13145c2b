//! Local key/value cache and the progress kept in it

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

/// Storage keys
pub mod keys {
    pub const HIGH_SCORE: &str = "thief_highscore";
    pub const TOTAL_SPECIALS: &str = "thief_total_specials";
    pub const PLAYER: &str = "thief_username";
    pub const SETTINGS: &str = "thief_settings";
}

/// String key/value store that survives page reloads
pub trait LocalStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Progress that outlives a single run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProgress {
    /// Best score ever reached on this device
    pub high_score: u64,
    /// Specials caught across all runs
    pub total_special_catches: u64,
    /// Last player name used, empty if none
    pub player: String,
}

impl LocalProgress {
    /// Load progress, defaulting any missing or unreadable entry
    pub fn load(store: &dyn LocalStore) -> Self {
        let progress = Self {
            high_score: read_count(store, keys::HIGH_SCORE),
            total_special_catches: read_count(store, keys::TOTAL_SPECIALS),
            player: store.get(keys::PLAYER).unwrap_or_default(),
        };
        log::info!(
            "Loaded progress: high score {}, {} specials",
            progress.high_score,
            progress.total_special_catches
        );
        progress
    }

    /// Write progress back; failures are logged, never raised
    pub fn save(&self, store: &mut dyn LocalStore) {
        let mut writes = vec![
            (keys::HIGH_SCORE, self.high_score.to_string()),
            (keys::TOTAL_SPECIALS, self.total_special_catches.to_string()),
        ];
        if !self.player.is_empty() {
            writes.push((keys::PLAYER, self.player.clone()));
        }
        for (key, value) in writes {
            if let Err(e) = store.set(key, &value) {
                log::error!("Failed to save {key}: {e}");
            }
        }
    }

    /// Raise the high score if `score` beats it. Returns true when it changed.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}

fn read_count(store: &dyn LocalStore, key: &str) -> u64 {
    match store.get(key) {
        None => 0,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring unreadable {key}: {raw:?}");
            0
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_store_defaults() {
        let store = MemoryStore::new();
        assert_eq!(LocalProgress::load(&store), LocalProgress::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let progress = LocalProgress {
            high_score: 1040,
            total_special_catches: 3,
            player: "robin".to_string(),
        };
        progress.save(&mut store);
        assert_eq!(LocalProgress::load(&store), progress);
    }

    #[test]
    fn test_empty_player_not_written() {
        let mut store = MemoryStore::new();
        LocalProgress::default().save(&mut store);
        assert_eq!(store.get(keys::PLAYER), None);
        assert_eq!(store.get(keys::HIGH_SCORE).as_deref(), Some("0"));
    }

    #[test]
    fn test_garbage_counts_fall_back_to_zero() {
        let mut store = MemoryStore::new();
        store.set(keys::HIGH_SCORE, "lots").unwrap();
        store.set(keys::TOTAL_SPECIALS, " 7 ").unwrap();
        let progress = LocalProgress::load(&store);
        assert_eq!(progress.high_score, 0);
        assert_eq!(progress.total_special_catches, 7);
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set("k", "v").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_record_score() {
        let mut progress = LocalProgress::default();
        assert!(progress.record_score(10));
        assert_eq!(progress.high_score, 10);
        assert!(!progress.record_score(10));
        assert!(!progress.record_score(3));
        assert_eq!(progress.high_score, 10);
    }

    proptest! {
        #[test]
        fn prop_record_score_never_lowers(high in 0u64..100_000, score in 0u64..100_000) {
            let mut progress = LocalProgress { high_score: high, ..Default::default() };
            let changed = progress.record_score(score);
            prop_assert_eq!(progress.high_score, high.max(score));
            prop_assert_eq!(changed, score > high);
        }
    }
}
