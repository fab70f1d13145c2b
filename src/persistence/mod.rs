//! Local progress cache and remote ranking store
//!
//! Features:
//! - String key/value local cache (LocalStorage on web, in-memory elsewhere)
//! - High score, all-time special count and player name, loaded once
//! - Append-only remote score records, written once per finished run
//! - Detached, never-awaited writes whose failures are only logged

pub mod local;
pub mod remote;

pub use local::{LocalProgress, LocalStore, MemoryStore, keys};
pub use remote::{
    MemoryRankingStore, PlayerProgress, RankingStore, ScoreRecord, StoreFuture, detach, player_key,
};
