//! Thief Run - a falling-object catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, game state)
//! - `session`: Run lifecycle and side-effect sequencing
//! - `persistence`: Local progress cache and remote ranking store
//! - `leaderboard`: Scroll-driven reveal of the ranked snapshot
//! - `renderer`: Canvas 2D drawing
//! - `audio` / `hud`: Output ports for sound and on-page text
//! - `platform`: Browser/native platform abstraction
//! - `tuning` / `settings`: Game balance and player preferences

pub mod audio;
pub mod error;
pub mod hud;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{AudioError, StartError, StoreError, TuningError};
pub use session::{Location, LocationStatus, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Field size used before the first viewport measurement
    pub const DEFAULT_FIELD_WIDTH: f32 = 1280.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 720.0;

    /// Minimum player name length (in characters, after trimming)
    pub const MIN_IDENTITY_LEN: usize = 3;

    /// Label used when location resolution gives up
    pub const UNKNOWN_LOCATION: &str = "Unknown";

    /// Number of records pulled for a leaderboard view
    pub const LEADERBOARD_FETCH_LIMIT: usize = 50;
}
