//! Error types
//!
//! None of these are fatal: start errors are shown to the player, everything
//! else is logged and swallowed by the caller.

use thiserror::Error;

/// Reasons a run refuses to start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// Player name is empty or shorter than `MIN_IDENTITY_LEN`
    #[error("Please enter a username (min 3 characters)")]
    IdentityTooShort,

    /// Location lookup has not settled yet
    #[error("Please wait for location to be fetched")]
    LocationPending,
}

/// Local cache or remote ranking store failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Backend is not reachable (no storage, no network)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success status
    #[error("Store rejected request with status {status}")]
    Rejected { status: u16 },

    /// Payload could not be encoded or decoded
    #[error("Malformed store payload: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Malformed(err.to_string())
    }
}

/// Audio playback failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Sound handle was never registered
    #[error("Sound not loaded: {0}")]
    NotLoaded(&'static str),

    /// Browser refused playback (autoplay policy and similar)
    #[error("Playback rejected: {0}")]
    Rejected(String),
}

/// Balance values that cannot drive a run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    /// JSON did not parse into a tuning table
    #[error("Invalid tuning JSON: {0}")]
    Parse(String),

    /// Spawn rate outside [0, 1] (or NaN)
    #[error("{name} must be within [0, 1], got {value}")]
    RateOutOfRange { name: &'static str, value: f64 },

    /// A missed special must lock out spawns for less time than a catch
    #[error("missed_cooldown ({missed}) must be shorter than caught_cooldown ({caught})")]
    CooldownOrder { missed: u32, caught: u32 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveSize { name: &'static str, value: f32 },
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err.to_string())
    }
}
