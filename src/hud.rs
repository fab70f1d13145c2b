//! Presentation output port
//!
//! The session never touches widgets directly; it reports what should be shown
//! through `Hud` and the front-end decides how.

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Playing,
    Celebration,
    GameOver,
}

/// Hint shown next to the name input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityHint {
    /// Nothing typed yet
    Empty,
    Valid,
    /// One or two characters typed
    TooShort,
}

/// State of the start control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartReadiness {
    pub enabled: bool,
    pub hint: IdentityHint,
}

/// Details shown on the special-catch interstitial
#[derive(Debug, Clone, PartialEq)]
pub struct Celebration {
    pub player: String,
    pub location: String,
}

/// Details shown when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub special_catches: u32,
    pub high_score: u64,
}

pub trait Hud {
    fn show_screen(&mut self, screen: Screen);
    fn set_score(&mut self, score: u64);
    fn set_special_catches(&mut self, count: u32);
    fn set_high_score(&mut self, high_score: u64);
    fn set_start_readiness(&mut self, readiness: StartReadiness);
    /// Fire-and-forget celebration effect
    fn celebrate(&mut self, celebration: &Celebration);
    fn show_game_over(&mut self, summary: &GameOverSummary);
    /// Direct message to the player (refused start)
    fn alert(&mut self, message: &str);
}

/// Hud that writes to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn show_screen(&mut self, screen: Screen) {
        log::debug!("Screen: {screen:?}");
    }

    fn set_score(&mut self, _score: u64) {}

    fn set_special_catches(&mut self, _count: u32) {}

    fn set_high_score(&mut self, _high_score: u64) {}

    fn set_start_readiness(&mut self, _readiness: StartReadiness) {}

    fn celebrate(&mut self, celebration: &Celebration) {
        log::info!(
            "Special caught by {} ({})",
            celebration.player,
            celebration.location
        );
    }

    fn show_game_over(&mut self, summary: &GameOverSummary) {
        log::info!(
            "Game over: score {}, specials {}, high score {}",
            summary.score,
            summary.special_catches,
            summary.high_score
        );
    }

    fn alert(&mut self, message: &str) {
        log::warn!("{message}");
    }
}
