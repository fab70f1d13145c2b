//! Run lifecycle
//!
//! `Session` owns the game state for one player and turns simulation events
//! into side effects: sounds, screen swaps, local progress writes and the
//! single remote score submission at the end of a run.
//!
//! ```text
//! Idle -> Running -> Paused (special caught) -> Running
//!            |
//!            v
//!          Ended -> Running (restart)
//! ```

use std::rc::Rc;

use crate::audio::{self, AudioPort, Sound};
use crate::consts::{MIN_IDENTITY_LEN, UNKNOWN_LOCATION};
use crate::error::StartError;
use crate::hud::{Celebration, GameOverSummary, Hud, IdentityHint, Screen, StartReadiness};
use crate::persistence::{
    LocalProgress, LocalStore, PlayerProgress, RankingStore, ScoreRecord, detach,
};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Where the player is, as far as we could tell
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub label: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    pub fn new(label: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            label: label.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Sentinel for a lookup that gave up
    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN_LOCATION.to_string(),
            latitude: None,
            longitude: None,
        }
    }
}

/// Progress of the location lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LocationStatus {
    Pending,
    /// Settled, possibly to `Location::unknown()`
    Resolved(Location),
}

impl LocationStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, LocationStatus::Resolved(_))
    }

    pub fn label(&self) -> &str {
        match self {
            LocationStatus::Pending => UNKNOWN_LOCATION,
            LocationStatus::Resolved(location) => &location.label,
        }
    }
}

/// Trim and check a player name
pub fn validate_identity(input: &str) -> Result<String, StartError> {
    let name = input.trim();
    if name.chars().count() < MIN_IDENTITY_LEN {
        return Err(StartError::IdentityTooShort);
    }
    Ok(name.to_string())
}

/// Whether the start control should be enabled, and the hint to show
pub fn start_readiness(input: &str, location: &LocationStatus) -> StartReadiness {
    let typed = input.trim().chars().count();
    let valid = typed >= MIN_IDENTITY_LEN;
    let hint = match typed {
        0 => IdentityHint::Empty,
        _ if valid => IdentityHint::Valid,
        _ => IdentityHint::TooShort,
    };
    StartReadiness {
        enabled: valid && location.is_resolved(),
        hint,
    }
}

/// One player's game, from start screen to game over and back
pub struct Session {
    state: GameState,
    progress: LocalProgress,
    settings: Settings,
    location: LocationStatus,
    store: Box<dyn LocalStore>,
    ranking: Rc<dyn RankingStore>,
    audio: Box<dyn AudioPort>,
    hud: Box<dyn Hud>,
}

impl Session {
    /// Load local progress and settings, and show the start screen
    pub fn new(
        state: GameState,
        store: Box<dyn LocalStore>,
        ranking: Rc<dyn RankingStore>,
        mut audio: Box<dyn AudioPort>,
        mut hud: Box<dyn Hud>,
    ) -> Self {
        let progress = LocalProgress::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        audio::apply_settings(audio.as_mut(), &settings);
        hud.set_high_score(progress.high_score);
        hud.show_screen(Screen::Start);

        Self {
            state,
            progress,
            settings,
            location: LocationStatus::Pending,
            store,
            ranking,
            audio,
            hud,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn progress(&self) -> &LocalProgress {
        &self.progress
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Last player name used on this device
    pub fn player(&self) -> &str {
        &self.progress.player
    }

    pub fn location(&self) -> &LocationStatus {
        &self.location
    }

    pub fn set_location(&mut self, status: LocationStatus) {
        log::info!("Location: {}", status.label());
        self.location = status;
    }

    /// Re-evaluate the start control for the current name input
    pub fn identity_changed(&mut self, input: &str) -> StartReadiness {
        let readiness = start_readiness(input, &self.location);
        self.hud.set_start_readiness(readiness);
        readiness
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Begin a run. A refused start reports why and changes nothing.
    pub fn start(&mut self, identity_input: &str) -> Result<(), StartError> {
        let result = validate_identity(identity_input).and_then(|name| {
            if self.location.is_resolved() {
                Ok(name)
            } else {
                Err(StartError::LocationPending)
            }
        });
        let name = match result {
            Ok(name) => name,
            Err(e) => {
                self.hud.alert(&e.to_string());
                return Err(e);
            }
        };

        self.progress.player = name;
        self.progress.save(self.store.as_mut());

        self.state.begin_run();
        self.hud.show_screen(Screen::Playing);
        self.hud.set_score(self.state.score);
        self.hud.set_special_catches(self.state.special_catches);
        self.hud.set_high_score(self.progress.high_score);

        audio::play_quietly(self.audio.as_mut(), Sound::Background);
        log::info!(
            "Run started for {} ({})",
            self.progress.player,
            self.location.label()
        );
        Ok(())
    }

    /// Start again with the same player after a game over
    pub fn restart(&mut self) -> Result<(), StartError> {
        if self.state.phase != GamePhase::Ended {
            log::warn!("Restart ignored in phase {:?}", self.state.phase);
            return Ok(());
        }
        self.audio.rewind(Sound::Background);
        let player = self.progress.player.clone();
        self.start(&player)
    }

    /// Leave the special-catch interstitial
    pub fn continue_run(&mut self) {
        if self.state.phase != GamePhase::Paused {
            return;
        }
        audio::stop(self.audio.as_mut(), Sound::Fanfare);
        self.state.phase = GamePhase::Running;
        self.hud.show_screen(Screen::Playing);
        audio::play_quietly(self.audio.as_mut(), Sound::Background);
        log::info!("Run resumed");
    }

    /// Persist new audio settings and apply them right away
    pub fn update_settings(&mut self, settings: Settings) {
        settings.save(self.store.as_mut());
        audio::apply_settings(self.audio.as_mut(), &settings);
        self.settings = settings;
    }

    /// The player asked for sound: clear a saved mute, then retry the music
    pub fn enable_sound(&mut self) {
        if self.settings.muted {
            log::info!("Unmuting");
            self.update_settings(Settings {
                muted: false,
                ..self.settings.clone()
            });
        }
        audio::play_quietly(self.audio.as_mut(), Sound::Background);
    }

    /// Run one frame. Safe to call every frame in any phase.
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let events = tick(&mut self.state, input);
        for event in &events {
            self.handle_event(*event);
        }
        events
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Collected { .. } => {
                self.score_changed();
                audio::replay(self.audio.as_mut(), Sound::Collect);
            }
            GameEvent::SpecialCaught { .. } => self.special_caught(),
            GameEvent::SpecialMissed => {}
            GameEvent::Busted => self.game_over(),
        }
    }

    /// Show the new score and raise the stored high score if beaten
    fn score_changed(&mut self) {
        self.hud.set_score(self.state.score);
        if self.progress.record_score(self.state.score) {
            self.hud.set_high_score(self.progress.high_score);
            self.progress.save(self.store.as_mut());
        }
    }

    fn special_caught(&mut self) {
        self.score_changed();
        self.progress.total_special_catches += 1;
        self.hud.set_special_catches(self.state.special_catches);
        // Local only; the remote store hears about this at game over
        self.progress.save(self.store.as_mut());

        self.audio.pause(Sound::Background);
        self.audio
            .set_volume(Sound::Fanfare, self.settings.effective_fanfare_volume());
        self.audio.boost(Sound::Fanfare, self.settings.fanfare_boost);
        audio::replay(self.audio.as_mut(), Sound::Fanfare);

        self.hud.show_screen(Screen::Celebration);
        self.hud.celebrate(&Celebration {
            player: self.progress.player.clone(),
            location: self.location.label().to_string(),
        });
        log::info!(
            "Special caught ({} this run, {} total)",
            self.state.special_catches,
            self.progress.total_special_catches
        );
    }

    fn game_over(&mut self) {
        self.audio.pause(Sound::Background);
        audio::replay(self.audio.as_mut(), Sound::Caught);
        self.score_changed();

        let record = self.score_record();
        let progress = PlayerProgress {
            player: record.player.clone(),
            high_score: self.progress.high_score,
            total_special_catches: self.progress.total_special_catches,
            last_played: record.timestamp,
        };
        detach("final score", self.ranking.submit(record));
        detach("player progress", self.ranking.save_progress(progress));

        let summary = GameOverSummary {
            score: self.state.score,
            special_catches: self.state.special_catches,
            high_score: self.progress.high_score,
        };
        self.hud.show_game_over(&summary);
        self.hud.show_screen(Screen::GameOver);
        log::info!("Game over at score {}", self.state.score);
    }

    fn score_record(&self) -> ScoreRecord {
        let (latitude, longitude) = match &self.location {
            LocationStatus::Resolved(location) => (location.latitude, location.longitude),
            LocationStatus::Pending => (None, None),
        };
        ScoreRecord {
            player: self.progress.player.clone(),
            score: self.state.score,
            special_catches: self.state.special_catches,
            location: self.location.label().to_string(),
            latitude,
            longitude,
            timestamp: crate::platform::now_ms(),
        }
    }
}
