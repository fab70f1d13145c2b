//! Per-frame simulation tick
//!
//! One call advances the run by exactly one frame. Side effects (sound,
//! persistence, screens) are left to the caller, driven by the returned events.

use serde::{Deserialize, Serialize};

use super::collision::{Outcome, resolve_collisions};
use super::motion::{advance_actors, move_thief};
use super::spawn::spawn_actors;
use super::state::{GamePhase, GameState, ItemKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move left (ArrowLeft / A held)
    pub left: bool,
    /// Move right (ArrowRight / D held)
    pub right: bool,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Collectible caught, score already credited
    Collected { item: ItemKind, points: u64 },
    /// Special caught, score credited and the run paused
    SpecialCaught { points: u64 },
    /// Special left the field uncaught
    SpecialMissed,
    /// Obstacle hit, the run is over
    Busted,
}

/// Advance the game state by one tick.
///
/// Does nothing unless the run is `Running`, so a paused loop can keep calling
/// this every frame.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    if state.phase != GamePhase::Running {
        return Vec::new();
    }

    state.time_ticks += 1;

    // Cooldown only runs while no special is on screen
    if state.special_cooldown > 0 && !state.special_present {
        state.special_cooldown -= 1;
    }

    move_thief(&mut state.thief, state.field, input.left, input.right);
    spawn_actors(state);

    let mut events = Vec::new();
    if advance_actors(state) {
        log::debug!("Special target missed, cooldown {}", state.special_cooldown);
        events.push(GameEvent::SpecialMissed);
    }

    let thief = state.thief.bounds();
    for outcome in resolve_collisions(&thief, &mut state.actors) {
        match outcome {
            Outcome::Collected { item, points } => {
                state.score += points;
                events.push(GameEvent::Collected { item, points });
            }
            Outcome::SpecialCaught { points } => {
                state.score += points;
                state.special_catches += 1;
                state.special_present = false;
                state.special_cooldown = state.tuning.caught_cooldown;
                state.phase = GamePhase::Paused;
                events.push(GameEvent::SpecialCaught { points });
            }
            Outcome::Busted => {
                state.phase = GamePhase::Ended;
                events.push(GameEvent::Busted);
            }
        }
    }

    events
}
