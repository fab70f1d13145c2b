//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Outcome, resolve_collisions};
pub use state::{ActorKind, FallingActor, Field, GamePhase, GameState, ItemKind, Thief};
pub use tick::{GameEvent, TickInput, tick};
