//! Collision detection and outcome resolution
//!
//! Everything is an axis-aligned box. Overlap is strict on all four sides, so
//! boxes that only share an edge never collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{ActorKind, FallingActor, ItemKind};

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict rectangle overlap; zero-area contact is a miss
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Result of the thief touching a falling actor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Collectible caught and removed
    Collected { item: ItemKind, points: u64 },
    /// Special target caught and removed
    SpecialCaught { points: u64 },
    /// Obstacle hit, run is over
    Busted,
}

/// Test the thief against every actor and remove what was caught.
///
/// Any obstacle overlap wins outright: the result is a single `Busted` and the
/// actor list is left untouched, so nothing else is credited that tick.
/// Otherwise every overlapping collectible and special is removed and reported
/// in spawn order.
pub fn resolve_collisions(thief: &Aabb, actors: &mut Vec<FallingActor>) -> Vec<Outcome> {
    let busted = actors
        .iter()
        .any(|a| matches!(a.kind, ActorKind::Obstacle) && thief.overlaps(&a.bounds()));
    if busted {
        return vec![Outcome::Busted];
    }

    let mut outcomes = Vec::new();
    actors.retain(|actor| {
        if !thief.overlaps(&actor.bounds()) {
            return true;
        }
        match actor.kind {
            ActorKind::Collectible { item, points } => {
                outcomes.push(Outcome::Collected { item, points });
                false
            }
            ActorKind::Special { points, .. } => {
                outcomes.push(Outcome::SpecialCaught { points });
                false
            }
            // Ruled out by the precedence pass above
            ActorKind::Obstacle => true,
        }
    });
    outcomes
}
