//! Game state and core simulation types
//!
//! Everything the tick function touches lives here, owned by one `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run yet, start screen showing
    Idle,
    /// Active gameplay
    Running,
    /// Special-catch interstitial, waiting for Continue
    Paused,
    /// Run ended by an obstacle
    Ended,
}

/// Play field dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Collectible subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    FriedChicken,
    Watermelon,
    Cotton,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::FriedChicken, ItemKind::Watermelon, ItemKind::Cotton];

    /// Points awarded on catch
    pub fn points(self) -> u64 {
        match self {
            ItemKind::FriedChicken => 10,
            ItemKind::Watermelon => 15,
            ItemKind::Cotton => 5,
        }
    }

    /// Asset name
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::FriedChicken => "fried_chicken",
            ItemKind::Watermelon => "watermelon",
            ItemKind::Cotton => "cotton",
        }
    }
}

/// The player-controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thief {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal pixels per tick while a direction key is held
    pub speed: f32,
}

impl Thief {
    /// Centered on the floor of `field`
    pub fn new(field: Field, tuning: &Tuning) -> Self {
        let size = Vec2::splat(tuning.thief_size);
        Self {
            pos: Vec2::new(
                field.width / 2.0 - size.x / 2.0,
                Self::floor_y(field, size.y, tuning.floor_margin),
            ),
            size,
            speed: tuning.thief_speed,
        }
    }

    fn floor_y(field: Field, height: f32, margin: f32) -> f32 {
        field.height - height - margin
    }

    /// Re-pin to the floor after the field changed height
    pub fn pin_to_floor(&mut self, field: Field, margin: f32) {
        self.pos.y = Self::floor_y(field, self.size.y, margin);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// What a falling actor is, and the per-kind data it carries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActorKind {
    /// Normal item, caught for points
    Collectible { item: ItemKind, points: u64 },
    /// Ends the run on contact
    Obstacle,
    /// Rare oscillating bonus target
    Special {
        points: u64,
        /// Horizontal pixels per tick
        zigzag_speed: f32,
        /// +1.0 (right) or -1.0 (left)
        zigzag_dir: f32,
    },
}

/// A falling entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingActor {
    pub id: u32,
    pub kind: ActorKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical pixels per tick
    pub speed: f32,
}

impl FallingActor {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn is_special(&self) -> bool {
        matches!(self.kind, ActorKind::Special { .. })
    }
}

/// Complete simulation state for one player
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub field: Field,
    pub phase: GamePhase,
    pub score: u64,
    /// Specials caught this run
    pub special_catches: u32,
    /// Simulation tick counter for the current run
    pub time_ticks: u64,
    pub thief: Thief,
    /// Falling actors in spawn order
    pub actors: Vec<FallingActor>,
    /// A special target is currently falling
    pub special_present: bool,
    /// Ticks until a special may spawn again
    pub special_cooldown: u32,
    /// Latched once score first reaches the eased threshold this run
    pub difficulty_eased: bool,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, tuning: Tuning, field: Field) -> Self {
        let thief = Thief::new(field, &tuning);
        Self {
            seed,
            tuning,
            field,
            phase: GamePhase::Idle,
            score: 0,
            special_catches: 0,
            time_ticks: 0,
            thief,
            actors: Vec::new(),
            special_present: false,
            special_cooldown: 0,
            difficulty_eased: false,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Reset counters, actors and spawn gating, and enter `Running`
    pub fn begin_run(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.special_catches = 0;
        self.time_ticks = 0;
        self.actors.clear();
        self.special_present = false;
        self.special_cooldown = 0;
        self.difficulty_eased = false;
        self.thief = Thief::new(self.field, &self.tuning);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Number of special targets in the actor list
    pub fn special_count(&self) -> usize {
        self.actors.iter().filter(|a| a.is_special()).count()
    }

    /// Follow a viewport resize
    pub fn resize(&mut self, width: f32, height: f32) {
        self.field = Field::new(width, height);
        self.thief.pin_to_floor(self.field, self.tuning.floor_margin);
    }
}
