//! Canvas 2D rendering
//!
//! Each frame clears the surface and draws the thief plus every falling actor.
//! Sprites that have not loaded (or failed to) are drawn as solid rectangles.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use crate::sim::{Aabb, ActorKind, GamePhase, GameState, ItemKind};

/// Every image the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Thief,
    Item(ItemKind),
    Obstacle,
    Special,
}

impl Sprite {
    pub const ALL: [Sprite; 6] = [
        Sprite::Thief,
        Sprite::Item(ItemKind::FriedChicken),
        Sprite::Item(ItemKind::Watermelon),
        Sprite::Item(ItemKind::Cotton),
        Sprite::Obstacle,
        Sprite::Special,
    ];

    /// Image file stem under the assets directory
    pub fn asset_name(self) -> &'static str {
        match self {
            Sprite::Thief => "thief",
            Sprite::Item(item) => item.as_str(),
            Sprite::Obstacle => "cop",
            Sprite::Special => "justin",
        }
    }

    /// Fill used while the image is unavailable
    pub fn placeholder_color(self) -> &'static str {
        match self {
            Sprite::Thief | Sprite::Special => "#fff",
            Sprite::Item(_) => "#aaa",
            Sprite::Obstacle => "#888",
        }
    }

    pub fn for_actor(kind: &ActorKind) -> Self {
        match kind {
            ActorKind::Collectible { item, .. } => Sprite::Item(*item),
            ActorKind::Obstacle => Sprite::Obstacle,
            ActorKind::Special { .. } => Sprite::Special,
        }
    }
}

/// Minimal drawing surface
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    /// Image decoded and drawable
    fn sprite_ready(&self, sprite: Sprite) -> bool;
    fn draw_sprite(&mut self, sprite: Sprite, bounds: Aabb);
    fn fill_rect(&mut self, bounds: Aabb, color: &str);
}

fn draw(surface: &mut dyn Surface, sprite: Sprite, bounds: Aabb) {
    if surface.sprite_ready(sprite) {
        surface.draw_sprite(sprite, bounds);
    } else {
        surface.fill_rect(bounds, sprite.placeholder_color());
    }
}

/// Draw one frame of the current state
pub fn draw_frame(surface: &mut dyn Surface, state: &GameState) {
    surface.clear(state.field.width, state.field.height);
    draw(surface, Sprite::Thief, state.thief.bounds());
    for actor in &state.actors {
        draw(surface, Sprite::for_actor(&actor.kind), actor.bounds());
    }
}

/// Skips drawing while nothing moves.
///
/// Running frames always draw. Any other phase draws once when it is entered,
/// then the canvas is left alone until the phase changes again.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedrawGate {
    last_drawn: Option<GamePhase>,
}

impl RedrawGate {
    pub fn should_draw(&mut self, phase: GamePhase) -> bool {
        let changed = self.last_drawn != Some(phase);
        self.last_drawn = Some(phase);
        changed || phase == GamePhase::Running
    }

    /// Force the next frame to draw (canvas was cleared)
    pub fn invalidate(&mut self) {
        self.last_drawn = None;
    }
}

/// Tracks how many sprite loads have settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetProgress {
    pub settled: usize,
    pub total: usize,
    pub failed: usize,
}

impl AssetProgress {
    pub fn new(total: usize) -> Self {
        Self {
            settled: 0,
            total,
            failed: 0,
        }
    }

    /// Count a finished load; failures still count as settled.
    /// Returns true exactly when the last load settles.
    pub fn settle(&mut self, ok: bool) -> bool {
        if self.is_complete() {
            return false;
        }
        self.settled += 1;
        if !ok {
            self.failed += 1;
        }
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.settled >= self.total
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glam::Vec2;

    use super::*;
    use crate::sim::{FallingActor, Field};
    use crate::tuning::Tuning;

    #[derive(Default)]
    struct Recording {
        ready: HashSet<Sprite>,
        ops: Vec<String>,
    }

    impl Surface for Recording {
        fn clear(&mut self, width: f32, height: f32) {
            self.ops.push(format!("clear {width}x{height}"));
        }

        fn sprite_ready(&self, sprite: Sprite) -> bool {
            self.ready.contains(&sprite)
        }

        fn draw_sprite(&mut self, sprite: Sprite, bounds: Aabb) {
            self.ops
                .push(format!("sprite {} {}", sprite.asset_name(), bounds.min.x));
        }

        fn fill_rect(&mut self, _bounds: Aabb, color: &str) {
            self.ops.push(format!("fill {color}"));
        }
    }

    fn state_with_actors() -> GameState {
        let mut state = GameState::new(1, Tuning::default(), Field::new(400.0, 300.0));
        state.begin_run();
        for (i, kind) in [
            ActorKind::Collectible {
                item: ItemKind::Watermelon,
                points: 15,
            },
            ActorKind::Obstacle,
            ActorKind::Special {
                points: 1000,
                zigzag_speed: 2.5,
                zigzag_dir: 1.0,
            },
        ]
        .into_iter()
        .enumerate()
        {
            let id = state.next_entity_id();
            state.actors.push(FallingActor {
                id,
                kind,
                pos: Vec2::new(i as f32 * 100.0, 10.0),
                size: Vec2::splat(80.0),
                speed: 2.5,
            });
        }
        state
    }

    #[test]
    fn test_placeholders_when_nothing_loaded() {
        let mut surface = Recording::default();
        draw_frame(&mut surface, &state_with_actors());
        assert_eq!(
            surface.ops,
            vec!["clear 400x300", "fill #fff", "fill #aaa", "fill #888", "fill #fff"]
        );
    }

    #[test]
    fn test_loaded_sprites_drawn() {
        let mut surface = Recording {
            ready: Sprite::ALL.into_iter().collect(),
            ..Default::default()
        };
        draw_frame(&mut surface, &state_with_actors());
        assert_eq!(
            surface.ops,
            vec![
                "clear 400x300",
                "sprite thief 150",
                "sprite watermelon 0",
                "sprite cop 100",
                "sprite justin 200",
            ]
        );
    }

    #[test]
    fn test_asset_names_unique() {
        let names: HashSet<&str> = Sprite::ALL.iter().map(|s| s.asset_name()).collect();
        assert_eq!(names.len(), Sprite::ALL.len());
    }

    #[test]
    fn test_redraw_gate_draws_running_frames() {
        let mut gate = RedrawGate::default();
        assert!(gate.should_draw(GamePhase::Running));
        assert!(gate.should_draw(GamePhase::Running));
        assert!(gate.should_draw(GamePhase::Running));
    }

    #[test]
    fn test_redraw_gate_freezes_paused_and_ended() {
        let mut gate = RedrawGate::default();
        assert!(gate.should_draw(GamePhase::Idle));
        assert!(!gate.should_draw(GamePhase::Idle));

        gate.should_draw(GamePhase::Running);
        assert!(gate.should_draw(GamePhase::Paused));
        assert!(!gate.should_draw(GamePhase::Paused));
        assert!(!gate.should_draw(GamePhase::Paused));

        assert!(gate.should_draw(GamePhase::Running));
        assert!(gate.should_draw(GamePhase::Ended));
        assert!(!gate.should_draw(GamePhase::Ended));
    }

    #[test]
    fn test_redraw_gate_invalidate_forces_one_draw() {
        let mut gate = RedrawGate::default();
        gate.should_draw(GamePhase::Ended);
        assert!(!gate.should_draw(GamePhase::Ended));

        gate.invalidate();
        assert!(gate.should_draw(GamePhase::Ended));
        assert!(!gate.should_draw(GamePhase::Ended));
    }

    #[test]
    fn test_asset_progress_counts_failures() {
        let mut progress = AssetProgress::new(3);
        assert!(!progress.settle(true));
        assert!(!progress.settle(false));
        assert!(progress.settle(true));
        assert_eq!(progress.failed, 1);
        assert!(!progress.settle(true));
        assert_eq!(progress.settled, 3);
    }
}
