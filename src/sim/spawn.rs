//! Procedural spawning
//!
//! Each kind rolls its own independent per-tick probability.

use glam::Vec2;
use rand::Rng;

use super::state::{ActorKind, FallingActor, GameState, ItemKind};

/// Roll every spawn table once, pushing new actors to the back of the list
pub fn spawn_actors(state: &mut GameState) {
    spawn_collectible(state);
    spawn_obstacle(state);
    spawn_special(state);
}

/// Random x so the actor starts fully inside the field, y just above the top
fn entry_position(state: &mut GameState, size: f32) -> Vec2 {
    let span = (state.field.width - size).max(0.0);
    let x = state.rng.random::<f32>() * span;
    Vec2::new(x, -size)
}

fn spawn_collectible(state: &mut GameState) {
    if !state.rng.random_bool(state.tuning.item_spawn_rate) {
        return;
    }
    let item = ItemKind::ALL[state.rng.random_range(0..ItemKind::ALL.len())];
    let size = state.tuning.item_size;
    let pos = entry_position(state, size);
    let speed =
        state.tuning.item_speed + state.rng.random::<f32>() * state.tuning.item_speed_jitter;
    let id = state.next_entity_id();
    state.actors.push(FallingActor {
        id,
        kind: ActorKind::Collectible {
            item,
            points: item.points(),
        },
        pos,
        size: Vec2::splat(size),
        speed,
    });
}

fn spawn_obstacle(state: &mut GameState) {
    if !state.rng.random_bool(state.tuning.obstacle_spawn_rate) {
        return;
    }
    let size = state.tuning.obstacle_size;
    let pos = entry_position(state, size);
    let speed =
        state.tuning.item_speed + state.rng.random::<f32>() * state.tuning.obstacle_speed_jitter;
    let id = state.next_entity_id();
    state.actors.push(FallingActor {
        id,
        kind: ActorKind::Obstacle,
        pos,
        size: Vec2::splat(size),
        speed,
    });
}

/// Whether a special may be rolled for this tick
pub fn special_eligible(state: &GameState) -> bool {
    !state.special_present && state.special_cooldown == 0
}

fn spawn_special(state: &mut GameState) {
    if state.score >= state.tuning.eased_threshold && !state.difficulty_eased {
        state.difficulty_eased = true;
        log::info!("Special difficulty eased at score {}", state.score);
    }

    // Eligibility gates the roll itself, not just the push
    if !special_eligible(state) || !state.rng.random_bool(state.tuning.special_spawn_rate) {
        return;
    }

    let tier = state.tuning.special_tier(state.score);
    let size = state.tuning.special_size;
    let pos = entry_position(state, size);
    let zigzag_dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let id = state.next_entity_id();
    state.actors.push(FallingActor {
        id,
        kind: ActorKind::Special {
            points: state.tuning.special_points,
            zigzag_speed: tier.zigzag_speed,
            zigzag_dir,
        },
        pos,
        size: Vec2::splat(size),
        speed: state.tuning.item_speed + tier.extra_fall_speed,
    });
    state.special_present = true;
    log::debug!("Special target spawned (id {id}, score {})", state.score);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Field, GamePhase};
    use crate::tuning::Tuning;

    fn always_special(score: u64) -> GameState {
        let tuning = Tuning {
            item_spawn_rate: 0.0,
            obstacle_spawn_rate: 0.0,
            special_spawn_rate: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning, Field::new(800.0, 600.0));
        state.begin_run();
        state.score = score;
        state
    }

    #[test]
    fn test_hard_tier_below_threshold() {
        let mut state = always_special(25);
        spawn_actors(&mut state);

        assert_eq!(state.actors.len(), 1);
        let actor = &state.actors[0];
        assert_eq!(actor.speed, 2.5 + 3.5);
        match actor.kind {
            ActorKind::Special {
                points,
                zigzag_speed,
                zigzag_dir,
            } => {
                assert_eq!(points, 1000);
                assert_eq!(zigzag_speed, 2.5);
                assert!(zigzag_dir == 1.0 || zigzag_dir == -1.0);
            }
            other => panic!("expected special, got {other:?}"),
        }
        assert!(state.special_present);
        assert!(!state.difficulty_eased);
    }

    #[test]
    fn test_eased_tier_at_threshold() {
        let mut state = always_special(30);
        spawn_actors(&mut state);

        let actor = &state.actors[0];
        assert_eq!(actor.speed, 2.5 + 1.0);
        assert!(matches!(
            actor.kind,
            ActorKind::Special { zigzag_speed, .. } if zigzag_speed == 0.8
        ));
        assert!(state.difficulty_eased);
    }

    #[test]
    fn test_special_is_singleton() {
        let mut state = always_special(0);
        for _ in 0..50 {
            spawn_actors(&mut state);
        }
        assert_eq!(state.special_count(), 1);
    }

    #[test]
    fn test_cooldown_blocks_special() {
        let mut state = always_special(0);
        state.special_cooldown = 1;
        spawn_actors(&mut state);
        assert!(state.actors.is_empty());
        assert!(!state.special_present);
    }

    #[test]
    fn test_spawn_positions_inside_field() {
        let tuning = Tuning {
            item_spawn_rate: 1.0,
            obstacle_spawn_rate: 1.0,
            special_spawn_rate: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(11, tuning, Field::new(640.0, 480.0));
        state.begin_run();
        for _ in 0..200 {
            spawn_actors(&mut state);
        }
        assert_eq!(state.actors.len(), 400);
        for actor in &state.actors {
            assert!(actor.pos.x >= 0.0);
            assert!(actor.pos.x + actor.size.x <= 640.0);
            assert_eq!(actor.pos.y, -actor.size.y);
            match actor.kind {
                ActorKind::Collectible { item, points } => {
                    assert_eq!(points, item.points());
                    assert!(actor.speed >= 2.5 && actor.speed <= 3.5);
                }
                ActorKind::Obstacle => assert!(actor.speed >= 2.5 && actor.speed <= 4.0),
                ActorKind::Special { .. } => panic!("special rate is zero"),
            }
        }
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_ids_follow_spawn_order() {
        let tuning = Tuning {
            item_spawn_rate: 1.0,
            obstacle_spawn_rate: 1.0,
            special_spawn_rate: 1.0,
            ..Default::default()
        };
        let mut state = GameState::new(5, tuning, Field::new(640.0, 480.0));
        state.begin_run();
        spawn_actors(&mut state);
        let ids: Vec<u32> = state.actors.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(matches!(state.actors[0].kind, ActorKind::Collectible { .. }));
        assert!(matches!(state.actors[1].kind, ActorKind::Obstacle));
        assert!(state.actors[2].is_special());
    }
}
