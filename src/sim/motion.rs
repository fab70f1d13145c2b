//! Actor and character motion

use super::state::{ActorKind, FallingActor, Field, GameState, Thief};

/// Move the thief by held direction keys and clamp it to the field
pub fn move_thief(thief: &mut Thief, field: Field, left: bool, right: bool) {
    if left {
        thief.pos.x -= thief.speed;
    }
    if right {
        thief.pos.x += thief.speed;
    }
    if thief.pos.x < 0.0 {
        thief.pos.x = 0.0;
    }
    if thief.pos.x + thief.size.x > field.width {
        thief.pos.x = field.width - thief.size.x;
    }
}

/// Advance one actor by a tick.
///
/// Specials reflect off the side walls by flipping direction once their edge
/// reaches a wall; the position is not clamped, so they may overshoot slightly.
pub fn advance_actor(actor: &mut FallingActor, field: Field) {
    actor.pos.y += actor.speed;

    match &mut actor.kind {
        ActorKind::Special {
            zigzag_speed,
            zigzag_dir,
            ..
        } => {
            actor.pos.x += *zigzag_speed * *zigzag_dir;
            if actor.pos.x <= 0.0 || actor.pos.x + actor.size.x >= field.width {
                *zigzag_dir = -*zigzag_dir;
            }
        }
        ActorKind::Collectible { .. } | ActorKind::Obstacle => {}
    }
}

/// Whether an actor has left through the bottom of the field
pub fn has_fallen_out(actor: &FallingActor, field: Field) -> bool {
    actor.pos.y >= field.height
}

/// Advance every actor, then drop the ones that left the field.
///
/// Returns true when a special fell out uncaught; the special flag is cleared
/// and the missed cooldown armed in that case.
pub fn advance_actors(state: &mut GameState) -> bool {
    let field = state.field;
    for actor in &mut state.actors {
        advance_actor(actor, field);
    }

    let mut special_missed = false;
    state.actors.retain(|actor| {
        if !has_fallen_out(actor, field) {
            return true;
        }
        if actor.is_special() {
            special_missed = true;
        }
        false
    });

    if special_missed {
        state.special_present = false;
        state.special_cooldown = state.tuning.missed_cooldown;
    }
    special_missed
}
