//! Single-frame simulation step
//!
//! Advances the duel by exactly one rendered frame.

use super::state::{GameEvent, GameState, ScoringMode, Side};
use crate::clamp_to_arena;
use crate::consts::*;

/// Input commands for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Absolute player target drained from the input controller
    pub player_target: Option<f32>,
}

/// Advance the game state by one frame
///
/// Order matters: the player target is applied first, the contact test then
/// reads the positions the frame starts from, and only afterwards does the AI
/// take its step.
pub fn tick(state: &mut GameState, input: &TickInput) -> Option<GameEvent> {
    if let Some(target) = input.player_target {
        state.set_player_position(target);
    }

    let event = resolve_contact(state);
    move_ai(state);

    state.frame += 1;
    event
}

/// Award a point if the sabers are within the proximity threshold
fn resolve_contact(state: &mut GameState) -> Option<GameEvent> {
    let touching = state.gap() < PROXIMITY_THRESHOLD;
    let was_touching = state.in_contact;
    state.in_contact = touching;

    if !touching {
        return None;
    }
    if state.scoring == ScoringMode::OncePerContact && was_touching {
        return None;
    }

    // Ties go to the AI
    let side = if state.player_position < state.ai_position {
        Side::Player
    } else {
        Side::Ai
    };
    state.award(side);
    log::debug!(
        "{:?} scored at frame {} (player {}, ai {})",
        side,
        state.frame,
        state.player_score,
        state.ai_score
    );
    Some(GameEvent::Scored(side))
}

/// Fixed-speed pursuit of the player; holds when level
fn move_ai(state: &mut GameState) {
    let next = if state.ai_position < state.player_position {
        state.ai_position + AI_SPEED
    } else if state.ai_position > state.player_position {
        state.ai_position - AI_SPEED
    } else {
        state.ai_position
    };
    state.ai_position = clamp_to_arena(next, state.arena.height);
}
