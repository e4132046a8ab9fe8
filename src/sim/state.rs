//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives here.

use serde::{Deserialize, Serialize};

use crate::clamp_to_arena;
use crate::consts::*;

/// Which combatant an event or position belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Human-controlled saber (left wall)
    Player,
    /// AI opponent (right wall, mirrored)
    Ai,
}

/// How contacts turn into points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringMode {
    /// A point for every frame the sabers stay within the threshold
    #[default]
    EveryFrame,
    /// A single point when a contact begins; re-armed once the sabers separate
    OncePerContact,
}

/// Events emitted by a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Scored(Side),
}

/// Fixed arena bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Complete game state for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Vertical offset of the human saber
    pub player_position: f32,
    /// Vertical offset of the AI saber
    pub ai_position: f32,
    pub player_score: u32,
    pub ai_score: u32,
    pub arena: Arena,
    pub scoring: ScoringMode,
    /// Whether the previous step ended inside the proximity threshold
    pub in_contact: bool,
    /// Simulation steps applied so far
    pub frame: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(ScoringMode::default())
    }
}

impl GameState {
    /// Create a fresh session with both sabers at their starting offsets
    pub fn new(scoring: ScoringMode) -> Self {
        let arena = Arena::default();
        Self {
            player_position: clamp_to_arena(PLAYER_START, arena.height),
            ai_position: clamp_to_arena(AI_START, arena.height),
            player_score: 0,
            ai_score: 0,
            arena,
            scoring,
            in_contact: false,
            frame: 0,
        }
    }

    /// Absolute gap between the two sabers
    pub fn gap(&self) -> f32 {
        (self.player_position - self.ai_position).abs()
    }

    /// Position of the given side
    pub fn position(&self, side: Side) -> f32 {
        match side {
            Side::Player => self.player_position,
            Side::Ai => self.ai_position,
        }
    }

    /// Score of the given side
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_score,
            Side::Ai => self.ai_score,
        }
    }

    /// Move the player saber, clamped to the arena
    pub fn set_player_position(&mut self, position: f32) {
        self.player_position = clamp_to_arena(position, self.arena.height);
    }

    /// Award one point to `side`
    pub(crate) fn award(&mut self, side: Side) {
        match side {
            Side::Player => self.player_score = self.player_score.saturating_add(1),
            Side::Ai => self.ai_score = self.ai_score.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starting_offsets() {
        let state = GameState::default();
        assert_eq!(state.player_position, 200.0);
        assert_eq!(state.ai_position, 600.0);
        assert_eq!(state.player_score, 0);
        assert_eq!(state.ai_score, 0);
        assert_eq!(state.arena, Arena { width: 800.0, height: 600.0 });
        assert_eq!(state.scoring, ScoringMode::EveryFrame);
        assert!(!state.in_contact);
    }

    #[test]
    fn test_set_player_position_clamps() {
        let mut state = GameState::default();
        state.set_player_position(-35.0);
        assert_eq!(state.player_position, 0.0);
        state.set_player_position(900.0);
        assert_eq!(state.player_position, 600.0);
    }

    #[test]
    fn test_award_touches_one_side() {
        let mut state = GameState::default();
        state.award(Side::Ai);
        assert_eq!(state.score(Side::Ai), 1);
        assert_eq!(state.score(Side::Player), 0);
    }
}
