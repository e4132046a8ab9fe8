//! Saber Duel - a lightsaber duel arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (AI pursuit, contact scoring, game state)
//! - `input`: Keyboard/gamepad mediation into a single player target
//! - `assets`: Asset ids, bundles and the loader contract
//! - `renderer`: Draw pass over an abstract drawing surface
//! - `game_loop`: Lifecycle and per-frame orchestration
//! - `platform`: Browser host (canvas, animation frames, listeners)

pub mod assets;
pub mod game_loop;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game_loop::{FrameOutcome, GameLoop, LoopError, LoopPhase};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (logical canvas units)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Starting offsets
    pub const PLAYER_START: f32 = 200.0;
    pub const AI_START: f32 = 600.0;

    /// AI pursuit speed (units per frame)
    pub const AI_SPEED: f32 = 2.0;
    /// Gap below which a contact scores
    pub const PROXIMITY_THRESHOLD: f32 = 20.0;

    /// Player movement per arrow-key event
    pub const KEY_STEP: f32 = 10.0;
    /// Player movement per polled gamepad frame
    pub const GAMEPAD_STEP: f32 = 5.0;
    /// Stick magnitude that must be exceeded before the pad moves the player
    pub const GAMEPAD_DEADZONE: f32 = 0.5;
    /// Vertical stick axis on a standard-mapping pad
    pub const GAMEPAD_AXIS: u32 = 1;

    /// Horizontal distance of each actor from its wall
    pub const ACTOR_WALL_OFFSET: f32 = 100.0;
}

/// Clamp a vertical offset into `[0, height]`
#[inline]
pub fn clamp_to_arena(position: f32, height: f32) -> f32 {
    position.clamp(0.0, height)
}
