//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per rendered frame, no wall-clock time
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Arena, GameEvent, GameState, ScoringMode, Side};
pub use tick::{TickInput, tick};
