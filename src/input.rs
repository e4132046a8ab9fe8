//! Player input mediation
//!
//! Keyboard events and gamepad polls both move one authoritative target
//! position. The game loop drains that target once per frame, so the
//! simulation never sees a value captured before the latest input.

use crate::clamp_to_arena;
use crate::consts::*;

/// Keys the duel reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            _ => Key::Other,
        }
    }
}

/// Device that produced an intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Gamepad,
}

/// Requested player position for the coming frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputIntent {
    pub target: f32,
    /// Last device to write the target
    pub source: InputSource,
}

/// Merges keyboard and gamepad input into a single player target
#[derive(Debug, Clone)]
pub struct InputController {
    target: f32,
    height: f32,
    deadzone: f32,
    invert_y: bool,
    /// Active gamepad index (first connected wins)
    gamepad: Option<u32>,
    /// Set when a device has written since the last drain
    pending: Option<InputSource>,
}

impl InputController {
    pub fn new(start: f32, height: f32) -> Self {
        Self {
            target: clamp_to_arena(start, height),
            height,
            deadzone: GAMEPAD_DEADZONE,
            invert_y: false,
            gamepad: None,
            pending: None,
        }
    }

    /// Override the stick deadzone and axis direction
    pub fn with_gamepad_tuning(mut self, deadzone: f32, invert_y: bool) -> Self {
        self.deadzone = deadzone.abs();
        self.invert_y = invert_y;
        self
    }

    /// Current target (includes writes not yet drained)
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Re-seed the target, dropping any pending intent
    pub fn reset(&mut self, position: f32) {
        self.target = clamp_to_arena(position, self.height);
        self.pending = None;
    }

    /// Handle one key event (each auto-repeat counts)
    pub fn key_down(&mut self, key: Key) {
        let delta = match key {
            Key::Up => -KEY_STEP,
            Key::Down => KEY_STEP,
            Key::Other => return,
        };
        self.nudge(delta, InputSource::Keyboard);
    }

    /// Register a connected pad; returns true if it became the active one
    pub fn gamepad_connected(&mut self, index: u32) -> bool {
        if self.gamepad.is_some() {
            log::debug!("Gamepad {} connected, keeping active pad", index);
            return false;
        }
        log::debug!("Gamepad {} connected", index);
        self.gamepad = Some(index);
        true
    }

    /// Forget a pad; returns true if it was the active one
    pub fn gamepad_disconnected(&mut self, index: u32) -> bool {
        if self.gamepad != Some(index) {
            return false;
        }
        log::debug!("Gamepad {} disconnected, keyboard only", index);
        self.gamepad = None;
        true
    }

    /// Active gamepad index, if any
    pub fn active_gamepad(&self) -> Option<u32> {
        self.gamepad
    }

    /// Sample the vertical stick axis once for this frame
    pub fn poll_gamepad(&mut self, axis: f32) {
        if self.gamepad.is_none() {
            return;
        }
        let axis = if self.invert_y { -axis } else { axis };
        if axis < -self.deadzone {
            self.nudge(-GAMEPAD_STEP, InputSource::Gamepad);
        } else if axis > self.deadzone {
            self.nudge(GAMEPAD_STEP, InputSource::Gamepad);
        }
    }

    /// Drain the target if any device wrote since the last call
    pub fn take_intent(&mut self) -> Option<InputIntent> {
        self.pending.take().map(|source| InputIntent {
            target: self.target,
            source,
        })
    }

    fn nudge(&mut self, delta: f32, source: InputSource) {
        self.target = clamp_to_arena(self.target + delta, self.height);
        self.pending = Some(source);
        log::trace!("{:?} moved target to {}", source, self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> InputController {
        InputController::new(PLAYER_START, ARENA_HEIGHT)
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("ArrowUp"), Key::Up);
        assert_eq!(Key::from_dom("ArrowDown"), Key::Down);
        assert_eq!(Key::from_dom("w"), Key::Other);
    }

    #[test]
    fn test_ten_down_presses() {
        let mut input = controller();
        for i in 1..=10 {
            input.key_down(Key::Down);
            assert_eq!(input.target(), 200.0 + 10.0 * i as f32);
        }
        assert_eq!(input.target(), 300.0);
    }

    #[test]
    fn test_keys_clamp_to_arena() {
        let mut input = InputController::new(595.0, ARENA_HEIGHT);
        input.key_down(Key::Down);
        assert_eq!(input.target(), 600.0);

        let mut input = InputController::new(5.0, ARENA_HEIGHT);
        input.key_down(Key::Up);
        assert_eq!(input.target(), 0.0);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut input = controller();
        input.key_down(Key::Other);
        assert_eq!(input.take_intent(), None);
    }

    #[test]
    fn test_gamepad_sustained_push() {
        let mut input = controller();
        assert!(input.gamepad_connected(0));
        for _ in 0..5 {
            input.poll_gamepad(0.8);
        }
        assert_eq!(input.target(), 225.0);
    }

    #[test]
    fn test_gamepad_deadzone() {
        let mut input = controller();
        input.gamepad_connected(0);
        input.poll_gamepad(0.5);
        input.poll_gamepad(-0.5);
        input.poll_gamepad(0.2);
        assert_eq!(input.take_intent(), None);

        input.poll_gamepad(-0.9);
        assert_eq!(input.target(), 195.0);
    }

    #[test]
    fn test_gamepad_ignored_without_pad() {
        let mut input = controller();
        input.poll_gamepad(1.0);
        assert_eq!(input.take_intent(), None);
        assert_eq!(input.target(), 200.0);
    }

    #[test]
    fn test_first_pad_wins() {
        let mut input = controller();
        assert!(input.gamepad_connected(2));
        assert!(!input.gamepad_connected(3));
        assert!(!input.gamepad_disconnected(3));
        assert_eq!(input.active_gamepad(), Some(2));
        assert!(input.gamepad_disconnected(2));
        assert_eq!(input.active_gamepad(), None);
    }

    #[test]
    fn test_inverted_axis() {
        let mut input = controller().with_gamepad_tuning(0.3, true);
        input.gamepad_connected(0);
        input.poll_gamepad(0.4);
        assert_eq!(input.target(), 195.0);
    }

    #[test]
    fn test_sources_share_one_target() {
        let mut input = controller();
        input.gamepad_connected(0);
        input.key_down(Key::Down);
        input.poll_gamepad(-1.0);
        input.key_down(Key::Down);
        input.poll_gamepad(1.0);

        let intent = input.take_intent().expect("intent pending");
        assert_eq!(intent.target, 220.0);
        assert_eq!(intent.source, InputSource::Gamepad);
        assert_eq!(input.take_intent(), None);
    }

    #[test]
    fn test_reset_drops_pending() {
        let mut input = controller();
        input.key_down(Key::Up);
        input.reset(PLAYER_START);
        assert_eq!(input.take_intent(), None);
        assert_eq!(input.target(), 200.0);
    }
}
