//! Session lifecycle and per-frame orchestration
//!
//! `GameLoop` owns the only `GameState`. Every frame drains input, steps the
//! simulation and draws the result in one synchronous call, so a rendered
//! frame always shows exactly that frame's post-step values.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

use crate::assets::{AssetBundle, AssetLoadError, AssetProvider, load_bundle};
use crate::consts::PLAYER_START;
use crate::input::{InputController, Key};
use crate::renderer::{DrawSurface, render};
use crate::settings::Settings;
use crate::sim::{GameState, TickInput, tick};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    /// Waiting on assets
    Loading,
    Running,
    Stopped,
    /// Asset loading failed; nothing was drawn
    Failed,
}

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    Halted,
}

/// Shared cancellation flag for every cycle belonging to one session
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Rc<Cell<bool>>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.set(true);
    }

    pub fn is_raised(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error(transparent)]
    Assets(#[from] AssetLoadError),
    #[error("game loop is already {0:?}")]
    AlreadyActive(LoopPhase),
}

/// Game instance holding all session state
pub struct GameLoop<I> {
    phase: LoopPhase,
    state: GameState,
    input: InputController,
    assets: Option<AssetBundle<I>>,
    settings: Settings,
    stop: StopSignal,
    frames_drawn: u64,
}

impl<I> GameLoop<I> {
    pub fn new(settings: Settings) -> Self {
        let state = GameState::new(settings.scoring);
        let input = Self::input_for(&settings, &state);
        Self {
            phase: LoopPhase::Idle,
            state,
            input,
            assets: None,
            settings,
            stop: StopSignal::new(),
            frames_drawn: 0,
        }
    }

    fn input_for(settings: &Settings, state: &GameState) -> InputController {
        InputController::new(PLAYER_START, state.arena.height)
            .with_gamepad_tuning(settings.gamepad_deadzone, settings.invert_gamepad_y)
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Frames rendered this session
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Signal shared by the frame and gamepad cycles of the current session
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Enter `Loading` with a fresh session (scores reset)
    pub fn begin_loading(&mut self) -> Result<(), LoopError> {
        match self.phase {
            LoopPhase::Loading | LoopPhase::Running => {
                log::warn!("Start ignored, loop is {:?}", self.phase);
                return Err(LoopError::AlreadyActive(self.phase));
            }
            LoopPhase::Idle | LoopPhase::Stopped | LoopPhase::Failed => {}
        }

        let gamepad = self.input.active_gamepad();
        self.state = GameState::new(self.settings.scoring);
        self.input = Self::input_for(&self.settings, &self.state);
        // Pad connection outlives sessions
        if let Some(index) = gamepad {
            self.input.gamepad_connected(index);
        }
        self.assets = None;
        self.stop = StopSignal::new();
        self.frames_drawn = 0;
        self.phase = LoopPhase::Loading;
        log::info!("Loading assets...");
        Ok(())
    }

    /// Resolve the `Loading` phase with the outcome of asset loading
    ///
    /// Returns the resulting phase; only `Running` should get a frame cycle.
    pub fn finish_loading(
        &mut self,
        result: Result<AssetBundle<I>, AssetLoadError>,
    ) -> Result<LoopPhase, LoopError> {
        if self.phase != LoopPhase::Loading {
            // Stopped while the assets were in flight
            log::info!("Discarding assets, loop is {:?}", self.phase);
            return Ok(self.phase);
        }

        match result {
            Ok(bundle) => {
                self.assets = Some(bundle);
                self.phase = LoopPhase::Running;
                log::info!("Game loop running");
                Ok(self.phase)
            }
            Err(e) => {
                log::error!("Asset loading failed: {}", e);
                self.phase = LoopPhase::Failed;
                self.stop.raise();
                Err(e.into())
            }
        }
    }

    /// Load assets through `provider` and start running
    pub async fn start<P>(&mut self, provider: &P) -> Result<(), LoopError>
    where
        P: AssetProvider<Image = I>,
    {
        self.begin_loading()?;
        let result = load_bundle(provider).await;
        self.finish_loading(result).map(|_| ())
    }

    /// Run one frame: drain input, step, draw
    pub fn frame<S>(&mut self, surface: &mut S) -> FrameOutcome
    where
        S: DrawSurface<Image = I>,
    {
        if self.phase != LoopPhase::Running || self.stop.is_raised() {
            return FrameOutcome::Halted;
        }
        let Some(assets) = self.assets.as_ref() else {
            return FrameOutcome::Halted;
        };

        let input = TickInput {
            player_target: self.input.take_intent().map(|intent| intent.target),
        };
        tick(&mut self.state, &input);
        render(&self.state, assets, surface);

        self.frames_drawn += 1;
        FrameOutcome::Continue
    }

    fn accepts_input(&self) -> bool {
        matches!(self.phase, LoopPhase::Loading | LoopPhase::Running)
    }

    pub fn key_down(&mut self, key: Key) {
        if self.accepts_input() {
            self.input.key_down(key);
        }
    }

    /// Returns true if the pad became active and should be polled
    pub fn gamepad_connected(&mut self, index: u32) -> bool {
        self.accepts_input() && self.input.gamepad_connected(index)
    }

    /// Returns true if the active pad went away
    pub fn gamepad_disconnected(&mut self, index: u32) -> bool {
        self.input.gamepad_disconnected(index)
    }

    pub fn active_gamepad(&self) -> Option<u32> {
        self.input.active_gamepad()
    }

    /// Register the first pad that is already plugged in
    ///
    /// Pads connected before this session never announce themselves again.
    /// Returns the index to poll if one was adopted.
    pub fn adopt_gamepad(&mut self, present: impl IntoIterator<Item = u32>) -> Option<u32> {
        if self.input.active_gamepad().is_some() {
            return None;
        }
        let index = present.into_iter().next()?;
        self.gamepad_connected(index).then_some(index)
    }

    /// Feed one gamepad axis sample
    pub fn poll_gamepad(&mut self, axis: f32) -> FrameOutcome {
        if !self.accepts_input() || self.stop.is_raised() || self.input.active_gamepad().is_none() {
            return FrameOutcome::Halted;
        }
        self.input.poll_gamepad(axis);
        FrameOutcome::Continue
    }

    /// Tear down the session; safe to call repeatedly
    pub fn stop(&mut self) {
        self.stop.raise();
        match self.phase {
            LoopPhase::Loading | LoopPhase::Running => {
                self.phase = LoopPhase::Stopped;
                log::info!("Game loop stopped after {} frames", self.frames_drawn);
            }
            LoopPhase::Idle | LoopPhase::Stopped | LoopPhase::Failed => {}
        }
    }
}
