//! Browser host
//!
//! Wires a `GameLoop` to a canvas, `requestAnimationFrame` and DOM input
//! events. The frame cycle and the gamepad poll cycle are separate
//! `AnimationTask`s sharing the session's `StopSignal`; `Session::stop`
//! cancels both and removes every listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Event, EventTarget, Gamepad, GamepadEvent, HtmlImageElement, KeyboardEvent, Navigator, Window,
};

use super::PlatformError;
use crate::assets::{AssetBundle, AssetId, AssetLoadError, AssetProvider};
use crate::consts::*;
use crate::game_loop::{FrameOutcome, GameLoop, LoopPhase, StopSignal};
use crate::input::Key;
use crate::renderer::CanvasSurface;
use crate::settings::Settings;

/// Element id of the game canvas
pub const CANVAS_ID: &str = "canvas";

pub type SharedGame = Rc<RefCell<GameLoop<HtmlImageElement>>>;

/// Loads `{base}/{name}.svg` into decoded image elements
pub struct WebImageProvider {
    base: String,
}

impl WebImageProvider {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn path(&self, id: AssetId) -> String {
        format!("{}/{}.svg", self.base, id.name())
    }
}

impl AssetProvider for WebImageProvider {
    type Image = HtmlImageElement;

    async fn load(&self, id: AssetId) -> Result<HtmlImageElement, AssetLoadError> {
        let image = HtmlImageElement::new().map_err(|_| AssetLoadError::Missing { id })?;
        image.set_src(&self.path(id));
        JsFuture::from(image.decode())
            .await
            .map_err(|e| AssetLoadError::Decode {
                id,
                reason: format!("{:?}", e),
            })?;
        log::debug!("Decoded {}", self.path(id));
        Ok(image)
    }
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut(f64)>) -> Result<i32, PlatformError> {
    Ok(window.request_animation_frame(callback.as_ref().unchecked_ref())?)
}

/// Self-rescheduling `requestAnimationFrame` cycle that can be cancelled
pub struct AnimationTask {
    name: &'static str,
    window: Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
}

impl AnimationTask {
    /// Schedule `step` every animation frame until it halts, `stop` is
    /// raised, or the task is cancelled
    pub fn spawn(
        name: &'static str,
        stop: StopSignal,
        mut step: impl FnMut(f64) -> FrameOutcome + 'static,
    ) -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
        let pending = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));

        // Weak so dropping the task frees the closure
        let this = Rc::downgrade(&callback);
        let cycle_window = window.clone();
        let cycle_pending = pending.clone();
        let closure = Closure::wrap(Box::new(move |time: f64| {
            cycle_pending.set(None);
            if stop.is_raised() || step(time) == FrameOutcome::Halted {
                log::debug!("{} cycle halted", name);
                return;
            }
            let Some(callback) = this.upgrade() else {
                return;
            };
            if let Some(cb) = callback.borrow().as_ref() {
                match request_frame(&cycle_window, cb) {
                    Ok(id) => cycle_pending.set(Some(id)),
                    Err(e) => log::error!("{} cycle could not reschedule: {}", name, e),
                }
            }
        }) as Box<dyn FnMut(f64)>);

        pending.set(Some(request_frame(&window, &closure)?));
        *callback.borrow_mut() = Some(closure);
        log::debug!("{} cycle started", name);

        Ok(Self {
            name,
            window,
            pending,
            callback,
        })
    }

    /// Cancel the scheduled frame and release the closure
    ///
    /// Must not be called from inside this task's own step.
    pub fn cancel(&mut self) {
        if let Some(id) = self.pending.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("{} cycle cancel failed: {:?}", self.name, e);
            }
        }
        if self.callback.borrow_mut().take().is_some() {
            log::debug!("{} cycle cancelled", self.name);
        }
    }
}

impl Drop for AnimationTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// DOM event listener removed on drop
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, PlatformError> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("{} listener removal failed: {:?}", self.kind, e);
        }
    }
}

fn gamepad_index(event: &Event) -> Option<u32> {
    event
        .dyn_ref::<GamepadEvent>()?
        .gamepad()
        .map(|pad| pad.index())
}

/// Vertical stick value of pad `index`, if it is still present
fn read_axis(navigator: &Navigator, index: u32) -> Option<f32> {
    let pads = navigator.get_gamepads().ok()?;
    let pad: Gamepad = pads.get(index).dyn_into().ok()?;
    pad.axes().get(GAMEPAD_AXIS).as_f64().map(|v| v as f32)
}

fn spawn_gamepad_poll(game: &SharedGame, index: u32) -> Result<AnimationTask, PlatformError> {
    let navigator = web_sys::window().ok_or(PlatformError::NoWindow)?.navigator();
    let stop = game.borrow().stop_signal();
    let game = game.clone();
    AnimationTask::spawn("gamepad", stop, move |_time| {
        let axis = read_axis(&navigator, index).unwrap_or(0.0);
        game.borrow_mut().poll_gamepad(axis)
    })
}

/// Indices of the pads the browser already reports as plugged in
fn present_gamepads(navigator: &Navigator) -> Vec<u32> {
    let Ok(pads) = navigator.get_gamepads() else {
        return Vec::new();
    };
    pads.iter()
        .filter_map(|pad| pad.dyn_into::<Gamepad>().ok())
        .filter(|pad| pad.connected())
        .map(|pad| pad.index())
        .collect()
}

/// One game in the page, from loading until it is stopped
pub struct Session {
    game: SharedGame,
    provider: Rc<WebImageProvider>,
    surface: Option<CanvasSurface>,
    frame_task: Option<AnimationTask>,
    gamepad_task: Rc<RefCell<Option<AnimationTask>>>,
    listeners: Vec<Listener>,
}

impl Session {
    /// Enter `Loading` and attach input
    ///
    /// Assets are loaded by the caller through `provider()`; the session can
    /// be stopped at any point while that is in flight.
    pub fn open(settings: Settings) -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
        let document = window.document().ok_or(PlatformError::NoDocument)?;
        let surface = CanvasSurface::from_element_id(
            &document,
            CANVAS_ID,
            Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
        )?;
        let provider = Rc::new(WebImageProvider::new(&settings.asset_base));

        let game: SharedGame = Rc::new(RefCell::new(GameLoop::new(settings)));
        game.borrow_mut().begin_loading()?;

        let gamepad_task = Rc::new(RefCell::new(None));
        let listeners = install_listeners(&window, &game, &gamepad_task)?;

        // Pads plugged in before this session fire no connect event
        let adopted = game
            .borrow_mut()
            .adopt_gamepad(present_gamepads(&window.navigator()));
        if let Some(index) = adopted {
            log::info!("Using gamepad {}", index);
            *gamepad_task.borrow_mut() = Some(spawn_gamepad_poll(&game, index)?);
        }

        Ok(Self {
            game,
            provider,
            surface: Some(surface),
            frame_task: None,
            gamepad_task,
            listeners,
        })
    }

    pub fn game(&self) -> &SharedGame {
        &self.game
    }

    pub fn provider(&self) -> Rc<WebImageProvider> {
        self.provider.clone()
    }

    /// Hand over the loaded assets and start the frame cycle
    ///
    /// Nothing is drawn if any asset failed to load or the session was
    /// stopped meanwhile.
    pub fn finish(
        &mut self,
        result: Result<AssetBundle<HtmlImageElement>, AssetLoadError>,
    ) -> Result<(), PlatformError> {
        let phase = self.game.borrow_mut().finish_loading(result)?;
        if phase != LoopPhase::Running {
            log::info!("Not starting frames, loop is {:?}", phase);
            return Ok(());
        }
        let Some(mut surface) = self.surface.take() else {
            return Ok(());
        };

        let stop = self.game.borrow().stop_signal();
        let frame_game = self.game.clone();
        self.frame_task = Some(AnimationTask::spawn("frame", stop, move |_time| {
            frame_game.borrow_mut().frame(&mut surface)
        })?);

        log::info!("Saber Duel running!");
        Ok(())
    }

    /// Stop both cycles and detach listeners; safe to call repeatedly
    pub fn stop(&mut self) {
        self.game.borrow_mut().stop();
        self.frame_task.take();
        self.gamepad_task.borrow_mut().take();
        self.listeners.clear();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

fn install_listeners(
    window: &Window,
    game: &SharedGame,
    gamepad_task: &Rc<RefCell<Option<AnimationTask>>>,
) -> Result<Vec<Listener>, PlatformError> {
    let mut listeners = Vec::with_capacity(3);

    // Keyboard
    {
        let game = game.clone();
        listeners.push(Listener::attach(window, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = Key::from_dom(&event.key());
            if key != Key::Other {
                // Keep arrows from scrolling the page
                event.prevent_default();
                game.borrow_mut().key_down(key);
            }
        })?);
    }

    // Gamepad connected
    {
        let game = game.clone();
        let gamepad_task = gamepad_task.clone();
        listeners.push(Listener::attach(window, "gamepadconnected", move |event| {
            let Some(index) = gamepad_index(&event) else {
                return;
            };
            if !game.borrow_mut().gamepad_connected(index) {
                return;
            }
            match spawn_gamepad_poll(&game, index) {
                Ok(task) => *gamepad_task.borrow_mut() = Some(task),
                Err(e) => log::error!("Gamepad polling unavailable: {}", e),
            }
        })?);
    }

    // Gamepad disconnected
    {
        let game = game.clone();
        let gamepad_task = gamepad_task.clone();
        listeners.push(Listener::attach(window, "gamepaddisconnected", move |event| {
            let Some(index) = gamepad_index(&event) else {
                return;
            };
            if game.borrow_mut().gamepad_disconnected(index) {
                gamepad_task.borrow_mut().take();
            }
        })?);
    }

    Ok(listeners)
}
