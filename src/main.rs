//! Saber Duel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use saber_duel::Settings;
    use saber_duel::assets::load_bundle;
    use saber_duel::platform::web::Session;

    thread_local! {
        static SESSION: RefCell<Option<Session>> = const { RefCell::new(None) };
    }

    /// Tear down the running session, if any
    pub fn stop() {
        let session = SESSION.with(|slot| slot.borrow_mut().take());
        if let Some(mut session) = session {
            session.stop();
            log::info!("Session torn down");
        }
    }

    /// Start a fresh session, replacing any running one
    ///
    /// The session is registered before its assets load, so `stop` reaches it
    /// while loading is still in flight.
    pub async fn start() {
        stop();

        let settings = Settings::load();
        settings.save();

        let session = match Session::open(settings) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Saber Duel failed to start: {}", e);
                return;
            }
        };
        let game = session.game().clone();
        let provider = session.provider();
        SESSION.with(|slot| *slot.borrow_mut() = Some(session));

        let result = load_bundle(provider.as_ref()).await;

        let failed = SESSION.with(|slot| {
            let mut slot = slot.borrow_mut();
            let session = slot.as_mut().filter(|s| Rc::ptr_eq(s.game(), &game))?;
            session.finish(result).err()
        });
        if let Some(e) = failed {
            log::error!("Saber Duel failed to start: {}", e);
            stop();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {}", e).into());
        }

        log::info!("Saber Duel starting...");
        start().await;
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Unmount hook for the host page
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_game() {
    wasm_game::stop();
}

/// Restart with fresh scores
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn restart_game() {
    wasm_game::start().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Saber Duel (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    // Headless attract mode: the AI closes in on an idle player
    println!("\nSimulating 300 idle frames...");
    attract_mode(300);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn attract_mode(frames: u32) {
    use saber_duel::sim::{GameEvent, GameState, TickInput, tick};

    let settings = saber_duel::Settings::load();
    let mut state = GameState::new(settings.scoring);
    let mut first_contact = None;

    for _ in 0..frames {
        if let Some(GameEvent::Scored(_)) = tick(&mut state, &TickInput::default()) {
            first_contact.get_or_insert(state.frame);
        }
    }

    match first_contact {
        Some(frame) => println!("First contact on frame {}", frame),
        None => println!("No contact"),
    }
    println!(
        "Player {} - AI {} (ai at {})",
        state.player_score, state.ai_score, state.ai_position
    );
}
