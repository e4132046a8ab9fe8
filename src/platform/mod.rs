//! Platform abstraction layer
//!
//! Handles the browser host for:
//! - Canvas lookup and image decoding
//! - Animation-frame scheduling with cancellation
//! - Keyboard and gamepad listeners

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

use crate::game_loop::LoopError;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no canvas element with id `{0}`")]
    NoCanvas(String),
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
    #[error(transparent)]
    Loop(#[from] LoopError),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PlatformError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        PlatformError::Js(format!("{:?}", value))
    }
}
