//! Rendering module
//!
//! The scene is drawn through [`DrawSurface`], a minimal 2D surface with a
//! transform stack, image blits and text. The browser implementation wraps a
//! `CanvasRenderingContext2d`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::render;

/// Axis-aligned rectangle in surface units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }
}

/// Font and fill for text labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// CSS font shorthand
    pub font: &'static str,
    /// CSS color
    pub color: &'static str,
}

/// Drawing surface collaborator
pub trait DrawSurface {
    type Image;

    /// Wipe the whole surface
    fn clear(&mut self, size: Vec2);
    /// Push the current transform and fill style
    fn save(&mut self);
    /// Pop back to the last saved transform and fill style
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn scale(&mut self, factor: Vec2);
    fn set_fill_style(&mut self, color: &str);
    /// Blit an image scaled into `dest` (in the current transform)
    fn draw_image(&mut self, image: &Self::Image, dest: Rect);
    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle);
}
