//! Canvas 2D drawing surface

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::{DrawSurface, Rect, TextStyle};
use crate::platform::PlatformError;

/// `DrawSurface` over a `<canvas>` 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up the canvas by element id and size it to the arena
    pub fn from_element_id(
        document: &Document,
        id: &str,
        size: Vec2,
    ) -> Result<Self, PlatformError> {
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| PlatformError::NoCanvas(id.to_string()))?
            .dyn_into()
            .map_err(|_| PlatformError::NoCanvas(id.to_string()))?;
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(PlatformError::from)?
            .ok_or(PlatformError::NoContext)?
            .dyn_into()
            .map_err(|_| PlatformError::NoContext)?;

        Ok(Self { ctx })
    }
}

impl DrawSurface for CanvasSurface {
    type Image = HtmlImageElement;

    fn clear(&mut self, size: Vec2) {
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        if let Err(e) = self.ctx.translate(offset.x as f64, offset.y as f64) {
            log::warn!("translate failed: {:?}", e);
        }
    }

    fn scale(&mut self, factor: Vec2) {
        if let Err(e) = self.ctx.scale(factor.x as f64, factor.y as f64) {
            log::warn!("scale failed: {:?}", e);
        }
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, dest: Rect) {
        let result = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            dest.origin.x as f64,
            dest.origin.y as f64,
            dest.size.x as f64,
            dest.size.y as f64,
        );
        if let Err(e) = result {
            log::warn!("draw_image failed: {:?}", e);
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) {
        self.ctx.set_font(style.font);
        self.ctx.set_fill_style_str(style.color);
        if let Err(e) = self.ctx.fill_text(text, at.x as f64, at.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}
