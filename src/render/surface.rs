//! Drawing surface abstraction.
//!
//! The same engine paints either a DOM canvas (direct path) or an
//! `OffscreenCanvas` transferred into a worker (delegated path). Both
//! expose the same 2d API surface; the offscreen context is cast
//! unchecked because wasm-bindgen types the two contexts separately
//! while every call used here exists identically on both.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, OffscreenCanvas};

use crate::error::{GridError, Result};

pub enum GridSurface {
    Html(HtmlCanvasElement),
    Offscreen(OffscreenCanvas),
}

impl GridSurface {
    pub fn context_2d(&self) -> Result<CanvasRenderingContext2d> {
        match self {
            GridSurface::Html(canvas) => canvas
                .get_context("2d")
                .map_err(|_| GridError::Context("failed to get 2d context".into()))?
                .ok_or_else(|| GridError::Context("no 2d context available".into()))?
                .dyn_into::<CanvasRenderingContext2d>()
                .map_err(|_| GridError::Context("not a CanvasRenderingContext2d".into())),
            GridSurface::Offscreen(canvas) => {
                let ctx = canvas
                    .get_context("2d")
                    .map_err(|_| GridError::Context("failed to get 2d context".into()))?
                    .ok_or_else(|| GridError::Context("no 2d context available".into()))?;
                Ok(ctx.unchecked_into::<CanvasRenderingContext2d>())
            }
        }
    }

    /// Resize the backing store, in physical pixels.
    pub fn set_size(&self, width: u32, height: u32) {
        match self {
            GridSurface::Html(canvas) => {
                canvas.set_width(width);
                canvas.set_height(height);
            }
            GridSurface::Offscreen(canvas) => {
                canvas.set_width(width);
                canvas.set_height(height);
            }
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            GridSurface::Html(canvas) => canvas.width(),
            GridSurface::Offscreen(canvas) => canvas.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            GridSurface::Html(canvas) => canvas.height(),
            GridSurface::Offscreen(canvas) => canvas.height(),
        }
    }
}
