//! Canvas rendering: the drawing surface abstraction and the render
//! engine that paints the visible window of the flattened rows.

mod engine;
mod surface;

pub use engine::Grid;
pub use surface::GridSurface;
