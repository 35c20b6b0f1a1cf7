//! Structured error types for gridview.
//!
//! Construction failures are the only errors surfaced to the caller; every
//! other failure class (missing formatter, unsupported offscreen transfer,
//! failed worker post) degrades locally without reporting.

/// All errors that can occur while constructing a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// No drawing surface was supplied at grid creation, or a supplied
    /// canvas could not be paired with a worker. Fatal: the grid cannot
    /// render at all.
    #[error("no drawing surface supplied")]
    NoSurface,

    /// A canvas exists but a 2d context could not be obtained from it.
    #[error("canvas context unavailable: {0}")]
    Context(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
