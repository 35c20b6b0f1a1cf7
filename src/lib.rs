//! gridview - virtualized canvas data grid for the web
//!
//! Renders large (10^4-10^5 row) flat or hierarchical datasets into a
//! Canvas 2D surface via WebAssembly, painting only the visible window:
//! - Tree data and field grouping with expand/collapse
//! - Multi-column sort and free-text filtering through pluggable formatters
//! - Identity-based selection, pinned columns, drag row reordering
//! - Optional worker-delegated rendering over transferred offscreen canvases
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'gridview';
//! await init();
//! const grid = new GridView(canvas, devicePixelRatio);
//! grid.set_columns(columns);
//! grid.set_data(rows);
//! ```

pub mod data;
pub mod error;
pub mod formatter;
pub mod layout;
pub mod render;
pub mod types;
pub mod worker;

use wasm_bindgen::prelude::*;

pub use data::GridCore;
pub use error::{GridError, Result};
pub use render::{Grid, GridSurface};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use worker::{create_grid, GridHandle};
#[cfg(target_arch = "wasm32")]
pub use worker::init_grid_worker;

/// Crate version, handy for cache-busting worker scripts.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// JS-facing wrapper around the direct/delegated grid.
#[cfg(target_arch = "wasm32")]
mod view {
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, Worker};

    use crate::types::{ColumnConfig, GridEventKind, GridOptions, SubscriptionId};
    use crate::worker::{create_grid, GridHandle};

    #[wasm_bindgen]
    pub struct GridView {
        handle: GridHandle,
        subscriptions: Vec<(GridEventKind, SubscriptionId)>,
    }

    #[wasm_bindgen]
    impl GridView {
        /// Direct single-canvas grid.
        #[wasm_bindgen(constructor)]
        pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<GridView, JsValue> {
            console_error_panic_hook::set_once();
            let mut handle = create_grid(vec![canvas], Vec::new(), GridOptions::default())?;
            handle.set_size(0.0, 0.0, dpr);
            Ok(GridView {
                handle,
                subscriptions: Vec::new(),
            })
        }

        /// Worker-delegated grid, one worker per canvas. Falls back to
        /// direct rendering when offscreen canvases are unsupported.
        pub fn with_workers(
            canvases: Vec<HtmlCanvasElement>,
            workers: Vec<Worker>,
        ) -> Result<GridView, JsValue> {
            console_error_panic_hook::set_once();
            let handle = create_grid(canvases, workers, GridOptions::default())?;
            Ok(GridView {
                handle,
                subscriptions: Vec::new(),
            })
        }

        pub fn set_data(&mut self, rows: JsValue) -> Result<(), JsValue> {
            let rows: serde_json::Value = serde_wasm_bindgen::from_value(rows)?;
            self.handle.set_data(rows);
            Ok(())
        }

        pub fn set_columns(&mut self, columns: JsValue) -> Result<(), JsValue> {
            let columns: Vec<ColumnConfig> = serde_wasm_bindgen::from_value(columns)?;
            self.handle.set_columns(columns);
            Ok(())
        }

        pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
            let options: GridOptions = serde_wasm_bindgen::from_value(options)?;
            self.handle.set_options(options);
            Ok(())
        }

        pub fn set_query(&mut self, query: Option<String>) {
            self.handle.set_query(query);
        }

        pub fn set_scroll(&mut self, left: f64, top: f64) {
            self.handle.set_scroll(left, top);
        }

        pub fn set_size(&mut self, width: f64, height: f64, dpr: f64) {
            self.handle.set_size(width, height, dpr);
        }

        pub fn click(&mut self, x: f64, y: f64, shift: bool) {
            self.handle.handle_click(x, y, shift);
        }

        pub fn context_menu(&mut self, x: f64, y: f64) {
            self.handle.handle_context_menu(x, y);
        }

        pub fn start_drag(&mut self, y: f64) {
            self.handle.start_drag(y);
        }

        pub fn drag_to(&mut self, y: f64) {
            self.handle.drag_to(y);
        }

        pub fn end_drag(&mut self) {
            self.handle.end_drag();
        }

        /// Subscribe a JS callback to row clicks. The callback receives
        /// the event as a plain object.
        pub fn on_row_click(&mut self, callback: js_sys::Function) {
            self.subscribe_js(GridEventKind::RowClick, callback);
        }

        pub fn on_row_context_menu(&mut self, callback: js_sys::Function) {
            self.subscribe_js(GridEventKind::RowContextMenu, callback);
        }

        pub fn on_height_change(&mut self, callback: js_sys::Function) {
            self.handle.set_on_height_change(move |height| {
                callback
                    .call1(&JsValue::NULL, &JsValue::from_f64(height))
                    .ok();
            });
        }

        /// Drop every subscription made through this wrapper.
        pub fn clear_listeners(&mut self) {
            for (kind, id) in self.subscriptions.drain(..) {
                self.handle.unsubscribe(kind, id);
            }
        }

        fn subscribe_js(&mut self, kind: GridEventKind, callback: js_sys::Function) {
            let id = self.handle.subscribe(kind, move |event| {
                if let Ok(value) = serde_wasm_bindgen::to_value(event) {
                    callback.call1(&JsValue::NULL, &value).ok();
                }
            });
            self.subscriptions.push((kind, id));
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use view::GridView;
