//! Worker-delegated rendering: the wire protocol, rate gating, the
//! delegate facade, the worker-side host, and the factory that picks
//! between the direct and delegated paths.

mod protocol;
mod rate;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod stub;

pub use protocol::{GridReply, GridRequest, InitPayload, INIT_KIND};
pub use rate::{RoundRobin, Throttle};

#[cfg(target_arch = "wasm32")]
pub use host::init_grid_worker;
#[cfg(target_arch = "wasm32")]
pub use stub::GridStub;

#[cfg(target_arch = "wasm32")]
pub use factory::{create_grid, GridHandle};

#[cfg(target_arch = "wasm32")]
mod factory {
    use js_sys::Reflect;
    use serde_json::Value;
    use wasm_bindgen::JsValue;
    use web_sys::{HtmlCanvasElement, Worker};

    use super::stub::GridStub;
    use crate::error::{GridError, Result};
    use crate::render::{Grid, GridSurface};
    use crate::types::{
        ColumnConfig, GridEventKind, GridOptions, RowClickEvent, SubscriptionId,
    };

    /// Direct or delegated grid, behind one surface.
    pub enum GridHandle {
        Direct(Box<Grid>),
        Delegated(GridStub),
    }

    fn offscreen_supported(canvas: &HtmlCanvasElement) -> bool {
        Reflect::has(canvas, &JsValue::from_str("transferControlToOffscreen")).unwrap_or(false)
    }

    /// Build a grid against the supplied canvases. With workers and
    /// offscreen-canvas support, rendering is delegated; otherwise it
    /// falls back to direct rendering on the first canvas. No canvases
    /// at all is the one loud construction failure.
    pub fn create_grid(
        canvases: Vec<HtmlCanvasElement>,
        workers: Vec<Worker>,
        options: GridOptions,
    ) -> Result<GridHandle> {
        let Some(first) = canvases.first() else {
            return Err(GridError::NoSurface);
        };
        if !workers.is_empty() {
            if offscreen_supported(first) {
                let stub = GridStub::new(canvases, workers, options)?;
                return Ok(GridHandle::Delegated(stub));
            }
            web_sys::console::warn_1(
                &"offscreen canvas unsupported, falling back to direct rendering".into(),
            );
        }
        let canvas = canvases.into_iter().next().ok_or(GridError::NoSurface)?;
        let grid = Grid::new(GridSurface::Html(canvas), options)?;
        Ok(GridHandle::Direct(Box::new(grid)))
    }

    impl GridHandle {
        pub fn set_data(&mut self, rows: Value) {
            match self {
                GridHandle::Direct(grid) => grid.set_data(rows),
                GridHandle::Delegated(stub) => stub.set_data(rows),
            }
        }

        pub fn set_columns(&mut self, columns: Vec<ColumnConfig>) {
            match self {
                GridHandle::Direct(grid) => grid.set_columns(columns),
                GridHandle::Delegated(stub) => stub.set_columns(columns),
            }
        }

        pub fn set_options(&mut self, options: GridOptions) {
            match self {
                GridHandle::Direct(grid) => grid.set_options(options),
                GridHandle::Delegated(stub) => stub.set_options(options),
            }
        }

        pub fn set_query(&mut self, query: Option<String>) {
            match self {
                GridHandle::Direct(grid) => grid.set_query(query),
                GridHandle::Delegated(stub) => stub.set_query(query),
            }
        }

        pub fn set_scroll(&mut self, left: f64, top: f64) {
            match self {
                GridHandle::Direct(grid) => grid.set_scroll(left, top),
                GridHandle::Delegated(stub) => stub.set_scroll(left, top),
            }
        }

        pub fn set_size(&mut self, width: f64, height: f64, dpr: f64) {
            match self {
                GridHandle::Direct(grid) => grid.set_size(width, height, dpr),
                GridHandle::Delegated(stub) => stub.set_size(width, height, dpr),
            }
        }

        pub fn handle_click(&mut self, left: f64, top: f64, shift: bool) {
            match self {
                GridHandle::Direct(grid) => grid.handle_click(left, top, shift),
                GridHandle::Delegated(stub) => stub.handle_click(left, top, shift),
            }
        }

        pub fn handle_context_menu(&mut self, left: f64, top: f64) {
            match self {
                GridHandle::Direct(grid) => grid.handle_context_menu(left, top),
                GridHandle::Delegated(stub) => stub.handle_context_menu(left, top),
            }
        }

        pub fn subscribe(
            &mut self,
            kind: GridEventKind,
            callback: impl Fn(&RowClickEvent) + 'static,
        ) -> SubscriptionId {
            match self {
                GridHandle::Direct(grid) => grid.subscribe(kind, callback),
                GridHandle::Delegated(stub) => stub.subscribe(kind, callback),
            }
        }

        pub fn unsubscribe(&mut self, kind: GridEventKind, id: SubscriptionId) -> bool {
            match self {
                GridHandle::Direct(grid) => grid.unsubscribe(kind, id),
                GridHandle::Delegated(stub) => stub.unsubscribe(kind, id),
            }
        }

        pub fn set_on_height_change(&mut self, callback: impl Fn(f64) + 'static) {
            match self {
                GridHandle::Direct(grid) => grid.set_on_height_change(callback),
                GridHandle::Delegated(stub) => stub.set_on_height_change(callback),
            }
        }

        /// Drag-reorder stays on the direct path: the delegated facade
        /// has no flattened rows to plan against.
        pub fn start_drag(&mut self, y: f64) {
            if let GridHandle::Direct(grid) = self {
                grid.start_drag(y);
            }
        }

        pub fn drag_to(&mut self, y: f64) {
            if let GridHandle::Direct(grid) = self {
                grid.drag_to(y);
            }
        }

        pub fn end_drag(&mut self) {
            if let GridHandle::Direct(grid) = self {
                grid.end_drag();
            }
        }
    }
}
