//! Worker-side entry point.
//!
//! Runs inside a dedicated worker: receives the init handshake and the
//! request stream, drives a full [`Grid`] against the transferred
//! `OffscreenCanvas`, and posts height changes and user events back.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{DedicatedWorkerGlobalScope, MessageEvent, OffscreenCanvas};

use crate::render::{Grid, GridSurface};
use crate::types::GridEventKind;
use crate::worker::protocol::{GridReply, GridRequest, InitPayload, INIT_KIND};

struct HostState {
    grid: Option<Grid>,
    last_version: u64,
}

/// Install the message handler and announce readiness. Called once from
/// the worker script after the wasm module loads.
#[wasm_bindgen]
pub fn init_grid_worker() {
    console_error_panic_hook::set_once();
    let Ok(scope) = js_sys::global().dyn_into::<DedicatedWorkerGlobalScope>() else {
        return;
    };
    let state = Rc::new(RefCell::new(HostState {
        grid: None,
        last_version: 0,
    }));
    let handler_scope = scope.clone();
    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        handle_message(&handler_scope, &state, event.data());
    }) as Box<dyn FnMut(MessageEvent)>);
    scope.set_onmessage(Some(closure.as_ref().unchecked_ref()));
    // The handler lives for the worker's whole lifetime.
    closure.forget();
    post_reply(&scope, &GridReply::Ready);
}

fn post_reply(scope: &DedicatedWorkerGlobalScope, reply: &GridReply) {
    if let Ok(value) = serde_wasm_bindgen::to_value(reply) {
        scope.post_message(&value).ok();
    }
}

fn handle_message(
    scope: &DedicatedWorkerGlobalScope,
    state: &Rc<RefCell<HostState>>,
    data: JsValue,
) {
    let kind = Reflect::get(&data, &JsValue::from_str("kind"))
        .ok()
        .and_then(|v| v.as_string());
    if kind.as_deref() == Some(INIT_KIND) {
        handle_init(scope, state, &data);
        return;
    }
    let Ok(request) = serde_wasm_bindgen::from_value::<GridRequest>(data) else {
        return;
    };
    let mut s = state.borrow_mut();
    // Drop anything older than what has already been applied.
    if request.version() < s.last_version {
        return;
    }
    s.last_version = request.version();
    let Some(grid) = s.grid.as_mut() else {
        return;
    };
    match request {
        GridRequest::SetData { rows, .. } => grid.set_data(rows),
        GridRequest::SetColumns { columns, .. } => grid.set_columns(columns),
        GridRequest::SetOptions { options, .. } => grid.set_options(options),
        GridRequest::SetQuery { query, .. } => grid.set_query(query),
        GridRequest::SetScroll { left, top, .. } => grid.set_scroll(left, top),
        GridRequest::SetViewport {
            width, height, dpr, ..
        } => grid.set_size(width, height, dpr),
        GridRequest::Click {
            left, top, shift, ..
        } => grid.handle_click(left, top, shift),
        GridRequest::ContextMenu { left, top, .. } => grid.handle_context_menu(left, top),
        GridRequest::Redraw { .. } => grid.redraw(),
    }
}

fn handle_init(
    scope: &DedicatedWorkerGlobalScope,
    state: &Rc<RefCell<HostState>>,
    data: &JsValue,
) {
    let Ok(canvas_value) = Reflect::get(data, &JsValue::from_str("canvas")) else {
        return;
    };
    let Ok(canvas) = canvas_value.dyn_into::<OffscreenCanvas>() else {
        return;
    };
    let payload: InitPayload = Reflect::get(data, &JsValue::from_str("payload"))
        .ok()
        .and_then(|value| serde_wasm_bindgen::from_value(value).ok())
        .unwrap_or_default();

    let Ok(mut grid) = Grid::new(GridSurface::Offscreen(canvas), payload.options) else {
        return;
    };
    let height_scope = scope.clone();
    grid.set_on_height_change(move |height| {
        post_reply(&height_scope, &GridReply::HeightChanged { height });
    });
    for kind in [GridEventKind::RowClick, GridEventKind::RowContextMenu] {
        let event_scope = scope.clone();
        grid.subscribe(kind, move |event| {
            post_reply(
                &event_scope,
                &GridReply::Event {
                    event_kind: kind,
                    event: event.clone(),
                },
            );
        });
    }

    // Apply the snapshot as one visible frame.
    grid.set_block_redraw(true);
    if payload.width > 0.0 && payload.height > 0.0 {
        grid.set_size(payload.width, payload.height, payload.dpr);
    }
    grid.set_columns(payload.columns);
    grid.set_data(payload.rows);
    grid.set_block_redraw(false);

    state.borrow_mut().grid = Some(grid);
}
