//! The render delegate: same public surface as [`crate::render::Grid`],
//! but every mutation is serialized and posted to one or more workers
//! instead of touching local state.
//!
//! Each worker owns one transferred `OffscreenCanvas` and the full grid
//! state, so any of them can repaint its canvas independently. The init
//! message is sent only once a worker posts `Ready`; until then setters
//! just update the snapshot the init will carry.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, Object, Reflect};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, MessageEvent, OffscreenCanvas, Worker};

use crate::error::{GridError, Result};
use crate::types::{
    ColumnConfig, GridEventKind, GridOptions, Listeners, RowClickEvent, SubscriptionId,
    SCROLL_SETTLE_DELAY_MS,
};
use crate::worker::protocol::{GridReply, GridRequest, InitPayload, INIT_KIND};
use crate::worker::rate::{RoundRobin, Throttle};

type HeightCallback = Box<dyn Fn(f64)>;

pub struct GridStub {
    state: Rc<RefCell<StubState>>,
    listeners: Rc<RefCell<Listeners>>,
    on_height_change: Rc<RefCell<Option<HeightCallback>>>,
    // Keeps the per-worker onmessage closures alive.
    _onmessage: Vec<Closure<dyn FnMut(MessageEvent)>>,
}

struct StubState {
    workers: Vec<Worker>,
    /// Offscreen handles awaiting transfer, one per worker.
    canvases: Vec<Option<OffscreenCanvas>>,
    ready: Vec<bool>,
    version: u64,
    throttle: Throttle,
    robin: RoundRobin,
    // Snapshot mirrored into every worker.
    rows: Value,
    columns: Vec<ColumnConfig>,
    options: GridOptions,
    query: Option<String>,
    scroll: (f64, f64),
    viewport: (f64, f64, f64),
    settle_timer: Option<i32>,
    settle_closure: Option<Closure<dyn FnMut()>>,
    viewport_timer: Option<i32>,
    viewport_closure: Option<Closure<dyn FnMut()>>,
}

impl StubState {
    fn next_version(&mut self) -> u64 {
        self.version += 1;
        self.version
    }

    /// Post a request to every initialized worker.
    fn broadcast(&self, request: &GridRequest) {
        let Ok(value) = serde_wasm_bindgen::to_value(request) else {
            return;
        };
        for (worker, ready) in self.workers.iter().zip(self.ready.iter()) {
            if *ready {
                worker.post_message(&value).ok();
            }
        }
    }

    fn post_to(&self, index: usize, request: &GridRequest) {
        let Ok(value) = serde_wasm_bindgen::to_value(request) else {
            return;
        };
        if let (Some(worker), Some(true)) = (self.workers.get(index), self.ready.get(index).copied())
        {
            worker.post_message(&value).ok();
        }
    }

    fn init_payload(&self) -> InitPayload {
        InitPayload {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            options: self.options.clone(),
            width: self.viewport.0,
            height: self.viewport.1,
            dpr: self.viewport.2,
        }
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now())
}

impl GridStub {
    /// Transfer each canvas offscreen and wire the ready/init handshake.
    /// Canvases and workers pair up one to one; a length mismatch fails,
    /// as does a canvas that cannot be transferred.
    pub fn new(
        canvases: Vec<HtmlCanvasElement>,
        workers: Vec<Worker>,
        options: GridOptions,
    ) -> Result<GridStub> {
        if canvases.len() != workers.len() {
            return Err(GridError::NoSurface);
        }
        let mut offscreens = Vec::with_capacity(canvases.len());
        for canvas in &canvases {
            let offscreen = canvas
                .transfer_control_to_offscreen()
                .map_err(|_| GridError::NoSurface)?;
            offscreens.push(Some(offscreen));
        }
        let worker_count = workers.len();
        let throttle = Throttle::new(options.scroll_framerate());
        let state = Rc::new(RefCell::new(StubState {
            workers,
            canvases: offscreens,
            ready: vec![false; worker_count],
            version: 0,
            throttle,
            robin: RoundRobin::new(),
            rows: Value::Array(Vec::new()),
            columns: Vec::new(),
            options,
            query: None,
            scroll: (0.0, 0.0),
            viewport: (0.0, 0.0, 1.0),
            settle_timer: None,
            settle_closure: None,
            viewport_timer: None,
            viewport_closure: None,
        }));
        let listeners = Rc::new(RefCell::new(Listeners::new()));
        let on_height_change: Rc<RefCell<Option<HeightCallback>>> = Rc::new(RefCell::new(None));

        let mut closures = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let weak_state = Rc::downgrade(&state);
            let weak_listeners = Rc::downgrade(&listeners);
            let weak_height = Rc::downgrade(&on_height_change);
            let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
                GridStub::handle_reply(
                    index,
                    event.data(),
                    &weak_state,
                    &weak_listeners,
                    &weak_height,
                );
            }) as Box<dyn FnMut(MessageEvent)>);
            if let Some(worker) = state.borrow().workers.get(index) {
                worker.set_onmessage(Some(closure.as_ref().unchecked_ref()));
            }
            closures.push(closure);
        }

        Ok(GridStub {
            state,
            listeners,
            on_height_change,
            _onmessage: closures,
        })
    }

    fn handle_reply(
        index: usize,
        data: JsValue,
        state: &Weak<RefCell<StubState>>,
        listeners: &Weak<RefCell<Listeners>>,
        on_height_change: &Weak<RefCell<Option<HeightCallback>>>,
    ) {
        let Ok(reply) = serde_wasm_bindgen::from_value::<GridReply>(data) else {
            return;
        };
        match reply {
            GridReply::Ready => {
                if let Some(state) = state.upgrade() {
                    GridStub::send_init(index, &state);
                }
            }
            // Every worker holds the full state, so state-derived
            // replies are deduplicated to the first worker.
            GridReply::HeightChanged { height } => {
                if index != 0 {
                    return;
                }
                if let Some(callback) = on_height_change.upgrade() {
                    if let Some(callback) = callback.borrow().as_ref() {
                        callback(height);
                    }
                }
            }
            GridReply::Event { event_kind, event } => {
                if index != 0 {
                    return;
                }
                if let Some(listeners) = listeners.upgrade() {
                    listeners.borrow().fire(event_kind, &event);
                }
            }
        }
    }

    fn send_init(index: usize, state: &Rc<RefCell<StubState>>) {
        let mut s = state.borrow_mut();
        let Some(canvas) = s.canvases.get_mut(index).and_then(|slot| slot.take()) else {
            return;
        };
        let payload = s.init_payload();
        let Ok(payload_value) = serde_wasm_bindgen::to_value(&payload) else {
            return;
        };
        let message = Object::new();
        Reflect::set(&message, &JsValue::from_str("kind"), &JsValue::from_str(INIT_KIND)).ok();
        Reflect::set(&message, &JsValue::from_str("canvas"), canvas.as_ref()).ok();
        Reflect::set(&message, &JsValue::from_str("payload"), &payload_value).ok();
        let transfer = Array::of1(canvas.as_ref());
        if let Some(worker) = s.workers.get(index) {
            if worker
                .post_message_with_transfer(&message, &transfer)
                .is_ok()
            {
                if let Some(ready) = s.ready.get_mut(index) {
                    *ready = true;
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Mirrored setters.

    pub fn set_data(&self, rows: Value) {
        let mut s = self.state.borrow_mut();
        s.rows = rows.clone();
        let version = s.next_version();
        s.broadcast(&GridRequest::SetData { version, rows });
    }

    pub fn set_columns(&self, columns: Vec<ColumnConfig>) {
        let mut s = self.state.borrow_mut();
        s.columns = columns.clone();
        let version = s.next_version();
        s.broadcast(&GridRequest::SetColumns { version, columns });
    }

    pub fn set_options(&self, options: GridOptions) {
        let mut s = self.state.borrow_mut();
        s.throttle.set_interval(options.scroll_framerate());
        s.options = options.clone();
        let version = s.next_version();
        s.broadcast(&GridRequest::SetOptions { version, options });
    }

    pub fn set_query(&self, query: Option<String>) {
        let mut s = self.state.borrow_mut();
        s.query = query.clone();
        let version = s.next_version();
        s.broadcast(&GridRequest::SetQuery { version, query });
    }

    /// Scroll propagation: a leading throttle keeps message volume
    /// bounded during continuous movement, alternating targets
    /// round-robin; a trailing settle broadcast guarantees the final
    /// resting position is rendered exactly.
    pub fn set_scroll(&self, left: f64, top: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.scroll = (left, top);
            if s.throttle.allow(now_ms()) {
                let version = s.next_version();
                let target = {
                    let len = s.workers.len();
                    s.robin.next(len)
                };
                s.post_to(target, &GridRequest::SetScroll { version, left, top });
            }
        }
        self.schedule_settle();
    }

    pub fn set_size(&self, width: f64, height: f64, dpr: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.viewport = (width, height, dpr);
        }
        self.schedule_viewport_flush();
    }

    // ------------------------------------------------------------------
    // Input dispatch. Clicks mutate selection state, so they broadcast:
    // every worker must stay in sync to repaint correctly.

    pub fn handle_click(&self, left: f64, top: f64, shift: bool) {
        let mut s = self.state.borrow_mut();
        let version = s.next_version();
        s.broadcast(&GridRequest::Click {
            version,
            left,
            top,
            shift,
        });
    }

    pub fn handle_context_menu(&self, left: f64, top: f64) {
        let mut s = self.state.borrow_mut();
        let version = s.next_version();
        s.broadcast(&GridRequest::ContextMenu { version, left, top });
    }

    // ------------------------------------------------------------------
    // Events re-emitted from the workers.

    pub fn subscribe(
        &self,
        kind: GridEventKind,
        callback: impl Fn(&RowClickEvent) + 'static,
    ) -> SubscriptionId {
        self.listeners.borrow_mut().subscribe(kind, callback)
    }

    pub fn unsubscribe(&self, kind: GridEventKind, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().unsubscribe(kind, id)
    }

    pub fn set_on_height_change(&self, callback: impl Fn(f64) + 'static) {
        *self.on_height_change.borrow_mut() = Some(Box::new(callback));
    }

    // ------------------------------------------------------------------

    #[allow(clippy::cast_possible_truncation)]
    fn schedule_settle(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = self.state.borrow_mut();
        if let Some(timer) = s.settle_timer.take() {
            window.clear_timeout_with_handle(timer);
        }
        if s.settle_closure.is_none() {
            let weak = Rc::downgrade(&self.state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    let mut s = state.borrow_mut();
                    s.settle_timer = None;
                    let (left, top) = s.scroll;
                    let version = s.next_version();
                    s.broadcast(&GridRequest::SetScroll { version, left, top });
                }
            }) as Box<dyn FnMut()>);
            s.settle_closure = Some(closure);
        }
        if let Some(closure) = s.settle_closure.as_ref() {
            s.settle_timer = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    SCROLL_SETTLE_DELAY_MS as i32,
                )
                .ok();
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn schedule_viewport_flush(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = self.state.borrow_mut();
        if let Some(timer) = s.viewport_timer.take() {
            window.clear_timeout_with_handle(timer);
        }
        if s.viewport_closure.is_none() {
            let weak = Rc::downgrade(&self.state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak.upgrade() {
                    let mut s = state.borrow_mut();
                    s.viewport_timer = None;
                    let (width, height, dpr) = s.viewport;
                    let version = s.next_version();
                    s.broadcast(&GridRequest::SetViewport {
                        version,
                        width,
                        height,
                        dpr,
                    });
                }
            }) as Box<dyn FnMut()>);
            s.viewport_closure = Some(closure);
        }
        if let Some(closure) = s.viewport_closure.as_ref() {
            s.viewport_timer = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    SCROLL_SETTLE_DELAY_MS as i32,
                )
                .ok();
        }
    }
}
