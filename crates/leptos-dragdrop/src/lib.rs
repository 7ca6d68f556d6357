//! Leptos DragDrop Utilities
//!
//! HTML5 drag-and-drop for Leptos lists. Items carry a `data-drag-id`
//! attribute; zones get the dragover/enter/leave/drop handlers. The state
//! machine itself lives in [`session`] and has no DOM dependency.

pub mod session;

use std::fmt::Display;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::DragEvent;

pub use session::{
    insertion_index, BoxSize, DragController, DragError, DragPhase, DragSession, DropResult,
    Placeholder, SiblingBox,
};

/// Attribute that marks an element as a draggable item inside a zone
pub const DRAG_ID_ATTR: &str = "data-drag-id";

/// Grace window between `dragend` and treating the drag as cancelled
pub const DEFAULT_GRACE_MS: u32 = 100;

/// Length of the drop transition
pub const DEFAULT_SETTLE_MS: u32 = 400;

/// Shared drag state plus timings. Copy, so handlers can capture it freely.
pub struct DragContext<Id: 'static, Zone: 'static> {
    pub state: RwSignal<DragController<Id, Zone>>,
    pub grace_ms: u32,
    pub settle_ms: u32,
}

impl<Id: 'static, Zone: 'static> Clone for DragContext<Id, Zone> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id: 'static, Zone: 'static> Copy for DragContext<Id, Zone> {}

impl<Id, Zone> DragContext<Id, Zone>
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(grace_ms: u32, settle_ms: u32) -> Self {
        Self {
            state: RwSignal::new(DragController::new()),
            grace_ms,
            settle_ms,
        }
    }

    /// Tracked read of the controller
    pub fn with<U>(&self, f: impl FnOnce(&DragController<Id, Zone>) -> U) -> U {
        self.state.with(f)
    }

    pub fn is_dragging_untracked(&self) -> bool {
        self.state.with_untracked(|c| c.is_dragging())
    }
}

fn measure(el: &web_sys::Element) -> BoxSize {
    let rect = el.get_bounding_client_rect();
    BoxSize {
        width: rect.width(),
        height: rect.height(),
    }
}

/// Boxes of every `[data-drag-id]` element under the zone, in DOM order
fn siblings_in<Id: From<String>>(zone: &web_sys::Element) -> Vec<SiblingBox<Id>> {
    let mut siblings = Vec::new();
    let Ok(nodes) = zone.query_selector_all(&format!("[{}]", DRAG_ID_ATTR)) else {
        return siblings;
    };
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let Some(id) = el.get_attribute(DRAG_ID_ATTR) else {
            continue;
        };
        let rect = el.get_bounding_client_rect();
        siblings.push(SiblingBox {
            id: Id::from(id),
            top: rect.top(),
            height: rect.height(),
        });
    }
    siblings
}

fn current_element(ev: &DragEvent) -> Option<web_sys::Element> {
    ev.current_target().and_then(|t| t.dyn_into::<web_sys::Element>().ok())
}

/// Run `f` on the next animation frame
fn next_frame(f: impl FnOnce() + 'static) {
    let Some(win) = web_sys::window() else {
        return;
    };
    let cb = Closure::once_into_js(f);
    if win.request_animation_frame(cb.unchecked_ref()).is_err() {
        tracing::warn!("[DND] requestAnimationFrame failed");
    }
}

/// dragstart for an item. `origin` is read at event time and returns the
/// item's zone and its index there.
///
/// The source is dimmed and the placeholder shown one frame later, leaving
/// the browser a chance to snapshot the drag image. A start while another
/// drag or drop transition is in progress is refused.
pub fn make_on_dragstart<Id, Zone>(
    ctx: DragContext<Id, Zone>,
    item: Id,
    origin: impl Fn() -> (Zone, usize) + Clone + 'static,
) -> impl Fn(DragEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Display + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: DragEvent| {
        let (zone, origin_index) = origin();
        let size = current_element(&ev).map(|el| measure(&el)).unwrap_or_default();

        let mut started = Ok(());
        ctx.state.update(|c| {
            started = c.start(item.clone(), zone, origin_index, size).map(|_| ());
        });
        if let Err(e) = started {
            tracing::debug!("[DND] refused drag of {}: {}", item, e);
            ev.prevent_default();
            return;
        }

        if let Some(dt) = ev.data_transfer() {
            dt.set_effect_allowed("move");
            let _ = dt.set_data("text/plain", &item.to_string());
        }
        tracing::debug!("[DND] drag start {} at {}", item, origin_index);
        next_frame(move || {
            ctx.state.update(|c| {
                c.reveal();
            });
        });
    }
}

/// dragover for a zone: accepts the drop and moves the placeholder
pub fn make_on_dragover<Id, Zone>(
    ctx: DragContext<Id, Zone>,
    zone: Zone,
) -> impl Fn(DragEvent) + Clone + 'static
where
    Id: Clone + PartialEq + From<String> + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: DragEvent| {
        if !ctx.is_dragging_untracked() {
            return;
        }
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        let Some(el) = current_element(&ev) else {
            return;
        };

        let siblings = siblings_in::<Id>(&el);
        let pointer_y = f64::from(ev.client_y());
        let (next, over) = ctx.state.with_untracked(|c| {
            (c.next_placeholder(&zone, pointer_y, &siblings), c.is_over(&zone))
        });
        // Only touch the signal when something visible changes
        if next.is_some() || !over {
            ctx.state.update(|c| {
                c.enter_zone(zone.clone());
                if let Some(placeholder) = next {
                    c.move_placeholder(placeholder);
                }
            });
        }
    }
}

/// dragenter for a zone: turns on its drag-over indicator
pub fn make_on_dragenter<Id, Zone>(
    ctx: DragContext<Id, Zone>,
    zone: Zone,
) -> impl Fn(DragEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: DragEvent| {
        if !ctx.is_dragging_untracked() {
            return;
        }
        ev.prevent_default();
        if !ctx.state.with_untracked(|c| c.is_over(&zone)) {
            ctx.state.update(|c| c.enter_zone(zone.clone()));
        }
    }
}

/// dragleave for a zone. Moving onto a child element is not leaving.
pub fn make_on_dragleave<Id, Zone>(
    ctx: DragContext<Id, Zone>,
    zone: Zone,
) -> impl Fn(DragEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
{
    move |ev: DragEvent| {
        let zone_node = ev.current_target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
        let related = ev.related_target().and_then(|t| t.dyn_into::<web_sys::Node>().ok());
        if let (Some(zone_node), Some(related)) = (zone_node, related) {
            if zone_node.contains(Some(&related)) {
                return;
            }
        }
        if ctx.state.with_untracked(|c| c.is_over(&zone)) {
            ctx.state.update(|c| c.leave_zone(&zone));
        }
    }
}

/// drop for a zone. The drop transition ends after `settle_ms`.
pub fn make_on_drop<Id, Zone, F>(
    ctx: DragContext<Id, Zone>,
    zone: Zone,
    on_drop: F,
) -> impl Fn(DragEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(DropResult<Id, Zone>) + Clone + 'static,
{
    move |ev: DragEvent| {
        ev.prevent_default();
        let mut result = None;
        ctx.state.update(|c| result = c.drop(zone.clone()).ok());
        let Some(result) = result else {
            return;
        };

        if !result.noop {
            Timeout::new(ctx.settle_ms, move || {
                ctx.state.update(|c| {
                    c.settle();
                });
            })
            .forget();
        }
        on_drop(result);
    }
}

/// Cancel the drag in progress, if any
pub fn cancel_drag<Id, Zone>(
    ctx: DragContext<Id, Zone>,
    on_cancel: &impl Fn(DragSession<Id, Zone>),
) -> bool
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
{
    if !ctx.is_dragging_untracked() {
        return false;
    }
    let mut session = None;
    ctx.state.update(|c| session = c.cancel());
    match session {
        Some(session) => {
            tracing::debug!("[DND] drag cancelled");
            on_cancel(session);
            true
        }
        None => false,
    }
}

/// dragend for an item. A drop normally lands first; if none did within
/// the grace window the drag counts as cancelled.
pub fn make_on_dragend<Id, Zone, F>(
    ctx: DragContext<Id, Zone>,
    on_cancel: F,
) -> impl Fn(DragEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(DragSession<Id, Zone>) + Clone + 'static,
{
    move |_ev: DragEvent| {
        let on_cancel = on_cancel.clone();
        Timeout::new(ctx.grace_ms, move || {
            cancel_drag(ctx, &on_cancel);
        })
        .forget();
    }
}

/// Escape anywhere on the page cancels the drag
pub fn bind_global_keydown<Id, Zone, F>(ctx: DragContext<Id, Zone>, on_cancel: F)
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    Zone: Clone + PartialEq + Send + Sync + 'static,
    F: Fn(DragSession<Id, Zone>) + 'static,
{
    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(
        move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Escape" {
                cancel_drag(ctx, &on_cancel);
            }
        },
    );

    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    }
    on_keydown.forget();
}
