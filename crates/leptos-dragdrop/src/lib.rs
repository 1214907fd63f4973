//! Leptos DragDrop Utilities
//!
//! Pointer-driven drag-and-drop for Leptos using mouse events.
//! Uses a movement threshold to distinguish click from drag. While dragging,
//! every pointer move measures the droppables currently in the document and
//! hands a [`PointerFrame`] to the consumer's [`DragHandler`], which decides
//! what the dragged element is over.
//!
//! Droppable elements are discovered by attribute:
//! `data-dnd-kind="<kind>" data-dnd-id="<id>"`.

mod collision;
mod geometry;

pub use collision::{closest_center, pointer_within, rect_intersection, Collision, GeometrySource};
pub use geometry::{Point, Rect};

use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Attribute selector matching every droppable element
pub const DROPPABLE_SELECTOR: &str = "[data-dnd-id]";

/// Identity of a droppable element, read from its data attributes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DroppableKey {
    pub kind: String,
    pub id: String,
}

impl DroppableKey {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self { kind: kind.into(), id: id.into() }
    }
}

/// Anything that can be picked up must know which droppable it is
pub trait Draggable {
    fn droppable_key(&self) -> DroppableKey;
}

/// One measured droppable
#[derive(Clone, Debug, PartialEq)]
pub struct DroppableRect {
    pub key: DroppableKey,
    pub rect: Rect,
    /// Set for the element being dragged: where it would be if it followed the pointer
    pub translated: Option<Rect>,
}

/// Geometry captured for a single pointer move
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerFrame {
    pub pointer: Option<Point>,
    pub active_rect: Option<Rect>,
    pub droppables: Vec<DroppableRect>,
}

impl PointerFrame {
    pub fn find(&self, key: &DroppableKey) -> Option<&DroppableRect> {
        self.droppables.iter().find(|d| &d.key == key)
    }
}

impl GeometrySource for PointerFrame {
    type Id = DroppableKey;

    fn droppable_ids(&self) -> Vec<DroppableKey> {
        self.droppables.iter().map(|d| d.key.clone()).collect()
    }

    fn rect(&self, id: &DroppableKey) -> Option<Rect> {
        self.find(id).map(|d| d.rect)
    }

    fn translated_rect(&self, id: &DroppableKey) -> Option<Rect> {
        self.find(id).and_then(|d| d.translated)
    }

    fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    fn active_rect(&self) -> Option<Rect> {
        self.active_rect
    }
}

/// Consumer callbacks for a drag lifecycle
pub trait DragHandler<T> {
    /// Pointer moved past the threshold with `active` pressed
    fn on_start(&self, active: &T);
    /// Pointer moved while dragging; returns the droppable now hovered
    fn on_move(&self, active: &T, frame: &PointerFrame) -> Option<DroppableKey>;
    /// Pointer released; `over` is the last hovered droppable
    fn on_end(&self, active: &T, over: Option<DroppableKey>);
    /// Escape pressed while dragging
    fn on_cancel(&self, active: &T);
}

/// DnD state signals
pub struct DndSignals<T: Send + Sync + 'static> {
    /// Pressed but not yet dragging
    pub pending: RwSignal<Option<T>>,
    pub active: RwSignal<Option<T>>,
    pub over: RwSignal<Option<DroppableKey>>,
    /// Pointer position at mousedown
    pub origin: RwSignal<Point>,
    pub pointer: RwSignal<Option<Point>>,
    /// Rectangle of the pressed element at mousedown
    pub pressed_rect: RwSignal<Option<Rect>>,
    /// True for a short moment after a real drag, so the trailing click can be ignored
    pub drag_just_ended: RwSignal<bool>,
}

impl<T: Send + Sync + 'static> Clone for DndSignals<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for DndSignals<T> {}

pub fn create_dnd_signals<T: Send + Sync + 'static>() -> DndSignals<T> {
    DndSignals {
        pending: RwSignal::new(None),
        active: RwSignal::new(None),
        over: RwSignal::new(None),
        origin: RwSignal::new(Point::default()),
        pointer: RwSignal::new(None),
        pressed_rect: RwSignal::new(None),
        drag_just_ended: RwSignal::new(false),
    }
}

/// Has the pointer travelled far enough from `origin` to count as a drag?
pub fn exceeds_threshold(origin: Point, pointer: Point) -> bool {
    (pointer.x - origin.x).abs() > DRAG_THRESHOLD_PX || (pointer.y - origin.y).abs() > DRAG_THRESHOLD_PX
}

/// End drag operation
pub fn end_drag<T: Send + Sync + 'static>(dnd: &DndSignals<T>) {
    let was_dragging = dnd.active.with_untracked(|a| a.is_some());
    dnd.active.set(None);
    dnd.pending.set(None);
    dnd.over.set(None);
    dnd.pointer.set(None);
    dnd.pressed_rect.set(None);

    if was_dragging {
        dnd.drag_just_ended.set(true);
        let clear = dnd.drag_just_ended;
        gloo_timers::callback::Timeout::new(100, move || clear.set(false)).forget();
    }
}

fn is_interactive(target: &web_sys::EventTarget) -> bool {
    target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
        || target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some()
}

fn event_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(ev.client_x() as f64, ev.client_y() as f64)
}

/// Create mousedown handler for draggable elements
/// Records pending drag with start position and the element's rectangle
pub fn make_on_mousedown<T>(dnd: DndSignals<T>, payload: T) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    T: Clone + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if ev.target().is_some_and(|t| is_interactive(&t)) {
            return;
        }
        let rect = ev
            .current_target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .map(|el| Rect::from_dom(&el.get_bounding_client_rect()));
        dnd.pending.set(Some(payload.clone()));
        dnd.origin.set(event_point(&ev));
        dnd.pressed_rect.set(rect);
    }
}

/// Measure every droppable in the document
fn measure_droppables(active_key: &DroppableKey, active_rect: Option<Rect>) -> Vec<DroppableRect> {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return Vec::new();
    };
    let Ok(nodes) = doc.query_selector_all(DROPPABLE_SELECTOR) else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let (Some(kind), Some(id)) = (el.get_attribute("data-dnd-kind"), el.get_attribute("data-dnd-id")) else {
            continue;
        };
        let key = DroppableKey { kind, id };
        let translated = if &key == active_key { active_rect } else { None };
        out.push(DroppableRect {
            key,
            rect: Rect::from_dom(&el.get_bounding_client_rect()),
            translated,
        });
    }
    out
}

fn capture_frame<T>(dnd: &DndSignals<T>, active: &T, pointer: Point) -> PointerFrame
where
    T: Draggable + Send + Sync + 'static,
{
    let origin = dnd.origin.get_untracked();
    let active_rect = dnd.pressed_rect.get_untracked().map(|r| r.translated(origin, pointer));
    PointerFrame {
        pointer: Some(pointer),
        active_rect,
        droppables: measure_droppables(&active.droppable_key(), active_rect),
    }
}

fn add_document_listener<E>(event: &str, callback: Closure<dyn FnMut(E)>)
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
{
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        if doc.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()).is_err() {
            tracing::warn!(event, "failed to bind document listener");
        }
    }
    callback.forget();
}

/// Bind document-level mousemove / mouseup / keydown handlers that drive
/// the drag lifecycle and report it to `handler`.
pub fn bind_global_listeners<T, H>(dnd: DndSignals<T>, handler: H)
where
    T: Draggable + Clone + Send + Sync + 'static,
    H: DragHandler<T> + 'static,
{
    let handler = Rc::new(handler);

    let move_handler = Rc::clone(&handler);
    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let point = event_point(&ev);

        if dnd.active.with_untracked(|a| a.is_none()) {
            let Some(pending) = dnd.pending.get_untracked() else {
                return;
            };
            if !exceeds_threshold(dnd.origin.get_untracked(), point) {
                return;
            }
            dnd.active.set(Some(pending.clone()));
            move_handler.on_start(&pending);
        }

        dnd.pointer.set(Some(point));
        if let Some(active) = dnd.active.get_untracked() {
            let frame = capture_frame(&dnd, &active, point);
            let over = move_handler.on_move(&active, &frame);
            if dnd.over.with_untracked(|current| current != &over) {
                dnd.over.set(over);
            }
        }
    });
    add_document_listener("mousemove", on_mousemove);

    let up_handler = Rc::clone(&handler);
    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        // Not dragging means this was a click; it fires naturally on the element
        if let Some(active) = dnd.active.get_untracked() {
            up_handler.on_end(&active, dnd.over.get_untracked());
        }
        end_drag(&dnd);
    });
    add_document_listener("mouseup", on_mouseup);

    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Escape" {
            return;
        }
        if let Some(active) = dnd.active.get_untracked() {
            ev.prevent_default();
            handler.on_cancel(&active);
        }
        end_drag(&dnd);
    });
    add_document_listener("keydown", on_keydown);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        let origin = Point::new(100.0, 100.0);
        assert!(!exceeds_threshold(origin, Point::new(104.0, 96.0)));
        assert!(!exceeds_threshold(origin, Point::new(105.0, 105.0)));
        assert!(exceeds_threshold(origin, Point::new(106.0, 100.0)));
        assert!(exceeds_threshold(origin, Point::new(100.0, 94.0)));
    }

    #[test]
    fn test_frame_prefers_translated_rect_of_active() {
        let key = DroppableKey::new("task", "t1");
        let frame = PointerFrame {
            pointer: Some(Point::new(10.0, 10.0)),
            active_rect: Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
            droppables: vec![DroppableRect {
                key: key.clone(),
                rect: Rect::new(100.0, 100.0, 20.0, 20.0),
                translated: Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
            }],
        };
        assert_eq!(frame.rect(&key), Some(Rect::new(100.0, 100.0, 20.0, 20.0)));
        assert_eq!(frame.translated_rect(&key), Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
        assert_eq!(frame.translated_rect(&DroppableKey::new("column", "x")), None);
    }
}
