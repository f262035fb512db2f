use std::cell::RefCell;
use std::rc::Rc;

use traverse_core::{Point, Segment, Viewport};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::models::Registration;
use crate::scheduler::RepaintScheduler;

/// Application state behind an `Rc<RefCell<_>>` so it can be shared across
/// the WASM event callbacks.
///
/// `segments` is the single source of truth; the point list, closure, area
/// and perimeter are derived from it on every paint. The viewport is only
/// mutated through its own operations, the renderer reads it as a value.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub segments: Vec<Segment>,
    pub registration: Registration,
    pub viewport: Viewport,
    pub show_labels: bool,
    pub dragging: bool,
    /// Mouse position of the last drag event, canvas pixels.
    pub drag_last: (f64, f64),
    /// Segment count at the previous change; a differing count refits the
    /// view, an equal one only repaints.
    pub last_segment_count: usize,
    pub scheduler: Rc<RepaintScheduler>,
}

impl State {
    pub fn points(&self) -> Vec<Point> {
        traverse_core::compute_points(&self.segments)
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
