//! Browser front end for the traverse editor.
//!
//! Owns the canvas, the pointer/wheel interactions and the exported JS API
//! the sidebar form calls into. All geometry lives in `traverse-core`,
//! KML export in `kml-core`; this crate wires them to the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use traverse_core::{Point, Segment, area_m2, is_closed, perimeter};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement,
    MouseEvent, WheelEvent,
};

mod constants;
mod editor;
mod export;
mod models;
mod render;
mod scheduler;
mod state;
mod upload;
mod utils;

use models::{LandRecord, SaveSummary};
use scheduler::RepaintScheduler;
use state::{STATE, State};
use utils::{asset_url, event_canvas_coords, fetch_text, get_query_param, log, sync_canvas_size};

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;
    let scheduler = RepaintScheduler::new(window.clone());

    let state = Rc::new(RefCell::new(State {
        window: window.clone(),
        document,
        canvas,
        ctx,
        segments: vec![Segment::new(editor::new_segment_id())],
        registration: Default::default(),
        viewport: Default::default(),
        show_labels: true,
        dragging: false,
        drag_last: (0.0, 0.0),
        last_segment_count: 1,
        scheduler,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    attach_ui(state.clone())?;
    upload::attach_file_input(state.clone())?;
    export::attach_export(state.clone())?;

    // A `?land=<name>` query seeds the editor from a served record.
    if let Ok(search) = window.location().search()
        && let Some(name) = get_query_param(&search, "land")
    {
        let win = window.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let path = format!("lands/{name}.json");
            match fetch_text(&win, &[&asset_url(&path), &path]).await {
                Some(text) => match serde_json::from_str::<LandRecord>(&text) {
                    Ok(record) => {
                        STATE.with(|st| {
                            if let Some(rc) = st.borrow().as_ref() {
                                let mut s = rc.borrow_mut();
                                editor::seed(&mut s, record);
                                s.last_segment_count = s.segments.len();
                                fit_view_state(&mut s);
                            }
                        });
                    }
                    Err(e) => log(&format!("Failed to parse land '{name}': {e}")),
                },
                None => log(&format!("Failed to load land '{name}'")),
            }
        });
    }

    fit_view_state(&mut state.borrow_mut());
    Ok(())
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    if let Some(btn) = doc.get_element_by_id("fitView") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            fit_view_state(&mut st.borrow_mut());
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Pointer drag pans the viewport.
    {
        let st = state.clone();
        let mousedown = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            if e.button() != 0 {
                return;
            }
            let mut s = st.borrow_mut();
            s.dragging = true;
            s.drag_last = event_canvas_coords(&e, &s.canvas);
            let _ = s.canvas.style().set_property("cursor", "grabbing");
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;
        mousedown.forget();
    }
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            if !s.dragging {
                return;
            }
            let (mx, my) = event_canvas_coords(&e, &s.canvas);
            let (lx, ly) = s.drag_last;
            s.viewport.pan_by(mx - lx, my - ly);
            s.drag_last = (mx, my);
            s.scheduler.request();
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    for event in ["mouseup", "mouseleave"] {
        let st = state.clone();
        let stop = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            let mut s = st.borrow_mut();
            s.dragging = false;
            let _ = s.canvas.style().set_property("cursor", "grab");
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback(event, stop.as_ref().unchecked_ref())?;
        stop.forget();
    }

    // Wheel zooms about the cursor; listener must not be passive or the
    // page scrolls along.
    {
        let st = state.clone();
        let wheel = Closure::<dyn FnMut(WheelEvent)>::wrap(Box::new(move |e: WheelEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            let (mx, my) = event_canvas_coords(&e, &s.canvas);
            s.viewport.zoom_at(Point { x: mx, y: my }, e.delta_y() < 0.0);
            update_zoom_dom(&s);
            s.scheduler.request();
        }));
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                wheel.as_ref().unchecked_ref(),
                &opts,
            )?;
        wheel.forget();
    }

    // Container resizes re-run the fit from scratch, deterministic from the
    // new box alone.
    {
        let st = state.clone();
        let onresize = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            fit_view_state(&mut st.borrow_mut());
        }));
        let observer = web_sys::ResizeObserver::new(onresize.as_ref().unchecked_ref())?;
        observer.observe(&state.borrow().canvas);
        onresize.forget();
        // The observer must outlive this scope or the browser drops it.
        std::mem::forget(observer);
    }

    Ok(())
}

/// Frame the current traverse in the canvas and repaint.
pub(crate) fn fit_view_state(s: &mut State) {
    sync_canvas_size(&s.window, &s.canvas);
    let w = s.canvas.width() as f64;
    let h = s.canvas.height() as f64;
    if w < 1.0 || h < 1.0 {
        return;
    }
    let points = s.points();
    s.viewport.fit_to_view(&points, w, h);
    update_zoom_dom(s);
    s.scheduler.request();
}

/// A changed segment count refits the view; a same-count edit only repaints.
fn segments_changed(s: &mut State) {
    let count = s.segments.len();
    if count != s.last_segment_count {
        s.last_segment_count = count;
        fit_view_state(s);
    } else {
        s.scheduler.request();
    }
}

fn update_zoom_dom(s: &State) {
    if let Some(el) = s.document.get_element_by_id("zoomDisplay")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(&zoom_display(s.viewport.zoom));
    }
}

/// Three significant digits with trailing zeros dropped, like the web
/// client's `toPrecision(3)` + `parseFloat`.
fn zoom_display(zoom: f64) -> String {
    if !zoom.is_finite() || zoom <= 0.0 {
        return "1".to_string();
    }
    let exponent = zoom.abs().log10().floor() as i32;
    let decimals = (2 - exponent).max(0) as usize;
    let s = format!("{zoom:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn with_state<R>(f: impl FnOnce(&mut State) -> R) -> Option<R> {
    STATE.with(|st| st.borrow().as_ref().map(|rc| f(&mut rc.borrow_mut())))
}

// ---------------------------------------------------------------------------
// JS API for the sidebar form
// ---------------------------------------------------------------------------

/// Append an empty segment row; returns its id, or nothing at the cap.
#[wasm_bindgen(js_name = addSegment)]
pub fn add_segment() -> Option<String> {
    with_state(|s| {
        let id = editor::add_segment(s);
        if id.is_some() {
            segments_changed(s);
        }
        id
    })
    .flatten()
}

#[wasm_bindgen(js_name = removeSegment)]
pub fn remove_segment(id: &str) {
    with_state(|s| {
        editor::remove_segment(s, id);
        segments_changed(s);
    });
}

/// Clamped write to distance / degrees / minutes / seconds.
#[wasm_bindgen(js_name = updateSegmentNumber)]
pub fn update_segment_number(id: &str, field: &str, value: f64) -> bool {
    with_state(|s| {
        let changed = editor::update_number(s, id, field, value);
        if changed {
            segments_changed(s);
        }
        changed
    })
    .unwrap_or(false)
}

/// Set the `from` or `to` octant from its token ("N".."SO").
#[wasm_bindgen(js_name = updateSegmentDirection)]
pub fn update_segment_direction(id: &str, field: &str, token: &str) -> bool {
    with_state(|s| {
        let changed = editor::update_direction(s, id, field, token);
        if changed {
            segments_changed(s);
        }
        changed
    })
    .unwrap_or(false)
}

#[wasm_bindgen(js_name = updateSegmentLabel)]
pub fn update_segment_label(id: &str, value: &str) {
    with_state(|s| {
        if editor::update_label(s, id, value) {
            segments_changed(s);
        }
    });
}

/// Apply a compact bearing token ("SO1235NE") to one row. Returns whether
/// it parsed; the raw text is kept on the row either way.
#[wasm_bindgen(js_name = updateBearingInput)]
pub fn update_bearing_input(id: &str, raw: &str) -> bool {
    with_state(|s| {
        let parsed = editor::update_bearing(s, id, raw);
        segments_changed(s);
        parsed
    })
    .unwrap_or(false)
}

/// Display form of one row's bearing, e.g. `SO 12°35'0" NE`.
#[wasm_bindgen(js_name = segmentBearingText)]
pub fn segment_bearing_text(id: &str) -> Option<String> {
    with_state(|s| {
        s.segments
            .iter()
            .find(|seg| seg.id == id)
            .map(Segment::display_bearing)
    })
    .flatten()
}

#[wasm_bindgen(js_name = setRegistrationField)]
pub fn set_registration_field(field: &str, value: &str) -> bool {
    with_state(|s| {
        let reg = &mut s.registration;
        match field {
            "name" => reg.name = value.to_string(),
            "registrationNumber" => reg.registration_number = value.to_string(),
            "location" => reg.location = value.to_string(),
            "client" => reg.client = value.to_string(),
            "notes" => reg.notes = value.to_string(),
            _ => return false,
        }
        true
    })
    .unwrap_or(false)
}

#[wasm_bindgen(js_name = setShowLabels)]
pub fn set_show_labels(visible: bool) {
    with_state(|s| {
        s.show_labels = visible;
        s.scheduler.request();
    });
}

#[wasm_bindgen(js_name = fitView)]
pub fn fit_view() {
    with_state(fit_view_state);
}

/// Current zoom, formatted for the toolbar readout.
#[wasm_bindgen(js_name = zoomLevel)]
pub fn zoom_level() -> String {
    with_state(|s| zoom_display(s.viewport.zoom)).unwrap_or_else(|| "1".to_string())
}

/// JSON payload for the external save operation: segments, registration
/// and the derived polygon facts.
#[wasm_bindgen(js_name = savePayload)]
pub fn save_payload() -> String {
    with_state(|s| {
        let points = s.points();
        let closed = is_closed(&points);
        let summary = SaveSummary {
            segments: s.segments.clone(),
            registration: s.registration.clone(),
            total_area: area_m2(&points),
            perimeter: perimeter(&s.segments),
            is_closed: closed,
        };
        serde_json::to_string(&summary).unwrap_or_else(|_| "{}".to_string())
    })
    .unwrap_or_else(|| "{}".to_string())
}

/// Replace the editor contents with a parcel record JSON.
#[wasm_bindgen(js_name = loadLand)]
pub fn load_land(json: &str) -> Result<(), JsValue> {
    let record: LandRecord =
        serde_json::from_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_state(|s| {
        editor::seed(s, record);
        s.last_segment_count = s.segments.len();
        fit_view_state(s);
    });
    Ok(())
}
