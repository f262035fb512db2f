//! The canvas draw pass.
//!
//! One stateless pass over (points, segments, viewport, flags), painting
//! layers back to front: background, grid, origin cross-hairs, compass,
//! polygon fill, edges with labels, open-traverse closing hint, vertex
//! markers, area readout. Nothing here mutates state; scheduling is the
//! `RepaintScheduler`'s job.

use traverse_core::{Point, Segment, Viewport, area_m2, is_closed, nice_step, perimeter};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlElement};

use crate::constants::*;
use crate::state::State;
use crate::utils::sync_canvas_size;

// Non-deprecated helpers to set canvas styles via property assignment.
pub fn set_fill_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(color),
    );
}

pub fn set_stroke_style(ctx: &CanvasRenderingContext2d, color: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(color),
    );
}

fn set_line_dash(ctx: &CanvasRenderingContext2d, dashes: &[f64]) {
    let arr = js_sys::Array::new();
    for d in dashes {
        arr.push(&JsValue::from_f64(*d));
    }
    let _ = ctx.set_line_dash(&arr);
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

pub fn draw(state: &State) {
    sync_canvas_size(&state.window, &state.canvas);
    let w = state.canvas.width() as f64;
    let h = state.canvas.height() as f64;
    if w < 1.0 || h < 1.0 {
        return;
    }

    let ctx = &state.ctx;
    let vp = state.viewport;
    let points = state.points();
    let closed = is_closed(&points);
    let area = area_m2(&points);

    set_fill_style(ctx, BACKGROUND_COLOR);
    ctx.fill_rect(0.0, 0.0, w, h);

    draw_grid(ctx, &vp, w, h);
    draw_axes(ctx, &vp, w, h);
    draw_compass(ctx, w, h);

    if points.len() >= 2 {
        if closed {
            draw_polygon_fill(ctx, &vp, &points);
        }
        draw_edges(ctx, &vp, &points, &state.segments, state.show_labels);
        if !closed && points.len() > 2 {
            draw_closing_hint(ctx, &vp, &points);
        }
        draw_vertices(ctx, &vp, &points, closed);
        if let Some(a) = area {
            draw_area_readout(ctx, w, h, a);
        }
    }

    update_summary_dom(state, closed, area);
}

/// World-aligned grid at the current nice step, lines snapped to half-pixel
/// so they stay crisp at width 1.
fn draw_grid(ctx: &CanvasRenderingContext2d, vp: &Viewport, w: f64, h: f64) {
    let step = nice_step(vp.zoom);
    set_stroke_style(ctx, GRID_COLOR);
    ctx.set_line_width(1.0);

    let mut wx = ((-vp.pan.x / vp.zoom) / step).floor() * step;
    while wx * vp.zoom + vp.pan.x <= w + step * vp.zoom {
        let cx = (wx * vp.zoom + vp.pan.x).round() + 0.5;
        ctx.begin_path();
        ctx.move_to(cx, 0.0);
        ctx.line_to(cx, h);
        ctx.stroke();
        wx += step;
    }

    let mut wy = ((-vp.pan.y / vp.zoom) / step).floor() * step;
    while wy * vp.zoom + vp.pan.y <= h + step * vp.zoom {
        let cy = (wy * vp.zoom + vp.pan.y).round() + 0.5;
        ctx.begin_path();
        ctx.move_to(0.0, cy);
        ctx.line_to(w, cy);
        ctx.stroke();
        wy += step;
    }
}

/// Dashed cross-hairs through the world origin, when it is on screen.
fn draw_axes(ctx: &CanvasRenderingContext2d, vp: &Viewport, w: f64, h: f64) {
    let ox = vp.pan.x;
    let oy = vp.pan.y;
    if !(0.0..=w).contains(&ox) || !(0.0..=h).contains(&oy) {
        return;
    }
    ctx.save();
    set_stroke_style(ctx, AXIS_COLOR);
    ctx.set_line_width(1.0);
    set_line_dash(ctx, &[4.0, 4.0]);
    ctx.begin_path();
    ctx.move_to(ox, 0.0);
    ctx.line_to(ox, h);
    ctx.stroke();
    ctx.begin_path();
    ctx.move_to(0.0, oy);
    ctx.line_to(w, oy);
    ctx.stroke();
    set_line_dash(ctx, &[]);
    ctx.restore();
}

/// Fixed compass rose in the bottom-right corner, screen space, unaffected
/// by pan/zoom. East is "L" (leste) in Portuguese survey convention.
fn draw_compass(ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
    let cx = w - COMPASS_MARGIN_PX;
    let cy = h - COMPASS_MARGIN_PX;
    let r = COMPASS_RADIUS_PX;
    ctx.save();
    set_stroke_style(ctx, "rgba(255,255,255,0.30)");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    let _ = ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU);
    ctx.stroke();
    set_fill_style(ctx, "rgba(255,255,255,0.50)");
    ctx.set_font("bold 8px monospace");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("N", cx, cy - r - 5.0);
    let _ = ctx.fill_text("S", cx, cy + r + 5.0);
    let _ = ctx.fill_text("L", cx + r + 5.0, cy);
    let _ = ctx.fill_text("O", cx - r - 5.0, cy);
    set_stroke_style(ctx, "rgba(34,197,94,0.80)");
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.move_to(cx, cy - r + 3.0);
    ctx.line_to(cx, cy);
    ctx.stroke();
    ctx.restore();
}

fn draw_polygon_fill(ctx: &CanvasRenderingContext2d, vp: &Viewport, points: &[Point]) {
    ctx.begin_path();
    let first = vp.to_screen(points[0]);
    ctx.move_to(first.x, first.y);
    for p in &points[1..] {
        let s = vp.to_screen(*p);
        ctx.line_to(s.x, s.y);
    }
    ctx.close_path();
    set_fill_style(ctx, POLYGON_FILL);
    ctx.fill();
}

fn draw_edges(
    ctx: &CanvasRenderingContext2d,
    vp: &Viewport,
    points: &[Point],
    segments: &[Segment],
    show_labels: bool,
) {
    set_stroke_style(ctx, EDGE_COLOR);
    ctx.set_line_width(EDGE_WIDTH_PX);
    set_line_dash(ctx, &[]);

    for i in 0..points.len() - 1 {
        let a = vp.to_screen(points[i]);
        let b = vp.to_screen(points[i + 1]);
        ctx.begin_path();
        ctx.move_to(a.x, a.y);
        ctx.line_to(b.x, b.y);
        ctx.stroke();

        let Some(seg) = segments.get(i) else { continue };
        // Unreadable clutter below this length; skip the label entirely.
        if (b.x - a.x).hypot(b.y - a.y) <= MIN_LABELED_EDGE_PX {
            continue;
        }

        let mid_x = (a.x + b.x) / 2.0;
        let mid_y = (a.y + b.y) / 2.0;
        let dist_label = format!("{:.2}m", seg.distance);

        ctx.save();
        ctx.set_font("10px monospace");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        let dw = text_width(ctx, &dist_label);
        set_fill_style(ctx, LABEL_BACKDROP);
        ctx.fill_rect(mid_x - dw / 2.0 - 4.0, mid_y - 8.0, dw + 8.0, 16.0);
        set_fill_style(ctx, LABEL_TEXT);
        let _ = ctx.fill_text(&dist_label, mid_x, mid_y);
        ctx.restore();

        if show_labels && !seg.label.is_empty() {
            ctx.save();
            ctx.set_font("italic 9px monospace");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            set_fill_style(ctx, LABEL_FAINT);
            let _ = ctx.fill_text(&seg.label, mid_x, mid_y + 14.0);
            ctx.restore();
        }
    }
}

/// Dashed amber segment from the last point back to the first, warning
/// that the traverse does not close yet.
fn draw_closing_hint(ctx: &CanvasRenderingContext2d, vp: &Viewport, points: &[Point]) {
    let first = vp.to_screen(points[0]);
    let last = vp.to_screen(points[points.len() - 1]);
    ctx.save();
    set_stroke_style(ctx, OPEN_HINT_COLOR);
    ctx.set_line_width(1.5);
    set_line_dash(ctx, &[6.0, 4.0]);
    ctx.begin_path();
    ctx.move_to(last.x, last.y);
    ctx.line_to(first.x, first.y);
    ctx.stroke();
    set_line_dash(ctx, &[]);
    ctx.restore();
}

fn draw_vertices(ctx: &CanvasRenderingContext2d, vp: &Viewport, points: &[Point], closed: bool) {
    for (i, p) in points.iter().enumerate() {
        let s = vp.to_screen(*p);
        let is_first = i == 0;
        let is_last = i == points.len() - 1;
        ctx.begin_path();
        let _ = ctx.arc(
            s.x,
            s.y,
            if is_first { 6.0 } else { 4.0 },
            0.0,
            std::f64::consts::TAU,
        );
        set_fill_style(
            ctx,
            if is_first || (is_last && closed) {
                VERTEX_HIGHLIGHT
            } else {
                VERTEX_FILL
            },
        );
        ctx.fill();
        set_stroke_style(ctx, VERTEX_STROKE);
        ctx.set_line_width(1.5);
        ctx.stroke();
    }
}

fn draw_area_readout(ctx: &CanvasRenderingContext2d, w: f64, h: f64, area: f64) {
    let label = format!("\u{c1}rea: {:.2} m\u{b2}", area);
    ctx.save();
    ctx.set_font("bold 11px monospace");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let tw = text_width(ctx, &label);
    let lx = w / 2.0;
    let ly = h - 18.0;
    set_fill_style(ctx, AREA_BACKDROP);
    ctx.fill_rect(lx - tw / 2.0 - 8.0, ly - 9.0, tw + 16.0, 18.0);
    set_fill_style(ctx, LABEL_TEXT);
    let _ = ctx.fill_text(&label, lx, ly);
    ctx.restore();
}

/// Sidebar summary line: segment count, perimeter, closure, area.
fn update_summary_dom(state: &State, closed: bool, area: Option<f64>) {
    if let Some(el) = state.document.get_element_by_id("traverseSummary")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        let n = state.segments.len();
        let plural = if n == 1 { "" } else { "s" };
        let status = match area {
            Some(a) => format!("fechado \u{b7} \u{c1}rea: {a:.2} m\u{b2}"),
            None if closed => "fechado".to_string(),
            None => "aberto".to_string(),
        };
        el.set_inner_text(&format!(
            "{n} segmento{plural} \u{b7} Per\u{ed}metro: {:.2} m \u{b7} Pol\u{ed}gono {status}",
            perimeter(&state.segments),
        ));
    }
}
