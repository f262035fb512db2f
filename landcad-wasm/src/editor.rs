//! Segment-list mutations driven by the sidebar form.
//!
//! Numeric fields clamp at the point of mutation and are never rejected;
//! the quick-entry bearing token updates the structured fields only when it
//! parses, keeping the raw text either way.

use traverse_core::{CardinalDirection, MAX_SEGMENTS, Segment};

use crate::models::LandRecord;
use crate::state::State;

/// Random row key in the same 7-char base36 shape the web client used.
pub fn new_segment_id() -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = (js_sys::Math::random() * 36f64.powi(7)) as u64;
    let mut out = [0u8; 7];
    for slot in out.iter_mut().rev() {
        *slot = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    // All bytes come from DIGITS, so this is valid UTF-8.
    String::from_utf8_lossy(&out).into_owned()
}

/// Append an empty segment, unless the parcel is already at the cap.
/// Returns the new row id.
pub fn add_segment(state: &mut State) -> Option<String> {
    if state.segments.len() >= MAX_SEGMENTS {
        return None;
    }
    let seg = Segment::new(new_segment_id());
    let id = seg.id.clone();
    state.segments.push(seg);
    Some(id)
}

pub fn remove_segment(state: &mut State, id: &str) {
    state.segments.retain(|s| s.id != id);
}

fn find<'a>(state: &'a mut State, id: &str) -> Option<&'a mut Segment> {
    state.segments.iter_mut().find(|s| s.id == id)
}

/// Clamped write to one of the numeric fields. Returns false for an
/// unknown row or field name.
pub fn update_number(state: &mut State, id: &str, field: &str, value: f64) -> bool {
    let Some(seg) = find(state, id) else {
        return false;
    };
    match field {
        "distance" => seg.set_distance(value),
        "degrees" => seg.set_degrees(value),
        "minutes" => seg.set_minutes(value),
        "seconds" => seg.set_seconds(value),
        _ => return false,
    }
    true
}

pub fn update_direction(state: &mut State, id: &str, field: &str, token: &str) -> bool {
    let Some(dir) = CardinalDirection::from_token(&token.trim().to_ascii_uppercase()) else {
        return false;
    };
    let Some(seg) = find(state, id) else {
        return false;
    };
    match field {
        "from" => seg.from = dir,
        "to" => seg.to = dir,
        _ => return false,
    }
    true
}

pub fn update_label(state: &mut State, id: &str, value: &str) -> bool {
    match find(state, id) {
        Some(seg) => {
            seg.label = value.to_string();
            true
        }
        None => false,
    }
}

/// Apply a compact bearing token to one row. Returns whether it parsed.
pub fn update_bearing(state: &mut State, id: &str, raw: &str) -> bool {
    match find(state, id) {
        Some(seg) => seg.apply_bearing_input(raw),
        None => false,
    }
}

/// Replace the editor contents with a parcel record from the backend or a
/// file. Rows missing ids get fresh ones; an empty record still yields one
/// blank row so the editor is never without a segment.
pub fn seed(state: &mut State, record: LandRecord) {
    state.segments = record.segments;
    for seg in &mut state.segments {
        if seg.id.is_empty() {
            seg.id = new_segment_id();
        }
    }
    if state.segments.is_empty() {
        state.segments.push(Segment::new(new_segment_id()));
    }
    state.registration = record.registration;
}
