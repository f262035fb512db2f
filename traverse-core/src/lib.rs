//! Traverse geometry for cadastral surveys.
//!
//! A land parcel is described as an ordered chain of bearing/distance
//! segments ("SO 12°35'00\" NE, 100m"). This crate turns those chains into
//! planar polygons and the derived facts a drawing surface needs: closure,
//! area, perimeter, grid spacing and the pan/zoom viewport transform.
//! Everything here is pure and total; malformed input comes back as `None`
//! or gets clamped, never panics.

pub mod bearing;
pub mod grid;
pub mod traverse;
pub mod viewport;

pub use bearing::{Bearing, CardinalDirection, azimuth_rad, format_bearing, parse_bearing};
pub use grid::nice_step;
pub use traverse::{
    CLOSE_TOLERANCE_M, MAX_DISTANCE_M, MAX_SEGMENTS, Point, Segment, area_m2, compute_points,
    is_closed, perimeter, polygon_area,
};
pub use viewport::{FIT_PADDING_PX, Viewport, ZOOM_FACTOR, ZOOM_MAX, ZOOM_MIN};
