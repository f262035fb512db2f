use serde::{Deserialize, Serialize};

use crate::bearing::{CardinalDirection, azimuth_rad, format_bearing};

/// Hard cap on segments per parcel; registries rarely go past a few dozen.
pub const MAX_SEGMENTS: usize = 100;
/// Longest single segment accepted, in meters.
pub const MAX_DISTANCE_M: f64 = 100_000.0;
/// First and last vertex closer than this per axis (meters) count as closed.
pub const CLOSE_TOLERANCE_M: f64 = 0.5;

/// Planar coordinate in meters. The origin is the traverse's first vertex
/// and +y points screen-down, so heading north decreases y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// One bearing/distance leg of a traverse.
///
/// Angle parts and distance are clamped on every write through the setters;
/// `bearing_raw` keeps whatever the user typed, even when it failed to
/// parse, so the quick-entry field never loses input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    #[serde(default)]
    pub id: String,
    pub from: CardinalDirection,
    pub to: CardinalDirection,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub distance: f64,
    #[serde(default)]
    pub bearing_raw: String,
    #[serde(default)]
    pub label: String,
}

impl Segment {
    /// Fresh segment with the editor defaults: SO→NE, zero angle, zero
    /// distance.
    pub fn new(id: String) -> Self {
        Segment {
            id,
            from: CardinalDirection::SO,
            to: CardinalDirection::NE,
            degrees: 0,
            minutes: 0,
            seconds: 0,
            distance: 0.0,
            bearing_raw: String::new(),
            label: String::new(),
        }
    }

    pub fn set_distance(&mut self, v: f64) {
        self.distance = if v.is_finite() {
            v.clamp(0.0, MAX_DISTANCE_M)
        } else {
            0.0
        };
    }

    pub fn set_degrees(&mut self, v: f64) {
        self.degrees = clamp_part(v, 89);
    }

    pub fn set_minutes(&mut self, v: f64) {
        self.minutes = clamp_part(v, 59);
    }

    pub fn set_seconds(&mut self, v: f64) {
        self.seconds = clamp_part(v, 59);
    }

    /// Apply a compact bearing token typed into the quick-entry field.
    ///
    /// The uppercased raw text is always stored; the structured fields only
    /// change when the token parses. Returns whether it did.
    pub fn apply_bearing_input(&mut self, raw: &str) -> bool {
        let upper = raw.to_ascii_uppercase();
        let parsed = crate::bearing::parse_bearing(&upper);
        self.bearing_raw = upper;
        match parsed {
            Some(b) => {
                self.from = b.from;
                self.to = b.to;
                self.degrees = b.degrees;
                self.minutes = b.minutes;
                self.seconds = b.seconds;
                true
            }
            None => false,
        }
    }

    /// Compass azimuth of this segment in radians.
    pub fn azimuth_rad(&self) -> f64 {
        azimuth_rad(self.from, self.to, self.degrees, self.minutes, self.seconds)
    }

    /// Display form, e.g. `SO 12°35'0" NE`.
    pub fn display_bearing(&self) -> String {
        format_bearing(self.from, self.to, self.degrees, self.minutes, self.seconds)
    }
}

fn clamp_part(v: f64, max: u32) -> u32 {
    if v.is_finite() {
        v.clamp(0.0, max as f64) as u32
    } else {
        0
    }
}

/// Fold the traverse into planar vertices, starting at (0, 0).
///
/// Yields one point per segment plus the origin. Segment data is never
/// touched; the point list is derived state, recomputed on every change.
pub fn compute_points(segments: &[Segment]) -> Vec<Point> {
    let mut points = Vec::with_capacity(segments.len() + 1);
    points.push(Point { x: 0.0, y: 0.0 });
    for seg in segments {
        let az = seg.azimuth_rad();
        let prev = points[points.len() - 1];
        points.push(Point {
            x: prev.x + seg.distance * az.sin(),
            y: prev.y - seg.distance * az.cos(),
        });
    }
    points
}

/// Whether the traverse returns to its starting vertex.
///
/// Closure is tested per axis against [`CLOSE_TOLERANCE_M`]; a chain of two
/// points or fewer is never closed.
pub fn is_closed(points: &[Point]) -> bool {
    if points.len() <= 2 {
        return false;
    }
    let first = points[0];
    let last = points[points.len() - 1];
    (first.x - last.x).abs() < CLOSE_TOLERANCE_M && (first.y - last.y).abs() < CLOSE_TOLERANCE_M
}

/// Shoelace area over consecutive vertex pairs, in square meters.
///
/// The sum does not wrap around: for a closed traverse the last point
/// already coincides with the first within tolerance. The value is only
/// meaningful when [`is_closed`] holds; use [`area_m2`] at call sites.
pub fn polygon_area(points: &[Point]) -> f64 {
    let mut area = 0.0;
    for pair in points.windows(2) {
        area += pair[0].x * pair[1].y;
        area -= pair[1].x * pair[0].y;
    }
    area.abs() / 2.0
}

/// Enclosed area, or `None` while the traverse is still open.
pub fn area_m2(points: &[Point]) -> Option<f64> {
    if is_closed(points) {
        Some(polygon_area(points))
    } else {
        None
    }
}

/// Sum of segment distances in meters, defined regardless of closure.
pub fn perimeter(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.distance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(from: CardinalDirection, to: CardinalDirection, d: u32, m: u32, s: u32, dist: f64) -> Segment {
        let mut out = Segment::new(format!("{}-{}", from.as_str(), dist));
        out.from = from;
        out.to = to;
        out.degrees = d;
        out.minutes = m;
        out.seconds = s;
        out.distance = dist;
        out
    }

    fn square() -> Vec<Segment> {
        use CardinalDirection::*;
        vec![
            seg(N, E, 0, 0, 0, 10.0),
            seg(E, S, 0, 0, 0, 10.0),
            seg(S, O, 0, 0, 0, 10.0),
            seg(O, N, 0, 0, 0, 10.0),
        ]
    }

    #[test]
    fn single_north_segment_decreases_y() {
        use CardinalDirection::*;
        let pts = compute_points(&[seg(N, NE, 0, 0, 0, 50.0)]);
        assert_eq!(pts.len(), 2);
        assert!(pts[1].x.abs() < 1e-9);
        assert!((pts[1].y + 50.0).abs() < 1e-9);
    }

    #[test]
    fn square_traverse_closes_with_area_100() {
        let pts = compute_points(&square());
        assert_eq!(pts.len(), 5);
        assert!(is_closed(&pts));
        let area = area_m2(&pts).unwrap();
        assert!((area - 100.0).abs() < 0.01);
        assert!((perimeter(&square()) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_traverse_has_same_area() {
        let mut reversed = square();
        reversed.reverse();
        for s in &mut reversed {
            std::mem::swap(&mut s.from, &mut s.to);
        }
        let a = area_m2(&compute_points(&square())).unwrap();
        let b = area_m2(&compute_points(&reversed)).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn there_and_back_closes_with_zero_area() {
        use CardinalDirection::*;
        let segs = vec![seg(SO, NE, 12, 35, 0, 100.0), seg(NE, SO, 12, 35, 0, 100.0)];
        let pts = compute_points(&segs);
        assert_eq!(pts.len(), 3);
        assert!((pts[0].x - pts[2].x).abs() < 1e-6);
        assert!((pts[0].y - pts[2].y).abs() < 1e-6);
        assert!(is_closed(&pts));
        assert!(area_m2(&pts).unwrap() < 1e-6);
    }

    #[test]
    fn short_or_open_chains_are_never_closed() {
        use CardinalDirection::*;
        assert!(!is_closed(&[]));
        assert!(!is_closed(&[Point::default()]));
        // Two coincident points still do not close anything.
        assert!(!is_closed(&[Point::default(), Point::default()]));
        let open = compute_points(&[
            seg(N, E, 0, 0, 0, 10.0),
            seg(E, S, 0, 0, 0, 10.0),
            seg(S, O, 0, 0, 0, 10.0),
        ]);
        assert!(!is_closed(&open));
        assert_eq!(area_m2(&open), None);
    }

    #[test]
    fn endpoint_just_inside_tolerance_counts_as_closed() {
        let pts = vec![
            Point { x: 0.0, y: 0.0 },
            Point { x: 10.0, y: 0.0 },
            Point { x: 10.0, y: 10.0 },
            Point { x: 0.4, y: -0.4 },
        ];
        assert!(is_closed(&pts));
        let mut far = pts;
        far[3].x = 0.6;
        assert!(!is_closed(&far));
    }

    #[test]
    fn setters_clamp_on_write() {
        let mut s = Segment::new("a".into());
        s.set_distance(250_000.0);
        assert_eq!(s.distance, MAX_DISTANCE_M);
        s.set_distance(-5.0);
        assert_eq!(s.distance, 0.0);
        s.set_degrees(120.0);
        assert_eq!(s.degrees, 89);
        s.set_minutes(75.0);
        assert_eq!(s.minutes, 59);
        s.set_seconds(-3.0);
        assert_eq!(s.seconds, 0);
        s.set_distance(f64::NAN);
        assert_eq!(s.distance, 0.0);
    }

    #[test]
    fn bearing_input_updates_fields_only_on_parse() {
        let mut s = Segment::new("a".into());
        assert!(s.apply_bearing_input("so123545ne"));
        assert_eq!(s.bearing_raw, "SO123545NE");
        assert_eq!(s.from, CardinalDirection::SO);
        assert_eq!((s.degrees, s.minutes, s.seconds), (12, 35, 45));

        // Malformed input keeps the raw text but leaves the fields alone.
        assert!(!s.apply_bearing_input("so99ne"));
        assert_eq!(s.bearing_raw, "SO99NE");
        assert_eq!((s.degrees, s.minutes, s.seconds), (12, 35, 45));
    }

    #[test]
    fn segment_round_trips_backend_json_field_names() {
        let mut s = Segment::new("abc1234".into());
        s.apply_bearing_input("SO1235NE");
        s.set_distance(100.0);
        s.label = "muro de divisa".into();
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"bearingRaw\":\"SO1235NE\""));
        assert!(json.contains("\"from\":\"SO\""));
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
