use crate::traverse::Point;

pub const ZOOM_MIN: f64 = 0.01;
pub const ZOOM_MAX: f64 = 500.0;
/// Multiplier applied per wheel notch.
pub const ZOOM_FACTOR: f64 = 1.12;
/// Screen-space margin kept around a fitted polygon.
pub const FIT_PADDING_PX: f64 = 80.0;

/// Two points this close together (meters) are one spot as far as view
/// fitting is concerned.
const DEGENERATE_EPS: f64 = 1e-3;

/// Pan/zoom state of the drawing surface.
///
/// `zoom` is pixels per meter, `pan` is the screen position of the world
/// origin. The affine pair `screen = world * zoom + pan` and its inverse
/// are the only transforms; all mutation goes through the methods here so
/// the renderer can take the viewport as a plain immutable value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            zoom: 1.0,
            pan: Point { x: 0.0, y: 0.0 },
        }
    }
}

impl Viewport {
    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan.x,
            y: world.y * self.zoom + self.pan.y,
        }
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan.x) / self.zoom,
            y: (screen.y - self.pan.y) / self.zoom,
        }
    }

    /// Translate by a raw screen-space delta; used while dragging.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Wheel zoom that keeps the world point under the cursor fixed.
    ///
    /// The pivot is read back through the old transform before the zoom
    /// changes, then the pan is recomputed so the same world point maps to
    /// the cursor again. Doing those two steps in the other order drifts.
    pub fn zoom_at(&mut self, cursor: Point, zoom_in: bool) {
        let pivot = self.to_world(cursor);
        let factor = if zoom_in { ZOOM_FACTOR } else { 1.0 / ZOOM_FACTOR };
        let new_zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = Point {
            x: cursor.x - pivot.x * new_zoom,
            y: cursor.y - pivot.y * new_zoom,
        };
        self.zoom = new_zoom;
    }

    /// Frame the whole point set inside a `width` x `height` viewport.
    ///
    /// Degenerate input (fewer than two points, or a two-point chain whose
    /// ends coincide) resets to zoom 1 with the origin centered. A flat
    /// bounding-box axis falls back to a 1 meter range so the division
    /// stays finite.
    pub fn fit_to_view(&mut self, points: &[Point], width: f64, height: f64) {
        let degenerate = points.len() < 2
            || (points.len() == 2
                && (points[0].x - points[1].x).abs() < DEGENERATE_EPS
                && (points[0].y - points[1].y).abs() < DEGENERATE_EPS);

        if degenerate {
            self.zoom = 1.0;
            self.pan = Point {
                x: width / 2.0,
                y: height / 2.0,
            };
            return;
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let range_x = if max_x - min_x > 0.0 { max_x - min_x } else { 1.0 };
        let range_y = if max_y - min_y > 0.0 { max_y - min_y } else { 1.0 };

        self.zoom = f64::min(
            (width - FIT_PADDING_PX * 2.0) / range_x,
            (height - FIT_PADDING_PX * 2.0) / range_y,
        );
        self.pan = Point {
            x: width / 2.0 - (min_x + max_x) / 2.0 * self.zoom,
            y: height / 2.0 - (min_y + max_y) / 2.0 * self.zoom,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn screen_world_transforms_invert() {
        let vp = Viewport {
            zoom: 2.5,
            pan: pt(120.0, -40.0),
        };
        let w = pt(13.7, -2.1);
        let back = vp.to_world(vp.to_screen(w));
        assert!((back.x - w.x).abs() < 1e-12);
        assert!((back.y - w.y).abs() < 1e-12);
    }

    #[test]
    fn pan_by_translates_in_screen_space() {
        let mut vp = Viewport::default();
        let before = vp.to_screen(pt(3.0, 4.0));
        vp.pan_by(15.0, -7.0);
        let after = vp.to_screen(pt(3.0, 4.0));
        assert_eq!(after.x, before.x + 15.0);
        assert_eq!(after.y, before.y - 7.0);
    }

    #[test]
    fn wheel_zoom_preserves_the_pivot() {
        let mut vp = Viewport {
            zoom: 1.7,
            pan: pt(33.0, 91.0),
        };
        let cursor = pt(250.0, 140.0);
        let before = vp.to_world(cursor);
        vp.zoom_at(cursor, true);
        let after = vp.to_world(cursor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
        assert!((vp.zoom - 1.7 * ZOOM_FACTOR).abs() < 1e-12);
    }

    #[test]
    fn repeated_wheel_zoom_stays_clamped() {
        let mut vp = Viewport::default();
        let cursor = pt(100.0, 100.0);
        for _ in 0..200 {
            vp.zoom_at(cursor, true);
        }
        assert!(vp.zoom <= ZOOM_MAX);
        for _ in 0..400 {
            vp.zoom_at(cursor, false);
        }
        assert!(vp.zoom >= ZOOM_MIN);
    }

    #[test]
    fn fit_frames_the_bounding_box_with_padding() {
        let mut vp = Viewport::default();
        let pts = [pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 50.0), pt(0.0, 50.0)];
        vp.fit_to_view(&pts, 800.0, 600.0);
        // Narrower axis ratio wins: (800-160)/100 = 6.4 vs (600-160)/50 = 8.8.
        assert!((vp.zoom - 6.4).abs() < 1e-9);
        // Box center lands on the viewport center.
        let center = vp.to_screen(pt(50.0, 25.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_input_resets_the_view() {
        let mut vp = Viewport {
            zoom: 55.0,
            pan: pt(-900.0, 2.0),
        };
        vp.fit_to_view(&[], 640.0, 480.0);
        assert_eq!(vp.zoom, 1.0);
        assert_eq!(vp.pan, pt(320.0, 240.0));

        vp.zoom = 55.0;
        vp.fit_to_view(&[pt(1.0, 1.0), pt(1.0, 1.0)], 640.0, 480.0);
        assert_eq!(vp.zoom, 1.0);
    }

    #[test]
    fn flat_axis_does_not_divide_by_zero() {
        let mut vp = Viewport::default();
        // Three collinear points along x: the y range collapses.
        let pts = [pt(0.0, 5.0), pt(40.0, 5.0), pt(80.0, 5.0)];
        vp.fit_to_view(&pts, 800.0, 600.0);
        assert!(vp.zoom.is_finite());
        assert!(vp.zoom > 0.0);
        let center = vp.to_screen(pt(40.0, 5.0));
        assert!((center.x - 400.0).abs() < 1e-9);
        assert!((center.y - 300.0).abs() < 1e-9);
    }
}
