/// Screen distance the background grid aims to keep between lines.
const TARGET_PX: f64 = 50.0;

/// Pick a "nice" world-space grid spacing for the current zoom.
///
/// Classic nice-numbers axis labeling: take the raw spacing that would land
/// on [`TARGET_PX`], split off its power of ten and snap the mantissa to
/// 1 / 2 / 5 / 10 at the 1.5 / 3.5 / 7.5 thresholds. Recomputed on every
/// zoom change; there is nothing to cache.
pub fn nice_step(zoom: f64) -> f64 {
    let raw = TARGET_PX / zoom;
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let factor = if norm < 1.5 {
        1.0
    } else if norm < 3.5 {
        2.0
    } else if norm < 7.5 {
        5.0
    } else {
        10.0
    };
    magnitude * factor
}

#[cfg(test)]
mod tests {
    use super::nice_step;

    #[test]
    fn unit_zoom_snaps_to_50() {
        // raw = 50, magnitude = 10, norm = 5 -> factor 5.
        assert_eq!(nice_step(1.0), 50.0);
    }

    #[test]
    fn snaps_to_1_2_5_10_ladder() {
        assert_eq!(nice_step(50.0), 1.0); // raw 1.0
        assert_eq!(nice_step(25.0), 2.0); // raw 2.0
        assert_eq!(nice_step(10.0), 5.0); // raw 5.0
        assert_eq!(nice_step(5.5), 10.0); // raw ~9.1
    }

    #[test]
    fn thresholds_split_at_1_5_3_5_7_5() {
        assert_eq!(nice_step(50.0 / 1.4), 1.0);
        assert_eq!(nice_step(50.0 / 1.6), 2.0);
        assert_eq!(nice_step(50.0 / 3.4), 2.0);
        assert_eq!(nice_step(50.0 / 3.6), 5.0);
        assert_eq!(nice_step(50.0 / 7.4), 5.0);
        assert_eq!(nice_step(50.0 / 7.6), 10.0);
    }

    #[test]
    fn scales_across_magnitudes() {
        // Zoomed far out the step grows into the thousands.
        assert_eq!(nice_step(0.01), 5000.0);
        // Zoomed far in it shrinks below one meter.
        assert_eq!(nice_step(100.0), 0.5);
    }

    #[test]
    fn step_renders_near_the_target_density() {
        // factor/norm stays within (1/3.5, 10/7) of 1, so the on-screen
        // spacing never strays far from the 50px target.
        let mut zoom = 0.01;
        while zoom < 500.0 {
            let px = nice_step(zoom) * zoom;
            assert!(px > 28.0 && px < 72.0, "zoom {zoom}: {px}px");
            zoom *= 1.7;
        }
    }
}
