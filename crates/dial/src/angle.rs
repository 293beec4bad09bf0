use crate::geometry::Point;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Folds `theta` into (-PI, PI]. Values already in range come back untouched, so
/// normalizing twice is exact. Non-finite input is returned as is.
pub fn normalize_angle(theta: f64) -> f64 {
    if !theta.is_finite() || (theta > -PI && theta <= PI) {
        return theta;
    }
    let r = theta.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

/// Angle of `point` around `center` as `atan(-dy / dx)`, y growing downwards.
///
/// Only the slope is used, so the result lies in [-PI/2, PI/2]. A point straight
/// above or below the center gives `atan(+inf) = PI/2`. The center itself has no
/// angle.
pub fn touch_angle(point: Point, center: Point) -> Option<f64> {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    match (dx == 0.0, dy == 0.0) {
        (true, true) => None,
        (true, false) => Some(FRAC_PI_2),
        _ => Some((-(dy / dx)).atan()),
    }
}

/// Turns the difference between two touch samples into a rotation step.
///
/// Anything beyond a quarter turn is read as the slope flipping across the
/// vertical axis rather than a fast spin, and is folded back by half a turn.
pub fn unwrap_delta(raw: f64) -> f64 {
    if raw.abs() <= FRAC_PI_2 {
        raw
    } else {
        normalize_angle(raw - PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[f64] = &[
        0.0, 1.0, -1.0, PI, -PI, 3.5, -3.5, 7.0, -12.9, 100.25, -1e6, 4.0e12, -PI + 1e-12,
    ];

    #[test]
    fn test_clamp_respects_bounds() {
        for v in [-10.0, -0.8, -0.3, 0.0, 0.5, 0.8, 42.0] {
            let c = clamp(v, -0.8, 0.8);
            assert!((-0.8..=0.8).contains(&c));
        }
        assert_eq!(clamp(0.5, -0.8, 0.8), 0.5);
        assert_eq!(clamp(3, 0, 2), 2);
        assert_eq!(clamp(-3, 0, 2), 0);
    }

    #[test]
    fn test_normalize_range() {
        for &theta in SAMPLES {
            let n = normalize_angle(theta);
            assert!(n > -PI && n <= PI, "{theta} -> {n}");
        }
        assert_eq!(normalize_angle(-PI), PI);
        assert_eq!(normalize_angle(PI), PI);
    }

    #[test]
    fn test_normalize_idempotent() {
        for &theta in SAMPLES {
            let once = normalize_angle(theta);
            assert_eq!(normalize_angle(once), once);
        }
    }

    #[test]
    fn test_normalize_periodic() {
        for &theta in &[0.3, -2.0, 3.0, -3.1] {
            for k in -5..=5 {
                let shifted = normalize_angle(theta + TAU * k as f64);
                assert!((shifted - normalize_angle(theta)).abs() < 1e-9, "{theta} {k}");
            }
        }
    }

    #[test]
    fn test_normalize_terminates_for_huge_input() {
        let n = normalize_angle(1e300);
        assert!(n > -PI && n <= PI);
        assert!(normalize_angle(f64::NAN).is_nan());
    }

    #[test]
    fn test_touch_angle() {
        let center = Point::new(100.0, 100.0);
        assert_eq!(touch_angle(Point::new(150.0, 100.0), center), Some(0.0));
        assert_eq!(touch_angle(Point::new(100.0, 50.0), center), Some(FRAC_PI_2));
        assert_eq!(touch_angle(Point::new(100.0, 150.0), center), Some(FRAC_PI_2));
        assert_eq!(touch_angle(center, center), None);

        let diag = touch_angle(Point::new(150.0, 50.0), center).unwrap();
        assert!((diag - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_unwrap_delta() {
        assert_eq!(unwrap_delta(0.4), 0.4);
        assert_eq!(unwrap_delta(FRAC_PI_2), FRAC_PI_2);
        assert!((unwrap_delta(0.9 * PI) - (-0.1 * PI)).abs() < 1e-12);
        assert!((unwrap_delta(-0.9 * PI) - (0.1 * PI)).abs() < 1e-12);
    }
}
