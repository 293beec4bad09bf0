use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Radius of the circle cell centers travel on, leaving room for the cells themselves.
pub fn orbit_radius(size: Size, cell_width: f64) -> f64 {
    ((size.width.min(size.height) - cell_width) / 2.0).max(0.0)
}

pub fn position_on_circle(center: Point, radius: f64, theta: f64) -> Point {
    Point::new(
        center.x + radius * theta.cos(),
        center.y - radius * theta.sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_orbit_radius() {
        assert_eq!(orbit_radius(Size::new(300.0, 200.0), 40.0), 80.0);
        assert_eq!(orbit_radius(Size::new(20.0, 200.0), 40.0), 0.0);
    }

    #[test]
    fn test_top_of_circle_is_up() {
        let p = position_on_circle(Point::new(50.0, 50.0), 10.0, FRAC_PI_2);
        assert!((p.x - 50.0).abs() < 1e-12);
        assert!((p.y - 40.0).abs() < 1e-12);
    }
}
