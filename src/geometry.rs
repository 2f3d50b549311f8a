use serde::{Deserialize, Serialize};

/// Position on the host canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive on every edge: a point exactly on the border is inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x <= self.right()
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(10.0, 20.0, 100.0, 50.0)
    }

    #[test]
    fn interior_point_is_contained() {
        assert!(rect().contains(Point::new(50.0, 40.0)));
    }

    #[test]
    fn edges_and_corners_count_as_inside() {
        let r = rect();
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(r.contains(Point::new(110.0, 70.0)));
        assert!(r.contains(Point::new(10.0, 70.0)));
        assert!(r.contains(Point::new(110.0, 45.0)));
    }

    #[test]
    fn points_just_outside_are_rejected() {
        let r = rect();
        assert!(!r.contains(Point::new(9.999, 40.0)));
        assert!(!r.contains(Point::new(110.001, 40.0)));
        assert!(!r.contains(Point::new(50.0, 19.5)));
        assert!(!r.contains(Point::new(50.0, 70.5)));
    }

    #[test]
    fn zero_sized_rect_contains_only_its_origin() {
        let r = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(r.contains(Point::new(5.0, 5.0)));
        assert!(!r.contains(Point::new(5.0, 5.1)));
    }
}
