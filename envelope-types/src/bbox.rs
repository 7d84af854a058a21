//! rectangular extents

use crate::Point;

/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum extent in the x direction-- the left side of a region.
    pub x_min: T,
    /// Minimum extent in the y direction.
    pub y_min: T,
    /// Maximum extent in the x direction-- the right side of a region.
    pub x_max: T,
    /// Maximum extent in the y direction.
    pub y_max: T,
}

impl<T> BoundingBox<T> {
    pub const fn new(x_min: T, y_min: T, x_max: T, y_max: T) -> Self {
        BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }
}

impl<T: PartialOrd + Copy> BoundingBox<T> {
    /// The degenerate box covering a single point.
    pub fn from_point(point: Point<T>) -> Self {
        BoundingBox::new(point.x, point.y, point.x, point.y)
    }

    /// Grow this box just enough to also cover `point`.
    pub fn union_point(self, point: Point<T>) -> Self {
        fn min<T: PartialOrd>(a: T, b: T) -> T {
            if b < a {
                b
            } else {
                a
            }
        }
        fn max<T: PartialOrd>(a: T, b: T) -> T {
            if b > a {
                b
            } else {
                a
            }
        }
        BoundingBox {
            x_min: min(self.x_min, point.x),
            y_min: min(self.y_min, point.y),
            x_max: max(self.x_max, point.x),
            y_max: max(self.y_max, point.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union() {
        let bounds = BoundingBox::from_point(Point::new(-10.0, -5.0))
            .union_point(Point::new(20.0, 15.0))
            .union_point(Point::new(0.0, 30.0));
        assert_eq!(bounds, BoundingBox::new(-10.0, -5.0, 20.0, 30.0));
    }
}
