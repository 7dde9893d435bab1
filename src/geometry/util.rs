//! Geometric utility functions for triangles in 3D.
//!
//! These measures back the facet accessors and the subdivision conservation
//! checks (children areas must sum to the parent's area).

use crate::geometry::point::Point;

/// Area of `triangle`, `|ab × ac| / 2`.
///
/// # Examples
///
/// ```rust
/// use approx::assert_relative_eq;
/// use facet_address::geometry::point::Point;
/// use facet_address::geometry::util::triangle_area;
///
/// let area = triangle_area(&[
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([3.0, 0.0, 0.0]),
///     Point::new([0.0, 4.0, 0.0]),
/// ]);
/// assert_relative_eq!(area, 6.0, epsilon = 1e-12); // 3*4/2 = 6
/// ```
#[must_use]
pub fn triangle_area(triangle: &[Point; 3]) -> f64 {
    let [a, b, c] = triangle;
    (*b - *a).cross(&(*c - *a)).length() * 0.5
}

/// Centroid (arithmetic mean of the vertices) of `triangle`.
#[must_use]
pub fn triangle_centroid(triangle: &[Point; 3]) -> Point {
    let [a, b, c] = triangle;
    (*a + *b + *c) / 3.0
}

/// Unit normal `(b - a) × (c - a)` of `triangle`, or `None` if degenerate.
#[must_use]
pub fn triangle_normal(triangle: &[Point; 3]) -> Option<Point> {
    let [a, b, c] = triangle;
    (*b - *a).cross(&(*c - *a)).normalized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centroid_of_axis_triangle() {
        let centroid = triangle_centroid(&[
            Point::new([3.0, 0.0, 0.0]),
            Point::new([0.0, 3.0, 0.0]),
            Point::new([0.0, 0.0, 3.0]),
        ]);
        assert_eq!(centroid, Point::new([1.0, 1.0, 1.0]));
    }

    #[test]
    fn degenerate_triangle_has_no_normal_and_zero_area() {
        let triangle = [
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([2.0, 0.0, 0.0]),
        ];
        assert!(triangle_normal(&triangle).is_none());
        assert_relative_eq!(triangle_area(&triangle), 0.0);
    }

    #[test]
    fn normal_is_unit_and_follows_winding() {
        let normal = triangle_normal(&[
            Point::new([0.0, 0.0, 5.0]),
            Point::new([1.0, 0.0, 5.0]),
            Point::new([0.0, 1.0, 5.0]),
        ])
        .unwrap();
        assert_eq!(normal, Point::new([0.0, 0.0, 1.0]));
    }
}
