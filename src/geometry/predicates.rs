//! Geometric predicates for triangles in 3D.
//!
//! Containment is decided by barycentric-coordinate sign tests on the point's
//! orthogonal projection onto the triangle's plane. Triangles are closed: a
//! point within [`BARYCENTRIC_TOLERANCE`] of an edge or vertex counts as
//! contained, so a point on an edge shared by two triangles is contained by
//! both. Callers that scan several triangles resolve the tie by order.

use crate::geometry::plane::COLLINEAR_TOLERANCE;
use crate::geometry::point::Point;

/// Tolerance applied to barycentric weights at triangle edges.
pub const BARYCENTRIC_TOLERANCE: f64 = 1e-10;

/// Represents the position of a point relative to a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleLocation {
    /// The point is outside the triangle
    OUTSIDE,
    /// The point is on an edge or vertex of the triangle (within numerical tolerance)
    BOUNDARY,
    /// The point is strictly inside the triangle
    INSIDE,
}

impl std::fmt::Display for TriangleLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Barycentric weights of `point` with respect to `triangle`.
///
/// Returns `[wa, wb, wc]` with `wa + wb + wc = 1`, such that the orthogonal
/// projection of `point` onto the triangle's plane equals
/// `wa·a + wb·b + wc·c`. Returns `None` for a degenerate (collinear)
/// triangle.
///
/// # Examples
///
/// ```rust
/// use approx::assert_relative_eq;
/// use facet_address::geometry::point::Point;
/// use facet_address::geometry::predicates::barycentric_coordinates;
///
/// let triangle = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([1.0, 0.0, 0.0]),
///     Point::new([0.0, 1.0, 0.0]),
/// ];
/// let [wa, wb, wc] = barycentric_coordinates(&triangle, &Point::new([0.25, 0.5, 3.0])).unwrap();
/// assert_relative_eq!(wa, 0.25);
/// assert_relative_eq!(wb, 0.25);
/// assert_relative_eq!(wc, 0.5);
/// ```
#[must_use]
pub fn barycentric_coordinates(triangle: &[Point; 3], point: &Point) -> Option<[f64; 3]> {
    let [a, b, c] = triangle;
    let v0 = *c - *a;
    let v1 = *b - *a;
    let v2 = *point - *a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    // Gram determinant = |v0|²·|v1|²·sin²θ
    let denominator = dot00.mul_add(dot11, -(dot01 * dot01));
    let threshold = COLLINEAR_TOLERANCE * COLLINEAR_TOLERANCE * dot00 * dot11;
    if !(denominator > threshold) || !denominator.is_finite() {
        return None;
    }

    let wc = dot11.mul_add(dot02, -(dot01 * dot12)) / denominator;
    let wb = dot00.mul_add(dot12, -(dot01 * dot02)) / denominator;
    Some([1.0 - wb - wc, wb, wc])
}

/// Classify `point` against `triangle` using barycentric sign tests.
///
/// Degenerate triangles contain nothing and always yield
/// [`TriangleLocation::OUTSIDE`].
#[must_use]
pub fn triangle_location(triangle: &[Point; 3], point: &Point) -> TriangleLocation {
    let Some(weights) = barycentric_coordinates(triangle, point) else {
        return TriangleLocation::OUTSIDE;
    };

    if weights.iter().any(|&w| w < -BARYCENTRIC_TOLERANCE || w.is_nan()) {
        TriangleLocation::OUTSIDE
    } else if weights.iter().any(|&w| w <= BARYCENTRIC_TOLERANCE) {
        TriangleLocation::BOUNDARY
    } else {
        TriangleLocation::INSIDE
    }
}

/// Returns `true` if `point` lies in the closed `triangle` (see module docs).
///
/// # Examples
///
/// ```rust
/// use facet_address::geometry::point::Point;
/// use facet_address::geometry::predicates::point_in_triangle;
///
/// let triangle = [
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([2.0, 0.0, 0.0]),
///     Point::new([0.0, 2.0, 0.0]),
/// ];
/// assert!(point_in_triangle(&triangle, &Point::new([0.5, 0.5, 0.0])));
/// assert!(point_in_triangle(&triangle, &Point::new([1.0, 1.0, 0.0])));  // on the hypotenuse
/// assert!(!point_in_triangle(&triangle, &Point::new([1.5, 1.5, 0.0])));
/// ```
#[must_use]
pub fn point_in_triangle(triangle: &[Point; 3], point: &Point) -> bool {
    triangle_location(triangle, point) != TriangleLocation::OUTSIDE
}

// =============================================================================
// TESTS
// =============================================================================
