//! Planes through three points and line/plane intersection.
//!
//! A [`Plane`] is stored in Hessian normal form, `n · x + constant = 0`, with
//! `n` a unit vector. Planes are built from facet vertices, so the normal's
//! orientation follows the facet's winding (right-hand rule).

use crate::geometry::point::Point;

/// Relative tolerance below which three points are considered collinear.
///
/// Compared against `|ab × ac| / (|ab| · |ac|)`, i.e. the sine of the angle at
/// the first vertex.
pub const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// Relative tolerance below which a line is considered parallel to a plane.
///
/// Compared against the cosine of the angle between the line direction and the
/// plane normal.
pub const PARALLEL_TOLERANCE: f64 = 1e-12;

/// Error raised when three points do not span a plane.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaneError {
    /// The points are collinear or coincident.
    #[error("Degenerate geometry: points {a}, {b}, {c} are collinear")]
    Degenerate {
        /// First point
        a: Point,
        /// Second point
        b: Point,
        /// Third point
        c: Point,
    },
}

/// An oriented plane in Hessian normal form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    normal: Point,
    constant: f64,
}

impl Plane {
    /// Build the plane through `a`, `b` and `c`.
    ///
    /// The normal is `(b - a) × (c - a)`, normalized, so counter-clockwise
    /// points (seen from the normal's tip) give an outward normal.
    ///
    /// # Errors
    ///
    /// Returns [`PlaneError::Degenerate`] if the points are collinear within
    /// [`COLLINEAR_TOLERANCE`], including the case where two of them coincide.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facet_address::geometry::plane::Plane;
    /// use facet_address::geometry::point::Point;
    ///
    /// let plane = Plane::from_points(
    ///     &Point::new([0.0, 0.0, 1.0]),
    ///     &Point::new([1.0, 0.0, 1.0]),
    ///     &Point::new([0.0, 1.0, 1.0]),
    /// )
    /// .unwrap();
    /// assert_eq!(plane.normal(), Point::new([0.0, 0.0, 1.0]));
    /// assert_eq!(plane.constant(), -1.0);
    ///
    /// let collinear = Plane::from_points(
    ///     &Point::new([0.0, 0.0, 0.0]),
    ///     &Point::new([1.0, 1.0, 1.0]),
    ///     &Point::new([2.0, 2.0, 2.0]),
    /// );
    /// assert!(collinear.is_err());
    /// ```
    pub fn from_points(a: &Point, b: &Point, c: &Point) -> Result<Self, PlaneError> {
        let ab = *b - *a;
        let ac = *c - *a;
        let cross = ab.cross(&ac);
        let cross_length = cross.length();
        let scale = ab.length() * ac.length();

        if !(cross_length > COLLINEAR_TOLERANCE * scale) || !cross_length.is_finite() {
            return Err(PlaneError::Degenerate {
                a: *a,
                b: *b,
                c: *c,
            });
        }

        let normal = cross / cross_length;
        Ok(Self {
            normal,
            constant: -normal.dot(a),
        })
    }

    /// Unit normal of the plane.
    #[inline]
    #[must_use]
    pub const fn normal(&self) -> Point {
        self.normal
    }

    /// Signed distance from the origin along `-normal`.
    #[inline]
    #[must_use]
    pub const fn constant(&self) -> f64 {
        self.constant
    }

    /// Signed distance from `point` to the plane, positive on the normal side.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: &Point) -> f64 {
        self.normal.dot(point) + self.constant
    }

    /// Orthogonal projection of `point` onto the plane.
    #[must_use]
    pub fn project_point(&self, point: &Point) -> Point {
        *point - self.normal * self.signed_distance(point)
    }

    /// Returns `true` if the plane passes through the origin, relative to the
    /// magnitude `reference`.
    #[must_use]
    pub fn contains_origin(&self, reference: f64) -> bool {
        self.constant.abs() <= PARALLEL_TOLERANCE * reference
    }

    /// Intersect the infinite line through `line_start` and `line_end` with the
    /// plane.
    ///
    /// Returns `None` when the line is parallel to the plane (within
    /// [`PARALLEL_TOLERANCE`]) or when the two points coincide. The
    /// intersection is not restricted to the segment between the points.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facet_address::geometry::plane::Plane;
    /// use facet_address::geometry::point::Point;
    ///
    /// let plane = Plane::from_points(
    ///     &Point::new([0.0, 0.0, 2.0]),
    ///     &Point::new([1.0, 0.0, 2.0]),
    ///     &Point::new([0.0, 1.0, 2.0]),
    /// )
    /// .unwrap();
    ///
    /// let hit = plane
    ///     .intersect_line(&Point::ORIGIN, &Point::new([0.5, 0.5, 1.0]))
    ///     .unwrap();
    /// assert_eq!(hit, Point::new([1.0, 1.0, 2.0]));
    ///
    /// let parallel = plane.intersect_line(&Point::ORIGIN, &Point::new([1.0, 0.0, 0.0]));
    /// assert!(parallel.is_none());
    /// ```
    #[must_use]
    pub fn intersect_line(&self, line_start: &Point, line_end: &Point) -> Option<Point> {
        let direction = *line_end - *line_start;
        let denominator = self.normal.dot(&direction);

        if !(denominator.abs() > PARALLEL_TOLERANCE * direction.length()) {
            return None;
        }

        let t = -self.signed_distance(line_start) / denominator;
        Some(*line_start + direction * t)
    }

    /// Central projection of `point` onto the plane: the intersection of the
    /// ray from the origin through `point`.
    ///
    /// If the plane passes through the origin, no ray from the origin can
    /// select a unique point, and `point` is returned unchanged. Returns `None`
    /// when the ray is parallel to the plane or only meets it behind the
    /// origin.
    #[must_use]
    pub fn central_projection(&self, point: &Point) -> Option<Point> {
        let reach = point.length();
        if self.contains_origin(reach) {
            return Some(*point);
        }

        let denominator = self.normal.dot(point);
        if !(denominator.abs() > PARALLEL_TOLERANCE * reach) {
            return None;
        }

        let t = -self.constant / denominator;
        (t > 0.0).then(|| *point * t)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tilted_plane() -> Plane {
        Plane::from_points(
            &Point::new([4.0, 0.0, 0.0]),
            &Point::new([0.0, 4.0, 0.0]),
            &Point::new([0.0, 0.0, 4.0]),
        )
        .unwrap()
    }

    #[test]
    fn normal_follows_winding() {
        let plane = tilted_plane();
        let expected = 1.0 / 3.0_f64.sqrt();
        assert_relative_eq!(plane.normal().x(), expected, epsilon = 1e-15);
        assert_relative_eq!(plane.normal().y(), expected, epsilon = 1e-15);
        assert_relative_eq!(plane.normal().z(), expected, epsilon = 1e-15);
        assert!(plane.signed_distance(&Point::ORIGIN) < 0.0);
    }

    #[test]
    fn coincident_points_are_degenerate() {
        let p = Point::new([1.0, 2.0, 3.0]);
        let result = Plane::from_points(&p, &p, &Point::new([0.0, 0.0, 0.0]));
        assert!(matches!(result, Err(PlaneError::Degenerate { .. })));
    }

    #[test]
    fn nearly_collinear_points_are_degenerate() {
        let result = Plane::from_points(
            &Point::new([0.0, 0.0, 0.0]),
            &Point::new([1.0, 0.0, 0.0]),
            &Point::new([2.0, 1e-14, 0.0]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn intersect_line_extends_beyond_segment() {
        let plane = tilted_plane();
        let hit = plane
            .intersect_line(&Point::ORIGIN, &Point::new([0.1, 0.1, 0.1]))
            .unwrap();
        assert_relative_eq!(plane.signed_distance(&hit), 0.0, epsilon = 1e-12);
        assert_relative_eq!(hit.x(), 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn intersect_line_with_zero_length_direction_is_none() {
        let plane = tilted_plane();
        let p = Point::new([1.0, 1.0, 1.0]);
        assert!(plane.intersect_line(&p, &p).is_none());
    }

    #[test]
    fn central_projection_rejects_points_behind_origin() {
        let plane = tilted_plane();
        assert!(plane.central_projection(&Point::new([1.0, 1.0, 1.0])).is_some());
        assert!(
            plane
                .central_projection(&Point::new([-1.0, -1.0, -1.0]))
                .is_none()
        );
    }

    #[test]
    fn central_projection_through_origin_plane_keeps_point() {
        let plane = Plane::from_points(
            &Point::new([0.0, 0.0, 0.0]),
            &Point::new([2.0, 0.0, 0.0]),
            &Point::new([0.0, 2.0, 0.0]),
        )
        .unwrap();
        let p = Point::new([0.5, 0.5, 0.0]);
        assert_eq!(plane.central_projection(&p), Some(p));
    }

    #[test]
    fn project_point_lands_on_plane() {
        let plane = tilted_plane();
        let projected = plane.project_point(&Point::new([5.0, -2.0, 7.0]));
        assert_relative_eq!(plane.signed_distance(&projected), 0.0, epsilon = 1e-12);
    }
}
