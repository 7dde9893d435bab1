//! Triangular facets and ordered face sets.
//!
//! A [`Facet`] is a value: three ordered vertices and nothing else. Two facets
//! with the same vertices in the same order are indistinguishable. The winding
//! order does not affect geometric validity, but it is part of the facet's
//! identity for reproducibility: subdivision derives child order from it.
//!
//! A [`FaceSet`] is an ordered sequence of facets whose positions are the
//! facets' identities at one recursion level.
//!
//! # Examples
//!
//! ```rust
//! use approx::assert_relative_eq;
//! use facet_address::core::facet::Facet;
//! use facet_address::geometry::point::Point;
//!
//! let facet = Facet::new([
//!     Point::new([0.0, 0.0, 0.0]),
//!     Point::new([2.0, 0.0, 0.0]),
//!     Point::new([0.0, 2.0, 0.0]),
//! ]);
//! assert_relative_eq!(facet.area(), 2.0);
//! assert!(facet.contains(&Point::new([0.5, 0.5, 0.0])));
//! ```

use crate::geometry::plane::{Plane, PlaneError};
use crate::geometry::point::Point;
use crate::geometry::predicates::{TriangleLocation, point_in_triangle, triangle_location};
use crate::geometry::util::{triangle_area, triangle_centroid, triangle_normal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered collection of facets produced at one recursion level.
pub type FaceSet = Vec<Facet>;

// =============================================================================
// FACET
// =============================================================================

/// A triangular facet defined by three ordered points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facet {
    vertices: [Point; 3],
}

impl Facet {
    /// Create a facet from three ordered vertices.
    #[inline]
    #[must_use]
    pub const fn new(vertices: [Point; 3]) -> Self {
        Self { vertices }
    }

    /// The three vertices in winding order.
    #[inline]
    #[must_use]
    pub const fn vertices(&self) -> &[Point; 3] {
        &self.vertices
    }

    /// Vertex at `index` (0, 1 or 2).
    #[inline]
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    /// The three edges `(v0, v1)`, `(v1, v2)`, `(v2, v0)`.
    #[must_use]
    pub const fn edges(&self) -> [(Point, Point); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Area of the facet.
    #[must_use]
    pub fn area(&self) -> f64 {
        triangle_area(&self.vertices)
    }

    /// Centroid of the facet.
    #[must_use]
    pub fn centroid(&self) -> Point {
        triangle_centroid(&self.vertices)
    }

    /// Unit normal following the winding, or `None` if degenerate.
    #[must_use]
    pub fn normal(&self) -> Option<Point> {
        triangle_normal(&self.vertices)
    }

    /// Supporting plane of the facet.
    ///
    /// # Errors
    ///
    /// Returns [`PlaneError::Degenerate`] if the vertices are collinear.
    pub fn plane(&self) -> Result<Plane, PlaneError> {
        let [a, b, c] = &self.vertices;
        Plane::from_points(a, b, c)
    }

    /// Returns `true` if `point` lies in the closed facet.
    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        point_in_triangle(&self.vertices, point)
    }

    /// Classify `point` against the facet.
    #[must_use]
    pub fn location(&self, point: &Point) -> TriangleLocation {
        triangle_location(&self.vertices, point)
    }

    /// Returns `true` if `vertex` is bit-identical to one of the facet's
    /// vertices.
    #[must_use]
    pub fn has_vertex(&self, vertex: &Point) -> bool {
        self.vertices.iter().any(|v| v == vertex)
    }
}

impl From<[Point; 3]> for Facet {
    fn from(vertices: [Point; 3]) -> Self {
        Self::new(vertices)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.vertices;
        write!(f, "[{a}, {b}, {c}]")
    }
}

// =============================================================================
// EDGE KEYS
// =============================================================================

/// Canonical identifier for an (undirected) edge between two exact points.
///
/// Endpoints are compared by their coordinate bit patterns and reordered so
/// that `(a, b)` and `(b, a)` map to the same key. Positive and negative zero
/// are folded together.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    v0: [u64; 3],
    v1: [u64; 3],
}

impl EdgeKey {
    /// Creates a new canonical edge key.
    #[must_use]
    pub fn new(a: &Point, b: &Point) -> Self {
        let ka = point_bits(a);
        let kb = point_bits(b);
        if ka <= kb {
            Self { v0: ka, v1: kb }
        } else {
            Self { v0: kb, v1: ka }
        }
    }
}

fn point_bits(point: &Point) -> [u64; 3] {
    // -0.0 + 0.0 == +0.0
    point.coords().map(|c| (c + 0.0).to_bits())
}

// =============================================================================
// TESTS
// =============================================================================
