//! Midpoint subdivision of triangular facets.
//!
//! A facet `(p1, p2, p3)` is split at its edge midpoints
//! `m12 = lerp(p1, p2, ½)`, `m23 = lerp(p2, p3, ½)` and `m31 = lerp(p3, p1, ½)`
//! into four children, always emitted in this order:
//!
//! | Index | Child | Role |
//! |---|---|---|
//! | 0 | `(p1, m12, m31)` | corner at `p1` |
//! | 1 | `(m12, p2, m23)` | corner at `p2` |
//! | 2 | `(m23, m31, p3)` | corner at `p3` |
//! | 3 | `(m23, m31, m12)` | center |
//!
//! The vertex order of every child, including the rotated order of the
//! center child, is part of the addressing convention: child indices are
//! recorded in addresses and keyed by glyph tables, and the order of each
//! child's vertices determines the order of *its* children.
//!
//! Child 2 is wound opposite to its parent: its normal, and the normal of its
//! plane, point the other way. Children 0, 1 and 3 keep the parent's winding.
//!
//! Subdivision is pure. The same input always yields bit-identical output.

use crate::core::facet::{FaceSet, Facet};

/// Number of children produced by one subdivision step.
pub const CHILDREN_PER_FACET: usize = 4;

/// Index of the central child.
pub const CENTER_CHILD: usize = 3;

/// Split `facet` into its four children (see module docs for the order).
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::subdivision::subdivide;
/// use facet_address::core::facet::Facet;
/// use facet_address::geometry::point::Point;
///
/// let parent = Facet::new([
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([2.0, 0.0, 0.0]),
///     Point::new([0.0, 2.0, 0.0]),
/// ]);
/// let children = subdivide(&parent);
/// assert_eq!(children.len(), 4);
///
/// let m12 = Point::new([1.0, 0.0, 0.0]);
/// let m23 = Point::new([1.0, 1.0, 0.0]);
/// let m31 = Point::new([0.0, 1.0, 0.0]);
/// assert_eq!(children[3], Facet::new([m23, m31, m12]));
/// ```
#[must_use]
pub fn subdivide(facet: &Facet) -> FaceSet {
    split(facet).to_vec()
}

/// Split `facet` recursively `depth` times, returning the `4^depth` tiles in
/// nested order.
///
/// The tile at position `i` is the one reached by the child indices
/// `c1, …, c_depth` with `i = Σ c_k · 4^(depth - k)`, i.e. the base-4 digits
/// of `i`. `depth = 0` yields the facet itself.
///
/// Memory grows as `4^depth`; the hierarchical driver never materializes more
/// than one level, so this is meant for small depths (rendering a tile grid
/// or keying a tile glyph table).
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::subdivision::subdivide_to_depth;
/// use facet_address::core::facet::Facet;
/// use facet_address::geometry::point::Point;
///
/// let parent = Facet::new([
///     Point::new([0.0, 0.0, 0.0]),
///     Point::new([8.0, 0.0, 0.0]),
///     Point::new([0.0, 8.0, 0.0]),
/// ]);
/// assert_eq!(subdivide_to_depth(&parent, 3).len(), 64);
/// ```
#[must_use]
pub fn subdivide_to_depth(facet: &Facet, depth: usize) -> FaceSet {
    let capacity = u32::try_from(depth)
        .ok()
        .and_then(|d| CHILDREN_PER_FACET.checked_pow(d))
        .unwrap_or(0);
    let mut tiles = Vec::with_capacity(capacity);
    collect_tiles(facet, depth, &mut tiles);
    tiles
}

fn collect_tiles(facet: &Facet, depth: usize, tiles: &mut FaceSet) {
    if depth == 0 {
        tiles.push(*facet);
        return;
    }
    for child in &split(facet) {
        collect_tiles(child, depth - 1, tiles);
    }
}

fn split(facet: &Facet) -> [Facet; CHILDREN_PER_FACET] {
    let [p1, p2, p3] = *facet.vertices();
    let m12 = p1.lerp(&p2, 0.5);
    let m23 = p2.lerp(&p3, 0.5);
    let m31 = p3.lerp(&p1, 0.5);

    [
        Facet::new([p1, m12, m31]),
        Facet::new([m12, p2, m23]),
        Facet::new([m23, m31, p3]),
        Facet::new([m23, m31, m12]),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
