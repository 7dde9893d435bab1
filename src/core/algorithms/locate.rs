//! Point location within an ordered face set.
//!
//! Finds the facet of a [`FaceSet`](crate::core::facet::FaceSet) that contains
//! a query point by a linear scan in index order. Face sets here are small
//! (60 base faces, 4 children per level), so no spatial index is needed.
//!
//! # Containment rule
//!
//! [`ContainmentRule`] decides which point is tested against each facet:
//!
//! - [`ContainmentRule::Central`] (default) tests the *central projection*
//!   of the query point onto the facet's plane, i.e. where the ray from the
//!   origin through the point meets the plane. For a target on the sphere it
//!   selects the facet the target lies "above", and never a facet on the far
//!   side of the origin. Planes through the origin fall back to the raw
//!   point.
//! - [`ContainmentRule::Planar`] tests the raw point with
//!   [`point_in_triangle`], which measures it by its orthogonal projection
//!   onto the facet's plane. A target off the mesh surface can then land in
//!   a facet on the far side of the sphere, or in none at all.
//!
//! Both rules agree on points that already lie on a facet plane, which is
//! every probe below the base level of a localization.
//!
//! Triangles are closed, so a point on an edge shared by two facets is
//! contained by both; the scan returns the lower index. This makes boundary
//! points resolve to one specific facet every time.
//!
//! # Fallback
//!
//! When no facet contains the point (floating-point error at a boundary, or a
//! point nowhere near the face set), location never fails. The active
//! [`FallbackPolicy`] picks a facet and the result is reported as
//! [`LocateResult::Fallback`], with a `tracing` warning.

use crate::core::facet::Facet;
use crate::geometry::point::Point;
use crate::geometry::predicates::point_in_triangle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which facet to choose when no facet contains the query point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Choose facet 0. Keeps previously recorded addresses reproducible.
    #[default]
    FirstFacet,
    /// Choose the facet whose centroid is nearest to the query point (ties go
    /// to the lower index). Changing to this policy can change recorded
    /// addresses of boundary-adjacent targets.
    NearestCentroid,
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstFacet => write!(f, "first-facet"),
            Self::NearestCentroid => write!(f, "nearest-centroid"),
        }
    }
}

/// Which point is tested for containment in each facet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainmentRule {
    /// Test the point where the ray from the origin through the query point
    /// meets the facet's plane.
    #[default]
    Central,
    /// Test the raw query point against the closed triangle.
    Planar,
}

impl ContainmentRule {
    /// Returns `true` if `facet` contains `point` under this rule.
    /// Degenerate facets contain nothing.
    #[must_use]
    pub fn contains(self, facet: &Facet, point: &Point) -> bool {
        match self {
            Self::Central => facet_contains(facet, point),
            Self::Planar => point_in_triangle(facet.vertices(), point),
        }
    }
}

impl fmt::Display for ContainmentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Central => write!(f, "central"),
            Self::Planar => write!(f, "planar"),
        }
    }
}

/// Result of a point location query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    /// The facet at this index contains the point.
    Contained(usize),
    /// No facet contains the point; this index was chosen by the fallback policy.
    Fallback(usize),
}

impl LocateResult {
    /// The selected facet index, regardless of how it was chosen.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Contained(index) | Self::Fallback(index) => index,
        }
    }

    /// Returns `true` if the fallback policy chose the facet.
    #[inline]
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Error during point location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// The face set has no facets
    #[error("Cannot locate in an empty face set")]
    EmptyFaceSet,
}

/// Returns `true` if the central projection of `point` onto `facet`'s plane
/// lies in the closed facet. Degenerate facets contain nothing.
#[must_use]
pub fn facet_contains(facet: &Facet, point: &Point) -> bool {
    let Ok(plane) = facet.plane() else {
        return false;
    };
    plane
        .central_projection(point)
        .is_some_and(|probe| point_in_triangle(facet.vertices(), &probe))
}

/// Locate `point` in `faces` with the default [`FallbackPolicy::FirstFacet`].
///
/// Returns the index of the first facet containing the point, or `0` if none
/// does.
///
/// # Errors
///
/// Returns [`LocateError::EmptyFaceSet`] if `faces` is empty.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::locate::locate;
/// use facet_address::core::algorithms::subdivision::subdivide;
/// use facet_address::core::facet::Facet;
/// use facet_address::geometry::point::Point;
///
/// let parent = Facet::new([
///     Point::new([0.0, 0.0, 1.0]),
///     Point::new([4.0, 0.0, 1.0]),
///     Point::new([0.0, 4.0, 1.0]),
/// ]);
/// let children = subdivide(&parent);
///
/// assert_eq!(locate(&children, &Point::new([0.5, 0.5, 1.0])).unwrap(), 0);
/// assert_eq!(locate(&children, &Point::new([3.0, 0.5, 1.0])).unwrap(), 1);
/// assert_eq!(locate(&children, &Point::new([0.5, 3.0, 1.0])).unwrap(), 2);
/// assert_eq!(locate(&children, &Point::new([1.5, 1.5, 1.0])).unwrap(), 3);
/// ```
pub fn locate(faces: &[Facet], point: &Point) -> Result<usize, LocateError> {
    locate_with_policy(faces, point, FallbackPolicy::FirstFacet).map(LocateResult::index)
}

/// Locate `point` in `faces` under [`ContainmentRule::Central`], choosing a
/// facet with `policy` when none contains it.
///
/// # Errors
///
/// Returns [`LocateError::EmptyFaceSet`] if `faces` is empty.
pub fn locate_with_policy(
    faces: &[Facet],
    point: &Point,
    policy: FallbackPolicy,
) -> Result<LocateResult, LocateError> {
    locate_with(faces, point, ContainmentRule::Central, policy)
}

/// Locate `point` in `faces` under `rule`, choosing a facet with `policy`
/// when none contains it.
///
/// # Errors
///
/// Returns [`LocateError::EmptyFaceSet`] if `faces` is empty.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::locate::{
///     ContainmentRule, FallbackPolicy, LocateResult, locate_with,
/// };
/// use facet_address::core::base_mesh::build_base_mesh;
/// use facet_address::geometry::point::Point;
///
/// let mesh = build_base_mesh(100.0).unwrap();
/// let target = Point::new([100.0, 0.0, 0.0]);
///
/// let central = locate_with(&mesh, &target, ContainmentRule::Central, FallbackPolicy::FirstFacet);
/// assert_eq!(central.unwrap(), LocateResult::Contained(0));
///
/// // The raw point falls inside the far-side face 5 when measured in its plane
/// let planar = locate_with(&mesh, &target, ContainmentRule::Planar, FallbackPolicy::FirstFacet);
/// assert_eq!(planar.unwrap(), LocateResult::Contained(5));
/// ```
pub fn locate_with(
    faces: &[Facet],
    point: &Point,
    rule: ContainmentRule,
    policy: FallbackPolicy,
) -> Result<LocateResult, LocateError> {
    if faces.is_empty() {
        return Err(LocateError::EmptyFaceSet);
    }

    if let Some(index) = faces.iter().position(|facet| rule.contains(facet, point)) {
        return Ok(LocateResult::Contained(index));
    }

    let index = match policy {
        FallbackPolicy::FirstFacet => 0,
        FallbackPolicy::NearestCentroid => nearest_centroid(faces, point),
    };
    tracing::warn!(
        %point,
        face_count = faces.len(),
        %rule,
        %policy,
        index,
        "no facet contains point; using fallback facet"
    );
    Ok(LocateResult::Fallback(index))
}

fn nearest_centroid(faces: &[Facet], point: &Point) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, facet) in faces.iter().enumerate() {
        let distance = (facet.centroid() - *point).length_squared();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

// =============================================================================
// TESTS
// =============================================================================
