//! Hierarchical localization of a target point.
//!
//! Starting from the base face that contains the target, each level
//! subdivides the current facet, projects the target onto the facet's plane
//! along the line from the origin, and picks the child containing that probe.
//! The child indices accumulate into a [`FacetAddress`].
//!
//! Only the chosen path is kept: each level stores the four children it
//! generated (for rendering subdivision guides) and which one was chosen.
//! Cost is linear in the depth.
//!
//! # Recovery
//!
//! - When the line from the origin through the target is parallel to the
//!   facet plane, the level reuses the previous probe (the raw target at the
//!   first level). The level records `projected = false`.
//! - When no child contains the probe, the [`FallbackPolicy`] chooses one and
//!   the level records `fallback = true`.
//! - A degenerate facet aborts localization with
//!   [`LocalizationError::DegenerateFacet`].

use crate::core::address::FacetAddress;
use crate::core::algorithms::locate::{ContainmentRule, FallbackPolicy, LocateResult, locate_with};
use crate::core::algorithms::subdivision::subdivide;
use crate::core::base_mesh::build_base_mesh;
use crate::core::config::{ConfigError, LocatorConfig};
use crate::core::facet::{FaceSet, Facet};
use crate::core::glyphs::{Label, LabelResolver};
use crate::geometry::plane::PlaneError;
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};

/// Largest supported number of subdivision levels.
///
/// Deeper facets are smaller than the rounding error of their own vertices.
pub const MAX_SUBDIVISION_DEPTH: usize = 32;

/// Errors that abort a localization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocalizationError {
    /// There is no base face to start from.
    #[error("Cannot localize on an empty base mesh")]
    EmptyBaseMesh,

    /// The requested depth exceeds [`MAX_SUBDIVISION_DEPTH`].
    #[error("Depth {requested} exceeds the maximum of {max}")]
    DepthOutOfRange {
        /// Requested depth
        requested: usize,
        /// Largest accepted depth
        max: usize,
    },

    /// The facet being subdivided has no plane.
    #[error("Facet subdivided at level {level} is degenerate: {source}")]
    DegenerateFacet {
        /// Level (1-based) at which the facet was subdivided
        level: usize,
        /// Why the plane could not be built
        #[source]
        source: PlaneError,
    },

    /// Subdivision produced nothing to choose from.
    #[error("No child facets to choose from at level {level}")]
    EmptyLevel {
        /// Level (1-based)
        level: usize,
    },
}

/// One subdivision level of a localization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// The children generated at this level, in subdivision order.
    pub faces: FaceSet,
    /// Index of the chosen child.
    pub index: usize,
    /// The point tested for containment.
    pub probe: Point,
    /// `false` if the target could not be projected and the previous probe
    /// was reused.
    pub projected: bool,
    /// `true` if no child contained the probe.
    pub fallback: bool,
}

impl Level {
    /// The chosen child, or `None` if `index` does not name one of `faces`.
    ///
    /// Levels built by [`localize_with`] always name a child; a level read
    /// back from untrusted data may not.
    #[must_use]
    pub fn chosen(&self) -> Option<Facet> {
        self.faces.get(self.index).copied()
    }
}

/// The result of localizing a target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    /// Base-face index followed by one child index per level.
    pub address: FacetAddress,
    /// One entry per subdivision level, outermost first.
    pub levels: Vec<Level>,
    /// The facet named by `address`.
    pub chosen: Facet,
    /// The target as given.
    pub target: Point,
    /// `true` if no base face contained the target.
    pub base_fallback: bool,
    /// The fallback policy in effect.
    pub policy: FallbackPolicy,
    /// The containment rule in effect.
    #[serde(default)]
    pub containment: ContainmentRule,
}

impl Localization {
    /// Number of subdivision levels performed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.address.depth()
    }

    /// The face set generated at every level, outermost first.
    pub fn face_sets(&self) -> impl ExactSizeIterator<Item = &FaceSet> + '_ {
        self.levels.iter().map(|level| &level.faces)
    }

    /// Number of levels, the base level included, at which the fallback
    /// policy chose the facet.
    #[must_use]
    pub fn fallback_count(&self) -> usize {
        usize::from(self.base_fallback) + self.levels.iter().filter(|level| level.fallback).count()
    }

    /// Angle in radians, seen from the origin, between the target and the
    /// centroid of the chosen facet.
    #[must_use]
    pub fn angular_error(&self) -> f64 {
        self.target.angle_to(&self.chosen.centroid())
    }
}

/// Localize `target` on `base_mesh` to `max_depth` levels with the default
/// [`ContainmentRule::Central`] and [`FallbackPolicy::FirstFacet`].
///
/// `max_depth` subdivisions are always performed; with `max_depth = 0` the
/// address holds only the base-face index.
///
/// # Errors
///
/// See [`localize_with_policy`].
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::localization::localize;
/// use facet_address::core::base_mesh::build_base_mesh;
/// use facet_address::geometry::point::Point;
///
/// let mesh = build_base_mesh(100.0).unwrap();
/// let target = Point::new([0.371_669, -0.036_043, 0.927_665]) * 100.0;
///
/// let localization = localize(&mesh, &target, 4).unwrap();
/// assert_eq!(localization.address.len(), 5);
/// assert_eq!(localization.levels.len(), 4);
/// assert_eq!(localization.address.follow(&mesh).unwrap(), localization.chosen);
/// ```
pub fn localize(
    base_mesh: &[Facet],
    target: &Point,
    max_depth: usize,
) -> Result<Localization, LocalizationError> {
    localize_with_policy(base_mesh, target, max_depth, FallbackPolicy::FirstFacet)
}

/// Localize `target` on `base_mesh` to `max_depth` levels under
/// [`ContainmentRule::Central`], using `policy` whenever no facet contains
/// the probe.
///
/// # Errors
///
/// See [`localize_with`].
pub fn localize_with_policy(
    base_mesh: &[Facet],
    target: &Point,
    max_depth: usize,
    policy: FallbackPolicy,
) -> Result<Localization, LocalizationError> {
    localize_with(base_mesh, target, max_depth, ContainmentRule::Central, policy)
}

/// Localize `target` on `base_mesh` to `max_depth` levels, testing
/// containment under `rule` and using `policy` whenever no facet contains
/// the probe.
///
/// The rule only matters for the base face: every deeper probe lies on the
/// plane of the facet being subdivided.
///
/// # Errors
///
/// - [`LocalizationError::EmptyBaseMesh`] if `base_mesh` is empty
/// - [`LocalizationError::DepthOutOfRange`] if `max_depth` exceeds
///   [`MAX_SUBDIVISION_DEPTH`]
/// - [`LocalizationError::DegenerateFacet`] if a facet on the path is
///   degenerate
///
/// Both input checks run before any subdivision.
pub fn localize_with(
    base_mesh: &[Facet],
    target: &Point,
    max_depth: usize,
    rule: ContainmentRule,
    policy: FallbackPolicy,
) -> Result<Localization, LocalizationError> {
    if max_depth > MAX_SUBDIVISION_DEPTH {
        return Err(LocalizationError::DepthOutOfRange {
            requested: max_depth,
            max: MAX_SUBDIVISION_DEPTH,
        });
    }
    let base = locate_with(base_mesh, target, rule, policy)
        .map_err(|_| LocalizationError::EmptyBaseMesh)?;

    let mut address = FacetAddress::new(base.index());
    let mut current = base_mesh[base.index()];
    let mut probe = *target;
    let mut levels = Vec::with_capacity(max_depth);

    for level in 1..=max_depth {
        let plane = current
            .plane()
            .map_err(|source| LocalizationError::DegenerateFacet { level, source })?;
        let children = subdivide(&current);

        let projected = match plane.intersect_line(&Point::ORIGIN, target) {
            Some(point) => {
                probe = point;
                true
            }
            None => {
                tracing::warn!(level, %target, "target line is parallel to the facet; reusing previous probe");
                false
            }
        };

        let chosen = locate_with(&children, &probe, rule, policy)
            .map_err(|_| LocalizationError::EmptyLevel { level })?;
        let index = chosen.index();
        tracing::debug!(level, index, projected, fallback = chosen.is_fallback(), "chose child facet");

        // Subdivision yields exactly CHILDREN_PER_FACET children, so the index is valid.
        address
            .push_child(index)
            .map_err(|_| LocalizationError::EmptyLevel { level })?;
        current = children[index];
        levels.push(Level {
            faces: children,
            index,
            probe,
            projected,
            fallback: chosen.is_fallback(),
        });
    }

    Ok(Localization {
        address,
        levels,
        chosen: current,
        target: *target,
        base_fallback: matches!(base, LocateResult::Fallback(_)),
        policy,
        containment: rule,
    })
}

/// A base mesh, glyph tables and settings bundled for repeated localization.
///
/// The base mesh is built once on construction and shared read-only by every
/// call, so a `Localizer` can serve concurrent queries.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::localization::Localizer;
/// use facet_address::core::config::LocatorConfigBuilder;
/// use facet_address::geometry::point::Point;
///
/// let config = LocatorConfigBuilder::default().size(1.0).max_depth(2).build().unwrap();
/// let localizer = Localizer::new(config).unwrap();
///
/// let localization = localizer.localize(&Point::new([0.0, 0.0, 1.0])).unwrap();
/// let labels = localizer.labels(&localization);
/// assert_eq!(labels.len(), 3);
/// assert!(labels[0].text.starts_with('F'));
/// ```
#[derive(Clone, Debug)]
pub struct Localizer {
    config: LocatorConfig,
    base_mesh: FaceSet,
    resolver: LabelResolver,
}

impl Localizer {
    /// Validate `config`, build the base mesh and locate the markers.
    ///
    /// Markers are directions and are always located under
    /// [`ContainmentRule::Central`], whatever the configured rule.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn new(config: LocatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_mesh = build_base_mesh(config.size)?;
        let resolver = LabelResolver::with_reach(
            config.glyphs.clone(),
            config.markers.clone(),
            &base_mesh,
            config.marker_reach,
        )?;
        Ok(Self {
            config,
            base_mesh,
            resolver,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// The base mesh.
    #[must_use]
    pub fn base_mesh(&self) -> &[Facet] {
        &self.base_mesh
    }

    /// The label resolver.
    #[must_use]
    pub const fn resolver(&self) -> &LabelResolver {
        &self.resolver
    }

    /// Localize `target` to the configured depth.
    ///
    /// # Errors
    ///
    /// See [`localize_with`].
    pub fn localize(&self, target: &Point) -> Result<Localization, LocalizationError> {
        self.localize_to_depth(target, self.config.max_depth)
    }

    /// Localize `target` to `depth` levels instead of the configured depth.
    ///
    /// # Errors
    ///
    /// See [`localize_with`].
    pub fn localize_to_depth(
        &self,
        target: &Point,
        depth: usize,
    ) -> Result<Localization, LocalizationError> {
        localize_with(
            &self.base_mesh,
            target,
            depth,
            self.config.containment,
            self.config.fallback,
        )
    }

    /// One label per address component of `localization`.
    #[must_use]
    pub fn labels(&self, localization: &Localization) -> Vec<Label> {
        self.resolver.labels(&localization.address)
    }

    /// Tile glyph for `localization` at the configured tile depth, if any.
    #[must_use]
    pub fn tile_label(&self, localization: &Localization) -> Option<Label> {
        self.resolver
            .resolve_tile(&localization.address, self.config.tile_depth)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::locate::locate;
    use crate::geometry::plane::PlaneError;
    use approx::assert_relative_eq;

    fn mesh() -> FaceSet {
        build_base_mesh(100.0).unwrap()
    }

    fn source_target() -> Point {
        Point::new([0.371_669_402_971_85, -0.036_043_090_065_277, 0.927_665_214_693_911]) * 100.0
    }

    #[test]
    fn depth_zero_returns_base_index_only() {
        let mesh = mesh();
        let target = source_target();
        let localization = localize(&mesh, &target, 0).unwrap();
        assert_eq!(localization.address.components(), &[locate(&mesh, &target).unwrap()]);
        assert!(localization.levels.is_empty());
        assert_eq!(localization.chosen, mesh[localization.address.base()]);
    }

    #[test]
    fn each_level_subdivides_the_previous_choice() {
        let mesh = mesh();
        let localization = localize(&mesh, &source_target(), 5).unwrap();
        assert_eq!(localization.depth(), 5);

        let mut parent = mesh[localization.address.base()];
        for (level, &child) in localization.levels.iter().zip(localization.address.children()) {
            assert_eq!(level.faces, subdivide(&parent));
            assert_eq!(level.index, child);
            assert!(level.projected);
            assert!(!level.fallback);
            parent = level.chosen().unwrap();
        }
        assert_eq!(parent, localization.chosen);
        assert_eq!(localization.fallback_count(), 0);
    }

    #[test]
    fn probes_lie_on_the_target_ray() {
        let mesh = mesh();
        let target = source_target();
        let localization = localize(&mesh, &target, 3).unwrap();
        for level in &localization.levels {
            assert_relative_eq!(level.probe.angle_to(&target), 0.0, epsilon = 1e-9);
            assert!(level.chosen().unwrap().contains(&level.probe));
        }
    }

    #[test]
    fn angular_error_shrinks_with_depth() {
        let mesh = mesh();
        let target = source_target();
        let shallow = localize(&mesh, &target, 1).unwrap().angular_error();
        let deep = localize(&mesh, &target, 8).unwrap().angular_error();
        assert!(deep < shallow);
        assert!(deep < 1e-2);
    }

    #[test]
    fn parallel_target_line_reuses_previous_probe() {
        let base = vec![Facet::new([
            Point::new([0.0, 0.0, 1.0]),
            Point::new([1.0, 0.0, 1.0]),
            Point::new([0.0, 1.0, 1.0]),
        ])];
        let target = Point::new([1.0, 1.0, 0.0]);
        let localization = localize(&base, &target, 2).unwrap();

        assert!(localization.base_fallback);
        for level in &localization.levels {
            assert!(!level.projected);
            assert_eq!(level.probe, target);
            assert!(level.fallback);
            assert_eq!(level.index, 0);
        }
        assert_eq!(localization.fallback_count(), 3);
    }

    #[test]
    fn degenerate_facet_aborts() {
        let base = vec![Facet::new([
            Point::new([1.0, 0.0, 0.0]),
            Point::new([2.0, 0.0, 0.0]),
            Point::new([3.0, 0.0, 0.0]),
        ])];
        let target = Point::new([1.0, 0.0, 0.0]);
        assert!(localize(&base, &target, 0).is_ok());
        assert!(matches!(
            localize(&base, &target, 1),
            Err(LocalizationError::DegenerateFacet {
                level: 1,
                source: PlaneError::Degenerate { .. }
            })
        ));
    }

    #[test]
    fn invalid_inputs_fail_fast() {
        let target = Point::new([0.0, 0.0, 1.0]);
        assert_eq!(localize(&[], &target, 2), Err(LocalizationError::EmptyBaseMesh));
        assert_eq!(
            localize(&mesh(), &target, MAX_SUBDIVISION_DEPTH + 1),
            Err(LocalizationError::DepthOutOfRange {
                requested: MAX_SUBDIVISION_DEPTH + 1,
                max: MAX_SUBDIVISION_DEPTH
            })
        );
    }

    #[test]
    fn localizer_uses_configured_depth_and_policy() {
        let config = LocatorConfig {
            max_depth: 4,
            fallback: FallbackPolicy::NearestCentroid,
            ..LocatorConfig::default()
        };
        let localizer = Localizer::new(config).unwrap();
        let localization = localizer.localize(&source_target()).unwrap();
        assert_eq!(localization.depth(), 4);
        assert_eq!(localization.policy, FallbackPolicy::NearestCentroid);
        assert_eq!(
            localization,
            localize_with_policy(
                localizer.base_mesh(),
                &source_target(),
                4,
                FallbackPolicy::NearestCentroid
            )
            .unwrap()
        );
    }

    #[test]
    fn containment_rule_changes_only_the_base_face() {
        let mesh = mesh();
        let target = Point::new([100.0, 0.0, 0.0]);
        let central = localize_with(
            &mesh,
            &target,
            3,
            ContainmentRule::Central,
            FallbackPolicy::FirstFacet,
        )
        .unwrap();
        let planar = localize_with(
            &mesh,
            &target,
            3,
            ContainmentRule::Planar,
            FallbackPolicy::FirstFacet,
        )
        .unwrap();

        assert_eq!(central.address.base(), 0);
        assert_eq!(planar.address.base(), 5);
        assert_eq!(planar.containment, ContainmentRule::Planar);
        assert!(central.chosen.centroid().dot(&target) > 0.0);
        for level in &planar.levels {
            let chosen = level.chosen().unwrap();
            assert!(ContainmentRule::Central.contains(&chosen, &level.probe));
        }
    }

    #[test]
    fn out_of_range_level_index_has_no_chosen_facet() {
        let localization = localize(&mesh(), &source_target(), 2).unwrap();
        let mut level = localization.levels[0].clone();
        assert!(level.chosen().is_some());

        level.index = level.faces.len();
        assert!(level.chosen().is_none());

        let mut json = serde_json::to_value(&localization).unwrap();
        json["levels"][1]["index"] = serde_json::json!(9);
        let restored: Localization = serde_json::from_value(json).unwrap();
        assert!(restored.levels[1].chosen().is_none());
    }

    #[test]
    fn localizer_rejects_invalid_config() {
        let config = LocatorConfig {
            size: 0.0,
            ..LocatorConfig::default()
        };
        assert!(matches!(
            Localizer::new(config),
            Err(ConfigError::InvalidSize { .. })
        ));
    }
}
