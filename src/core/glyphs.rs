//! Symbolic labels ("glyphs") attached to facet indices.
//!
//! Labels are plain data lookups. Three tables key glyphs at different
//! semantic levels:
//!
//! - `base`: base-face index (level 0)
//! - `child`: child index (any level ≥ 1)
//! - `tile`: flattened tile index at a fixed tile depth
//!   (see [`FacetAddress::tile_index`])
//!
//! Base faces can additionally be claimed by [`Marker`]s: reference
//! directions that label whichever base face they locate to. An optional
//! reach narrows this to markers that sit close to their face's centroid.
//!
//! A lookup miss is never an error. It yields a generated label built from the
//! address component: `F{index}` for base faces, the bare child index below.
//!
//! Resolution order at level 0 is marker, then base glyph, then fallback.

use crate::core::address::FacetAddress;
use crate::core::algorithms::locate::{LocateError, locate};
use crate::core::collections::FastHashMap;
use crate::core::facet::Facet;
use crate::geometry::point::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Partial mapping from an integer key to a symbolic label.
pub type GlyphMap = BTreeMap<usize, String>;

/// The glyph tables consulted during label resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlyphTables {
    /// Glyphs keyed by base-face index.
    #[serde(default)]
    pub base: GlyphMap,
    /// Glyphs keyed by child index, applied at every level below the base.
    #[serde(default)]
    pub child: GlyphMap,
    /// Glyphs keyed by tile index at the configured tile depth.
    #[serde(default)]
    pub tile: GlyphMap,
}

/// A reference direction that labels the base face it falls on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Marker {
    /// Direction from the sphere's center; only the direction matters.
    pub position: Point,
    /// Explicit glyph; `M{marker_index}` is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
}

impl Marker {
    /// Marker at `position` with no explicit glyph.
    #[must_use]
    pub const fn new(position: Point) -> Self {
        Self {
            position,
            glyph: None,
        }
    }

    /// Marker at `position` labelled `glyph`.
    #[must_use]
    pub fn with_glyph(position: Point, glyph: impl Into<String>) -> Self {
        Self {
            position,
            glyph: Some(glyph.into()),
        }
    }
}

/// Where a resolved label came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelSource {
    /// A marker located to this base face
    Marker,
    /// A glyph table entry
    Glyph,
    /// Generated from the address component
    Fallback,
}

/// A resolved label.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    /// Text to display (a glyph identifier or generated text)
    pub text: String,
    /// How the label was resolved
    pub source: LabelSource,
}

impl Label {
    fn new(text: impl Into<String>, source: LabelSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// Returns `true` if the label was generated rather than looked up.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == LabelSource::Fallback
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Generated label for address component `index` at `level`.
///
/// # Examples
///
/// ```rust
/// use facet_address::core::glyphs::fallback_label;
///
/// assert_eq!(fallback_label(0, 17), "F17");
/// assert_eq!(fallback_label(2, 3), "3");
/// ```
#[must_use]
pub fn fallback_label(level: usize, index: usize) -> String {
    if level == 0 {
        format!("F{index}")
    } else {
        index.to_string()
    }
}

/// Distance from `marker`, scaled onto the sphere through `face`'s first
/// vertex, to the centroid of `face`.
fn marker_distance(marker: &Marker, face: &Facet) -> Option<f64> {
    let radius = face.vertices()[0].length();
    let direction = marker.position.normalized()?;
    Some((direction * radius).distance(&face.centroid()))
}

/// Resolves labels for address components against glyph tables and markers.
#[derive(Clone, Debug)]
pub struct LabelResolver {
    tables: GlyphTables,
    markers: Vec<Marker>,
    marker_faces: Vec<usize>,
    face_markers: FastHashMap<usize, usize>,
}

impl LabelResolver {
    /// Build a resolver, locating every marker on `base_mesh`.
    ///
    /// Every marker claims the face it locates to; when several markers fall
    /// on the same face, the first one wins.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::EmptyFaceSet`] if markers are given and
    /// `base_mesh` is empty.
    pub fn new(
        tables: GlyphTables,
        markers: Vec<Marker>,
        base_mesh: &[Facet],
    ) -> Result<Self, LocateError> {
        Self::with_reach(tables, markers, base_mesh, None)
    }

    /// Like [`new`](Self::new), but when `reach` is given a marker only
    /// claims its face if the marker, placed on the sphere through that
    /// face's vertices, lies within `reach` of the face centroid.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::EmptyFaceSet`] if markers are given and
    /// `base_mesh` is empty.
    pub fn with_reach(
        tables: GlyphTables,
        markers: Vec<Marker>,
        base_mesh: &[Facet],
        reach: Option<f64>,
    ) -> Result<Self, LocateError> {
        let marker_faces = markers
            .iter()
            .map(|marker| locate(base_mesh, &marker.position))
            .collect::<Result<Vec<_>, _>>()?;

        let mut face_markers = FastHashMap::default();
        for (marker, &face) in marker_faces.iter().enumerate() {
            let in_reach = reach.is_none_or(|reach| {
                marker_distance(&markers[marker], &base_mesh[face])
                    .is_some_and(|distance| distance <= reach)
            });
            if in_reach {
                face_markers.entry(face).or_insert(marker);
            }
        }
        tracing::debug!(
            markers = markers.len(),
            claimed_faces = face_markers.len(),
            ?reach,
            "resolved marker faces"
        );

        Ok(Self {
            tables,
            markers,
            marker_faces,
            face_markers,
        })
    }

    /// Resolver with glyph tables only.
    #[must_use]
    pub fn from_tables(tables: GlyphTables) -> Self {
        Self {
            tables,
            markers: Vec::new(),
            marker_faces: Vec::new(),
            face_markers: FastHashMap::default(),
        }
    }

    /// The glyph tables.
    #[must_use]
    pub const fn tables(&self) -> &GlyphTables {
        &self.tables
    }

    /// Base face each marker located to, in marker order, whether or not the
    /// marker is within reach of it.
    #[must_use]
    pub fn marker_faces(&self) -> &[usize] {
        &self.marker_faces
    }

    /// Label for base face `index`.
    #[must_use]
    pub fn resolve_base(&self, index: usize) -> Label {
        if let Some(&marker) = self.face_markers.get(&index) {
            let text = self.markers[marker]
                .glyph
                .clone()
                .unwrap_or_else(|| format!("M{marker}"));
            return Label::new(text, LabelSource::Marker);
        }
        self.tables.base.get(&index).map_or_else(
            || Label::new(fallback_label(0, index), LabelSource::Fallback),
            |glyph| Label::new(glyph.as_str(), LabelSource::Glyph),
        )
    }

    /// Label for child index `index` at `level` (≥ 1).
    #[must_use]
    pub fn resolve_child(&self, level: usize, index: usize) -> Label {
        self.tables.child.get(&index).map_or_else(
            || Label::new(fallback_label(level, index), LabelSource::Fallback),
            |glyph| Label::new(glyph.as_str(), LabelSource::Glyph),
        )
    }

    /// Label for address component `index` at `level`.
    #[must_use]
    pub fn resolve(&self, level: usize, index: usize) -> Label {
        if level == 0 {
            self.resolve_base(index)
        } else {
            self.resolve_child(level, index)
        }
    }

    /// One label per component of `address`.
    #[must_use]
    pub fn labels(&self, address: &FacetAddress) -> Vec<Label> {
        address
            .components()
            .iter()
            .enumerate()
            .map(|(level, &index)| self.resolve(level, index))
            .collect()
    }

    /// Glyph for the tile `address` falls in at `tile_depth`, if the address
    /// is deep enough and the tile table has an entry.
    #[must_use]
    pub fn resolve_tile(&self, address: &FacetAddress, tile_depth: usize) -> Option<Label> {
        let tile = address.tile_index(tile_depth)?;
        self.tables
            .tile
            .get(&tile)
            .map(|glyph| Label::new(glyph.as_str(), LabelSource::Glyph))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::base_mesh::build_base_mesh;

    fn tables() -> GlyphTables {
        GlyphTables {
            base: GlyphMap::from([(0, "31-KARAS-glyph".into()), (14, "60-Spatha-glyph".into())]),
            child: GlyphMap::from([(3, "center-glyph".into())]),
            tile: GlyphMap::from([(0, "right-glyph".into()), (63, "center-glyph".into())]),
        }
    }

    #[test]
    fn base_lookup_and_fallback() {
        let resolver = LabelResolver::from_tables(tables());
        assert_eq!(
            resolver.resolve_base(14),
            Label::new("60-Spatha-glyph", LabelSource::Glyph)
        );
        let missing = resolver.resolve_base(13);
        assert_eq!(missing.text, "F13");
        assert!(missing.is_fallback());
    }

    #[test]
    fn child_lookup_and_fallback() {
        let resolver = LabelResolver::from_tables(tables());
        assert_eq!(resolver.resolve(4, 3).text, "center-glyph");
        assert_eq!(resolver.resolve(4, 1), Label::new("1", LabelSource::Fallback));
    }

    #[test]
    fn labels_follow_the_address() {
        let resolver = LabelResolver::from_tables(tables());
        let address = FacetAddress::from_components(&[0, 3, 2]).unwrap();
        let texts: Vec<_> = resolver
            .labels(&address)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(texts, ["31-KARAS-glyph", "center-glyph", "2"]);
    }

    #[test]
    fn tile_glyphs_need_enough_depth() {
        let resolver = LabelResolver::from_tables(tables());
        let deep = FacetAddress::from_components(&[9, 3, 3, 3, 0]).unwrap();
        assert_eq!(resolver.resolve_tile(&deep, 3).unwrap().text, "center-glyph");

        let shallow = FacetAddress::from_components(&[9, 3]).unwrap();
        assert!(resolver.resolve_tile(&shallow, 3).is_none());

        let unlabelled = FacetAddress::from_components(&[9, 1, 2, 3]).unwrap();
        assert!(resolver.resolve_tile(&unlabelled, 3).is_none());
    }

    #[test]
    fn markers_claim_their_face() {
        let mesh = build_base_mesh(100.0).unwrap();
        let target_face = 14;
        let direction = mesh[target_face].centroid();
        let markers = vec![
            Marker::new(direction),
            Marker::with_glyph(direction * 2.0, "ignored-duplicate"),
            Marker::with_glyph(mesh[0].centroid() * 0.01, "8-Orchid-glyph"),
        ];
        let resolver = LabelResolver::new(tables(), markers, &mesh).unwrap();

        assert_eq!(resolver.marker_faces(), &[target_face, target_face, 0]);
        assert_eq!(
            resolver.resolve_base(target_face),
            Label::new("M0", LabelSource::Marker)
        );
        // Markers take priority over the base table
        assert_eq!(
            resolver.resolve_base(0),
            Label::new("8-Orchid-glyph", LabelSource::Marker)
        );
    }

    #[test]
    fn marker_reach_limits_claims() {
        let mesh = build_base_mesh(100.0).unwrap();
        let face = 14;
        let centroid = mesh[face].centroid();
        // Gap between the sphere and the flat face at its centroid
        let gap = 100.0 - centroid.length();
        assert!(gap > 1.0);

        // Direction through a vertex: on the same face, far from the centroid
        let near_vertex = mesh[face].centroid().lerp(&mesh[face].vertices()[0], 0.9);
        let markers = vec![
            Marker::with_glyph(near_vertex, "corner"),
            Marker::with_glyph(centroid, "middle"),
        ];

        let unlimited = LabelResolver::new(tables(), markers.clone(), &mesh).unwrap();
        assert_eq!(unlimited.marker_faces(), &[face, face]);
        assert_eq!(unlimited.resolve_base(face).text, "corner");

        let reached =
            LabelResolver::with_reach(tables(), markers.clone(), &mesh, Some(gap + 1e-6)).unwrap();
        assert_eq!(reached.marker_faces(), &[face, face]);
        assert_eq!(reached.resolve_base(face).text, "middle");

        let none = LabelResolver::with_reach(tables(), markers, &mesh, Some(gap * 0.5)).unwrap();
        assert_eq!(none.resolve_base(face), Label::new("F14", LabelSource::Fallback));
    }

    #[test]
    fn tables_deserialize_from_string_keys() {
        let json = r#"{ "base": { "12": "30-TETRACAT-glyph" }, "tile": { "21": "left-glyph" } }"#;
        let parsed: GlyphTables = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.base.get(&12).map(String::as_str), Some("30-TETRACAT-glyph"));
        assert!(parsed.child.is_empty());
        assert_eq!(parsed.tile.get(&21).map(String::as_str), Some("left-glyph"));
    }
}
