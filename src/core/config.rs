//! Locator configuration.
//!
//! [`LocatorConfig`] is plain data: build it with [`LocatorConfigBuilder`] or
//! load it from JSON. Both paths validate, so an invalid configuration is
//! rejected before any mesh is built or any recursion begins.
//!
//! # JSON form
//!
//! ```json
//! {
//!   "size": 100.0,
//!   "max_depth": 3,
//!   "tile_depth": 3,
//!   "fallback": "first_facet",
//!   "containment": "central",
//!   "glyphs": {
//!     "base": { "0": "31-KARAS-glyph" },
//!     "child": {},
//!     "tile": { "63": "center-glyph" }
//!   },
//!   "markers": [ { "position": [-0.7356, -0.6445, 0.2085] } ],
//!   "marker_reach": 1.0
//! }
//! ```
//!
//! Every field is optional and falls back to its default. Glyph maps are
//! objects keyed by the integer rendered as a string.

use crate::core::algorithms::locate::{ContainmentRule, FallbackPolicy, LocateError};
use crate::core::algorithms::localization::MAX_SUBDIVISION_DEPTH;
use crate::core::algorithms::subdivision::CHILDREN_PER_FACET;
use crate::core::base_mesh::{BASE_FACE_COUNT, MeshError};
use crate::core::glyphs::{GlyphMap, GlyphTables, Marker};
use derive_builder::{Builder, UninitializedFieldError};
use serde::{Deserialize, Serialize};

/// Default sphere radius.
pub const DEFAULT_SIZE: f64 = 100.0;

/// Default number of subdivision levels.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default depth at which tile glyphs are keyed (64 tiles per base face).
pub const DEFAULT_TILE_DEPTH: usize = 3;

/// Errors raised by configuration building, loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The sphere radius is not a positive finite number.
    #[error("Size must be positive and finite, got {size}")]
    InvalidSize {
        /// The rejected size
        size: f64,
    },

    /// A depth setting exceeds what the locator supports.
    #[error("{field} of {requested} exceeds the maximum of {max}")]
    DepthOutOfRange {
        /// Name of the depth setting
        field: &'static str,
        /// Requested depth
        requested: usize,
        /// Largest accepted depth
        max: usize,
    },

    /// A glyph table key can never match an address component.
    #[error("Key {key} in the {table} glyph table must be below {limit}")]
    GlyphKeyOutOfRange {
        /// Table name (`base`, `child` or `tile`)
        table: &'static str,
        /// The offending key
        key: usize,
        /// Exclusive upper bound for keys of that table
        limit: usize,
    },

    /// A marker position is not a finite, non-zero direction.
    #[error("Marker {index} has an invalid position; expected a finite non-zero direction")]
    InvalidMarker {
        /// Index of the marker
        index: usize,
    },

    /// The marker reach is not a positive finite distance.
    #[error("Marker reach must be positive and finite, got {reach}")]
    InvalidMarkerReach {
        /// The rejected reach
        reach: f64,
    },

    /// A required builder field was not set.
    #[error("Missing configuration field: {0}")]
    MissingField(String),

    /// JSON input could not be parsed or output could not be written.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The base mesh could not be built.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Markers could not be located on the base mesh.
    #[error(transparent)]
    Markers(#[from] LocateError),
}

impl From<UninitializedFieldError> for ConfigError {
    fn from(error: UninitializedFieldError) -> Self {
        Self::MissingField(error.field_name().to_owned())
    }
}

/// Settings for a [`Localizer`](crate::core::algorithms::localization::Localizer).
///
/// # Examples
///
/// ```rust
/// use facet_address::core::algorithms::locate::FallbackPolicy;
/// use facet_address::core::config::LocatorConfigBuilder;
///
/// let config = LocatorConfigBuilder::default()
///     .size(1.0)
///     .max_depth(8)
///     .fallback(FallbackPolicy::NearestCentroid)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_depth, 8);
/// assert_eq!(config.tile_depth, 3);
///
/// assert!(LocatorConfigBuilder::default().size(-1.0).build().is_err());
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(private, name = "build_unvalidated", error = "ConfigError"))]
#[serde(default, deny_unknown_fields)]
pub struct LocatorConfig {
    /// Radius of the sphere the base mesh approximates.
    #[builder(default = "DEFAULT_SIZE")]
    pub size: f64,
    /// Number of subdivision levels performed by each localization.
    #[builder(default = "DEFAULT_MAX_DEPTH")]
    pub max_depth: usize,
    /// Depth at which the `tile` glyph table is keyed.
    #[builder(default = "DEFAULT_TILE_DEPTH")]
    pub tile_depth: usize,
    /// Facet choice when no facet contains the probe.
    #[builder(default)]
    pub fallback: FallbackPolicy,
    /// Which point is tested for containment when locating the base face.
    #[builder(default)]
    pub containment: ContainmentRule,
    /// Glyph tables for base faces, children and tiles.
    #[builder(default)]
    pub glyphs: GlyphTables,
    /// Reference directions labelling the base face they fall on.
    #[builder(default, setter(into))]
    pub markers: Vec<Marker>,
    /// Largest distance between a marker, placed on the sphere, and the
    /// centroid of its face for the marker to claim that face. Unlimited
    /// when absent.
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_reach: Option<f64>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            max_depth: DEFAULT_MAX_DEPTH,
            tile_depth: DEFAULT_TILE_DEPTH,
            fallback: FallbackPolicy::default(),
            containment: ContainmentRule::default(),
            glyphs: GlyphTables::default(),
            markers: Vec::new(),
            marker_reach: None,
        }
    }
}

impl LocatorConfigBuilder {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found by
    /// [`LocatorConfig::validate`].
    pub fn build(&self) -> Result<LocatorConfig, ConfigError> {
        let config = self.build_unvalidated()?;
        config.validate()?;
        Ok(config)
    }
}

impl LocatorConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON or unknown fields, and
    /// any validation error otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails (non-finite
    /// numbers are written as `null` rather than failing).
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of tiles per base face at [`tile_depth`](Self::tile_depth),
    /// or `None` if it overflows `usize`.
    #[must_use]
    pub fn tile_count(&self) -> Option<usize> {
        u32::try_from(self.tile_depth)
            .ok()
            .and_then(|depth| CHILDREN_PER_FACET.checked_pow(depth))
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidSize`] if `size` is not positive and finite
    /// - [`ConfigError::DepthOutOfRange`] if `max_depth` or `tile_depth`
    ///   exceeds [`MAX_SUBDIVISION_DEPTH`], or the tile count overflows
    /// - [`ConfigError::GlyphKeyOutOfRange`] for a key no address can produce
    /// - [`ConfigError::InvalidMarker`] for a non-finite or zero marker
    /// - [`ConfigError::InvalidMarkerReach`] for a non-positive or
    ///   non-finite marker reach
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.size > 0.0 && self.size.is_finite()) {
            return Err(ConfigError::InvalidSize { size: self.size });
        }
        check_depth("max_depth", self.max_depth)?;
        check_depth("tile_depth", self.tile_depth)?;
        let tile_count = self.tile_count().ok_or(ConfigError::DepthOutOfRange {
            field: "tile_depth",
            requested: self.tile_depth,
            max: (usize::BITS / 2 - 1) as usize,
        })?;

        check_keys("base", &self.glyphs.base, BASE_FACE_COUNT)?;
        check_keys("child", &self.glyphs.child, CHILDREN_PER_FACET)?;
        check_keys("tile", &self.glyphs.tile, tile_count)?;

        for (index, marker) in self.markers.iter().enumerate() {
            let position = marker.position;
            if !position.is_finite() || position.length_squared() == 0.0 {
                return Err(ConfigError::InvalidMarker { index });
            }
        }
        match self.marker_reach {
            Some(reach) if !(reach > 0.0 && reach.is_finite()) => {
                Err(ConfigError::InvalidMarkerReach { reach })
            }
            _ => Ok(()),
        }
    }
}

fn check_depth(field: &'static str, requested: usize) -> Result<(), ConfigError> {
    if requested > MAX_SUBDIVISION_DEPTH {
        return Err(ConfigError::DepthOutOfRange {
            field,
            requested,
            max: MAX_SUBDIVISION_DEPTH,
        });
    }
    Ok(())
}

fn check_keys(table: &'static str, glyphs: &GlyphMap, limit: usize) -> Result<(), ConfigError> {
    // Keys are ordered, so only the largest can be out of range.
    match glyphs.last_key_value() {
        Some((&key, _)) if key >= limit => {
            Err(ConfigError::GlyphKeyOutOfRange { table, key, limit })
        }
        _ => Ok(()),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point;

    #[test]
    fn builder_defaults_match_default() {
        let built = LocatorConfigBuilder::default().build().unwrap();
        assert_eq!(built, LocatorConfig::default());
    }

    #[test]
    fn empty_json_yields_defaults() {
        assert_eq!(LocatorConfig::from_json("{}").unwrap(), LocatorConfig::default());
    }

    #[test]
    fn rejects_invalid_size() {
        for size in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let result = LocatorConfigBuilder::default().size(size).build();
            assert!(matches!(result, Err(ConfigError::InvalidSize { .. })));
        }
    }

    #[test]
    fn rejects_excessive_depth() {
        let result = LocatorConfigBuilder::default()
            .max_depth(MAX_SUBDIVISION_DEPTH + 1)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::DepthOutOfRange {
                field: "max_depth",
                ..
            })
        ));
        assert!(
            LocatorConfigBuilder::default()
                .max_depth(MAX_SUBDIVISION_DEPTH)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn rejects_unreachable_glyph_keys() {
        let mut glyphs = GlyphTables::default();
        glyphs.child.insert(4, "nowhere".into());
        let result = LocatorConfigBuilder::default().glyphs(glyphs).build();
        assert!(matches!(
            result,
            Err(ConfigError::GlyphKeyOutOfRange {
                table: "child",
                key: 4,
                limit: 4
            })
        ));

        let mut glyphs = GlyphTables::default();
        glyphs.tile.insert(63, "center-glyph".into());
        assert!(
            LocatorConfigBuilder::default()
                .glyphs(glyphs.clone())
                .build()
                .is_ok()
        );
        let result = LocatorConfigBuilder::default()
            .tile_depth(2)
            .glyphs(glyphs)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::GlyphKeyOutOfRange {
                table: "tile",
                limit: 16,
                ..
            })
        ));
    }

    #[test]
    fn rejects_degenerate_markers() {
        let markers = vec![
            Marker::new(Point::new([1.0, 0.0, 0.0])),
            Marker::new(Point::ORIGIN),
        ];
        let result = LocatorConfigBuilder::default().markers(markers).build();
        assert!(matches!(result, Err(ConfigError::InvalidMarker { index: 1 })));
    }

    #[test]
    fn rejects_invalid_marker_reach() {
        for reach in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = LocatorConfigBuilder::default().marker_reach(reach).build();
            assert!(matches!(result, Err(ConfigError::InvalidMarkerReach { .. })));
        }
        let config = LocatorConfigBuilder::default().marker_reach(1.0).build().unwrap();
        assert_eq!(config.marker_reach, Some(1.0));
    }

    #[test]
    fn containment_rule_parses_from_json() {
        let config = LocatorConfig::from_json(r#"{ "containment": "planar" }"#).unwrap();
        assert_eq!(config.containment, ContainmentRule::Planar);
        assert_eq!(
            LocatorConfig::from_json("{}").unwrap().containment,
            ContainmentRule::Central
        );
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let result = LocatorConfig::from_json(r#"{ "size": 1.0, "depth": 4 }"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn json_validates_after_parsing() {
        let result = LocatorConfig::from_json(r#"{ "glyphs": { "base": { "60": "x" } } }"#);
        assert!(matches!(
            result,
            Err(ConfigError::GlyphKeyOutOfRange { table: "base", .. })
        ));
    }
}
