//! # facet-address
//!
//! Hierarchical facet localization on a subdivided polyhedral sphere.
//!
//! Given a target point, the locator finds the triangular face of a fixed
//! base mesh that contains it, then repeatedly splits the current facet into
//! four children and picks the child containing the target's projection. The
//! child indices form a [`FacetAddress`](core::address::FacetAddress): a
//! stable, reproducible name for the target's location, refined by one level
//! per subdivision.
//!
//! # Features
//!
//! - Pentakis dodecahedron base mesh (60 faces, closed, outward-wound)
//! - Order-sensitive midpoint subdivision with a fixed child order
//! - Deterministic point location with a documented fallback policy
//! - Glyph tables and markers for symbolic labels on addresses
//! - Serialization/Deserialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use facet_address::prelude::*;
//!
//! let mesh = build_base_mesh(100.0).unwrap();
//! assert_eq!(mesh.len(), BASE_FACE_COUNT);
//!
//! let target = Point::new([0.6, -0.2, 0.77]).normalized().unwrap() * 100.0;
//! let localization = localize(&mesh, &target, 4).unwrap();
//!
//! // Base face plus one child index per level
//! assert_eq!(localization.address.len(), 5);
//! // One face set of four children per level, for rendering
//! assert!(localization.face_sets().all(|faces| faces.len() == CHILDREN_PER_FACET));
//! // The address replays to the chosen facet
//! assert_eq!(localization.address.follow(&mesh).unwrap(), localization.chosen);
//! ```
//!
//! # Labels
//!
//! A [`Localizer`](core::algorithms::localization::Localizer) bundles the base
//! mesh with a validated [`LocatorConfig`](core::config::LocatorConfig), and
//! resolves glyph labels for each address component. Missing glyphs never
//! fail; they produce a generated label instead.
//!
//! ```rust
//! use facet_address::prelude::*;
//!
//! let mut glyphs = GlyphTables::default();
//! glyphs.child.insert(3, "center-glyph".to_owned());
//!
//! let config = LocatorConfigBuilder::default()
//!     .max_depth(2)
//!     .glyphs(glyphs)
//!     .build()
//!     .unwrap();
//! let localizer = Localizer::new(config).unwrap();
//!
//! let target = localizer.base_mesh()[17].centroid();
//! let localization = localizer.localize(&target).unwrap();
//!
//! // The centroid direction lands in the center child at every level
//! assert_eq!(localization.address.to_string(), "17.3.3");
//! let labels: Vec<String> = localizer
//!     .labels(&localization)
//!     .iter()
//!     .map(ToString::to_string)
//!     .collect();
//! assert_eq!(labels, ["F17", "center-glyph", "center-glyph"]);
//! ```
//!
//! # Numerical conventions
//!
//! - Triangles are closed: points on a shared edge belong to both facets, and
//!   location returns the lower index.
//! - By default containment is tested on the central projection of the point
//!   onto each facet's plane, so only facets facing the point can be
//!   selected. [`ContainmentRule::Planar`](core::algorithms::locate::ContainmentRule)
//!   tests the raw point instead.
//! - When no facet contains a point, location falls back to a facet chosen by
//!   [`FallbackPolicy`](core::algorithms::locate::FallbackPolicy) and logs a
//!   `tracing` warning. Location never fails on a non-empty face set.
//!
//! Diagnostics are emitted through [`tracing`](https://docs.rs/tracing); the
//! library never installs a subscriber.

#![forbid(unsafe_code)]

/// Facets, the base mesh, addresses, labels and the localization algorithms.
pub mod core {
    /// Subdivision, point location and hierarchical localization
    pub mod algorithms {
        /// Hierarchical localization driver
        pub mod localization;
        /// Point location within a face set
        pub mod locate;
        /// Midpoint subdivision into four children
        pub mod subdivision;
        pub use localization::*;
        pub use locate::*;
        pub use subdivision::*;
    }
    pub mod address;
    pub mod base_mesh;
    /// Collection aliases for internal maps and inline buffers
    pub mod collections;
    pub mod config;
    pub mod facet;
    pub mod glyphs;
    // Re-export the `core` modules.
    pub use address::*;
    pub use base_mesh::*;
    pub use config::*;
    pub use facet::*;
    pub use glyphs::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Points, planes and triangle predicates in three dimensions.
pub mod geometry {
    pub mod plane;
    pub mod point;
    pub mod predicates;
    /// Triangle measures: area, centroid and normal
    pub mod util;
    pub use plane::*;
    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        address::*,
        algorithms::{localization::*, locate::*, subdivision::*},
        base_mesh::*,
        config::*,
        facet::*,
        glyphs::*,
    };

    // Re-export commonly used collection types from core::collections
    pub use crate::core::collections::{
        FastHashMap, FastHashSet, SmallBuffer, fast_hash_map_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{plane::*, point::*, predicates::*, util::*};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
