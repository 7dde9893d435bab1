//! Facet addresses: the path from a base face down through child indices.
//!
//! An address `[b, c1, c2, …, ck]` names the facet reached by taking base
//! face `b` and then, at each of `k` subdivision levels, child `ci`. It
//! prints as a dotted path (`"12.0.3.1"`) and serializes as a plain integer
//! sequence.

use crate::core::algorithms::subdivision::{CHILDREN_PER_FACET, subdivide};
use crate::core::collections::{ADDRESS_INLINE_CAPACITY, SmallBuffer};
use crate::core::facet::Facet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised while building, parsing or replaying an address.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// An address needs at least the base-face index.
    #[error("Address must contain at least a base-face index")]
    Empty,

    /// A child index is not a valid subdivision child.
    #[error("Child index {index} at level {level} is out of range")]
    ChildOutOfRange {
        /// Subdivision level (1-based)
        level: usize,
        /// The offending index
        index: usize,
    },

    /// The base index does not name a face of the base mesh.
    #[error("Base face {index} is out of range for a mesh of {face_count} faces")]
    BaseOutOfRange {
        /// The offending index
        index: usize,
        /// Number of faces in the base mesh
        face_count: usize,
    },

    /// A dotted path component is not an integer.
    #[error("Invalid address component {component:?} at position {position}")]
    Parse {
        /// Position of the component in the path
        position: usize,
        /// The text that failed to parse
        component: String,
    },
}

/// The sequence of indices locating a facet: base-face index followed by one
/// child index per subdivision level.
///
/// Invariant: never empty, and every child index is below
/// [`CHILDREN_PER_FACET`].
///
/// # Examples
///
/// ```rust
/// use facet_address::core::address::FacetAddress;
///
/// let address: FacetAddress = "12.0.3.1".parse().unwrap();
/// assert_eq!(address.base(), 12);
/// assert_eq!(address.children(), &[0, 3, 1]);
/// assert_eq!(address.depth(), 3);
/// assert_eq!(address.to_string(), "12.0.3.1");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct FacetAddress {
    components: SmallBuffer<usize, ADDRESS_INLINE_CAPACITY>,
}

impl FacetAddress {
    /// Start an address at base face `base`, with no subdivision levels.
    #[must_use]
    pub fn new(base: usize) -> Self {
        let mut components = SmallBuffer::new();
        components.push(base);
        Self { components }
    }

    /// Build an address from its components.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Empty`] for an empty slice and
    /// [`AddressError::ChildOutOfRange`] for an invalid child index.
    pub fn from_components(components: &[usize]) -> Result<Self, AddressError> {
        let (&base, children) = components.split_first().ok_or(AddressError::Empty)?;
        let mut address = Self::new(base);
        for &child in children {
            address.push_child(child)?;
        }
        Ok(address)
    }

    /// Append the child index chosen at the next subdivision level.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::ChildOutOfRange`] if `child` is not a valid
    /// subdivision child.
    pub fn push_child(&mut self, child: usize) -> Result<(), AddressError> {
        if child >= CHILDREN_PER_FACET {
            return Err(AddressError::ChildOutOfRange {
                level: self.components.len(),
                index: child,
            });
        }
        self.components.push(child);
        Ok(())
    }

    /// The base-face index.
    #[inline]
    #[must_use]
    pub fn base(&self) -> usize {
        self.components[0]
    }

    /// The child indices, one per subdivision level.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.components[1..]
    }

    /// All components: base index then child indices.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[usize] {
        &self.components
    }

    /// Number of subdivision levels (`len - 1`).
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.components.len() - 1
    }

    /// Number of components (`depth + 1`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always `false`; an address holds at least its base index.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// The address truncated to its first `depth` subdivision levels, or
    /// `None` if it is shallower than that.
    #[must_use]
    pub fn prefix(&self, depth: usize) -> Option<Self> {
        (depth <= self.depth()).then(|| Self {
            components: self.components[..=depth].iter().copied().collect(),
        })
    }

    /// Flatten the first `depth` child indices into the index of the matching
    /// tile of [`subdivide_to_depth`](crate::core::algorithms::subdivision::subdivide_to_depth)
    /// applied to the base face.
    ///
    /// Returns `None` if the address is shallower than `depth` or the index
    /// does not fit in `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facet_address::core::address::FacetAddress;
    ///
    /// let address = FacetAddress::from_components(&[7, 3, 3, 3, 1]).unwrap();
    /// assert_eq!(address.tile_index(3), Some(63));
    /// assert_eq!(address.tile_index(1), Some(3));
    /// assert_eq!(address.tile_index(5), None);
    /// ```
    #[must_use]
    pub fn tile_index(&self, depth: usize) -> Option<usize> {
        let children = self.children().get(..depth)?;
        children.iter().try_fold(0_usize, |acc, &child| {
            acc.checked_mul(CHILDREN_PER_FACET)?.checked_add(child)
        })
    }

    /// Replay the address on `base_mesh`, returning the facet it names.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::BaseOutOfRange`] if the base index does not
    /// name a face of `base_mesh`.
    pub fn follow(&self, base_mesh: &[Facet]) -> Result<Facet, AddressError> {
        let base = base_mesh
            .get(self.base())
            .ok_or(AddressError::BaseOutOfRange {
                index: self.base(),
                face_count: base_mesh.len(),
            })?;

        // Child indices are validated on construction.
        Ok(self
            .children()
            .iter()
            .fold(*base, |facet, &child| subdivide(&facet)[child]))
    }
}

impl fmt::Display for FacetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.components {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for FacetAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        let components = trimmed
            .split('.')
            .enumerate()
            .map(|(position, component)| {
                component
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| AddressError::Parse {
                        position,
                        component: component.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_components(&components)
    }
}

impl TryFrom<Vec<usize>> for FacetAddress {
    type Error = AddressError;

    fn try_from(components: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_components(&components)
    }
}

impl From<FacetAddress> for Vec<usize> {
    fn from(address: FacetAddress) -> Self {
        address.components.into_vec()
    }
}

// =============================================================================
// TESTS
// =============================================================================
