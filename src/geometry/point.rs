//! Data and operations on 3D points.
//!
//! [`Point`] is an immutable value type: every arithmetic operation returns a
//! new point and nothing mutates in place. The same type doubles as a
//! displacement vector, so `b - a` is the vector from `a` to `b`.
//!
//! # Serialization
//!
//! Points serialize as a plain `[x, y, z]` tuple, which is also the form used
//! for marker positions in persisted configuration.

#![forbid(unsafe_code)]

use serde::de::{Error, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

// =============================================================================
// POINT STRUCT DEFINITION
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// A point (or vector) in 3D space with `f64` coordinates.
///
/// Points are intended to be immutable once created, so the `coords` field is
/// private to prevent modification after instantiation.
///
/// # Examples
///
/// ```rust
/// use facet_address::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0, 3.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0, 3.0]);
/// assert_eq!(p.y(), 2.0);
/// ```
pub struct Point {
    /// The coordinates of the point.
    coords: [f64; 3],
}

// =============================================================================
// PUBLIC API
// =============================================================================

impl Point {
    /// The coordinate-system origin.
    pub const ORIGIN: Self = Self::new([0.0, 0.0, 0.0]);

    /// Create a new point from an array of coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [f64; 3]) -> Self {
        Self { coords }
    }

    /// Returns a reference to the point's coordinates as an array.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[f64; 3] {
        &self.coords
    }

    /// Extract the coordinates as an owned array.
    #[inline]
    #[must_use]
    pub const fn to_array(&self) -> [f64; 3] {
        self.coords
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.coords[0]
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.coords[1]
    }

    /// The z coordinate.
    #[inline]
    #[must_use]
    pub const fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Returns `true` if every coordinate is finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }

    /// Multiply every coordinate by `factor`.
    #[inline]
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.coords.map(|c| c * factor))
    }

    /// Dot product with `other`.
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .fold(0.0, |acc, (a, b)| a.mul_add(*b, acc))
    }

    /// Cross product `self × other`.
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.coords;
        let [bx, by, bz] = other.coords;
        Self::new([
            ay.mul_add(bz, -(az * by)),
            az.mul_add(bx, -(ax * bz)),
            ax.mul_add(by, -(ay * bx)),
        ])
    }

    /// Squared Euclidean length.
    #[inline]
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length, treating the point as a vector from the origin.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use approx::assert_relative_eq;
    /// use facet_address::geometry::point::Point;
    ///
    /// assert_relative_eq!(Point::new([3.0, 4.0, 0.0]).length(), 5.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.coords[0].hypot(self.coords[1]).hypot(self.coords[2])
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    /// Returns the unit vector pointing in the same direction, or `None` for
    /// a zero-length or non-finite vector.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let length = self.length();
        if length > 0.0 && length.is_finite() {
            Some(*self / length)
        } else {
            None
        }
    }

    /// Linear interpolation between `self` (at `t = 0`) and `other` (at `t = 1`).
    ///
    /// Evaluated as `self·(1 - t) + other·t` with a fused multiply-add, so
    /// both endpoints are reproduced exactly and `a.lerp(&b, 0.5)` is
    /// bit-identical to `b.lerp(&a, 0.5)`.
    /// The second property keeps midpoints of an edge shared by two facets
    /// identical no matter which facet computes them.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facet_address::geometry::point::Point;
    ///
    /// let a = Point::new([0.0, 0.0, 0.0]);
    /// let b = Point::new([2.0, 4.0, -6.0]);
    /// assert_eq!(a.lerp(&b, 0.5), Point::new([1.0, 2.0, -3.0]));
    /// assert_eq!(a.lerp(&b, 1.0), b);
    /// ```
    #[inline]
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new([
            self.coords[0].mul_add(s, other.coords[0] * t),
            self.coords[1].mul_add(s, other.coords[1] * t),
            self.coords[2].mul_add(s, other.coords[2] * t),
        ])
    }

    /// The diametrically opposite point through the origin.
    #[inline]
    #[must_use]
    pub fn antipode(&self) -> Self {
        -*self
    }

    /// Angle in radians between `self` and `other` seen from the origin.
    ///
    /// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel
    /// vectors where `acos` loses precision. Returns `0.0` if either vector
    /// has zero length.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> f64 {
        self.cross(other).length().atan2(self.dot(other))
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl From<[f64; 3]> for Point {
    #[inline]
    fn from(coords: [f64; 3]) -> Self {
        Self::new(coords)
    }
}

impl From<Point> for [f64; 3] {
    #[inline]
    fn from(point: Point) -> Self {
        point.coords
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new([
            self.coords[0] + rhs.coords[0],
            self.coords[1] + rhs.coords[1],
            self.coords[2] + rhs.coords[2],
        ])
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new([
            self.coords[0] - rhs.coords[0],
            self.coords[1] - rhs.coords[1],
            self.coords[2] - rhs.coords[2],
        ])
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::new(self.coords.map(|c| c / rhs))
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(self.coords.map(|c| -c))
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

impl Serialize for Point {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeTuple;
        let mut tuple = serializer.serialize_tuple(3)?;
        for coord in &self.coords {
            tuple.serialize_element(coord)?;
        }
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TripleVisitor;

        impl<'de> Visitor<'de> for TripleVisitor {
            type Value = Point;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an array of 3 numeric coordinates [x, y, z]")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut coords = [0.0; 3];
                for (i, slot) in coords.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| Error::invalid_length(i, &self))?;
                }
                if seq.next_element::<serde::de::IgnoredAny>()?.is_some() {
                    return Err(Error::invalid_length(4, &self));
                }
                Ok(Point::new(coords))
            }
        }

        deserializer.deserialize_tuple(3, TripleVisitor)
    }
}

// =============================================================================
// TESTS
// =============================================================================
