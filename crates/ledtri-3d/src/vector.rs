//! 3D vector (double precision).

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Below this length [`Vector3::normalize`] leaves the vector untouched.
pub const NORMALIZE_EPSILON: f64 = 1e-8;

/// 3D vector (double precision).
///
/// A newtype wrapper around `glam::DVec3` with value semantics: every
/// operation returns a fresh vector and nothing is shared by reference.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Vector3(pub glam::DVec3);

impl Vector3 {
    /// Zero vector.
    pub const ZERO: Self = Self(glam::DVec3::ZERO);

    /// Create a new vector from x, y, and z components.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(glam::DVec3::new(x, y, z))
    }

    /// Create a vector from an array.
    #[inline]
    pub fn from_array(arr: [f64; 3]) -> Self {
        Self(glam::DVec3::from_array(arr))
    }

    /// Convert to array.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        self.0.to_array()
    }

    /// Returns `self * scale + other * other_scale`.
    #[inline]
    pub fn add_scaled(self, scale: f64, other: Self, other_scale: f64) -> Self {
        Self(self.0 * scale + other.0 * other_scale)
    }

    /// Returns the vector multiplied by `s`.
    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self(self.0 * s)
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.0.x * other.0.x + self.0.y * other.0.y + self.0.z * other.0.z
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length.
    ///
    /// A vector shorter than [`NORMALIZE_EPSILON`] is returned unchanged, so a
    /// zero direction stays zero instead of turning into NaN.
    #[inline]
    pub fn normalize(self) -> Self {
        let l = self.length();
        if l < NORMALIZE_EPSILON {
            return self;
        }
        self.scale(1.0 / l)
    }

    /// Right-handed cross product `self x other`.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        let (a, b) = (self.0, other.0);
        Self::new(
            a.y * b.z - a.z * b.y,
            a.z * b.x - a.x * b.z,
            a.x * b.y - a.y * b.x,
        )
    }

    /// Returns `a - b`.
    #[inline]
    pub fn diff(a: Self, b: Self) -> Self {
        a.add_scaled(1.0, b, -1.0)
    }
}

impl Deref for Vector3 {
    type Target = glam::DVec3;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<glam::DVec3> for Vector3 {
    #[inline]
    fn from(v: glam::DVec3) -> Self {
        Self(v)
    }
}

impl From<Vector3> for glam::DVec3 {
    #[inline]
    fn from(v: Vector3) -> Self {
        v.0
    }
}

impl From<[f64; 3]> for Vector3 {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vector3> for [f64; 3] {
    #[inline]
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl std::fmt::Display for Vector3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6},{:.6},{:.6})", self.0.x, self.0.y, self.0.z)
    }
}

// Arithmetic operations
impl std::ops::Add for Vector3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Vector3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Mul<f64> for Vector3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl std::ops::Div<f64> for Vector3 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl std::ops::Neg for Vector3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
