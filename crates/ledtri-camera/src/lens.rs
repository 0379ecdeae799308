//! Lens angle correction applied between the linear pixel/angle mapping
//! and ray construction.

use serde::{Deserialize, Serialize};

/// Maps the off-axis angle measured on the sensor to the true off-axis
/// angle in the world, and back.
///
/// Both directions take and return radians. Implementations are expected to
/// be odd functions so that negative pitches (points behind the camera)
/// mirror positive ones.
pub trait LensMapping: std::fmt::Debug + Send + Sync {
    /// Convert a sensor angle to a world angle.
    fn sensor_to_world(&self, angle: f64) -> f64;

    /// Convert a world angle to a sensor angle.
    fn world_to_sensor(&self, angle: f64) -> f64;
}

/// The ideal equidistant lens: angle maps to itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityLens;

impl LensMapping for IdentityLens {
    #[inline]
    fn sensor_to_world(&self, angle: f64) -> f64 {
        angle
    }

    #[inline]
    fn world_to_sensor(&self, angle: f64) -> f64 {
        angle
    }
}

/// A polynomial with coefficients in ascending powers of `x`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create a polynomial from coefficients `[c0, c1, c2, ...]`.
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    /// The coefficients, lowest power first.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Evaluate at `x` (Horner's scheme).
    pub fn calc(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}

impl From<Vec<f64>> for Polynomial {
    fn from(coeffs: Vec<f64>) -> Self {
        Self::new(coeffs)
    }
}

/// A lens described by a pair of polynomials, one per direction.
///
/// Typically degree-5 odd polynomials fitted offline, e.g.
/// `[0, 0.991, 0, 0.142, 0, 0.047]` sensor-to-world with its fitted inverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialLens {
    /// Sensor angle to world angle.
    pub sensor_to_world: Polynomial,
    /// World angle to sensor angle.
    pub world_to_sensor: Polynomial,
}

impl PolynomialLens {
    /// Create a lens from its forward and inverse polynomials.
    pub fn new(sensor_to_world: Polynomial, world_to_sensor: Polynomial) -> Self {
        Self {
            sensor_to_world,
            world_to_sensor,
        }
    }
}

impl LensMapping for PolynomialLens {
    fn sensor_to_world(&self, angle: f64) -> f64 {
        self.sensor_to_world.calc(angle)
    }

    fn world_to_sensor(&self, angle: f64) -> f64 {
        self.world_to_sensor.calc(angle)
    }
}
