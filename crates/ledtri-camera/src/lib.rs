#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Ledtri Camera
//!
//! A [`CameraModel`] turns stored pixel detections into world-space rays
//! using an equidistant angular projection (pitch proportional to pixel
//! radius) followed by two rotations, and projects world points back to
//! pixels for forward simulation.
//!
//! ## Example
//!
//! ```rust
//! use ledtri_3d::Vector3;
//! use ledtri_camera::{CameraModel, CameraParams};
//!
//! let params = CameraParams::from_degrees_fov(Vector3::ZERO, 0.0, 0.0, 45.0);
//! let mut camera = CameraModel::new(params);
//!
//! let target = Vector3::new(20.0, 10.0, -60.0);
//! let [x, y] = camera.pixel_of_world(target)?;
//! let [raw_x, raw_y] = camera.layout().raw_from_pixel(1.0, x, y);
//! let index = camera.add_detection(1.0, raw_x, raw_y)?;
//!
//! let ray = camera.ray_of(index)?;
//! assert!(ray.distance_to_point(target) < 1e-9);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Camera pose, sensor layout and the pixel/ray mapping.
pub mod camera;

/// Routing of raw per-camera detections.
pub mod detection;

/// Error types for camera operations.
pub mod error;

/// Injectable lens angle correction.
pub mod lens;

pub use camera::{CameraModel, CameraParams, SensorLayout};
pub use detection::{add_raw_detections, Detection};
pub use error::CameraError;
pub use lens::{IdentityLens, LensMapping, Polynomial, PolynomialLens};
