#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Ledtri Match
//!
//! Pairs detections across two cameras by nearest ray, triangulates each
//! pair at the midpoint of the rays' closest approach, and refines a
//! camera's extrinsics by grid search over known correspondences.
//!
//! ## Example
//!
//! ```rust
//! use ledtri_3d::Vector3;
//! use ledtri_camera::{CameraModel, CameraParams};
//! use ledtri_match::{Matcher, MatcherParams, PointMatch};
//!
//! let target = Vector3::new(20.0, 10.0, 60.0);
//! let mut cameras = [
//!     CameraModel::new(CameraParams::from_degrees_fov(Vector3::ZERO, 0.0, 0.0, 45.0)),
//!     CameraModel::new(CameraParams::from_degrees_fov(
//!         Vector3::new(30.0, 0.0, 0.0),
//!         0.22,
//!         -0.677,
//!         45.0,
//!     )),
//! ];
//! for camera in cameras.iter_mut() {
//!     let [x, y] = camera.pixel_of_world(target)?;
//!     let [raw_x, raw_y] = camera.layout().raw_from_pixel(1.0, x, y);
//!     camera.add_detection(1.0, raw_x, raw_y)?;
//! }
//!
//! let matches = Matcher::new(MatcherParams::default()).match_detections(&cameras[0], &cameras[1])?;
//! let PointMatch::Matched(m) = &matches[0] else { panic!("expected a match") };
//! assert_eq!(m.matched_index, 0);
//! assert!((m.midpoint - target).length() < 1e-6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Grid-search refinement of camera parameters.
pub mod calibrate;

/// Error types for matching and calibration.
pub mod error;

/// Nearest-ray correspondence search and triangulation.
pub mod matcher;

pub use calibrate::{correspondence_error, CalibrationResult, Calibrator, ParamGrid, SweepAxis};
pub use error::{CalibrationError, MatchError};
pub use matcher::{MatchResult, Matcher, MatcherParams, PointMatch, UnmatchedReason};
