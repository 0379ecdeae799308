#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for geometric operations.
pub mod error;

/// Rays in 3D space and the distances between them.
pub mod line;

/// Double precision 3D vector.
pub mod vector;

pub use error::GeometryError;
pub use line::{ClosestApproach, Line3, PARALLEL_EPSILON};
pub use vector::{Vector3, NORMALIZE_EPSILON};
