use ledtri_3d::GeometryError;
use ledtri_camera::CameraError;

/// Error types for the matcher.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// A camera could not produce a ray for one of its detections.
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
}

/// Error types for the calibrator.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// No correspondences to evaluate.
    #[error("Calibration requires at least one correspondence")]
    EmptyCorrespondences,

    /// One of the sweep axes has no values.
    #[error("Calibration grid has no points")]
    EmptyGrid,

    /// Every grid point hit a degenerate correspondence.
    #[error("No grid point could be evaluated ({skipped} skipped as degenerate)")]
    NoValidCandidate {
        /// Number of grid points skipped.
        skipped: usize,
    },

    /// A correspondence pair could not be evaluated.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// A correspondence names a detection the camera does not have.
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
}
