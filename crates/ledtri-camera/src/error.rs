/// An error type for the camera module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    /// The detection index does not refer to a stored detection.
    #[error("Detection index {index} out of range (camera has {len} detections)")]
    DetectionOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of stored detections.
        len: usize,
    },

    /// A raw detection names a camera that does not exist.
    #[error("Detection refers to camera {camera}, but only {num_cameras} cameras exist")]
    UnknownCamera {
        /// Camera index carried by the detection.
        camera: usize,
        /// Number of cameras available.
        num_cameras: usize,
    },

    /// The binning/cropping scale of a detection must be finite and positive.
    #[error("Invalid detection scale: {0}")]
    InvalidScale(f64),

    /// The field of view must be finite and positive.
    #[error("Invalid field of view: {0}")]
    InvalidFov(f64),

    /// The point coincides with the camera position, so it has no direction.
    #[error("Point coincides with the camera position")]
    PointAtCameraCenter,
}
