use serde::{Deserialize, Serialize};

use crate::{camera::CameraModel, error::CameraError};

/// A raw detection as reported by the capture side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Index of the camera that observed the point.
    pub camera: usize,
    /// Binning/cropping factor of the frame the point was found in.
    pub scale: f64,
    /// Raw x coordinate.
    pub x: f64,
    /// Raw y coordinate.
    pub y: f64,
}

impl From<(usize, f64, f64, f64)> for Detection {
    fn from((camera, scale, x, y): (usize, f64, f64, f64)) -> Self {
        Self { camera, scale, x, y }
    }
}

/// Append each detection to the camera it names, in order.
///
/// Fails on the first detection that names a missing camera or carries an
/// invalid scale; detections before it have already been stored.
pub fn add_raw_detections(
    cameras: &mut [CameraModel],
    detections: &[Detection],
) -> Result<(), CameraError> {
    let num_cameras = cameras.len();
    for detection in detections {
        let camera = cameras
            .get_mut(detection.camera)
            .ok_or(CameraError::UnknownCamera {
                camera: detection.camera,
                num_cameras,
            })?;
        camera.add_detection(detection.scale, detection.x, detection.y)?;
    }
    log::debug!(
        "Added {} detections across {} cameras",
        detections.len(),
        num_cameras
    );
    Ok(())
}
