use std::sync::Arc;

use ledtri_3d::{Line3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    error::CameraError,
    lens::{IdentityLens, LensMapping},
};

/// Fixed properties of the image sensor, in pixels.
///
/// Raw detections arrive in a sensor frame whose x axis is binned by
/// `x_binning` relative to y; they are divided down and re-centred on
/// `(center_x, center_y)` before storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorLayout {
    /// Principal point x coordinate.
    pub center_x: f64,
    /// Principal point y coordinate.
    pub center_y: f64,
    /// Image width spanned by the field of view.
    pub width: f64,
    /// Extra horizontal scale factor applied to raw x coordinates.
    pub x_binning: f64,
}

impl Default for SensorLayout {
    fn default() -> Self {
        Self {
            center_x: 320.0,
            center_y: 240.0,
            width: 640.0,
            x_binning: 2.0,
        }
    }
}

impl SensorLayout {
    /// Centred pixel coordinates of a raw detection.
    pub fn normalize_raw(&self, scale: f64, px: f64, py: f64) -> [f64; 2] {
        [
            px / (self.x_binning * scale) - self.center_x,
            py / scale - self.center_y,
        ]
    }

    /// Raw detection coordinates that normalize to the pixel `(x, y)`.
    ///
    /// Inverse of the storage normalization, used to feed forward-simulated
    /// pixels back in as detections.
    pub fn raw_from_pixel(&self, scale: f64, x: f64, y: f64) -> [f64; 2] {
        [x * self.x_binning * scale, y * scale]
    }
}

/// Snapshot of a camera's extrinsics and field of view.
///
/// The world orientation is a rotation by `zrot` about the optical axis
/// followed by a rotation by `yrot` about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// World-space location of the camera.
    pub position: Vector3,
    /// Roll offset about the optical axis, in radians.
    pub zrot: f64,
    /// Yaw about the vertical axis, in radians.
    pub yrot: f64,
    /// Field of view across `SensorLayout::width`, in radians. Must be
    /// finite and positive; see [`CameraParams::validate`].
    pub fov: f64,
}

impl CameraParams {
    /// Create parameters with the field of view in radians.
    pub fn new(position: Vector3, zrot: f64, yrot: f64, fov: f64) -> Self {
        Self {
            position,
            zrot,
            yrot,
            fov,
        }
    }

    /// Create parameters with the field of view given in degrees.
    pub fn from_degrees_fov(position: Vector3, zrot: f64, yrot: f64, fov_degrees: f64) -> Self {
        Self::new(position, zrot, yrot, fov_degrees.to_radians())
    }

    /// Check that the field of view can map pixels to angles.
    pub fn validate(&self) -> Result<(), CameraError> {
        if !self.fov.is_finite() || self.fov <= 0.0 {
            return Err(CameraError::InvalidFov(self.fov));
        }
        Ok(())
    }
}

/// A single camera: parameters, sensor layout, lens and the detections
/// observed in the current session.
///
/// Detections are append-only; their insertion index is their identity.
/// Parameters may be revised between passes, and every query is a pure
/// function of the current parameters and the stored detections. Do not
/// change parameters while a matching pass that reads this camera is in
/// progress.
#[derive(Debug, Clone)]
pub struct CameraModel {
    params: CameraParams,
    layout: SensorLayout,
    lens: Arc<dyn LensMapping>,
    detections: Vec<[f64; 2]>,
}

impl CameraModel {
    /// Creates a camera with the default sensor layout and an ideal lens.
    pub fn new(params: CameraParams) -> Self {
        Self {
            params,
            layout: SensorLayout::default(),
            lens: Arc::new(IdentityLens),
            detections: Vec::new(),
        }
    }

    /// Replace the sensor layout.
    pub fn with_layout(mut self, layout: SensorLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the lens angle mapping.
    pub fn with_lens(mut self, lens: impl LensMapping + 'static) -> Self {
        self.lens = Arc::new(lens);
        self
    }

    /// Current parameters.
    pub fn params(&self) -> &CameraParams {
        &self.params
    }

    /// Replace the parameters, e.g. with a calibration result.
    pub fn set_params(&mut self, params: CameraParams) {
        self.params = params;
    }

    /// Sensor layout.
    pub fn layout(&self) -> &SensorLayout {
        &self.layout
    }

    /// Stored detections as centred pixel coordinates.
    pub fn detections(&self) -> &[[f64; 2]] {
        &self.detections
    }

    /// Number of stored detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Whether no detections are stored.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Store a raw detection and return its index.
    ///
    /// `scale` undoes upstream binning or cropping of the sensor image.
    pub fn add_detection(&mut self, scale: f64, px: f64, py: f64) -> Result<usize, CameraError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CameraError::InvalidScale(scale));
        }
        self.detections
            .push(self.layout.normalize_raw(scale, px, py));
        Ok(self.detections.len() - 1)
    }

    /// Pitch and roll of a stored detection, in radians.
    pub fn angles_of(&self, index: usize) -> Result<(f64, f64), CameraError> {
        self.angles_with_params(&self.params, index)
    }

    /// Pixel coordinates at which a direction with the given pitch and roll
    /// is imaged.
    ///
    /// Expects valid parameters; [`CameraModel::pixel_of_world`] checks them.
    pub fn angles_to_pixels(&self, pitch: f64, roll: f64) -> [f64; 2] {
        let d = self.lens.world_to_sensor(pitch) / self.params.fov * self.layout.width;
        [
            self.layout.center_x + d * roll.cos(),
            self.layout.center_y + d * roll.sin(),
        ]
    }

    /// World-space ray through a stored detection.
    pub fn ray_of(&self, index: usize) -> Result<Line3, CameraError> {
        self.ray_with_params(&self.params, index)
    }

    /// World-space ray through a stored detection, evaluated against a
    /// parameter snapshot instead of the stored parameters.
    pub fn ray_with_params(&self, params: &CameraParams, index: usize) -> Result<Line3, CameraError> {
        let (p, r) = self.angles_with_params(params, index)?;

        let x = p.sin() * (r + params.zrot).cos();
        let y = p.sin() * (r + params.zrot).sin();
        let z = p.cos();

        let (sy, cy) = params.yrot.sin_cos();
        let x2 = x * cy + z * sy;
        let z2 = z * cy - x * sy;

        Ok(Line3::new(params.position, Vector3::new(x2, y, z2)))
    }

    /// Rays through every stored detection, in index order.
    pub fn rays(&self) -> Result<Vec<Line3>, CameraError> {
        (0..self.detections.len())
            .map(|index| self.ray_of(index))
            .collect()
    }

    /// Pitch and roll of a direction given relative to the camera position.
    ///
    /// Pitches beyond a right angle (behind the camera) are folded by `-pi`,
    /// which makes them negative.
    pub fn pitch_roll_of_direction(&self, direction: Vector3) -> Result<(f64, f64), CameraError> {
        let d = direction.length();
        if d == 0.0 {
            return Err(CameraError::PointAtCameraCenter);
        }

        // undo the yaw
        let (sy, cy) = (-self.params.yrot).sin_cos();
        let x2 = cy * direction.x + sy * direction.z;
        let z2 = cy * direction.z - sy * direction.x;

        let mut pitch = (z2 / d).clamp(-1.0, 1.0).acos();
        if pitch > std::f64::consts::FRAC_PI_2 {
            pitch -= std::f64::consts::PI;
        }
        let roll = direction.y.atan2(x2) - self.params.zrot;
        Ok((pitch, roll))
    }

    /// Pitch and roll at which a world point is seen.
    pub fn pitch_roll_of_world(&self, point: Vector3) -> Result<(f64, f64), CameraError> {
        self.pitch_roll_of_direction(point - self.params.position)
    }

    /// Pixel at which a world point is imaged.
    pub fn pixel_of_world(&self, point: Vector3) -> Result<[f64; 2], CameraError> {
        self.params.validate()?;
        let (pitch, roll) = self.pitch_roll_of_world(point)?;
        Ok(self.angles_to_pixels(pitch, roll))
    }

    fn angles_with_params(
        &self,
        params: &CameraParams,
        index: usize,
    ) -> Result<(f64, f64), CameraError> {
        params.validate()?;
        let [x, y] = *self
            .detections
            .get(index)
            .ok_or(CameraError::DetectionOutOfRange {
                index,
                len: self.detections.len(),
            })?;
        let pitch = self
            .lens
            .sensor_to_world(x.hypot(y) * params.fov / self.layout.width);
        let roll = y.atan2(x);
        Ok((pitch, roll))
    }
}
