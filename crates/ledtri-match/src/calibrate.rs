//! Brute-force refinement of one camera's rotation and field of view
//! against a fixed reference camera.
//!
//! Calibration is rare and supervised, so the search is a plain
//! enumeration of a small grid: no gradients and no convergence test.

use ledtri_3d::{GeometryError, Line3};
use ledtri_camera::{CameraError, CameraModel, CameraParams};
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Values swept along one parameter.
///
/// Produces `center + (i - count / 2) * step` for `i in 0..count`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepAxis {
    /// Value at offset zero.
    pub center: f64,
    /// Distance between neighbouring values.
    pub step: f64,
    /// Number of values.
    pub count: usize,
}

impl SweepAxis {
    /// Create a sweep axis.
    pub fn new(center: f64, step: f64, count: usize) -> Self {
        Self {
            center,
            step,
            count,
        }
    }

    /// An axis holding a single value.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, 0.0, 1)
    }

    /// The swept values in ascending order of offset.
    pub fn values(self) -> impl Iterator<Item = f64> {
        let half = (self.count / 2) as f64;
        (0..self.count).map(move |i| self.center + (i as f64 - half) * self.step)
    }
}

/// The grid of candidate parameters for the camera being calibrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    /// Roll offset values.
    pub zrot: SweepAxis,
    /// Yaw values.
    pub yrot: SweepAxis,
    /// Field of view values.
    pub fov: SweepAxis,
}

impl ParamGrid {
    /// A single-point grid at the given parameters.
    pub fn fixed_at(params: &CameraParams) -> Self {
        Self {
            zrot: SweepAxis::fixed(params.zrot),
            yrot: SweepAxis::fixed(params.yrot),
            fov: SweepAxis::fixed(params.fov),
        }
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.zrot.count * self.yrot.count * self.fov.count
    }

    /// Whether the grid has no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameter snapshots for every grid point, keeping `base.position`.
    pub fn candidates(&self, base: &CameraParams) -> impl Iterator<Item = CameraParams> {
        let (grid, base) = (*self, *base);
        grid.zrot.values().flat_map(move |zrot| {
            grid.yrot.values().flat_map(move |yrot| {
                grid.fov.values().map(move |fov| CameraParams {
                    zrot,
                    yrot,
                    fov,
                    ..base
                })
            })
        })
    }
}

/// Best grid point found by [`Calibrator::calibrate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationResult {
    /// Parameters with the lowest total error.
    pub params: CameraParams,
    /// Sum of absolute ray distances over the correspondences.
    pub error: f64,
    /// Per-correspondence ray distances at `params`.
    pub residuals: Vec<f64>,
    /// Number of grid points evaluated.
    pub evaluated: usize,
    /// Number of grid points skipped as degenerate or invalid.
    pub skipped: usize,
}

/// Total and per-pair ray distance for one parameter snapshot of `target`.
///
/// `correspondences` holds `(reference_index, target_index)` pairs. The
/// result depends only on the snapshot and the stored detections.
pub fn correspondence_error(
    reference: &CameraModel,
    target: &CameraModel,
    target_params: &CameraParams,
    correspondences: &[(usize, usize)],
) -> Result<(f64, Vec<f64>), CalibrationError> {
    let residuals = correspondences
        .iter()
        .map(|&(ri, ti)| -> Result<f64, CalibrationError> {
            let a = reference.ray_of(ri)?;
            let b = target.ray_with_params(target_params, ti)?;
            Ok(Line3::distance_between(&a, &b)?.abs())
        })
        .collect::<Result<Vec<f64>, CalibrationError>>()?;
    Ok((residuals.iter().sum(), residuals))
}

/// Grid-search calibrator.
#[derive(Debug, Clone)]
pub struct Calibrator {
    grid: ParamGrid,
}

impl Calibrator {
    /// Create a calibrator sweeping `grid`.
    pub fn new(grid: ParamGrid) -> Self {
        Self { grid }
    }

    /// The swept grid.
    pub fn grid(&self) -> &ParamGrid {
        &self.grid
    }

    /// Find the grid point of `target`'s parameters that minimizes the total
    /// ray distance over `correspondences`, holding `reference` fixed.
    ///
    /// Neither camera is modified; apply the result with
    /// [`CameraModel::set_params`]. The first grid point with the lowest
    /// error wins. Grid points at which any pair is degenerate, or whose
    /// field of view is not positive, are skipped.
    pub fn calibrate(
        &self,
        reference: &CameraModel,
        target: &CameraModel,
        correspondences: &[(usize, usize)],
    ) -> Result<CalibrationResult, CalibrationError> {
        if correspondences.is_empty() {
            return Err(CalibrationError::EmptyCorrespondences);
        }
        if self.grid.is_empty() {
            return Err(CalibrationError::EmptyGrid);
        }

        let mut best: Option<(CameraParams, f64, Vec<f64>)> = None;
        let mut evaluated = 0;
        let mut skipped = 0;

        for candidate in self.grid.candidates(target.params()) {
            let (error, residuals) =
                match correspondence_error(reference, target, &candidate, correspondences) {
                    Ok(r) => r,
                    Err(CalibrationError::Geometry(GeometryError::DegenerateGeometry {
                        cross_norm,
                    })) => {
                        log::debug!(
                            "Skipping zrot={} yrot={} fov={}: degenerate pair (|cross| = {cross_norm:e})",
                            candidate.zrot,
                            candidate.yrot,
                            candidate.fov
                        );
                        skipped += 1;
                        continue;
                    }
                    Err(CalibrationError::Camera(CameraError::InvalidFov(fov))) => {
                        log::debug!("Skipping grid point with invalid fov={fov}");
                        skipped += 1;
                        continue;
                    }
                    Err(e) => return Err(e),
                };
            evaluated += 1;

            log::debug!(
                "zrot={:.4} yrot={:.4} fov={:.4} error={:.6} residuals={:?}",
                candidate.zrot,
                candidate.yrot,
                candidate.fov,
                error,
                residuals
            );

            if best.as_ref().map_or(true, |(_, best_error, _)| error < *best_error) {
                best = Some((candidate, error, residuals));
            }
        }

        let (params, error, residuals) =
            best.ok_or(CalibrationError::NoValidCandidate { skipped })?;

        log::info!(
            "Calibration over {} grid points: zrot={} yrot={} fov={} error={}",
            evaluated,
            params.zrot,
            params.yrot,
            params.fov,
            error
        );

        Ok(CalibrationResult {
            params,
            error,
            residuals,
            evaluated,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ledtri_3d::Vector3;

    #[test]
    fn test_sweep_axis_values() {
        let axis = SweepAxis::new(0.307, 0.003, 20);
        let values: Vec<f64> = axis.values().collect();
        assert_eq!(values.len(), 20);
        assert_relative_eq!(values[0], 0.307 - 10.0 * 0.003, epsilon = 1e-12);
        assert_relative_eq!(values[10], 0.307, epsilon = 1e-12);
        assert_relative_eq!(values[19], 0.307 + 9.0 * 0.003, epsilon = 1e-12);

        let fixed: Vec<f64> = SweepAxis::fixed(1.5).values().collect();
        assert_eq!(fixed, vec![1.5]);
    }

    #[test]
    fn test_grid_candidates_keep_position() {
        let base = CameraParams::new(Vector3::new(30.0, 0.0, 0.0), 0.3, -0.3, 0.7);
        let grid = ParamGrid {
            zrot: SweepAxis::new(0.3, 0.01, 3),
            yrot: SweepAxis::new(-0.3, 0.01, 2),
            fov: SweepAxis::fixed(0.7),
        };
        let candidates: Vec<CameraParams> = grid.candidates(&base).collect();
        assert_eq!(candidates.len(), grid.len());
        assert_eq!(candidates.len(), 6);
        assert!(candidates.iter().all(|c| c.position == base.position));
        assert!(candidates.iter().all(|c| c.fov == 0.7));
    }

    #[test]
    fn test_empty_inputs() {
        let camera = CameraModel::new(CameraParams::new(Vector3::ZERO, 0.0, 0.0, 0.7));
        let calibrator = Calibrator::new(ParamGrid::fixed_at(camera.params()));
        assert_eq!(
            calibrator.calibrate(&camera, &camera, &[]),
            Err(CalibrationError::EmptyCorrespondences)
        );

        let mut grid = ParamGrid::fixed_at(camera.params());
        grid.fov.count = 0;
        assert_eq!(
            Calibrator::new(grid).calibrate(&camera, &camera, &[(0, 0)]),
            Err(CalibrationError::EmptyGrid)
        );
    }

    #[test]
    fn test_missing_detection_is_an_error() {
        let camera = CameraModel::new(CameraParams::new(Vector3::ZERO, 0.0, 0.0, 0.7));
        let calibrator = Calibrator::new(ParamGrid::fixed_at(camera.params()));
        assert!(matches!(
            calibrator.calibrate(&camera, &camera, &[(0, 0)]),
            Err(CalibrationError::Camera(_))
        ));
    }

    #[test]
    fn test_invalid_fov_grid_points_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let mut a = CameraModel::new(CameraParams::new(Vector3::ZERO, 0.0, 0.0, 0.7));
        a.add_detection(1.0, 700.0, 250.0)?;
        let mut b = CameraModel::new(CameraParams::new(
            Vector3::new(30.0, 0.0, 0.0),
            0.0,
            -0.3,
            0.7,
        ));
        b.add_detection(1.0, 500.0, 250.0)?;

        // values -0.7, 0.0, 0.7
        let grid = ParamGrid {
            fov: SweepAxis::new(0.0, 0.7, 3),
            ..ParamGrid::fixed_at(b.params())
        };
        let result = Calibrator::new(grid).calibrate(&a, &b, &[(0, 0)])?;
        assert_eq!(result.skipped, 2);
        assert_eq!(result.evaluated, 1);
        assert_relative_eq!(result.params.fov, 0.7, epsilon = 1e-12);

        let only_invalid = ParamGrid {
            fov: SweepAxis::new(-0.35, 0.35, 2),
            ..ParamGrid::fixed_at(b.params())
        };
        assert_eq!(
            Calibrator::new(only_invalid).calibrate(&a, &b, &[(0, 0)]),
            Err(CalibrationError::NoValidCandidate { skipped: 2 })
        );
        Ok(())
    }

    #[test]
    fn test_all_degenerate() -> Result<(), Box<dyn std::error::Error>> {
        // identical cameras see every point along identical, hence parallel, rays
        let mut a = CameraModel::new(CameraParams::new(Vector3::ZERO, 0.0, 0.0, 0.7));
        a.add_detection(1.0, 700.0, 250.0)?;
        let b = a.clone();
        let calibrator = Calibrator::new(ParamGrid::fixed_at(b.params()));
        assert_eq!(
            calibrator.calibrate(&a, &b, &[(0, 0)]),
            Err(CalibrationError::NoValidCandidate { skipped: 1 })
        );
        Ok(())
    }
}
