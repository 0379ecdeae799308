use approx::assert_relative_eq;
use ledtri_3d::Vector3;
use ledtri_camera::{CameraModel, CameraParams};
use ledtri_match::{
    Calibrator, Matcher, MatcherParams, ParamGrid, PointMatch, SweepAxis, UnmatchedReason,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn observe(camera: &mut CameraModel, point: Vector3) -> Result<usize, Box<dyn std::error::Error>> {
    let scale = 4.0;
    let [x, y] = camera.pixel_of_world(point)?;
    let [raw_x, raw_y] = camera.layout().raw_from_pixel(scale, x, y);
    Ok(camera.add_detection(scale, raw_x, raw_y)?)
}

fn camera_pair(zrot: f64, yrot: f64, fov: f64) -> (CameraModel, CameraModel) {
    (
        CameraModel::new(CameraParams::from_degrees_fov(Vector3::ZERO, 0.0, 0.0, 45.0)),
        CameraModel::new(CameraParams::new(Vector3::new(30.0, 0.0, 0.0), zrot, yrot, fov)),
    )
}

#[test]
fn single_point_triangulates_exactly() -> TestResult {
    let (mut a, mut b) = camera_pair(0.22, -0.677, 45f64.to_radians());
    let target = Vector3::new(20.0, 10.0, -60.0);
    observe(&mut a, target)?;
    observe(&mut b, target)?;

    let matches = Matcher::default().match_detections(&a, &b)?;
    assert_eq!(matches.len(), 1);

    let m = matches[0].matched().ok_or("expected a match")?;
    assert_eq!((m.source_index, m.matched_index), (0, 0));
    assert_relative_eq!(m.distance, 0.0, epsilon = 1e-9);
    assert_relative_eq!(m.midpoint.x, 20.0, epsilon = 1e-6);
    assert_relative_eq!(m.midpoint.y, 10.0, epsilon = 1e-6);
    assert_relative_eq!(m.midpoint.z, -60.0, epsilon = 1e-6);
    Ok(())
}

#[test]
fn shuffled_points_are_paired() -> TestResult {
    let (mut a, mut b) = camera_pair(0.22, -0.677, 45f64.to_radians());
    let points = [
        Vector3::new(20.0, 10.0, 60.0),
        Vector3::new(5.0, -8.0, 55.0),
        Vector3::new(12.0, 14.0, 70.0),
        Vector3::new(25.0, 3.0, 65.0),
        Vector3::new(-5.0, 6.0, 50.0),
    ];
    // camera b sees the points in a different order
    let order = [3, 0, 4, 1, 2];

    for p in points.iter() {
        observe(&mut a, *p)?;
    }
    for &k in order.iter() {
        observe(&mut b, points[k])?;
    }

    let matches = Matcher::default().match_detections(&a, &b)?;
    assert_eq!(matches.len(), points.len());
    for (i, outcome) in matches.iter().enumerate() {
        assert_eq!(outcome.source_index(), i);
        let m = outcome.matched().ok_or("expected a match")?;
        assert_eq!(order[m.matched_index], i);
        assert!(m.distance < 1e-9);
        assert!((m.midpoint - points[i]).length() < 1e-6);
    }
    Ok(())
}

#[test]
fn empty_target_reports_no_candidate() -> TestResult {
    let (mut a, b) = camera_pair(0.22, -0.677, 45f64.to_radians());
    observe(&mut a, Vector3::new(20.0, 10.0, 60.0))?;
    observe(&mut a, Vector3::new(5.0, -8.0, 55.0))?;

    let matches = Matcher::default().match_detections(&a, &b)?;
    assert_eq!(matches.len(), 2);
    for (i, outcome) in matches.iter().enumerate() {
        assert_eq!(
            *outcome,
            PointMatch::Unmatched {
                source_index: i,
                reason: UnmatchedReason::NoCandidate
            }
        );
    }
    Ok(())
}

#[test]
fn threshold_rejects_unrelated_detection() -> TestResult {
    let (mut a, mut b) = camera_pair(0.22, -0.677, 45f64.to_radians());
    observe(&mut a, Vector3::new(20.0, 10.0, 60.0))?;
    observe(&mut b, Vector3::new(-5.0, 6.0, 50.0))?;

    let matcher = Matcher::new(MatcherParams {
        max_distance: Some(0.5),
    });
    let matches = matcher.match_detections(&a, &b)?;
    assert!(matches!(
        matches[0],
        PointMatch::Unmatched {
            source_index: 0,
            reason: UnmatchedReason::AboveThreshold { best_index: 0, .. }
        }
    ));

    // without a threshold the spurious pairing is forced
    let forced = Matcher::default().match_detections(&a, &b)?;
    assert!(forced[0].matched().is_some());
    Ok(())
}

fn calibration_scene() -> Result<(CameraModel, CameraModel, Vec<(usize, usize)>), Box<dyn std::error::Error>> {
    let (mut a, mut b) = camera_pair(0.307, -0.327, 0.700);
    let points = [
        Vector3::new(10.0, 5.0, 60.0),
        Vector3::new(20.0, -8.0, 55.0),
        Vector3::new(5.0, 12.0, 70.0),
        Vector3::new(15.0, 0.0, 65.0),
        Vector3::new(25.0, 6.0, 50.0),
    ];
    let mut correspondences = Vec::new();
    for p in points.iter() {
        correspondences.push((observe(&mut a, *p)?, observe(&mut b, *p)?));
    }
    Ok((a, b, correspondences))
}

#[test]
fn zrot_sweep_selects_nearest_grid_point() -> TestResult {
    let (a, mut b, correspondences) = calibration_scene()?;

    // start from a wrong guess; the grid steps over the true value 0.307
    let mut guess = *b.params();
    guess.zrot = 0.311;
    b.set_params(guess);

    let grid = ParamGrid {
        zrot: SweepAxis::new(0.311, 0.003, 21),
        ..ParamGrid::fixed_at(&guess)
    };
    let result = Calibrator::new(grid).calibrate(&a, &b, &correspondences)?;

    assert_eq!(result.evaluated, 21);
    assert_eq!(result.skipped, 0);
    assert_relative_eq!(result.params.zrot, 0.308, epsilon = 1e-9);
    assert_eq!(result.residuals.len(), correspondences.len());
    assert_relative_eq!(
        result.error,
        result.residuals.iter().sum::<f64>(),
        epsilon = 1e-12
    );

    // the camera itself is untouched until the caller applies the result
    assert_eq!(b.params().zrot, 0.311);
    b.set_params(result.params);
    assert_eq!(b.params().zrot, result.params.zrot);
    Ok(())
}

#[test]
fn two_axis_sweep_recovers_true_pose() -> TestResult {
    let (a, b, correspondences) = calibration_scene()?;

    let grid = ParamGrid {
        zrot: SweepAxis::new(0.307, 0.004, 5),
        yrot: SweepAxis::new(-0.327, 0.003, 5),
        fov: SweepAxis::fixed(0.700),
    };
    let result = Calibrator::new(grid).calibrate(&a, &b, &correspondences)?;

    assert_eq!(result.evaluated, 25);
    assert_relative_eq!(result.params.zrot, 0.307, epsilon = 1e-12);
    assert_relative_eq!(result.params.yrot, -0.327, epsilon = 1e-12);
    assert!(result.error < 1e-9);
    Ok(())
}
