use argh::FromArgs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use ledtri::camera::{
    add_raw_detections, CameraModel, CameraParams, Detection, PolynomialLens, SensorLayout,
};
use ledtri::k3d::Vector3;
use ledtri::matching::{Calibrator, Matcher, MatcherParams, ParamGrid, PointMatch, SweepAxis};

#[derive(FromArgs)]
/// Match LED detections between two cameras and triangulate them
struct Args {
    /// path to a JSON scene; the recorded session is used when omitted
    #[argh(option)]
    scene: Option<PathBuf>,

    /// sweep the second camera's parameters before matching
    #[argh(switch)]
    calibrate: bool,

    /// reject matches whose rays pass further apart than this
    #[argh(option)]
    max_distance: Option<f64>,

    /// apply the grid-fitted lens polynomials to every camera
    #[argh(switch)]
    grid_lens: bool,
}

/// Cameras, raw detections and optional calibration inputs.
#[derive(Debug, Serialize, Deserialize)]
struct Scene {
    cameras: Vec<CameraParams>,
    #[serde(default)]
    layout: SensorLayout,
    detections: Vec<Detection>,
    #[serde(default)]
    correspondences: Vec<(usize, usize)>,
    #[serde(default)]
    grid: Option<ParamGrid>,
}

// the session's first detection list, not the later four/five-point one
fn recorded_scene() -> Scene {
    // (20, 10, -60) among the LEDs
    let detections = [
        (0, 4.0, 3152.0, 928.0),
        (0, 4.0, 2832.0, 1040.0),
        (0, 4.0, 3280.0, 1168.0),
        (0, 4.0, 2576.0, 1360.0),
        (0, 4.0, 3088.0, 1408.0),
        (1, 4.0, 4112.0, 736.0),
        (1, 4.0, 4208.0, 816.0),
        (1, 4.0, 3312.0, 928.0),
        (1, 4.0, 3728.0, 1024.0),
        (1, 4.0, 3216.0, 1280.0),
        (1, 4.0, 3600.0, 1312.0),
    ]
    .into_iter()
    .map(Detection::from)
    .collect();

    Scene {
        cameras: vec![
            CameraParams::from_degrees_fov(Vector3::ZERO, 0.0, 0.0, 45.0),
            CameraParams::new(Vector3::new(30.0, 0.0, 0.0), 0.307, -0.327, 0.700),
        ],
        layout: SensorLayout::default(),
        detections,
        correspondences: vec![(2, 3), (3, 4), (4, 5)],
        grid: Some(ParamGrid {
            zrot: SweepAxis::new(0.307, 0.003, 20),
            yrot: SweepAxis::fixed(-0.327),
            fov: SweepAxis::fixed(0.700),
        }),
    }
}

fn grid_lens() -> PolynomialLens {
    PolynomialLens::new(
        vec![0.0, 0.9910080700407145, 0.0, 0.14212768870589798, 0.0, 0.04690762704558438].into(),
        vec![0.0, 1.0090754323185678, 0.0, -0.1475322994748467, 0.0, 0.01851542667918693].into(),
    )
}

fn build_cameras(
    scene: &Scene,
    use_grid_lens: bool,
) -> Result<Vec<CameraModel>, Box<dyn std::error::Error>> {
    if scene.cameras.len() < 2 {
        return Err(format!("scene needs two cameras, got {}", scene.cameras.len()).into());
    }

    let mut cameras = scene
        .cameras
        .iter()
        .map(|params| {
            let camera = CameraModel::new(*params).with_layout(scene.layout);
            if use_grid_lens {
                camera.with_lens(grid_lens())
            } else {
                camera
            }
        })
        .collect::<Vec<_>>();

    add_raw_detections(&mut cameras, &scene.detections)?;
    Ok(cameras)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let scene: Scene = match &args.scene {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => recorded_scene(),
    };
    log::info!(
        "Scene with {} cameras and {} detections",
        scene.cameras.len(),
        scene.detections.len()
    );

    let mut cameras = build_cameras(&scene, args.grid_lens)?;
    for (i, camera) in cameras.iter().enumerate() {
        println!("camera {}: {} detections {:?}", i, camera.len(), camera.params());
    }

    if args.calibrate {
        let grid = scene
            .grid
            .unwrap_or_else(|| ParamGrid::fixed_at(cameras[1].params()));
        let result =
            Calibrator::new(grid).calibrate(&cameras[0], &cameras[1], &scene.correspondences)?;
        println!(
            "calibrated: zrot={} yrot={} fov={} error={} residuals={:?}",
            result.params.zrot, result.params.yrot, result.params.fov, result.error, result.residuals
        );
        cameras[1].set_params(result.params);
    }

    let matcher = Matcher::new(MatcherParams {
        max_distance: args.max_distance,
    });
    for outcome in matcher.match_detections(&cameras[0], &cameras[1])? {
        match outcome {
            PointMatch::Matched(m) => println!(
                "{} -> {} distance {:.6} midpoint {}",
                m.source_index, m.matched_index, m.distance, m.midpoint
            ),
            PointMatch::Unmatched {
                source_index,
                reason,
            } => println!("{} unmatched: {:?}", source_index, reason),
        }
    }

    Ok(())
}
