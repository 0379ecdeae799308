use ledtri_3d::{Line3, Vector3};
use ledtri_camera::CameraModel;
use serde::{Deserialize, Serialize};

use crate::error::MatchError;

/// Parameters for the nearest-ray matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatcherParams {
    /// Best candidates further than this from the source ray are reported as
    /// unmatched. `None` accepts every best candidate.
    pub max_distance: Option<f64>,
}

/// A source detection paired with its nearest target detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Index of the detection in the source camera.
    pub source_index: usize,
    /// Index of the nearest detection in the target camera.
    pub matched_index: usize,
    /// Ray distance as ranked by [`Line3::distance_between`].
    pub distance: f64,
    /// Estimated 3D position: midpoint of the rays' closest approach.
    pub midpoint: Vector3,
}

/// Why a source detection was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnmatchedReason {
    /// The target camera has no detections.
    NoCandidate,
    /// Every target ray is parallel to the source ray.
    AllDegenerate,
    /// The nearest candidate is further than `MatcherParams::max_distance`.
    AboveThreshold {
        /// Index of the nearest target detection.
        best_index: usize,
        /// Its ray distance.
        distance: f64,
    },
}

/// Outcome for one source detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointMatch {
    /// A partner was found and the point triangulated.
    Matched(MatchResult),
    /// No acceptable partner.
    Unmatched {
        /// Index of the detection in the source camera.
        source_index: usize,
        /// Reason no partner was accepted.
        reason: UnmatchedReason,
    },
}

impl PointMatch {
    /// Index of the source detection this outcome belongs to.
    pub fn source_index(&self) -> usize {
        match self {
            PointMatch::Matched(m) => m.source_index,
            PointMatch::Unmatched { source_index, .. } => *source_index,
        }
    }

    /// The match, if one was accepted.
    pub fn matched(&self) -> Option<&MatchResult> {
        match self {
            PointMatch::Matched(m) => Some(m),
            PointMatch::Unmatched { .. } => None,
        }
    }
}

/// Exhaustive nearest-ray matcher between two cameras.
///
/// Every source ray is compared against every target ray, so a pass costs
/// `O(|source| * |target|)` distance evaluations. Detection counts per
/// frame are in the tens, which keeps this cheap.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    params: MatcherParams,
}

impl Matcher {
    /// Create a matcher.
    pub fn new(params: MatcherParams) -> Self {
        Self { params }
    }

    /// The matcher's parameters.
    pub fn params(&self) -> &MatcherParams {
        &self.params
    }

    /// Match every detection of `source` against the detections of `target`.
    ///
    /// Returns one outcome per source detection, in source index order.
    pub fn match_detections(
        &self,
        source: &CameraModel,
        target: &CameraModel,
    ) -> Result<Vec<PointMatch>, MatchError> {
        let target_rays = target.rays()?;

        let matches = (0..source.len())
            .map(|source_index| -> Result<PointMatch, MatchError> {
                let ray = source.ray_of(source_index)?;
                Ok(self.match_ray(source_index, &ray, &target_rays))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Matched {}/{} source detections against {} candidates",
            matches.iter().filter(|m| m.matched().is_some()).count(),
            matches.len(),
            target_rays.len()
        );

        Ok(matches)
    }

    /// Find the nearest of `candidates` to `ray` and triangulate the pair.
    ///
    /// Ties keep the lowest candidate index.
    pub fn match_ray(&self, source_index: usize, ray: &Line3, candidates: &[Line3]) -> PointMatch {
        let unmatched = |reason: UnmatchedReason| PointMatch::Unmatched {
            source_index,
            reason,
        };

        if candidates.is_empty() {
            return unmatched(UnmatchedReason::NoCandidate);
        }

        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            match Line3::distance_between(ray, candidate) {
                Ok(distance) if distance.is_finite() => {
                    if best.map_or(true, |(_, best_distance)| distance < best_distance) {
                        best = Some((index, distance));
                    }
                }
                Ok(distance) => {
                    log::debug!("Skipping candidate {index} with distance {distance}");
                }
                Err(e) => {
                    log::debug!("Skipping candidate {index} for source {source_index}: {e}");
                }
            }
        }

        let Some((best_index, distance)) = best else {
            log::warn!("Source detection {source_index}: every candidate ray is parallel");
            return unmatched(UnmatchedReason::AllDegenerate);
        };

        if let Some(max_distance) = self.params.max_distance {
            if distance > max_distance {
                return unmatched(UnmatchedReason::AboveThreshold {
                    best_index,
                    distance,
                });
            }
        }

        match Line3::midpoint_between(ray, &candidates[best_index]) {
            Ok(approach) => PointMatch::Matched(MatchResult {
                source_index,
                matched_index: best_index,
                distance,
                midpoint: approach.midpoint,
            }),
            Err(_) => unmatched(UnmatchedReason::AllDegenerate),
        }
    }
}
