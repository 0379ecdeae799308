use serde::{Deserialize, Serialize};

use crate::{error::GeometryError, vector::Vector3};

/// Minimum magnitude of the cross product of two unit directions for the
/// lines to be treated as non-parallel.
pub const PARALLEL_EPSILON: f64 = 1e-9;

/// A ray in 3D space: a start point and a unit direction.
///
/// The direction is normalized on construction and the line is immutable
/// afterwards. Deserialization goes through [`Line3::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LineParts")]
pub struct Line3 {
    start: Vector3,
    direction: Vector3,
}

#[derive(Deserialize)]
struct LineParts {
    start: Vector3,
    direction: Vector3,
}

impl From<LineParts> for Line3 {
    fn from(parts: LineParts) -> Self {
        Line3::new(parts.start, parts.direction)
    }
}

/// Closest approach of two skew lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    /// Midpoint of the shortest segment connecting the lines.
    pub midpoint: Vector3,
    /// Length of the shortest segment.
    pub distance: f64,
    /// End of the segment lying on the first line.
    pub on_a: Vector3,
    /// End of the segment lying on the second line.
    pub on_b: Vector3,
}

impl Line3 {
    /// Create a new line, normalizing `direction`.
    pub fn new(start: Vector3, direction: Vector3) -> Self {
        Self {
            start,
            direction: direction.normalize(),
        }
    }

    /// The start point.
    #[inline]
    pub fn start(&self) -> Vector3 {
        self.start
    }

    /// The unit direction.
    #[inline]
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// The point `start + t * direction`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Vector3 {
        self.start.add_scaled(1.0, self.direction, t)
    }

    /// Perpendicular distance from `p` to the line.
    ///
    /// The offset of `p` from the start is split into a component along the
    /// direction and a perpendicular residual; the residual's length is the
    /// distance.
    pub fn distance_to_point(&self, p: Vector3) -> f64 {
        let rp = Vector3::diff(p, self.start);
        let along = self.direction.scale(rp.dot(self.direction));
        Vector3::diff(rp, along).length()
    }

    /// Distance measure between two lines used to rank candidate pairs.
    ///
    /// Returns `|dot(a.start - b.start, cross(a.direction, b.direction))|`.
    /// The cross product is not normalized, so this is the skew distance
    /// scaled by the sine of the angle between the lines; it equals the skew
    /// distance for perpendicular lines. The exact closest-approach length is
    /// [`ClosestApproach::distance`].
    ///
    /// Parallel lines are reported as [`GeometryError::DegenerateGeometry`].
    pub fn distance_between(a: &Self, b: &Self) -> Result<f64, GeometryError> {
        let cross = checked_cross(a, b)?;
        let sd = Vector3::diff(a.start, b.start);
        Ok(sd.dot(cross).abs())
    }

    /// Closest points on two lines and the midpoint between them.
    ///
    /// The closest point on `a` is where `a` crosses the plane containing `b`
    /// and the common perpendicular, and symmetrically for `b`.
    pub fn midpoint_between(a: &Self, b: &Self) -> Result<ClosestApproach, GeometryError> {
        // below the guard the plane normals vanish
        let avb = checked_cross(a, b)?;
        let a_n = a.direction.cross(avb);
        let b_n = b.direction.cross(avb);
        let bs_m_as = Vector3::diff(b.start, a.start);

        let ka = bs_m_as.dot(b_n) / a.direction.dot(b_n);
        let kb = -bs_m_as.dot(a_n) / b.direction.dot(a_n);

        let on_a = a.point_at(ka);
        let on_b = b.point_at(kb);

        Ok(ClosestApproach {
            midpoint: on_a.add_scaled(0.5, on_b, 0.5),
            distance: Vector3::diff(on_a, on_b).length(),
            on_a,
            on_b,
        })
    }
}

impl std::fmt::Display for Line3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} -> {}]", self.start, self.direction)
    }
}

// cross product of the directions, rejected when the lines are parallel
fn checked_cross(a: &Line3, b: &Line3) -> Result<Vector3, GeometryError> {
    let cross = a.direction.cross(b.direction);
    let cross_norm = cross.length();
    if cross_norm < PARALLEL_EPSILON {
        return Err(GeometryError::DegenerateGeometry { cross_norm });
    }
    Ok(cross)
}
