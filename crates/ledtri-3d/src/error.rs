/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The two lines are parallel or nearly so; their closest approach is not unique.
    #[error("Lines are parallel or nearly parallel (|cross| = {cross_norm:e})")]
    DegenerateGeometry {
        /// Magnitude of the cross product of the two unit directions.
        cross_norm: f64,
    },
}
