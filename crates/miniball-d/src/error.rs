use thiserror::Error;

/// Errors reported by the ball engine.
///
/// Numerically degenerate input (duplicates, affinely dependent points) is not an
/// error; it is absorbed by the basis update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MiniballError {
    /// `build` was called before any point was checked in.
    #[error("cannot build a ball from zero points")]
    NoPoints,

    /// The engine was created for a zero-dimensional space.
    #[error("ambient dimension must be at least 1")]
    ZeroDimension,

    /// A point's coordinate count differs from the engine's dimension.
    #[error("point has {found} coordinates, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}
