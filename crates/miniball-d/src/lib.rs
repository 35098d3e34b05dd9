//! Smallest enclosing balls of point sets in runtime-specified dimension.
//!
//! Points are checked into a [`Miniball`] engine one at a time; [`Miniball::build`]
//! runs a move-to-front algorithm (optionally with pivoting) over them and returns a
//! [`BuiltMiniball`] that answers center, radius and support queries, plus an
//! accuracy certificate computed independently of the construction.
//!
//! # Example
//!
//! ```
//! use miniball_d::compute;
//!
//! let points = vec![[0.0, 0.0], [4.0, 0.0], [0.0, 3.0], [2.0, 1.0]];
//!
//! let output = compute(&points).expect("non-empty input");
//! assert!((output.ball.squared_radius - 6.25).abs() < 1e-12);
//! assert!((output.ball.center[0] - 2.0).abs() < 1e-12);
//! assert!((output.ball.center[1] - 1.5).abs() < 1e-12);
//! ```

mod basis;
mod certify;
mod constants;
mod engine;
mod error;
mod point_set;
mod types;

pub use certify::Certificate;
pub use constants::{
    DEFAULT_OUTSIDE_TOLERANCE, DEFAULT_PUSH_EPSILON, DEFAULT_VALIDITY_TOLERANCE,
};
pub use engine::{BuiltMiniball, Miniball, MiniballConfig, SupportPoints};
pub use error::MiniballError;
pub use types::{squared_distance, Ball, PointLike};

/// Output from a one-shot ball computation.
#[derive(Debug, Clone)]
pub struct MiniballOutput {
    /// The smallest enclosing ball.
    pub ball: Ball,
    /// Accuracy and optimality slack of `ball`.
    pub certificate: Certificate,
    /// Input indices of the points that determine the ball.
    pub support: Vec<usize>,
    /// Whether the certificate passed the configured validity tolerance.
    pub valid: bool,
}

/// Compute the smallest enclosing ball of `points` with default settings.
///
/// The dimension is taken from the first point; every other point must match it.
pub fn compute<P: PointLike>(points: &[P]) -> Result<MiniballOutput, MiniballError> {
    compute_with(points, MiniballConfig::default())
}

/// Compute the smallest enclosing ball of `points` with explicit configuration.
pub fn compute_with<P: PointLike>(
    points: &[P],
    config: MiniballConfig,
) -> Result<MiniballOutput, MiniballError> {
    let first = points.first().ok_or(MiniballError::NoPoints)?;

    let mut mb = Miniball::with_config(first.coords().len(), config);
    for p in points {
        mb.try_check_in(p.coords())?;
    }
    let built = mb.build()?;

    let certificate = built.accuracy();
    Ok(MiniballOutput {
        ball: built.ball(),
        certificate,
        support: built.support_indices().collect(),
        valid: certificate.is_valid(config.validity_tolerance),
    })
}
