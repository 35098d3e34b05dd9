//! Default tolerances for basis updates, outside tests and certificate checks.

/// Relative threshold below which a pushed point counts as affinely dependent.
///
/// A point is rejected when the squared length of its offset from the first basis
/// point, after projecting out the current basis directions, is at most this
/// fraction of the squared length before projection. `1e-20` corresponds to an
/// orthogonal component below `1e-10` of the offset, well above the rounding noise
/// of the Gram-Schmidt step.
pub const DEFAULT_PUSH_EPSILON: f64 = 1e-20;

/// Relative excess a point must exceed to count as outside the current ball.
///
/// A point is outside when its excess is above this fraction of the squared
/// radius. Boundary points of cospherical input carry excess at rounding level
/// and must not trigger pushes or pivots.
pub const DEFAULT_OUTSIDE_TOLERANCE: f64 = 1e-12;

/// Relative accuracy a built ball must beat to be reported as valid.
pub const DEFAULT_VALIDITY_TOLERANCE: f64 = 1e-15;
