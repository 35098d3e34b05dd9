//! Post-hoc accuracy certificate for a built ball.
//!
//! The check recomputes every point's excess against the final center and does not
//! reuse any decision taken during construction.

use crate::basis::Basis;
use crate::point_set::{PointSet, ScanOrder, END};

/// Accuracy and optimality measures of a built ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Certificate {
    /// Largest violation relative to the squared radius: the absolute excess of
    /// support points (they should lie on the boundary) and the positive excess of
    /// every other point (they should lie inside).
    ///
    /// For a zero radius ball the violation is reported unscaled.
    pub accuracy: f64,
    /// Distance of the center from the convex hull of the support points, in
    /// barycentric units. Zero for an optimal ball.
    pub slack: f64,
}

impl Certificate {
    /// Strict check: accuracy below `tolerance` and exactly zero slack.
    ///
    /// Rounding in the slack computation can make this false for a ball that is
    /// fine in practice.
    #[inline]
    pub fn is_valid(&self, tolerance: f64) -> bool {
        self.accuracy < tolerance && self.slack == 0.0
    }
}

pub(crate) fn certify(
    points: &PointSet,
    order: &ScanOrder,
    support_end: usize,
    basis: &Basis,
) -> Certificate {
    let mut max_e = 0.0f64;
    let mut n_support = 0usize;

    for idx in order.range(order.head(), support_end) {
        max_e = max_e.max(basis.excess(points.get(idx)).abs());
        n_support += 1;
    }
    debug_assert_eq!(n_support, basis.support_size());

    for idx in order.range(support_end, END) {
        max_e = max_e.max(basis.excess(points.get(idx)));
    }

    let sqr_r = basis.squared_radius();
    let accuracy = if sqr_r > 0.0 { max_e / sqr_r } else { max_e };

    Certificate {
        accuracy,
        slack: basis.slack(),
    }
}
