//! The ball engine: point accumulation, move-to-front construction and queries.
//!
//! Construction follows the move-to-front scheme for smallest enclosing balls.
//! `mtf_mb(end)` makes the current ball enclose every point before `end` in scan
//! order, with the points already pushed on the basis kept on the boundary. A point
//! found outside is pushed, the prefix before it is re-established one level
//! deeper, and the point is moved to the front of the scan order. The nesting is
//! driven by an explicit frame stack whose depth is bounded by `dim + 1`, the
//! largest possible basis.
//!
//! With pivoting enabled, an outer loop repeatedly pushes the point of largest
//! excess outside the current prefix before re-running move-to-front, and stops
//! once no point is outside or the squared radius no longer grows. If a point is
//! still outside at that stage, a plain move-to-front pass over all points
//! finishes the construction.
//!
//! A point is outside when its excess is above `outside_tolerance` times the
//! squared radius.

use std::time::Instant;

use crate::basis::Basis;
use crate::certify::{certify, Certificate};
use crate::constants::{
    DEFAULT_OUTSIDE_TOLERANCE, DEFAULT_PUSH_EPSILON, DEFAULT_VALIDITY_TOLERANCE,
};
use crate::error::MiniballError;
use crate::point_set::{PointSet, ScanIter, ScanOrder, END};
use crate::types::Ball;

/// Configuration for ball construction and validation.
#[derive(Debug, Clone, Copy)]
pub struct MiniballConfig {
    /// Run the pivoting outer loop instead of a single move-to-front pass.
    pub pivoting: bool,
    /// Relative threshold below which a point counts as affinely dependent on the
    /// current support set.
    pub push_epsilon: f64,
    /// Fraction of the squared radius a point's excess must exceed for the point
    /// to count as outside during construction.
    pub outside_tolerance: f64,
    /// Relative accuracy below which [`BuiltMiniball::is_valid`] reports true.
    pub validity_tolerance: f64,
}

impl Default for MiniballConfig {
    fn default() -> Self {
        Self {
            pivoting: true,
            push_epsilon: DEFAULT_PUSH_EPSILON,
            outside_tolerance: DEFAULT_OUTSIDE_TOLERANCE,
            validity_tolerance: DEFAULT_VALIDITY_TOLERANCE,
        }
    }
}

/// An engine accumulating points of a fixed dimension.
#[derive(Debug, Clone)]
pub struct Miniball {
    points: PointSet,
    config: MiniballConfig,
}

impl Miniball {
    /// Create an engine for points with `dim` coordinates.
    pub fn new(dim: usize) -> Self {
        Self::with_config(dim, MiniballConfig::default())
    }

    pub fn with_config(dim: usize, config: MiniballConfig) -> Self {
        Self {
            points: PointSet::new(dim),
            config,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.points.dim()
    }

    #[inline]
    pub fn nr_points(&self) -> usize {
        self.points.len()
    }

    /// Append a point.
    ///
    /// # Panics
    ///
    /// Panics if `point` does not have exactly [`dim`](Self::dim) coordinates.
    pub fn check_in(&mut self, point: &[f64]) {
        assert_eq!(
            point.len(),
            self.dim(),
            "point has {} coordinates, engine dimension is {}",
            point.len(),
            self.dim()
        );
        self.points.push(point);
    }

    /// Append a point, reporting a coordinate count mismatch as an error.
    pub fn try_check_in(&mut self, point: &[f64]) -> Result<(), MiniballError> {
        if point.len() != self.dim() {
            return Err(MiniballError::DimensionMismatch {
                expected: self.dim(),
                found: point.len(),
            });
        }
        self.points.push(point);
        Ok(())
    }

    /// Compute the smallest ball enclosing all checked-in points.
    pub fn build(self) -> Result<BuiltMiniball, MiniballError> {
        if self.dim() == 0 {
            return Err(MiniballError::ZeroDimension);
        }
        if self.points.len() == 0 {
            return Err(MiniballError::NoPoints);
        }

        let dim = self.dim();
        let n = self.points.len();
        let mut built = BuiltMiniball {
            order: ScanOrder::new(n),
            basis: Basis::new(dim, self.config.push_epsilon),
            support_end: END,
            frames: Vec::with_capacity(dim + 2),
            points: self.points,
            config: self.config,
        };
        built.run();
        Ok(built)
    }
}

/// One level of the move-to-front nesting.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Scan stops at this node.
    end: usize,
    /// Next node to test.
    cursor: usize,
    /// Node pushed on the basis while the level above runs.
    pending: Option<usize>,
}

/// An engine whose ball has been computed.
#[derive(Debug, Clone)]
pub struct BuiltMiniball {
    points: PointSet,
    order: ScanOrder,
    basis: Basis,
    /// Support points occupy the scan order from its head up to this node.
    support_end: usize,
    frames: Vec<Frame>,
    config: MiniballConfig,
}

impl BuiltMiniball {
    /// Recompute the ball over the same points.
    ///
    /// The scan order left by the previous build is reused, so this usually
    /// finishes after a single pass.
    pub fn rebuild(&mut self) {
        self.run();
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.points.dim()
    }

    #[inline]
    pub fn nr_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn center(&self) -> &[f64] {
        self.basis.center()
    }

    #[inline]
    pub fn squared_radius(&self) -> f64 {
        self.basis.squared_radius()
    }

    pub fn ball(&self) -> Ball {
        Ball {
            center: self.center().to_vec(),
            squared_radius: self.squared_radius(),
        }
    }

    #[inline]
    pub fn nr_support_points(&self) -> usize {
        self.basis.support_size()
    }

    /// The points determining the ball, most recently moved to the front first.
    pub fn support_points(&self) -> SupportPoints<'_> {
        SupportPoints {
            points: &self.points,
            nodes: self.order.range(self.order.head(), self.support_end),
        }
    }

    /// Insertion indices of the support points, in the order of
    /// [`support_points`](Self::support_points).
    pub fn support_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.range(self.order.head(), self.support_end)
    }

    /// All checked-in points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.points.iter()
    }

    /// Relative accuracy and optimality slack of the ball.
    pub fn accuracy(&self) -> Certificate {
        certify(&self.points, &self.order, self.support_end, &self.basis)
    }

    /// Whether the certificate passes the configured validity tolerance.
    ///
    /// May report false for a ball that is acceptable in practice; see
    /// [`Certificate::is_valid`].
    pub fn is_valid(&self) -> bool {
        self.accuracy().is_valid(self.config.validity_tolerance)
    }

    fn run(&mut self) {
        let start = Instant::now();
        self.basis.reset();
        self.support_end = self.order.head();

        if self.config.pivoting {
            self.pivot_mb();
        } else {
            self.mtf_mb(END);
        }

        log::debug!(
            "miniball: {} points in {}d, {} support points, squared radius {:e} ({:.3?})",
            self.points.len(),
            self.dim(),
            self.basis.support_size(),
            self.basis.squared_radius(),
            start.elapsed()
        );
    }

    /// Make the ball enclose every point before `end`, keeping the currently
    /// pushed basis points on the boundary.
    fn mtf_mb(&mut self, end: usize) {
        debug_assert!(self.frames.is_empty());
        self.enter(end);

        while let Some(top) = self.frames.len().checked_sub(1) {
            if let Some(j) = self.frames[top].pending.take() {
                self.basis.pop();
                self.move_to_front(j);
            }

            let Frame { end, cursor, .. } = self.frames[top];
            if cursor == end {
                self.frames.pop();
                continue;
            }
            self.frames[top].cursor = self.order.next(cursor);

            let p = self.points.get(cursor);
            if self.basis.excess(p) > self.outside_threshold() && self.basis.push(p) {
                self.frames[top].pending = Some(cursor);
                self.enter(cursor);
            }
        }
    }

    fn enter(&mut self, end: usize) {
        self.support_end = self.order.head();
        if self.basis.size() == self.dim() + 1 {
            return;
        }
        debug_assert!(self.frames.len() <= self.dim());
        self.frames.push(Frame {
            end,
            cursor: self.order.head(),
            pending: None,
        });
    }

    fn pivot_mb(&mut self) {
        let mut t = self.order.next(self.order.head());
        self.mtf_mb(t);

        let mut rounds = 0usize;
        while let Some((pivot, max_e)) = self.max_excess(t) {
            rounds += 1;
            log::trace!("pivot round {}: point {} excess {:e}", rounds, pivot, max_e);

            t = self.support_end;
            if t == pivot {
                t = self.order.next(t);
            }

            let old_sqr_r = self.basis.squared_radius();
            let pushed = self.basis.push(self.points.get(pivot));
            debug_assert!(pushed, "push on an empty basis always succeeds");

            self.mtf_mb(self.support_end);
            self.basis.pop();
            self.move_to_front(pivot);

            if self.basis.squared_radius() <= old_sqr_r {
                break;
            }
        }

        if let Some((idx, e)) = self.max_excess(self.order.head()) {
            log::debug!(
                "pivoting left point {} outside (excess {:e}), finishing with move-to-front",
                idx,
                e
            );
            self.mtf_mb(END);
        }
    }

    /// Excess above which a point counts as outside the current ball.
    #[inline]
    fn outside_threshold(&self) -> f64 {
        self.config.outside_tolerance * self.basis.squared_radius().max(0.0)
    }

    /// Point of largest excess above the outside threshold from `start` to the
    /// end of the scan order.
    fn max_excess(&self, start: usize) -> Option<(usize, f64)> {
        let mut best = None;
        let mut max_e = self.outside_threshold();
        for idx in self.order.range(start, END) {
            let e = self.basis.excess(self.points.get(idx));
            if e > max_e {
                max_e = e;
                best = Some(idx);
            }
        }
        best.map(|idx| (idx, max_e))
    }

    fn move_to_front(&mut self, node: usize) {
        if self.support_end == node {
            self.support_end = self.order.next(node);
        }
        self.order.move_to_front(node);
    }
}

/// Iterator over the support points of a [`BuiltMiniball`].
///
/// Finite and side-effect free: clone it or call
/// [`BuiltMiniball::support_points`] again to iterate from the start.
#[derive(Debug, Clone)]
pub struct SupportPoints<'a> {
    points: &'a PointSet,
    nodes: ScanIter<'a>,
}

impl<'a> Iterator for SupportPoints<'a> {
    type Item = &'a [f64];

    #[inline]
    fn next(&mut self) -> Option<&'a [f64]> {
        self.nodes.next().map(|idx| self.points.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::squared_distance;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_points(n: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n)
            .map(|_| (0..dim).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect()
    }

    fn build(points: &[Vec<f64>], dim: usize, config: MiniballConfig) -> BuiltMiniball {
        let mut mb = Miniball::with_config(dim, config);
        for p in points {
            mb.check_in(p);
        }
        mb.build().expect("non-empty input")
    }

    fn assert_encloses(mb: &BuiltMiniball, rel_tol: f64) {
        let r2 = mb.squared_radius();
        for (i, p) in mb.points().enumerate() {
            let d2 = squared_distance(p, mb.center());
            assert!(
                d2 <= r2 + rel_tol * r2.max(1.0),
                "point {} outside ball: d2 = {}, r2 = {}",
                i,
                d2,
                r2
            );
        }
    }

    #[test]
    fn test_example_right_triangle() {
        let points = vec![
            vec![0.0, 0.0],
            vec![4.0, 0.0],
            vec![0.0, 3.0],
            vec![2.0, 1.0],
        ];
        for pivoting in [true, false] {
            let config = MiniballConfig {
                pivoting,
                ..Default::default()
            };
            let mb = build(&points, 2, config);

            assert!((mb.center()[0] - 2.0).abs() < 1e-12);
            assert!((mb.center()[1] - 1.5).abs() < 1e-12);
            assert!((mb.squared_radius() - 6.25).abs() < 1e-12);
            assert_encloses(&mb, 1e-12);

            let cert = mb.accuracy();
            assert!(cert.accuracy < 1e-12, "accuracy {}", cert.accuracy);
            assert!(cert.slack < 1e-12, "slack {}", cert.slack);
        }
    }

    #[test]
    fn test_single_point() {
        let mb = build(&[vec![3.0, -1.0, 2.0]], 3, MiniballConfig::default());
        assert_eq!(mb.center(), &[3.0, -1.0, 2.0]);
        assert_eq!(mb.squared_radius(), 0.0);
        assert_eq!(mb.nr_support_points(), 1);
        assert!(mb.is_valid());
    }

    #[test]
    fn test_two_points_diametral() {
        let points = vec![vec![1.0, 1.0], vec![5.0, 4.0]];
        let mb = build(&points, 2, MiniballConfig::default());
        assert!((mb.center()[0] - 3.0).abs() < 1e-12);
        assert!((mb.center()[1] - 2.5).abs() < 1e-12);
        assert!((mb.squared_radius() - 6.25).abs() < 1e-12);
        assert_eq!(mb.nr_support_points(), 2);
    }

    #[test]
    fn test_identical_points() {
        let points = vec![vec![2.0, 2.0]; 10];
        let mb = build(&points, 2, MiniballConfig::default());
        assert_eq!(mb.squared_radius(), 0.0);
        assert_eq!(mb.center(), &[2.0, 2.0]);
        assert_eq!(mb.nr_support_points(), 1);
        assert!(mb.is_valid());
    }

    #[test]
    fn test_collinear_points() {
        let points: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, 2.0 * i as f64]).collect();
        let mb = build(&points, 2, MiniballConfig::default());
        assert!((mb.center()[0] - 9.5).abs() < 1e-9);
        assert!((mb.center()[1] - 19.0).abs() < 1e-9);
        assert!(mb.nr_support_points() <= 3);
        assert_encloses(&mb, 1e-12);
    }

    #[test]
    fn test_support_bound_and_enclosure() {
        for dim in 1..=6 {
            for pivoting in [true, false] {
                let points = random_points(300, dim, 1000 + dim as u64);
                let config = MiniballConfig {
                    pivoting,
                    ..Default::default()
                };
                let mb = build(&points, dim, config);

                assert!(
                    mb.nr_support_points() <= dim + 1,
                    "dim {}: {} support points",
                    dim,
                    mb.nr_support_points()
                );
                assert_eq!(mb.support_points().count(), mb.nr_support_points());
                assert_encloses(&mb, 1e-10);

                let cert = mb.accuracy();
                assert!(cert.accuracy < 1e-10, "dim {}: accuracy {}", dim, cert.accuracy);
                assert!(cert.slack < 1e-10, "dim {}: slack {}", dim, cert.slack);
            }
        }
    }

    #[test]
    fn test_support_points_on_boundary() {
        let points = random_points(200, 4, 7);
        let mb = build(&points, 4, MiniballConfig::default());
        let r2 = mb.squared_radius();
        for p in mb.support_points() {
            let d2 = squared_distance(p, mb.center());
            assert!((d2 - r2).abs() <= 1e-10 * r2, "support point off boundary");
        }
        // Restartable: a second pass sees the same points
        let first: Vec<&[f64]> = mb.support_points().collect();
        let second: Vec<&[f64]> = mb.support_points().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_permutation_invariance() {
        let mut points = random_points(150, 3, 99);
        let a = build(&points, 3, MiniballConfig::default());

        points.reverse();
        let b = build(&points, 3, MiniballConfig::default());

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for i in (1..points.len()).rev() {
            let j = rng.gen_range(0..=i);
            points.swap(i, j);
        }
        let c = build(&points, 3, MiniballConfig::default());

        for other in [&b, &c] {
            assert!((a.squared_radius() - other.squared_radius()).abs() < 1e-10);
            assert!(squared_distance(a.center(), other.center()) < 1e-18);
        }
    }

    #[test]
    fn test_pivoting_matches_plain_move_to_front() {
        let points = random_points(400, 5, 2024);
        let pivot = build(&points, 5, MiniballConfig::default());
        let plain = build(
            &points,
            5,
            MiniballConfig {
                pivoting: false,
                ..Default::default()
            },
        );
        assert!((pivot.squared_radius() - plain.squared_radius()).abs() < 1e-10);
        assert!(squared_distance(pivot.center(), plain.center()) < 1e-18);
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let points = random_points(250, 3, 31);
        let mut mb = build(&points, 3, MiniballConfig::default());
        let before = mb.ball();

        mb.rebuild();
        let after = mb.ball();

        assert!((before.squared_radius - after.squared_radius).abs() < 1e-12);
        assert!(squared_distance(&before.center, &after.center) < 1e-20);
        assert!(mb.nr_support_points() <= 4);
    }

    #[test]
    fn test_cospherical_points() {
        // Regular 12-gon on a circle of radius 2 around (1, -1)
        let points: Vec<Vec<f64>> = (0..12)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / 12.0;
                vec![1.0 + 2.0 * theta.cos(), -1.0 + 2.0 * theta.sin()]
            })
            .collect();
        let mb = build(&points, 2, MiniballConfig::default());
        assert!((mb.squared_radius() - 4.0).abs() < 1e-9);
        assert!(mb.nr_support_points() <= 3);
        assert_encloses(&mb, 1e-12);
    }

    #[test]
    fn test_random_cospherical_points_pivoting() {
        let mut rng = ChaCha8Rng::seed_from_u64(36);
        for trial in 0..500 {
            let n = rng.gen_range(4..=40);
            let points: Vec<Vec<f64>> = (0..n)
                .map(|_| {
                    let theta: f64 = rng.gen_range(0.0..std::f64::consts::TAU);
                    vec![theta.cos(), theta.sin()]
                })
                .collect();

            let pivot = build(&points, 2, MiniballConfig::default());
            let plain = build(
                &points,
                2,
                MiniballConfig {
                    pivoting: false,
                    ..Default::default()
                },
            );
            assert_encloses(&pivot, 1e-9);
            assert!(
                (pivot.squared_radius() - plain.squared_radius()).abs() < 1e-9,
                "trial {}: pivoting {} vs plain {}",
                trial,
                pivot.squared_radius(),
                plain.squared_radius()
            );
            assert!(pivot.max_excess(pivot.order.head()).is_none());
        }
    }

    #[test]
    fn test_outside_tolerance_ignores_boundary_noise() {
        let mb = build(&[vec![0.0, 0.0], vec![2.0, 0.0]], 2, MiniballConfig::default());
        let (c, r2) = (mb.center().to_vec(), mb.squared_radius());
        assert!((r2 - 1.0).abs() < 1e-12);

        let just_outside = [c[0], c[1] + (r2 * (1.0 + 1e-14)).sqrt()];
        assert!(mb.basis.excess(&just_outside) > 0.0);
        assert!(mb.basis.excess(&just_outside) <= mb.outside_threshold());

        let clearly_outside = [c[0], c[1] + 1.1];
        assert!(mb.basis.excess(&clearly_outside) > mb.outside_threshold());
    }

    #[test]
    fn test_translated_far_from_origin() {
        let offset = 1e6;
        let points: Vec<Vec<f64>> = random_points(100, 3, 3)
            .into_iter()
            .map(|p| p.into_iter().map(|x| x + offset).collect())
            .collect();
        let mb = build(&points, 3, MiniballConfig::default());
        assert_encloses(&mb, 1e-6);
        assert!(mb.nr_support_points() <= 4);
    }

    #[test]
    fn test_build_errors() {
        assert_eq!(Miniball::new(3).build().unwrap_err(), MiniballError::NoPoints);

        let mut zero = Miniball::new(0);
        zero.check_in(&[]);
        assert_eq!(zero.build().unwrap_err(), MiniballError::ZeroDimension);
    }

    #[test]
    fn test_try_check_in_mismatch() {
        let mut mb = Miniball::new(2);
        assert_eq!(
            mb.try_check_in(&[1.0, 2.0, 3.0]),
            Err(MiniballError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(mb.nr_points(), 0);
        assert!(mb.try_check_in(&[1.0, 2.0]).is_ok());
        assert_eq!(mb.nr_points(), 1);
    }

    #[test]
    #[should_panic(expected = "engine dimension is 2")]
    fn test_check_in_wrong_dimension_panics() {
        let mut mb = Miniball::new(2);
        mb.check_in(&[1.0]);
    }
}
