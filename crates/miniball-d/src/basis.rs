//! Incremental basis of affinely independent points and the smallest ball through them.
//!
//! Pushing `q_0, ..., q_m` maintains, for every level `k <= m`, the center `c_k`
//! and squared radius `r_k` of the smallest ball with `q_0..=q_k` on its boundary.
//! Level `k` is obtained from level `k - 1` in closed form: the offset
//! `q_k - q_0` is orthogonalized against the earlier directions (Gram-Schmidt),
//! and the center moves along the resulting direction `v_k` until `q_k` is on the
//! boundary.
//!
//! All buffers are sized for `dim + 1` levels at construction and reused.

use crate::types::squared_distance;

#[derive(Debug, Clone)]
pub(crate) struct Basis {
    dim: usize,
    /// Levels currently pushed.
    m: usize,
    /// Level count of the push that produced the current ball.
    s: usize,
    push_epsilon: f64,

    /// First basis point; directions are offsets from it.
    q0: Vec<f64>,
    /// `2 * |v_k|^2` per level.
    z: Vec<f64>,
    /// Step length along `v_k` from `c_{k-1}` to `c_k`.
    f: Vec<f64>,
    /// Orthogonalized directions, `(dim + 1) x dim`.
    v: Vec<f64>,
    /// Projection coefficients `a[k][i]`, `(dim + 1) x (dim + 1)`.
    a: Vec<f64>,
    /// Centers per level, `(dim + 1) x dim`.
    c: Vec<f64>,
    sqr_r: Vec<f64>,

    /// Level whose center is the current ball's center.
    current: usize,
    current_sqr_r: f64,
}

impl Basis {
    pub fn new(dim: usize, push_epsilon: f64) -> Self {
        let levels = dim + 1;
        let mut basis = Self {
            dim,
            m: 0,
            s: 0,
            push_epsilon,
            q0: vec![0.0; dim],
            z: vec![0.0; levels],
            f: vec![0.0; levels],
            v: vec![0.0; levels * dim],
            a: vec![0.0; levels * levels],
            c: vec![0.0; levels * dim],
            sqr_r: vec![0.0; levels],
            current: 0,
            current_sqr_r: -1.0,
        };
        basis.reset();
        basis
    }

    /// Forget all pushed points. The ball becomes empty (negative squared radius),
    /// so every point has positive excess.
    pub fn reset(&mut self) {
        self.m = 0;
        self.s = 0;
        self.c[..self.dim].fill(0.0);
        self.current = 0;
        self.current_sqr_r = -1.0;
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.m
    }

    #[inline]
    pub fn support_size(&self) -> usize {
        self.s
    }

    #[inline]
    pub fn center(&self) -> &[f64] {
        let start = self.current * self.dim;
        &self.c[start..start + self.dim]
    }

    #[inline]
    pub fn squared_radius(&self) -> f64 {
        self.current_sqr_r
    }

    /// Squared distance from the current center minus the squared radius.
    #[inline]
    pub fn excess(&self, p: &[f64]) -> f64 {
        squared_distance(p, self.center()) - self.current_sqr_r
    }

    /// Try to extend the basis by `p`.
    ///
    /// Returns false and leaves the basis unchanged if `p` is numerically in the
    /// affine hull of the pushed points. On success the smallest ball through all
    /// pushed points becomes the current ball.
    pub fn push(&mut self, p: &[f64]) -> bool {
        debug_assert_eq!(p.len(), self.dim);
        debug_assert!(self.m <= self.dim, "basis already holds dim + 1 points");

        let d = self.dim;
        let m = self.m;

        if m == 0 {
            self.q0.copy_from_slice(p);
            self.c[..d].copy_from_slice(p);
            self.sqr_r[0] = 0.0;
        } else {
            let levels = d + 1;
            let (done, rest) = self.v.split_at_mut(m * d);
            let vm = &mut rest[..d];

            for ((vj, pj), qj) in vm.iter_mut().zip(p).zip(&self.q0) {
                *vj = pj - qj;
            }
            let z_raw = 2.0 * vm.iter().map(|x| x * x).sum::<f64>();

            // a[m][i] = 2 <v_i, q_m - q_0> / z_i, then project v_i out of v_m
            for i in 1..m {
                let vi = &done[i * d..(i + 1) * d];
                let dot: f64 = vi.iter().zip(vm.iter()).map(|(x, y)| x * y).sum();
                self.a[m * levels + i] = 2.0 * dot / self.z[i];
            }
            for i in 1..m {
                let vi = &done[i * d..(i + 1) * d];
                let coeff = self.a[m * levels + i];
                for (vj, vij) in vm.iter_mut().zip(vi) {
                    *vj -= coeff * vij;
                }
            }

            let zm = 2.0 * vm.iter().map(|x| x * x).sum::<f64>();
            // Orthogonal component negligible against the point's own offset
            if zm <= self.push_epsilon * z_raw {
                return false;
            }
            self.z[m] = zm;

            let (prev, cur) = self.c.split_at_mut(m * d);
            let c_prev = &prev[(m - 1) * d..];
            let c_cur = &mut cur[..d];

            let e = squared_distance(p, c_prev) - self.sqr_r[m - 1];
            let fm = e / zm;
            self.f[m] = fm;

            for ((cj, cpj), vj) in c_cur.iter_mut().zip(c_prev).zip(vm.iter()) {
                *cj = cpj + fm * vj;
            }
            self.sqr_r[m] = self.sqr_r[m - 1] + e * fm / 2.0;
        }

        self.current = m;
        self.current_sqr_r = self.sqr_r[m];
        self.m += 1;
        self.s = self.m;
        true
    }

    /// Drop the most recently pushed point.
    ///
    /// The next push extends the previous level; the current ball keeps the value
    /// of the last successful push until another push replaces it.
    #[inline]
    pub fn pop(&mut self) {
        debug_assert!(self.m > 0);
        self.m -= 1;
    }

    /// How far the current center is from the convex hull of the support points.
    ///
    /// The center is an affine combination `sum l_i q_i` of the support points;
    /// the slack is `-min(l_i)` if some coefficient is negative, otherwise zero.
    pub fn slack(&self) -> f64 {
        let levels = self.dim + 1;
        let mut l = vec![0.0; levels];
        let mut min_l = 0.0f64;
        l[0] = 1.0;

        for i in (1..self.s).rev() {
            let mut li = self.f[i];
            for k in (i + 1..self.s).rev() {
                li -= self.a[k * levels + i] * l[k];
            }
            l[i] = li;
            min_l = min_l.min(li);
            l[0] -= li;
        }
        min_l = min_l.min(l[0]);

        if min_l < 0.0 {
            -min_l
        } else {
            0.0
        }
    }
}
