/// Anything that can be viewed as a slice of `f64` coordinates.
///
/// Lets the one-shot [`compute`](crate::compute) entry point accept `Vec<f64>`,
/// fixed-size arrays and borrowed slices alike.
pub trait PointLike {
    fn coords(&self) -> &[f64];
}

impl PointLike for Vec<f64> {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

impl PointLike for Box<[f64]> {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

impl<const N: usize> PointLike for [f64; N] {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

impl PointLike for &[f64] {
    #[inline]
    fn coords(&self) -> &[f64] {
        self
    }
}

/// Squared Euclidean distance between two points of equal dimension.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// A ball given by its center and squared radius.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub center: Vec<f64>,
    pub squared_radius: f64,
}

impl Ball {
    #[inline]
    pub fn dim(&self) -> usize {
        self.center.len()
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.squared_radius.max(0.0).sqrt()
    }

    /// Returns true if `point` lies in the ball, allowing its squared distance to
    /// exceed the squared radius by `rel_tolerance * squared_radius`.
    #[inline]
    pub fn contains(&self, point: &[f64], rel_tolerance: f64) -> bool {
        let excess = squared_distance(&self.center, point) - self.squared_radius;
        excess <= rel_tolerance * self.squared_radius
    }
}
