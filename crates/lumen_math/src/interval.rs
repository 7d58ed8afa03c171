/// A range of reals `[min, max]`; empty when `min > max`.
///
/// Two jobs in the tracer: the admissible `t` range of a ray query, which
/// shrinks as nearer hits are found, and one axis of an [`Aabb`](crate::Aabb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Contains nothing. Unioning with it is a no-op.
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Closed membership, endpoints included.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Open membership, endpoints excluded.
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.max(self.min).min(self.max)
    }

    /// The same range with its upper end pulled in to `t`.
    ///
    /// Used while walking a scene: once a hit at `t` is known, only nearer
    /// ones are of interest.
    pub fn closer_than(self, t: f64) -> Interval {
        Interval::new(self.min, t)
    }

    /// Grow by `delta / 2` on each side.
    pub fn expand(&self, delta: f64) -> Interval {
        let half = delta / 2.0;
        Interval::new(self.min - half, self.max + half)
    }

    /// Smallest interval covering both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward() -> Interval {
        Interval::new(0.001, f64::INFINITY)
    }

    #[test]
    fn test_ray_range_rejects_self_intersection() {
        let ray_t = forward();
        assert!(!ray_t.contains(0.0));
        assert!(!ray_t.contains(-2.0));
        assert!(ray_t.contains(0.001));
        assert!(ray_t.contains(1e12));
    }

    #[test]
    fn test_narrowing_keeps_only_nearer_hits() {
        let mut ray_t = forward();
        for t in [7.5, 3.0, 4.0, 2.5] {
            if ray_t.contains(t) {
                ray_t = ray_t.closer_than(t);
            }
        }
        assert_eq!(ray_t, Interval::new(0.001, 2.5));

        // A hit exactly at the current bound is a tie, not an improvement
        assert!(ray_t.contains(2.5));
        assert!(!ray_t.surrounds(2.5));
        assert!(ray_t.surrounds(1.0));
    }

    #[test]
    fn test_clamp_for_quantisation() {
        let intensity = Interval::new(0.0, 0.999);
        assert_eq!(intensity.clamp(-0.3), 0.0);
        assert_eq!(intensity.clamp(0.25), 0.25);
        assert_eq!(intensity.clamp(4.0), 0.999);
        assert_eq!((256.0 * intensity.clamp(1.0)) as u8, 255);
    }

    #[test]
    fn test_expand_pads_flat_axis() {
        // A quad lying in z = 2 has a zero-width z extent
        let flat = Interval::new(2.0, 2.0);
        assert_eq!(flat.size(), 0.0);

        let padded = flat.expand(1e-4);
        assert!((padded.size() - 1e-4).abs() < 1e-12);
        assert!(padded.surrounds(2.0));
    }

    #[test]
    fn test_union_of_axes() {
        let left = Interval::new(-3.0, -1.0);
        let right = Interval::new(0.5, 4.0);
        let both = Interval::surrounding(&left, &right);
        assert_eq!(both, Interval::new(-3.0, 4.0));

        // The gap between them is covered too
        assert!(both.contains(0.0));

        let start = Interval::default();
        assert_eq!(start, Interval::EMPTY);
        assert!(!start.contains(0.0));
        assert_eq!(Interval::surrounding(&start, &right), right);
    }
}
