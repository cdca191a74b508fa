/// Range of ray parameters or of one box slab, `[min, max]`.
///
/// `min > max` is the empty range. Hit queries accept only `t` strictly inside,
/// see [`Interval::surrounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing; the identity of [`Interval::surrounding`].
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Everything past `min`, the usual range for a fresh ray query.
    pub const fn beyond(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// Closed test, `min <= x <= max`.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Open test, `min < x < max`.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Grow by `delta` in total, half on each end.
    pub fn expand(&self, delta: f32) -> Interval {
        let half = 0.5 * delta;
        Interval::new(self.min - half, self.max + half)
    }

    /// Shift both ends by `offset`.
    pub fn add_scalar(&self, offset: f32) -> Interval {
        Interval::new(self.min + offset, self.max + offset)
    }

    /// Smallest interval holding both `a` and `b`.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_closed_membership() {
        let range = Interval::new(0.0, 10.0);

        assert!(range.contains(0.0) && range.contains(10.0));
        assert!(!range.contains(10.1));
        assert!(!range.surrounds(0.0) && !range.surrounds(10.0));
        assert!(range.surrounds(0.1));
        assert_eq!(range.size(), 10.0);
    }

    #[test]
    fn test_beyond_starts_open_at_min() {
        let query = Interval::beyond(0.001);

        assert!(!query.surrounds(0.001));
        assert!(query.surrounds(1e20));
        assert_eq!(query.max, f32::INFINITY);
    }

    #[test]
    fn test_clamp_expand_shift() {
        let range = Interval::new(0.0, 10.0);

        assert_eq!(range.clamp(-5.0), 0.0);
        assert_eq!(range.clamp(15.0), 10.0);
        assert_eq!(range.expand(4.0), Interval::new(-2.0, 12.0));
        assert_eq!(range.add_scalar(-1.0), Interval::new(-1.0, 9.0));
    }

    #[test]
    fn test_surrounding_holds_both() {
        let a = Interval::new(1.0, 5.0);
        let b = Interval::new(3.0, 8.0);
        let s = Interval::surrounding(&a, &b);

        assert_eq!(s, Interval::new(1.0, 8.0));
        assert!(s.contains_interval(&a) && s.contains_interval(&b));
        assert!(!a.contains_interval(&s));
        assert_eq!(Interval::surrounding(&Interval::EMPTY, &a), a);
    }

    #[test]
    fn test_empty_and_universe() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(-1e10) && Interval::UNIVERSE.contains(1e10));
    }
}
