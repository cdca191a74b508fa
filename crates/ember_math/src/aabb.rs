use crate::{Interval, Ray, Vec3};

/// Thinnest allowed slab. Flat primitives such as axis-aligned rectangles are
/// widened to this so the slab test never degenerates.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-aligned bounding box, one [`Interval`] per axis.
///
/// `min() <= max()` componentwise for every non-empty box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Identity of [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Build from per-axis ranges, padding any axis thinner than the minimum.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let pad = |slab: Interval| {
            if slab.size() < MIN_EXTENT {
                slab.expand(MIN_EXTENT)
            } else {
                slab
            }
        };
        Self {
            x: pad(x),
            y: pad(y),
            z: pad(z),
        }
    }

    /// Box spanned by two opposite corners given in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let (lo, hi) = (a.min(b), a.max(b));
        Self::new(
            Interval::new(lo.x, hi.x),
            Interval::new(lo.y, hi.y),
            Interval::new(lo.z, hi.z),
        )
    }

    /// Envelope of two boxes. Contains every corner of both.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&a.x, &b.x),
            y: Interval::surrounding(&a.y, &b.y),
            z: Interval::surrounding(&a.z, &b.z),
        }
    }

    /// Slab for axis `n` (0 = x, 1 = y, anything else = z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    pub fn contains_box(&self, other: &Aabb) -> bool {
        self.x.contains_interval(&other.x)
            && self.y.contains_interval(&other.y)
            && self.z.contains_interval(&other.z)
    }

    /// Slab test: does `ray` pass through the box for some `t` in `ray_t`?
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        let origin = ray.origin();
        let inv_dir = ray.direction().recip();
        let (mut t_min, mut t_max) = (ray_t.min, ray_t.max);

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let t0 = (slab.min - origin[axis]) * inv_dir[axis];
            let t1 = (slab.max - origin[axis]) * inv_dir[axis];
            let (near, far) = if inv_dir[axis] < 0.0 { (t1, t0) } else { (t0, t1) };

            t_min = t_min.max(near);
            t_max = t_max.min(far);
            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    /// Axis with the widest extent; ties go to the later axis.
    pub fn longest_axis(&self) -> usize {
        let size = self.max() - self.min();
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        0.5 * (self.min() + self.max())
    }
}
