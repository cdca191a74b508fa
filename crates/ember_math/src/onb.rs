use crate::Vec3;

/// Orthonormal basis: a local frame whose `w` axis follows a given direction.
///
/// Used to map directions sampled around +Z into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    u: Vec3,
    v: Vec3,
    w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis is `n` normalized. `n` must be non-zero.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.u
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.v
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.w
    }

    /// Map local coordinates `(a.x, a.y, a.z)` along `(u, v, w)` into world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
