//! Axis-aligned rectangles.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::gen_f32,
    Material, Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Orientation of a rectangle: the two axes it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectPlane {
    /// Spans x and y, lies at constant z.
    Xy,
    /// Spans x and z, lies at constant y.
    Xz,
    /// Spans y and z, lies at constant x.
    Yz,
}

impl RectPlane {
    /// Axis indices `(a, b, constant)`.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::Xy => (0, 1, 2),
            RectPlane::Xz => (0, 2, 1),
            RectPlane::Yz => (1, 2, 0),
        }
    }
}

/// A rectangle `a0 < a < a1`, `b0 < b < b1` on the plane where the constant axis equals `k`.
///
/// The normal is always the positive constant axis; wrap in [`crate::FlipNormals`]
/// to face the other way.
pub struct Rect {
    plane: RectPlane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl Rect {
    pub fn new(
        plane: RectPlane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let (a0, a1) = (a0.min(a1), a0.max(a1));
        let (b0, b1) = (b0.min(b1), b0.max(b1));
        if a1 - a0 <= 0.0 || b1 - b0 <= 0.0 {
            log::warn!("Rectangle on {plane:?} plane at k={k} has zero area and will never be hit");
        }

        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    /// Rectangle spanning `[x0, x1] x [y0, y1]` at `z = k`.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(RectPlane::Xy, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle spanning `[x0, x1] x [z0, z1]` at `y = k`.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(RectPlane::Xz, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle spanning `[y0, y1] x [z0, z1]` at `x = k`.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(RectPlane::Yz, (y0, y1), (z0, z1), k, material)
    }

    pub fn plane(&self) -> RectPlane {
        self.plane
    }

    pub fn area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    pub fn normal(&self) -> Vec3 {
        let (_, _, c) = self.plane.axes();
        let mut n = Vec3::ZERO;
        n[c] = 1.0;
        n
    }

    /// Plane crossing inside the extent: `(t, a, b)`.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32, f32)> {
        let (ia, ib, ic) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // Parallel rays give an infinite or NaN t, which never lies inside ray_t.
        let t = (self.k - origin[ic]) / direction[ic];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if a <= self.a0 || a >= self.a1 || b <= self.b0 || b >= self.b1 {
            return None;
        }

        Some((t, a, b))
    }
}

impl Hittable for Rect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (t, a, b) = self.intersect(ray, ray_t)?;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal: self.normal(),
            u: (a - self.a0) / (self.a1 - self.a0),
            v: (b - self.b0) / (self.b1 - self.b0),
            material: self.material.as_ref(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let (ia, ib, ic) = self.plane.axes();
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo[ia] = self.a0;
        hi[ia] = self.a1;
        lo[ib] = self.b0;
        hi[ib] = self.b1;
        lo[ic] = self.k;
        hi[ic] = self.k;
        Some(Aabb::from_points(lo, hi))
    }

    /// Area sampling converted to solid angle: `distance^2 / (|cos| * area)`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let Some((t, _, _)) = self.intersect(&ray, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let area = self.area();
        let length = direction.length();
        let distance_squared = t * t * direction.length_squared();
        let cosine = (direction.dot(self.normal()) / length).abs();
        if cosine <= 0.0 || area <= 0.0 {
            return 0.0;
        }

        distance_squared / (cosine * area)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let (ia, ib, ic) = self.plane.axes();
        let mut point = Vec3::ZERO;
        point[ia] = self.a0 + gen_f32(rng) * (self.a1 - self.a0);
        point[ib] = self.b0 + gen_f32(rng) * (self.b1 - self.b0);
        point[ic] = self.k;
        point - origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::solid(Vec3::splat(0.5)))
    }

    #[test]
    fn test_xy_rect_hit() {
        let rect = Rect::xy(-1.0, 1.0, -1.0, 1.0, -5.0, grey());
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(0.5, 0.0, 0.0), -Vec3::Z);

        let rec = rect
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 5.0).abs() < 1e-5);
        assert_eq!(rec.normal, Vec3::Z);
        assert!((rec.u - 0.75).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_rect_orientations_have_axis_normals() {
        assert_eq!(Rect::xy(0.0, 1.0, 0.0, 1.0, 0.0, grey()).normal(), Vec3::Z);
        assert_eq!(Rect::xz(0.0, 1.0, 0.0, 1.0, 0.0, grey()).normal(), Vec3::Y);
        assert_eq!(Rect::yz(0.0, 1.0, 0.0, 1.0, 0.0, grey()).normal(), Vec3::X);
    }

    #[test]
    fn test_rect_outside_extent_misses() {
        let rect = Rect::yz(0.0, 1.0, 0.0, 1.0, 3.0, grey());
        let mut rng = StdRng::seed_from_u64(0);
        let range = Interval::new(0.001, f32::INFINITY);

        let inside = Ray::new_simple(Vec3::new(0.0, 0.5, 0.5), Vec3::X);
        let outside = Ray::new_simple(Vec3::new(0.0, 1.5, 0.5), Vec3::X);
        let parallel = Ray::new_simple(Vec3::new(0.0, 0.5, 0.5), Vec3::Y);

        assert!(rect.hit(&inside, range, &mut rng).is_some());
        assert!(rect.hit(&outside, range, &mut rng).is_none());
        assert!(rect.hit(&parallel, range, &mut rng).is_none());
    }

    #[test]
    fn test_degenerate_rect_never_hit() {
        let rect = Rect::xz(1.0, 1.0, 0.0, 1.0, 0.0, grey());
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::new(1.0, 1.0, 0.5), -Vec3::Y);
        assert!(rect
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());
    }

    #[test]
    fn test_flat_rect_has_padded_box() {
        let bbox = Rect::xz(0.0, 2.0, 0.0, 3.0, 5.0, grey())
            .bounding_box(0.0, 1.0)
            .unwrap();
        assert_eq!(bbox.x, Interval::new(0.0, 2.0));
        assert_eq!(bbox.z, Interval::new(0.0, 3.0));
        assert!(bbox.y.contains(5.0) && bbox.y.size() > 0.0);
    }

    #[test]
    fn test_rect_pdf_value_head_on() {
        // Unit-area light 2 units straight above: distance^2 / (cos * area) = 4.
        let rect = Rect::xz(-0.5, 0.5, -0.5, 0.5, 2.0, grey());
        let pdf = rect.pdf_value(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        assert!((pdf - 4.0).abs() < 1e-4, "pdf = {pdf}");

        // Missing direction.
        assert_eq!(rect.pdf_value(Vec3::ZERO, -Vec3::Y), 0.0);
    }

    #[test]
    fn test_rect_samples_land_on_rect() {
        let rect = Rect::xz(1.0, 2.0, -3.0, -1.0, 4.0, grey());
        let mut rng = StdRng::seed_from_u64(9);
        let origin = Vec3::new(0.0, 0.0, 0.0);

        for _ in 0..500 {
            let dir = rect.sample_direction(origin, &mut rng);
            let p = origin + dir;
            assert!((p.y - 4.0).abs() < 1e-5);
            assert!((1.0..=2.0).contains(&p.x));
            assert!((-3.0..=-1.0).contains(&p.z));
        }
    }
}
