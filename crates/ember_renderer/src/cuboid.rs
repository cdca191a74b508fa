//! Axis-aligned box built from six rectangles.

use crate::{
    hittable::{HitRecord, Hittable, HittableList},
    FlipNormals, Material, Ray, Rect,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A closed axis-aligned box between two corners.
///
/// The three faces at the max corner face outward directly; the three at the
/// min corner are wrapped in [`FlipNormals`] so every face normal points out.
pub struct Cuboid {
    bbox: Aabb,
    faces: HittableList,
}

impl Cuboid {
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let p0 = a.min(b);
        let p1 = a.max(b);

        let mut faces = HittableList::new();
        faces.add(Arc::new(Rect::xy(p0.x, p1.x, p0.y, p1.y, p1.z, material.clone())));
        faces.add(Arc::new(FlipNormals::new(Arc::new(Rect::xy(
            p0.x,
            p1.x,
            p0.y,
            p1.y,
            p0.z,
            material.clone(),
        )))));
        faces.add(Arc::new(Rect::xz(p0.x, p1.x, p0.z, p1.z, p1.y, material.clone())));
        faces.add(Arc::new(FlipNormals::new(Arc::new(Rect::xz(
            p0.x,
            p1.x,
            p0.z,
            p1.z,
            p0.y,
            material.clone(),
        )))));
        faces.add(Arc::new(Rect::yz(p0.y, p1.y, p0.z, p1.z, p1.x, material.clone())));
        faces.add(Arc::new(FlipNormals::new(Arc::new(Rect::yz(
            p0.y, p1.y, p0.z, p1.z, p0.x, material,
        )))));

        Self {
            bbox: Aabb::from_points(p0, p1),
            faces,
        }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.faces.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.faces.pdf_value(origin, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.faces.sample_direction(origin, rng)
    }
}
