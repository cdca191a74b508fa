//! Decorators that wrap another hittable and transform its results.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Reverses the normal reported by the wrapped object.
pub struct FlipNormals {
    object: Arc<dyn Hittable>,
}

impl FlipNormals {
    pub fn new(object: Arc<dyn Hittable>) -> Self {
        Self { object }
    }
}

impl Hittable for FlipNormals {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.object.hit(ray, ray_t, rng).map(|mut rec| {
            rec.normal = -rec.normal;
            rec
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object.bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.sample_direction(origin, rng)
    }
}

/// Moves the wrapped object by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { object, offset }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Move the ray into object space instead of moving the object.
        let moved = ray.spawn(ray.origin() - self.offset, ray.direction());
        self.object.hit(&moved, ray_t, rng).map(|mut rec| {
            rec.p += self.offset;
            rec
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.sample_direction(origin - self.offset, rng)
    }
}

/// Rotates the wrapped object about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
}

impl RotateY {
    /// Rotate by `angle` degrees (counter-clockwise looking down -Y).
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let radians = angle.to_radians();
        Self {
            object,
            sin_theta: radians.sin(),
            cos_theta: radians.cos(),
        }
    }

    #[inline]
    fn to_object(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    #[inline]
    fn to_world(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let rotated = ray.spawn(self.to_object(ray.origin()), self.to_object(ray.direction()));

        self.object.hit(&rotated, ray_t, rng).map(|mut rec| {
            rec.p = self.to_world(rec.p);
            rec.normal = self.to_world(rec.normal);
            rec
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let inner = self.object.bounding_box(time0, time1)?;

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in inner.corners() {
            let rotated = self.to_world(corner);
            min = min.min(rotated);
            max = max.max(rotated);
        }
        Some(Aabb::from_points(min, max))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        // Rotation preserves solid angle.
        self.object
            .pdf_value(self.to_object(origin), self.to_object(direction))
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world(self.object.sample_direction(self.to_object(origin), rng))
    }
}
