//! Hittable trait and HitRecord for ray-object intersection.

use crate::sampling::gen_f32;
use crate::{Material, Ray};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Record of a ray-object intersection.
///
/// Produced fresh for every query. The normal is the geometric (outward) normal
/// of the surface, it is NOT flipped to face the ray. Use [`HitRecord::front_face`]
/// to find out which side was hit.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection
    pub normal: Vec3,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Material at the intersection point
    pub material: &'a dyn Material,
}

impl<'a> HitRecord<'a> {
    /// Whether `ray` arrived on the side the normal points to.
    #[inline]
    pub fn front_face(&self, ray: &Ray) -> bool {
        ray.direction().dot(self.normal) < 0.0
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Closest intersection of `ray` with this object for `t` strictly inside `ray_t`.
    ///
    /// `rng` is only consumed by primitives with stochastic boundaries (participating media).
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore)
        -> Option<HitRecord<'a>>;

    /// Box enclosing the object over the time interval `[time0, time1]`.
    ///
    /// `None` means the object has no finite bounds (or no geometry) and cannot
    /// be placed in a BVH.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;

    /// Solid-angle density of [`Hittable::sample_direction`] from `origin`, evaluated for `direction`.
    ///
    /// Only meaningful for objects used as importance-sampled lights.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Random direction from `origin` toward this object.
    fn sample_direction(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }

    /// Short type description used in diagnostics.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// A flat list of hittable objects.
///
/// Members are reference counted so the same object can live in the scene and in
/// a separate light list.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }
}

impl From<Vec<Arc<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            let interval = Interval::new(ray_t.min, closest_so_far);
            if let Some(rec) = object.hit(ray, interval, rng) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        if self.objects.is_empty() {
            return None;
        }

        let mut bbox = Aabb::EMPTY;
        for object in &self.objects {
            let object_box = object.bounding_box(time0, time1)?;
            bbox = Aabb::surrounding(&bbox, &object_box);
        }
        Some(bbox)
    }

    /// Equal-weight mixture of every member's density.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }

        let n = self.objects.len();
        let index = ((gen_f32(rng) * n as f32) as usize).min(n - 1);
        self.objects[index].sample_direction(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Rect, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::solid(Vec3::splat(0.5)))
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, grey())));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, grey())));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -6.0), 1.0, grey())));

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, -Vec3::Z);
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();

        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_list_has_no_box() {
        let list = HittableList::new();
        assert!(list.bounding_box(0.0, 1.0).is_none());
        assert_eq!(list.pdf_value(Vec3::ZERO, Vec3::X), 0.0);
    }

    #[test]
    fn test_list_box_envelops_members() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(-5.0, 0.0, 0.0), 1.0, grey())));
        list.add(Arc::new(Sphere::new(Vec3::new(5.0, 2.0, 0.0), 1.0, grey())));

        let bbox = list.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::new(-6.0, -1.0, -1.0));
        assert_eq!(bbox.max(), Vec3::new(6.0, 3.0, 1.0));
    }

    #[test]
    fn test_list_pdf_is_average_of_members() {
        let light = Arc::new(Rect::xz(-1.0, 1.0, -1.0, 1.0, 5.0, grey()));
        let mut list = HittableList::new();
        list.add(light.clone());
        list.add(Arc::new(Sphere::new(Vec3::new(100.0, 0.0, 0.0), 1.0, grey())));

        let dir = Vec3::Y;
        let expected = 0.5 * light.pdf_value(Vec3::ZERO, dir);
        assert!(expected > 0.0);
        assert!((list.pdf_value(Vec3::ZERO, dir) - expected).abs() < 1e-6);
    }
}
