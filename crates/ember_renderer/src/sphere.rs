//! Sphere primitives: static and linearly moving.

use crate::{
    hittable::{HitRecord, Hittable},
    sampling::{random_to_sphere, random_unit_vector},
    Material, Ray,
};
use ember_math::{Aabb, Interval, Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Coefficients of the ray/sphere quadratic `a t^2 + 2 half_b t + c = 0`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SphereQuadratic {
    pub a: f32,
    pub half_b: f32,
    pub c: f32,
}

impl SphereQuadratic {
    pub fn new(center: Vec3, radius: f32, ray: &Ray) -> Self {
        let oc = ray.origin() - center;
        Self {
            a: ray.direction().length_squared(),
            half_b: oc.dot(ray.direction()),
            c: oc.length_squared() - radius * radius,
        }
    }

    pub fn discriminant(&self) -> f32 {
        self.half_b * self.half_b - self.a * self.c
    }

    /// Both roots, nearest first. `None` for non-positive discriminants
    /// (misses and exact grazes) and for a degenerate zero direction.
    pub fn roots(&self) -> Option<(f32, f32)> {
        let discriminant = self.discriminant();
        if discriminant <= 0.0 || self.a <= 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        Some(((-self.half_b - sqrtd) / self.a, (-self.half_b + sqrtd) / self.a))
    }
}

/// Get the UV coordinates for a point on the unit sphere.
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.x.atan2(p.z);
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    ((phi + PI) / (2.0 * PI), theta / PI)
}

fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let (near, far) = SphereQuadratic::new(center, radius, ray).roots()?;

    // Find the nearest root in the acceptable range
    let t = if ray_t.surrounds(near) {
        near
    } else if ray_t.surrounds(far) {
        far
    } else {
        return None;
    };

    let p = ray.at(t);
    // A negative radius turns the normal inward (hollow shell).
    let normal = (p - center) / radius;
    let (u, v) = sphere_uv(normal);

    Some(HitRecord {
        t,
        p,
        normal,
        u,
        v,
        material,
    })
}

/// A sphere primitive.
///
/// A negative radius is accepted and describes an inward-facing shell, which is how
/// an air gap inside a glass sphere is built.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius.abs());
        Some(Aabb::from_points(self.center - rvec, self.center + rvec))
    }

    /// Uniform density over the cone of directions the sphere subtends from `origin`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let ray = Ray::new_simple(origin, direction);
        let radius = self.radius.abs();
        let Some((_, far)) = SphereQuadratic::new(self.center, radius, &ray).roots() else {
            return 0.0;
        };
        if far <= 0.001 {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        if distance_squared <= radius * radius {
            // Inside the sphere every direction reaches it.
            return 1.0 / (4.0 * PI);
        }

        let cos_theta_max = (1.0 - radius * radius / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn sample_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let radius = self.radius.abs();
        if distance_squared <= radius * radius {
            return random_unit_vector(rng);
        }

        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(radius, distance_squared, rng))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to `center1` at `time1`.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center at `time`. Times outside the keyframe range extrapolate linearly.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let center = self.center(ray.time());
        hit_sphere(center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius.abs());
        let c0 = self.center(time0);
        let c1 = self.center(time1);
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}
