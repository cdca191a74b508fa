//! Homogeneous participating media.

use crate::{
    hittable::{HitRecord, Hittable},
    material::Isotropic,
    sampling::gen_f32_nonzero,
    Ray, Texture,
};
use ember_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A volume of constant density filling a closed boundary shape.
///
/// Rays that enter the boundary travel an exponentially distributed free path
/// before scattering; if the path is longer than the chord through the volume,
/// the ray passes straight through.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        if density <= 0.0 {
            log::warn!("Constant medium with non-positive density {density} is fully transparent");
        }

        Self {
            boundary,
            neg_inv_density: if density > 0.0 {
                -1.0 / density
            } else {
                f32::NEG_INFINITY
            },
            phase_function: Isotropic::new(albedo),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Entry and exit along the whole line, then clip to the query range.
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::beyond(entry.t + 0.0001), rng)?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        if t_enter < 0.0 {
            // Origin already inside the volume.
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32_nonzero(rng).ln();
        if hit_distance.is_nan() || hit_distance >= distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            t,
            p: ray.at(t),
            normal: Vec3::X, // arbitrary, never used by the phase function
            u: 0.0,
            v: 0.0,
            material: &self.phase_function,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, Lambertian, SolidColor, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fog(boundary: Arc<dyn Hittable>, density: f32) -> ConstantMedium {
        ConstantMedium::new(boundary, density, Arc::new(SolidColor::new(Vec3::ONE)))
    }

    fn unit_sphere() -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::solid(Vec3::ONE)),
        ))
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        let medium = fog(unit_sphere(), 1000.0);
        let mut rng = StdRng::seed_from_u64(11);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        for _ in 0..100 {
            let rec = medium
                .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                .unwrap();
            assert!(rec.t >= 4.0 && rec.t < 6.0);
            assert!(rec.p.length() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_thin_medium_mostly_transmits() {
        let medium = fog(unit_sphere(), 1e-4);
        let mut rng = StdRng::seed_from_u64(12);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let hits = (0..1000)
            .filter(|_| {
                medium
                    .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                    .is_some()
            })
            .count();
        // Expected scatter probability is 1 - exp(-2e-4).
        assert!(hits < 10, "hits = {hits}");
    }

    #[test]
    fn test_scatter_fraction_follows_beer_lambert() {
        let density = 0.5;
        let medium = fog(unit_sphere(), density);
        let mut rng = StdRng::seed_from_u64(13);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        let n = 20_000;
        let hits = (0..n)
            .filter(|_| {
                medium
                    .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                    .is_some()
            })
            .count();
        let fraction = hits as f32 / n as f32;
        let expected = 1.0 - (-density * 2.0f32).exp();
        assert!((fraction - expected).abs() < 0.02, "{fraction} vs {expected}");
    }

    #[test]
    fn test_ray_starting_inside_clamps_entry() {
        let medium = fog(
            Arc::new(Cuboid::new(
                Vec3::splat(-1.0),
                Vec3::splat(1.0),
                Arc::new(Lambertian::solid(Vec3::ONE)),
            )),
            1000.0,
        );
        let mut rng = StdRng::seed_from_u64(14);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        let rec = medium
            .hit(&ray, Interval::new(0.0, f32::INFINITY), &mut rng)
            .unwrap();
        assert!(rec.t >= 0.0 && rec.t < 1.0);
    }

    #[test]
    fn test_range_ending_before_volume_misses() {
        let medium = fog(unit_sphere(), 1000.0);
        let mut rng = StdRng::seed_from_u64(15);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        assert!(medium
            .hit(&ray, Interval::new(0.001, 3.0), &mut rng)
            .is_none());
    }
}
