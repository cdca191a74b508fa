//! Random sampling helpers.
//!
//! Every function draws from an explicitly passed generator so that each render
//! worker can own its own stream. Nothing here keeps state of its own.

use ember_math::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in (0, 1]. Safe to pass to `ln`.
#[inline]
pub fn gen_f32_nonzero(rng: &mut dyn RngCore) -> f32 {
    1.0 - rng.gen::<f32>()
}

/// Uniform point inside the unit ball (rejection sampling).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Uniform point inside the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_f32(rng) * 2.0 - 1.0, gen_f32(rng) * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction in the +Z hemisphere. Density is `z / PI`.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let phi = 2.0 * PI * r1;
    let sqrt_r2 = r2.sqrt();
    Vec3::new(phi.cos() * sqrt_r2, phi.sin() * sqrt_r2, (1.0 - r2).sqrt())
}

/// Direction uniformly distributed inside the cone, around +Z, subtended by a
/// sphere of `radius` whose center is `distance_squared` away.
pub fn random_to_sphere(radius: f32, distance_squared: f32, rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let cos_theta_max = (1.0 - radius * radius / distance_squared).max(0.0).sqrt();
    let z = 1.0 + r2 * (cos_theta_max - 1.0);
    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gen_f32_nonzero_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let x = gen_f32_nonzero(&mut rng);
            assert!(x > 0.0 && x <= 1.0);
        }
    }

    #[test]
    fn test_unit_vector_length() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            assert!((random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_unit_sphere_and_disk_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
            let d = random_in_unit_disk(&mut rng);
            assert!(d.length_squared() < 1.0);
            assert_eq!(d.z, 0.0);
        }
    }

    #[test]
    fn test_cosine_direction_upper_hemisphere() {
        let mut rng = StdRng::seed_from_u64(4);
        let n = 50_000;
        let mut mean_z = 0.0;
        for _ in 0..n {
            let d = random_cosine_direction(&mut rng);
            assert!(d.z >= 0.0);
            assert!((d.length() - 1.0).abs() < 1e-4);
            mean_z += d.z;
        }
        // E[cos] under a cosine-weighted hemisphere is 2/3.
        mean_z /= n as f32;
        assert!((mean_z - 2.0 / 3.0).abs() < 0.01, "mean cos = {mean_z}");
    }

    #[test]
    fn test_to_sphere_stays_inside_cone() {
        let mut rng = StdRng::seed_from_u64(5);
        let radius = 1.0;
        let distance_squared = 16.0;
        let cos_theta_max = (1.0f32 - radius * radius / distance_squared).sqrt();
        for _ in 0..1000 {
            let d = random_to_sphere(radius, distance_squared, &mut rng);
            assert!(d.z >= cos_theta_max - 1e-5);
            assert!((d.length() - 1.0).abs() < 1e-4);
        }
    }
}
