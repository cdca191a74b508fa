//! Sampleable probability densities over directions.
//!
//! A [`Pdf`] both draws directions and reports the solid-angle density of any
//! direction, which is what the radiance estimator needs to weight a sample.

use crate::{
    hittable::Hittable,
    sampling::{gen_f32, random_cosine_direction, random_unit_vector},
};
use ember_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Density of a uniform distribution over the full sphere of directions.
pub const UNIFORM_SPHERE_PDF: f32 = 1.0 / (4.0 * PI);

/// A distribution over directions.
pub trait Pdf {
    /// Solid-angle density of `direction`.
    fn value(&self, direction: Vec3) -> f32;

    /// Draw a direction from the distribution.
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a surface normal.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(normal: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(normal),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize_or_zero().dot(self.uvw.w());
        cosine.max(0.0) / PI
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Uniform over all directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpherePdf;

impl Pdf for SpherePdf {
    fn value(&self, _direction: Vec3) -> f32 {
        UNIFORM_SPHERE_PDF
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        random_unit_vector(rng)
    }
}

/// Directions toward a hittable as seen from a fixed origin.
///
/// Delegates to the target's own `pdf_value` / `sample_direction`, which is how
/// lights are importance sampled.
pub struct HittablePdf<'a> {
    target: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(target: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { target, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        self.target.pdf_value(self.origin, direction)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.target.sample_direction(self.origin, rng)
    }
}

/// Equal-weight mixture of up to two densities.
///
/// With a single member it behaves exactly like that member, and sampling does
/// not consume a coin flip.
#[derive(Clone, Copy)]
pub struct MixturePdf<'a> {
    first: Option<&'a dyn Pdf>,
    second: Option<&'a dyn Pdf>,
}

impl<'a> MixturePdf<'a> {
    /// Mix two densities 50/50.
    pub fn new(first: &'a dyn Pdf, second: &'a dyn Pdf) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    /// Build from optional members. Returns `None` when both are absent.
    pub fn from_options(first: Option<&'a dyn Pdf>, second: Option<&'a dyn Pdf>) -> Option<Self> {
        if first.is_none() && second.is_none() {
            return None;
        }
        Some(Self { first, second })
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3) -> f32 {
        match (self.first, self.second) {
            (Some(a), Some(b)) => 0.5 * a.value(direction) + 0.5 * b.value(direction),
            (Some(p), None) | (None, Some(p)) => p.value(direction),
            (None, None) => 0.0,
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match (self.first, self.second) {
            (Some(a), Some(b)) => {
                if gen_f32(rng) < 0.5 {
                    a.generate(rng)
                } else {
                    b.generate(rng)
                }
            }
            (Some(p), None) | (None, Some(p)) => p.generate(rng),
            // Unreachable through the constructors.
            (None, None) => Vec3::X,
        }
    }
}

/// The density a non-specular material scatters with.
#[derive(Debug, Clone, Copy)]
pub enum SurfacePdf {
    Cosine(CosinePdf),
    Sphere(SpherePdf),
}

impl Pdf for SurfacePdf {
    fn value(&self, direction: Vec3) -> f32 {
        match self {
            SurfacePdf::Cosine(pdf) => pdf.value(direction),
            SurfacePdf::Sphere(pdf) => pdf.value(direction),
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            SurfacePdf::Cosine(pdf) => pdf.generate(rng),
            SurfacePdf::Sphere(pdf) => pdf.generate(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Rect, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_cosine_pdf_integrates_to_one() {
        let pdf = CosinePdf::new(Vec3::new(0.3, 1.0, -0.2));
        let mut rng = StdRng::seed_from_u64(42);

        // E[cos/π / value] over samples drawn from value is ∫ cos/π dω = 1.
        let n = 100_000;
        let normal = Vec3::new(0.3, 1.0, -0.2).normalize();
        let mut sum = 0.0f64;
        for _ in 0..n {
            let dir = pdf.generate(&mut rng);
            let value = pdf.value(dir);
            if value > 0.0 {
                let integrand = dir.normalize().dot(normal).max(0.0) / PI;
                sum += (integrand / value) as f64;
            }
        }
        let estimate = sum / n as f64;
        assert!((estimate - 1.0).abs() < 0.01, "estimate = {estimate}");
    }

    #[test]
    fn test_cosine_pdf_samples_upper_hemisphere() {
        let normal = -Vec3::Y;
        let pdf = CosinePdf::new(normal);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..1000 {
            let dir = pdf.generate(&mut rng);
            assert!(dir.dot(normal) >= 0.0);
            assert!((dir.length() - 1.0).abs() < 1e-4);
        }
        assert_eq!(pdf.value(Vec3::Y), 0.0);
        assert!((pdf.value(normal) - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_pdf_is_uniform() {
        let pdf = SpherePdf;
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(pdf.value(Vec3::X), UNIFORM_SPHERE_PDF);
        assert_eq!(pdf.value(-Vec3::Z), UNIFORM_SPHERE_PDF);

        let mut mean = Vec3::ZERO;
        for _ in 0..20_000 {
            let dir = pdf.generate(&mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            mean += dir;
        }
        mean /= 20_000.0;
        assert!(mean.length() < 0.03, "mean = {mean:?}");
    }

    #[test]
    fn test_mixture_with_one_member_delegates_exactly() {
        let cosine = CosinePdf::new(Vec3::Z);
        let mixture = MixturePdf::from_options(Some(&cosine), None).unwrap();
        let flipped = MixturePdf::from_options(None, Some(&cosine)).unwrap();

        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        let mut rng_c = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let expected = cosine.generate(&mut rng_a);
            assert_eq!(mixture.generate(&mut rng_b), expected);
            assert_eq!(flipped.generate(&mut rng_c), expected);
            assert_eq!(mixture.value(expected), cosine.value(expected));
        }
    }

    #[test]
    fn test_mixture_value_is_mean() {
        let cosine = CosinePdf::new(Vec3::Z);
        let sphere = SpherePdf;
        let mixture = MixturePdf::new(&cosine, &sphere);

        for dir in [Vec3::Z, Vec3::new(1.0, 0.0, 1.0), -Vec3::Z] {
            let expected = 0.5 * (cosine.value(dir) + sphere.value(dir));
            assert!((mixture.value(dir) - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn test_mixture_without_members_is_rejected() {
        assert!(MixturePdf::from_options(None, None).is_none());
    }

    #[test]
    fn test_mixture_samples_both_members() {
        let up = CosinePdf::new(Vec3::Y);
        let down = CosinePdf::new(-Vec3::Y);
        let mixture = MixturePdf::new(&up, &down);
        let mut rng = StdRng::seed_from_u64(3);

        let n = 10_000;
        let ups = (0..n)
            .filter(|_| mixture.generate(&mut rng).y > 0.0)
            .count();
        let fraction = ups as f32 / n as f32;
        assert!((fraction - 0.5).abs() < 0.03, "fraction = {fraction}");
    }

    #[test]
    fn test_hittable_pdf_delegates_to_target() {
        let light = Rect::xz(
            -0.5,
            0.5,
            -0.5,
            0.5,
            2.0,
            Arc::new(Lambertian::solid(Vec3::ONE)),
        );
        let origin = Vec3::ZERO;
        let pdf = HittablePdf::new(&light, origin);

        assert_eq!(pdf.value(Vec3::Y), light.pdf_value(origin, Vec3::Y));

        let mut rng_a = StdRng::seed_from_u64(5);
        let mut rng_b = StdRng::seed_from_u64(5);
        assert_eq!(
            pdf.generate(&mut rng_a),
            light.sample_direction(origin, &mut rng_b)
        );
    }

    #[test]
    fn test_hittable_pdf_for_sphere_light() {
        let light = Sphere::new(
            Vec3::new(0.0, 0.0, -10.0),
            1.0,
            Arc::new(Lambertian::solid(Vec3::ONE)),
        );
        let pdf = HittablePdf::new(&light, Vec3::ZERO);
        let mut rng = StdRng::seed_from_u64(6);

        for _ in 0..200 {
            let dir = pdf.generate(&mut rng);
            assert!(pdf.value(dir) > 0.0);
        }
        assert_eq!(pdf.value(Vec3::Z), 0.0);
    }
}
