//! Material trait for surface scattering.

use crate::{
    hittable::HitRecord,
    pdf::{CosinePdf, SpherePdf, SurfacePdf, UNIFORM_SPHERE_PDF},
    sampling::{gen_f32, random_in_unit_sphere},
    texture::{SolidColor, Texture},
    Ray,
};
use ember_math::{Color, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// How a scattered ray leaves the surface.
#[derive(Debug, Clone, Copy)]
pub enum ScatterLobe {
    /// The material already picked the outgoing ray (mirror, glass).
    Specular(Ray),
    /// The outgoing direction is drawn from a density by the estimator.
    Diffuse(SurfacePdf),
}

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub lobe: ScatterLobe,
}

impl ScatterRecord {
    pub fn specular(attenuation: Color, ray: Ray) -> Self {
        Self {
            attenuation,
            lobe: ScatterLobe::Specular(ray),
        }
    }

    pub fn diffuse(attenuation: Color, pdf: SurfacePdf) -> Self {
        Self {
            attenuation,
            lobe: ScatterLobe::Diffuse(pdf),
        }
    }

    pub fn is_specular(&self) -> bool {
        matches!(self.lobe, ScatterLobe::Specular(_))
    }

    /// The outgoing ray, for specular scatters.
    pub fn specular_ray(&self) -> Option<&Ray> {
        match &self.lobe {
            ScatterLobe::Specular(ray) => Some(ray),
            ScatterLobe::Diffuse(_) => None,
        }
    }

    /// The sampling density, for non-specular scatters.
    pub fn pdf(&self) -> Option<&SurfacePdf> {
        match &self.lobe {
            ScatterLobe::Specular(_) => None,
            ScatterLobe::Diffuse(pdf) => Some(pdf),
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterRecord>;

    /// Light emitted at the hit point toward the incoming ray.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord) -> Color {
        Color::ZERO
    }

    /// Density with which this material would scatter `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    /// Lambertian with a constant albedo.
    pub fn solid(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }

    pub fn albedo(&self) -> &dyn Texture {
        self.albedo.as_ref()
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::diffuse(
            self.albedo.value(rec.u, rec.v, rec.p),
            SurfacePdf::Cosine(CosinePdf::new(rec.normal)),
        ))
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize_or_zero());
        cosine.max(0.0) / PI
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);
        let scattered = ray_in.spawn(rec.p, direction);
        Some(ScatterRecord::specular(self.albedo, scattered))
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    /// Cosine fed to [`Dielectric::reflectance`] for a unit `direction` hitting a
    /// surface with outward `normal`.
    ///
    /// Entering uses the incident cosine. Exiting scales it by the index of
    /// refraction, capped at 1.
    fn fresnel_cosine(&self, direction: Vec3, normal: Vec3) -> f32 {
        let along = direction.dot(normal);
        if along > 0.0 {
            (self.ior * along).min(1.0)
        } else {
            (-along).min(1.0)
        }
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let unit_direction = ray_in.direction().normalize();

        // Exiting when the ray travels along the outward normal.
        let (outward_normal, refraction_ratio) = if unit_direction.dot(rec.normal) > 0.0 {
            (-rec.normal, self.ior)
        } else {
            (rec.normal, 1.0 / self.ior)
        };
        let cos_theta = self.fresnel_cosine(unit_direction, rec.normal);

        let reflect_prob = match refract(unit_direction, outward_normal, refraction_ratio) {
            Some(_) => Self::reflectance(cos_theta, refraction_ratio),
            None => 1.0,
        };

        let direction = if gen_f32(rng) < reflect_prob {
            reflect(unit_direction, rec.normal)
        } else {
            // reflect_prob < 1 implies a real refraction exists
            refract(unit_direction, outward_normal, refraction_ratio)
                .unwrap_or_else(|| reflect(unit_direction, rec.normal))
        };

        Some(ScatterRecord::specular(Color::ONE, ray_in.spawn(rec.p, direction)))
    }
}

/// Phase function of a participating medium: scatters uniformly in all directions.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn solid(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::diffuse(
            self.albedo.value(rec.u, rec.v, rec.p),
            SurfacePdf::Sphere(SpherePdf),
        ))
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        UNIFORM_SPHERE_PDF
    }
}

/// Diffuse light emitter.
///
/// Emits only from the side its surface normal points to.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    /// Create a new diffuse light with the given emission color.
    pub fn solid(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, ray_in: &Ray, rec: &HitRecord) -> Color {
        if rec.front_face(ray_in) {
            self.emit.value(rec.u, rec.v, rec.p)
        } else {
            Color::ZERO
        }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `uv` through a surface with unit normal `n` facing against it.
///
/// `None` on total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Option<Vec3> {
    let cos_theta = (-uv).dot(n).min(1.0);
    let discriminant = 1.0 - etai_over_etat * etai_over_etat * (1.0 - cos_theta * cos_theta);
    if discriminant <= 0.0 {
        return None;
    }

    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -discriminant.sqrt() * n;
    Some(r_out_perp + r_out_parallel)
}
