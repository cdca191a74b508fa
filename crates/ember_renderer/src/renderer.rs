//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation bounded by a fixed depth
//! - Importance sampling that mixes the material density with light sampling
//! - Gamma correction
//! - Anti-aliasing via multi-sampling

use crate::{
    bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE},
    hittable::Hittable,
    material::ScatterLobe,
    pdf::{HittablePdf, MixturePdf, Pdf},
    Camera, Color, Ray, Scene,
};
use ember_math::Interval;
use rand::RngCore;
use rayon::prelude::*;
use std::time::Instant;

/// Minimum hit distance for secondary rays, to avoid self-intersection.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Sampling densities at or below this contribute nothing.
const PDF_EPSILON: f32 = 1e-8;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Base seed; every bucket derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::ZERO,
            use_sky_gradient: false,
            seed: 0,
        }
    }
}

/// Estimate the radiance arriving along `ray`.
///
/// `depth` counts bounces taken so far; once it reaches `config.max_depth`
/// only emission is returned. `lights` are sampled alongside the material's own
/// density for non-specular surfaces.
pub fn radiance(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let Some(rec) = world.hit(ray, Interval::beyond(SHADOW_EPSILON), rng) else {
        return background(ray, config);
    };

    let emitted = sanitize(rec.material.emitted(ray, &rec));
    if depth >= config.max_depth {
        return emitted;
    }

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    let scattered_light = match srec.lobe {
        ScatterLobe::Specular(scattered) => {
            srec.attenuation * radiance(&scattered, world, lights, depth + 1, config, rng)
        }
        ScatterLobe::Diffuse(surface_pdf) => {
            let light_pdf = lights.map(|lights| HittablePdf::new(lights, rec.p));
            let mixture;
            let sampling_pdf: &dyn Pdf = match &light_pdf {
                Some(light_pdf) => {
                    mixture = MixturePdf::new(&surface_pdf, light_pdf);
                    &mixture
                }
                None => &surface_pdf,
            };

            let direction = sampling_pdf.generate(rng);
            let scattered = ray.spawn(rec.p, direction);
            let pdf_val = sampling_pdf.value(direction);
            let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);

            if pdf_val <= PDF_EPSILON || scattering_pdf <= 0.0 {
                Color::ZERO
            } else {
                let incoming = radiance(&scattered, world, lights, depth + 1, config, rng);
                weighted_contribution(srec.attenuation, scattering_pdf, incoming, pdf_val)
            }
        }
    };

    sanitize(emitted + scattered_light)
}

/// `attenuation * scattering_pdf * incoming / pdf_val`, or zero for a degenerate density.
#[inline]
fn weighted_contribution(
    attenuation: Color,
    scattering_pdf: f32,
    incoming: Color,
    pdf_val: f32,
) -> Color {
    if pdf_val.is_nan() || pdf_val <= PDF_EPSILON {
        return Color::ZERO;
    }
    sanitize(attenuation * scattering_pdf * incoming / pdf_val)
}

/// Replace NaN or infinite channels with zero.
#[inline]
pub fn sanitize(color: Color) -> Color {
    Color::new(
        finite_or_zero(color.x),
        finite_or_zero(color.y),
        finite_or_zero(color.z),
    )
}

#[inline]
fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Radiance for rays that leave the scene.
fn background(ray: &Ray, config: &RenderConfig) -> Color {
    if config.use_sky_gradient {
        sky_gradient(ray)
    } else {
        config.background
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * linear_to_gamma(color.x).clamp(0.0, 1.0)) as u8;
    let g = (255.0 * linear_to_gamma(color.y).clamp(0.0, 1.0)) as u8;
    let b = (255.0 * linear_to_gamma(color.z).clamp(0.0, 1.0)) as u8;
    [r, g, b, 255]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel_color = Color::ZERO;

    for _ in 0..samples {
        let ray = camera.get_ray(x, y, rng);
        pixel_color += sanitize(radiance(
            &ray,
            scene.world(),
            scene.lights(),
            0,
            config,
            rng,
        ));
    }

    pixel_color / samples as f32
}

/// Linear-color image produced by a render.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Row-major offset of (x, y), computed in `usize` so large frames do not wrap.
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to gamma-corrected RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }
}

/// Render the entire scene, buckets in parallel.
///
/// Each bucket owns a generator seeded from `config.seed` and its index, so the
/// output does not depend on thread scheduling.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> ImageBuffer {
    let start = Instant::now();
    let buckets = generate_buckets(camera.image_width, camera.image_height, DEFAULT_BUCKET_SIZE);
    log::info!(
        "Rendering {}x{} in {} buckets, {} spp, max depth {}",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        config.samples_per_pixel,
        config.max_depth
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| BucketResult::new(*bucket, render_bucket(bucket, camera, scene, config)))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
