//! Ember renderer - CPU Monte Carlo path tracing
//!
//! A path tracer for scenes made of spheres, axis-aligned rectangles, boxes and
//! homogeneous participating media, with light importance sampling.
//!
//! The pieces fit together as follows:
//! - [`Hittable`] primitives answer ray queries; [`BvhNode`] indexes them.
//! - [`Material`]s decide how light scatters and what the surface emits.
//! - [`Pdf`]s sample directions and report their densities.
//! - [`radiance`] combines the three into a recursive estimator.
//! - [`render`] drives the estimator over an image, bucket by bucket.

mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod hittable;
mod material;
mod medium;
mod noise;
mod pdf;
mod rect;
mod renderer;
mod scene;
mod sphere;
mod texture;
mod transform;

pub mod sampling;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal,
    ScatterLobe, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, SpherePdf, SurfacePdf, UNIFORM_SPHERE_PDF};
pub use rect::{Rect, RectPlane};
pub use renderer::{
    color_to_rgba, linear_to_gamma, radiance, render, render_pixel, sanitize, ImageBuffer,
    RenderConfig, SHADOW_EPSILON,
};
pub use scene::{Scene, SceneError, SceneResult};
pub use sphere::{MovingSphere, Sphere};
pub use noise::{Perlin, DEFAULT_OCTAVES};
pub use texture::{
    CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, TextureError,
    TextureResult,
};
pub use transform::{FlipNormals, RotateY, Translate};

/// Re-export Vec3 and common math types from ember_math
pub use ember_math::{Aabb, Color, Interval, Onb, Ray, Vec3};
