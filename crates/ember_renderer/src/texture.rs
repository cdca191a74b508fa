//! Textures: spatially varying colors looked up at a surface point.

use std::path::Path;
use std::sync::Arc;

use ember_math::{Color, Vec3};
use rand::RngCore;
use thiserror::Error;

use crate::noise::{Perlin, DEFAULT_OCTAVES};

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Texture {path} is empty ({width}x{height})")]
    Empty {
        path: String,
        width: u32,
        height: u32,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A color lookup at `(u, v)` surface coordinates and world point `p`.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;

    /// Whether this texture samples a bitmap.
    fn is_image_backed(&self) -> bool {
        false
    }
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// Alternates two textures in a 3D pattern driven by the sign of `sin(s·x)·sin(s·z)`.
pub struct CheckerTexture {
    scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { scale, even, odd }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (self.scale * p.x).sin() * (self.scale * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Grey marble: `0.5 * (1 + sin(scale * z + 10 * turbulence(p)))`.
///
/// Stripes run across `z`; turbulence bends them. Values stay in `[0, 1]`.
#[derive(Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(scale: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, DEFAULT_OCTAVES);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// Nearest-pixel lookup into an 8-bit RGB image.
///
/// `v = 1` is the top row of the image.
pub struct ImageTexture {
    image: image::RgbImage,
}

impl ImageTexture {
    pub fn new(image: image::RgbImage) -> Self {
        Self { image }
    }

    /// Load and decode an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgb8();
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty {
                path: path.display().to_string(),
                width,
                height,
            });
        }

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);
        Ok(Self::new(image))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            // Debug magenta for a missing bitmap.
            return Color::new(1.0, 0.0, 1.0);
        }

        let i = ((u * width as f32) as i64).clamp(0, width as i64 - 1) as u32;
        let j = (((1.0 - v) * height as f32 - 0.001) as i64).clamp(0, height as i64 - 1) as u32;

        let pixel = self.image.get_pixel(i, j);
        Color::new(
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        )
    }

    fn is_image_backed(&self) -> bool {
        true
    }
}
