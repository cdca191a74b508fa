//! Image tiling for parallel rendering.
//!
//! The frame is cut into square buckets that render independently. Every bucket
//! carries its own seed, so a frame is reproducible whatever order the workers
//! pick buckets up in.

use crate::renderer::render_pixel;
use crate::{Camera, Color, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Edge length of a bucket in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Golden-ratio increment used to spread bucket seeds across the u64 range.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A rectangular tile of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's private generator.
    pub fn seed(&self, base: u64) -> u64 {
        base ^ (self.index as u64 + 1).wrapping_mul(SEED_STRIDE)
    }

    /// Squared distance from the bucket center to `(cx, cy)`.
    fn distance_sq(&self, cx: f32, cy: f32) -> f32 {
        let dx = self.x as f32 + 0.5 * self.width as f32 - cx;
        let dy = self.y as f32 + 0.5 * self.height as f32 - cy;
        dx * dx + dy * dy
    }
}

/// Tile a `width` x `height` image, center buckets first.
///
/// Edge buckets are clipped to the image. Indices follow the returned order.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| {
                Bucket::new(x, y, size.min(width - x), size.min(height - y), 0)
            })
        })
        .collect();

    let (cx, cy) = (0.5 * width as f32, 0.5 * height as f32);
    buckets.sort_by(|a, b| a.distance_sq(cx, cy).total_cmp(&b.distance_sq(cx, cy)));

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }
    buckets
}

/// Render one bucket, row-major.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> Vec<Color> {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));

    let pixels: Vec<Color> = (bucket.y..bucket.y + bucket.height)
        .flat_map(|y| (bucket.x..bucket.x + bucket.width).map(move |x| (x, y)))
        .map(|(x, y)| render_pixel(camera, scene, x, y, config, &mut rng))
        .collect();

    log::debug!(
        "Bucket {} ({}x{} at {},{}) done",
        bucket.index,
        bucket.width,
        bucket.height,
        bucket.x,
        bucket.y
    );
    pixels
}

/// A rendered bucket, ready to be copied into the frame.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(buckets: &[Bucket]) -> u32 {
        buckets.iter().map(Bucket::pixel_count).sum()
    }

    #[test]
    fn test_buckets_tile_whole_image() {
        let exact = generate_buckets(128, 128, 64);
        assert_eq!(exact.len(), 4);
        assert_eq!(covered(&exact), 128 * 128);

        let ragged = generate_buckets(100, 70, 64);
        assert_eq!(ragged.len(), 4);
        assert_eq!(covered(&ragged), 100 * 70);
        assert!(ragged.iter().all(|b| b.x + b.width <= 100 && b.y + b.height <= 70));
    }

    #[test]
    fn test_center_bucket_comes_first() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9);
        assert_eq!((buckets[0].x, buckets[0].y), (64, 64));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_zero_bucket_size_is_one_pixel() {
        assert_eq!(generate_buckets(3, 2, 0).len(), 6);
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let buckets = generate_buckets(192, 192, 64);
        let mut seeds: Vec<u64> = buckets.iter().map(|b| b.seed(42)).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), buckets.len());
        assert_ne!(buckets[0].seed(1), buckets[0].seed(2));
    }
}
