//! Gradient noise and turbulence for procedural textures.

use ember_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const PERM_SIZE: usize = 256;

/// Octaves summed by [`Perlin::turbulence`] when a texture does not ask for more.
pub const DEFAULT_OCTAVES: u32 = 7;

/// Improved Perlin noise over a shuffled permutation table.
///
/// The table is doubled so corner hashes never need wrapping. Two generators
/// built from equally seeded rngs produce identical fields.
#[derive(Clone)]
pub struct Perlin {
    perm: [u8; 2 * PERM_SIZE],
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut base: Vec<u8> = (0..=255).collect();
        base.shuffle(rng);

        let mut perm = [0u8; 2 * PERM_SIZE];
        perm[..PERM_SIZE].copy_from_slice(&base);
        perm[PERM_SIZE..].copy_from_slice(&base);
        Self { perm }
    }

    /// Noise in roughly `[-1, 1]`, zero on every integer lattice point.
    pub fn noise(&self, p: Vec3) -> f32 {
        let cell = p.floor();
        let d = p - cell;
        let ix = (cell.x as i32 & (PERM_SIZE as i32 - 1)) as usize;
        let iy = (cell.y as i32 & (PERM_SIZE as i32 - 1)) as usize;
        let iz = (cell.z as i32 & (PERM_SIZE as i32 - 1)) as usize;

        let w000 = self.grad(ix, iy, iz, d.x, d.y, d.z);
        let w100 = self.grad(ix + 1, iy, iz, d.x - 1.0, d.y, d.z);
        let w010 = self.grad(ix, iy + 1, iz, d.x, d.y - 1.0, d.z);
        let w110 = self.grad(ix + 1, iy + 1, iz, d.x - 1.0, d.y - 1.0, d.z);
        let w001 = self.grad(ix, iy, iz + 1, d.x, d.y, d.z - 1.0);
        let w101 = self.grad(ix + 1, iy, iz + 1, d.x - 1.0, d.y, d.z - 1.0);
        let w011 = self.grad(ix, iy + 1, iz + 1, d.x, d.y - 1.0, d.z - 1.0);
        let w111 = self.grad(ix + 1, iy + 1, iz + 1, d.x - 1.0, d.y - 1.0, d.z - 1.0);

        let (wx, wy, wz) = (fade(d.x), fade(d.y), fade(d.z));
        let x00 = lerp(wx, w000, w100);
        let x10 = lerp(wx, w010, w110);
        let x01 = lerp(wx, w001, w101);
        let x11 = lerp(wx, w011, w111);
        let y0 = lerp(wy, x00, x10);
        let y1 = lerp(wy, x01, x11);
        lerp(wz, y0, y1)
    }

    /// Sum of `|noise|` over `octaves`, each twice the frequency and half the weight.
    pub fn turbulence(&self, p: Vec3, octaves: u32) -> f32 {
        let mut sum = 0.0;
        let mut point = p;
        let mut weight = 1.0;
        for _ in 0..octaves {
            sum += weight * self.noise(point).abs();
            weight *= 0.5;
            point *= 2.0;
        }
        sum
    }

    /// Dot product of a hashed corner gradient with the offset to `p`.
    fn grad(&self, x: usize, y: usize, z: usize, dx: f32, dy: f32, dz: f32) -> f32 {
        let perm = &self.perm;
        let h = perm[perm[perm[x] as usize + y] as usize + z] & 15;
        let u = if h < 8 || h == 12 || h == 13 { dx } else { dy };
        let v = if h < 4 || h == 12 || h == 13 { dy } else { dz };
        let u = if h & 1 != 0 { -u } else { u };
        let v = if h & 2 != 0 { -v } else { v };
        u + v
    }
}

/// Quintic smoothstep, `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (6.0 * t - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}
