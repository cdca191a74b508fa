//! Thin-lens camera with a shutter interval.

use crate::{
    sampling::{gen_f32, random_in_unit_disk},
    Ray,
};
use ember_math::Vec3;
use rand::RngCore;

/// Pixel grid and lens disk in world space, derived by [`Camera::initialize`].
#[derive(Debug, Clone, Copy)]
struct Frame {
    pixel00: Vec3,
    step_u: Vec3,
    step_v: Vec3,
    lens_u: Vec3,
    lens_v: Vec3,
    forward: Vec3,
}

impl Frame {
    const UNSET: Frame = Frame {
        pixel00: Vec3::ZERO,
        step_u: Vec3::ZERO,
        step_v: Vec3::ZERO,
        lens_u: Vec3::ZERO,
        lens_v: Vec3::ZERO,
        forward: Vec3::NEG_Z,
    };
}

/// Generates primary rays.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before the first [`Camera::get_ray`].
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view, degrees
    vfov: f32,
    /// Cone angle through each pixel, degrees; 0 is a pinhole
    defocus_angle: f32,
    focus_dist: f32,

    time0: f32,
    time1: f32,

    frame: Frame,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            frame: Frame::UNSET,
        }
    }

    /// Image size in pixels; each side is at least one.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Open the shutter over `[time0, time1]`; the ends may come in either order.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0.min(time1);
        self.time1 = time0.max(time1);
        self
    }

    pub fn shutter(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }

    /// Derive the pixel grid from the current settings.
    pub fn initialize(&mut self) {
        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        let half_height = (0.5 * self.vfov.to_radians()).tan() * self.focus_dist;
        let aspect = self.image_width as f32 / self.image_height as f32;
        let across = 2.0 * half_height * aspect * u;
        let down = -2.0 * half_height * v;

        let step_u = across / self.image_width as f32;
        let step_v = down / self.image_height as f32;
        let upper_left = self.look_from - self.focus_dist * w - 0.5 * (across + down);

        let lens_radius = self.focus_dist * (0.5 * self.defocus_angle).to_radians().tan();

        self.frame = Frame {
            pixel00: upper_left + 0.5 * (step_u + step_v),
            step_u,
            step_v,
            lens_u: lens_radius * u,
            lens_v: lens_radius * v,
            forward: -w,
        };
    }

    /// Jittered ray through pixel `(i, j)` at a random shutter time.
    ///
    /// Row `j = 0` is the top of the image.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let frame = &self.frame;
        let jitter_u = gen_f32(rng) - 0.5;
        let jitter_v = gen_f32(rng) - 0.5;
        let target = frame.pixel00
            + (i as f32 + jitter_u) * frame.step_u
            + (j as f32 + jitter_v) * frame.step_v;

        let origin = if self.defocus_angle > 0.0 {
            let disk = random_in_unit_disk(rng);
            self.look_from + disk.x * frame.lens_u + disk.y * frame.lens_v
        } else {
            self.look_from
        };

        let time = self.time0 + gen_f32(rng) * (self.time1 - self.time0);
        Ray::new(origin, target - origin, time)
    }

    /// Unit view direction, valid after [`Camera::initialize`].
    pub fn forward(&self) -> Vec3 {
        self.frame.forward
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn looking_down_z(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_forward_follows_look_at() {
        let camera = looking_down_z(800, 600);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = looking_down_z(101, 101);
        let mut rng = StdRng::seed_from_u64(42);

        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().normalize().z < -0.99);
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_top_row_looks_up() {
        let camera = looking_down_z(100, 100);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(camera.get_ray(50, 0, &mut rng).direction().y > 0.0);
        assert!(camera.get_ray(50, 99, &mut rng).direction().y < 0.0);
    }

    #[test]
    fn test_ray_times_stay_in_shutter() {
        let mut camera = Camera::new().with_resolution(10, 10).with_shutter(1.0, 0.5);
        camera.initialize();
        assert_eq!(camera.shutter(), (0.5, 1.0));

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let t = camera.get_ray(3, 7, &mut rng).time();
            assert!((0.5..=1.0).contains(&t), "t = {t}");
        }
    }

    #[test]
    fn test_defocus_origins_on_lens_disk() {
        let mut camera = Camera::new()
            .with_resolution(10, 10)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize();

        let radius = 5.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let offset = camera.get_ray(5, 5, &mut rng).origin() - Vec3::new(0.0, 0.0, 5.0);
            assert!(offset.z.abs() < 1e-5);
            assert!(offset.length() <= radius + 1e-5);
        }
    }
}
