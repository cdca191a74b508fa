use crate::Vec3;

/// Half-line `origin + t * direction` sampled at one instant of the shutter.
///
/// `direction` is not normalized; hit distances are measured in multiples of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    time: f32,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Ray at time 0, for static scenes.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    /// Secondary ray from `origin` toward `direction` at this ray's time.
    ///
    /// Scattered, transformed and shadow rays must stay on the same instant so
    /// moving geometry is seen consistently along a path.
    #[inline]
    pub fn spawn(&self, origin: Vec3, direction: Vec3) -> Ray {
        Ray::new(origin, direction, self.time)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Shutter time, drives moving primitives.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_accessors() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, 0.5);

        assert_eq!(ray.origin(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ray.direction(), Vec3::Y);
        assert_eq!(ray.time(), 0.5);
        assert_eq!(Ray::new_simple(Vec3::ZERO, Vec3::X).time(), 0.0);
    }

    #[test]
    fn test_at_scales_unnormalized_direction() {
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.5), Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(ray.at(-1.0), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_spawn_keeps_time() {
        let primary = Ray::new(Vec3::ZERO, Vec3::X, 0.75);
        let bounce = primary.spawn(Vec3::ONE, Vec3::Z);

        assert_eq!(bounce.origin(), Vec3::ONE);
        assert_eq!(bounce.direction(), Vec3::Z);
        assert_eq!(bounce.time(), 0.75);
    }
}
