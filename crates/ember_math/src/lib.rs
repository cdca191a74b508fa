// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod interval;
mod onb;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;

/// RGB color in linear space. Channels are not clamped.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_indexing_by_axis() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 2.0);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn test_color_is_componentwise() {
        let a = Color::new(0.5, 1.0, 2.0);
        let b = Color::new(2.0, 0.5, 0.25);
        assert_eq!(a * b, Color::new(1.0, 0.5, 0.5));
    }
}
