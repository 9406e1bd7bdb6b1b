// Re-export glam for convenience
pub use glam::*;

// daeport math types
mod aabb;
mod interval;
mod matrix;

pub use aabb::Aabb;
pub use interval::Interval;
pub use matrix::Mat4Ext;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_dot() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec2_creation() {
        let uv = Vec2::new(0.25, 0.75);
        assert_eq!(uv.x, 0.25);
        assert_eq!(uv.y, 0.75);
    }
}
