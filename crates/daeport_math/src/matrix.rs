// Matrix layout helpers.
//
// COLLADA writes matrices row by row, glam stores them column by column.
// Reading the 16 values of a `<matrix>` element straight into a `Mat4`
// therefore yields the transpose of the transform it describes.

use glam::{Mat4, Vec3};

/// Extension trait for Mat4 covering the layouts found in COLLADA documents.
pub trait Mat4Ext {
    /// Build the transform described by 16 values written row by row.
    fn from_row_major(values: &[f32; 16]) -> Mat4;

    /// The 16 values of this transform written row by row.
    fn to_row_major(&self) -> [f32; 16];

    /// Rotation of `degrees` around `axis` (normalized internally).
    ///
    /// A zero-length axis yields the identity.
    fn from_axis_angle_degrees(axis: Vec3, degrees: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn from_row_major(values: &[f32; 16]) -> Mat4 {
        Mat4::from_cols_array(values).transpose()
    }

    fn to_row_major(&self) -> [f32; 16] {
        self.transpose().to_cols_array()
    }

    fn from_axis_angle_degrees(axis: Vec3, degrees: f32) -> Mat4 {
        match axis.try_normalize() {
            Some(axis) => Mat4::from_axis_angle(axis, degrees.to_radians()),
            None => Mat4::IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_translation() {
        #[rustfmt::skip]
        let values = [
            1.0, 0.0, 0.0, 5.0,
            0.0, 1.0, 0.0, 6.0,
            0.0, 0.0, 1.0, 7.0,
            0.0, 0.0, 0.0, 1.0,
        ];
        let matrix = Mat4::from_row_major(&values);

        let origin = matrix.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(5.0, 6.0, 7.0)).length() < 0.001);
        assert_eq!(matrix.to_row_major(), values);
    }

    #[test]
    fn test_axis_angle_degrees() {
        let matrix = Mat4::from_axis_angle_degrees(Vec3::new(0.0, 0.0, 2.0), 90.0);
        let rotated = matrix.transform_vector3(Vec3::X);
        assert!((rotated - Vec3::Y).length() < 0.001);

        assert_eq!(Mat4::from_axis_angle_degrees(Vec3::ZERO, 45.0), Mat4::IDENTITY);
    }
}
