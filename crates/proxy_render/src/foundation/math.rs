//! Math aliases and node transforms
//!
//! Mesh attributes and scene nodes use single-precision nalgebra types.

use nalgebra::{Matrix4, UnitQuaternion, Vector2, Vector3, Vector4};

/// Texture coordinate
pub type Vec2 = Vector2<f32>;

/// Position or normal
pub type Vec3 = Vector3<f32>;

/// Tangent with handedness in `w`
pub type Vec4 = Vector4<f32>;

/// Homogeneous transform matrix
pub type Mat4 = Matrix4<f32>;

/// Unit rotation
pub type Quat = UnitQuaternion<f32>;

/// Placement of a node relative to its parent
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Offset from the parent origin
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Transform {
    /// Transform that leaves points where they are
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::repeat(1.0),
        }
    }

    /// Pure translation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Whether this is exactly the identity
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Map a point from local space into the parent's space
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.position + self.rotation * self.scale.component_mul(point)
    }

    /// Express a child transform in this transform's parent space
    pub fn combine(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(&child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale.component_mul(&child.scale),
        }
    }

    /// Translation * rotation * scale as a 4x4 matrix
    pub fn to_homogeneous(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let transform = Transform::default();
        assert!(transform.is_identity());
        assert_relative_eq!(transform.to_homogeneous(), Mat4::identity());
    }

    #[test]
    fn test_transform_point_scales_rotates_then_translates() {
        let transform = Transform {
            position: Vec3::new(0.0, 0.0, 5.0),
            rotation: Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2),
            scale: Vec3::repeat(2.0),
        };
        let point = transform.transform_point(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point, Vec3::new(0.0, 2.0, 5.0), epsilon = 1e-6);

        let matrix_point = transform.to_homogeneous().transform_point(&nalgebra::Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(matrix_point.coords, point, epsilon = 1e-6);
    }

    #[test]
    fn test_combine_with_identity_child() {
        let parent = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(parent.combine(&Transform::identity()), parent);
    }

    #[test]
    fn test_combine_applies_parent_scale() {
        let parent = Transform {
            scale: Vec3::repeat(2.0),
            ..Transform::identity()
        };
        let child = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(parent.combine(&child).position, Vec3::new(2.0, 0.0, 0.0));
    }
}
