//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics, backed by nalgebra.
//! All matrices follow OpenGL conventions: right-handed world space with
//! clip-space depth in [-1, 1].

pub use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * constants::DEG_TO_RAD
}

/// Extension trait for Mat4 with additional convenience constructors
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a right-handed perspective projection matrix mapping depth to
    /// [-1, 1]
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create an orthographic projection matrix mapping the given volume to
    /// clip space
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = 1.0 / (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;

        result
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::identity();
        result[(0, 0)] = 2.0 / (right - left);
        result[(1, 1)] = 2.0 / (top - bottom);
        result[(2, 2)] = -2.0 / (far - near);
        result[(0, 3)] = -(right + left) / (right - left);
        result[(1, 3)] = -(top + bottom) / (top - bottom);
        result[(2, 3)] = -(far + near) / (far - near);

        result
    }
}
