//! Math utilities and types
//!
//! Provides the vector and matrix types used by the projection pipeline, plus
//! helpers for the OpenGL matrix layout the simulator host hands out.
//!
//! Host matrices arrive as 16 floats in column-major order. `nalgebra` stores
//! matrices column-major as well, so the raw array maps straight onto a
//! [`Mat4`] and the usual `m * v` product is the OpenGL transform
//! `dst[i] = Σ_j v[j] * m[j*4+i]`.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type (homogeneous coordinates, RGBA colors)
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Build a matrix from 16 floats in OpenGL column-major order
pub fn mat4_from_gl(m: &[f32; 16]) -> Mat4 {
    Mat4::from_column_slice(m)
}

/// Flatten a matrix into the OpenGL column-major layout
pub fn mat4_to_gl(m: &Mat4) -> [f32; 16] {
    let mut out = [0.0; 16];
    out.copy_from_slice(m.as_slice());
    out
}

/// 4x4 transform of an XYZW coordinate using OpenGL matrix conventions
///
/// Equivalent to treating `v` as a row vector multiplied by the matrix as it
/// is laid out in memory: `dst[i] = Σ_j v[j] * m[j*4+i]`.
#[inline]
pub fn transform_gl(m: &Mat4, v: &Vec4) -> Vec4 {
    m * v
}

/// Distance units used by the simulator
pub mod units {
    /// Meters in one nautical mile
    pub const METERS_PER_NM: f32 = 1852.0;

    /// Convert nautical miles to meters
    pub fn nm_to_m(nm: f32) -> f32 {
        nm * METERS_PER_NM
    }
}

/// Extension trait for Mat4 with camera matrix constructors
///
/// The host computes its own matrices; these exist so demo hosts and tests
/// can produce the same kind of matrices the simulator would report.
pub trait Mat4Ext {
    /// OpenGL-style perspective projection, depth mapped to [-1, 1]
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Perspective projection with depth mapped to [0, 1] (Vulkan/Metal drivers)
    fn perspective_zero_to_one(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix, camera looking down its -Z axis
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn perspective_zero_to_one(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // P = [f/a  0   0           0          ]
        //     [0    f   0           0          ]
        //     [0    0   F/(n-F)     nF/(n-F)   ]
        //     [0    0   -1          0          ]
        let f = 1.0 / (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = far / (near - far);
        result[(2, 3)] = (near * far) / (near - far);
        result[(3, 2)] = -1.0;
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gl_layout_matches_row_vector_product() {
        // Translation lives in elements 12..15 of an OpenGL matrix
        let mut raw = [0.0_f32; 16];
        raw[0] = 1.0;
        raw[5] = 1.0;
        raw[10] = 1.0;
        raw[15] = 1.0;
        raw[12] = 3.0;
        raw[13] = -2.0;
        raw[14] = 7.0;

        let m = mat4_from_gl(&raw);
        let v = Vec4::new(1.0, 1.0, 1.0, 1.0);
        let dst = transform_gl(&m, &v);

        for i in 0..4 {
            let expected: f32 = (0..4).map(|j| v[j] * raw[j * 4 + i]).sum();
            assert_relative_eq!(dst[i], expected);
        }
        assert_relative_eq!(dst, Vec4::new(4.0, -1.0, 8.0, 1.0));
        assert_eq!(mat4_to_gl(&m), raw);
    }

    #[test]
    fn test_zero_to_one_depth_range() {
        let proj = Mat4::perspective_zero_to_one(1.0, 1.0, 1.0, 100.0);

        let near = proj * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_gl_depth_range() {
        let proj = Mat4::perspective_gl(1.0, 1.0, 1.0, 100.0);

        let near = proj * Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert_relative_eq!(near.z / near.w, -1.0, epsilon = 1e-4);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_nautical_miles() {
        assert_relative_eq!(units::nm_to_m(3.0), 5556.0);
    }
}
