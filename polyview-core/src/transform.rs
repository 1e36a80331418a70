/// 4x4 homogeneous transformation matrices
use nalgebra::{Matrix4, Point3};

/// Row-major 4x4 homogeneous matrix. The bottom row stays `[0, 0, 0, 1]`.
pub type Matrix = Matrix4<f64>;

/// Transform builder for 3D transformations
///
/// Rotations use the right-hand convention: looking down the positive axis
/// towards the origin, a positive angle turns counter-clockwise. In
/// particular `rotate_z(90)` maps `(1, 0, 0)` onto `(0, 1, 0)`.
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix {
        Matrix4::identity()
    }

    /// `a · b`. Applying the result to a point applies `b` first, then `a`.
    pub fn compose(a: &Matrix, b: &Matrix) -> Matrix {
        a * b
    }

    /// Rotation around the X axis, in degrees
    pub fn rotate_x(degrees: f64) -> Matrix {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, cos, -sin, 0.0, //
            0.0, sin, cos, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Y axis, in degrees
    pub fn rotate_y(degrees: f64) -> Matrix {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix4::new(
            cos, 0.0, sin, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -sin, 0.0, cos, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Z axis, in degrees
    pub fn rotate_z(degrees: f64) -> Matrix {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix4::new(
            cos, -sin, 0.0, 0.0, //
            sin, cos, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a scale matrix
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix {
        Matrix4::new(
            sx, 0.0, 0.0, 0.0, //
            0.0, sy, 0.0, 0.0, //
            0.0, 0.0, sz, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Create a translation matrix
    pub fn translate(tx: f64, ty: f64, tz: f64) -> Matrix {
        Matrix4::new(
            1.0, 0.0, 0.0, tx, //
            0.0, 1.0, 0.0, ty, //
            0.0, 0.0, 1.0, tz, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Transform `(x, y, z, 1)` by the top three rows of `m`.
    pub fn apply(m: &Matrix, p: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            m[(0, 0)] * p.x + m[(0, 1)] * p.y + m[(0, 2)] * p.z + m[(0, 3)],
            m[(1, 0)] * p.x + m[(1, 1)] * p.y + m[(1, 2)] * p.z + m[(1, 3)],
            m[(2, 0)] * p.x + m[(2, 1)] * p.y + m[(2, 2)] * p.z + m[(2, 3)],
        )
    }
}
