// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Matrix3f, Matrix4f, Vector3f };
use super::ray::Ray3f;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Matrix4f,
    inv_matrix: Matrix4f
}

impl Default for Transform {
    fn default() -> Self {
        Self { matrix: Matrix4f::identity(),
               inv_matrix: Matrix4f::identity() }
    }
}

impl Transform {
    pub fn new(matrix: Matrix4f) -> Self {
        Self { matrix: matrix,
               inv_matrix: matrix.try_inverse().unwrap_or(Matrix4f::identity())}
    }

    /// Scale first, then rotate (XYZ euler angles in degrees), then translate.
    pub fn from_trs(translate: Vector3f, rotate_degrees: Vector3f, scale: Vector3f) -> Self {
        let radians = rotate_degrees * (std::f32::consts::PI / 180.0);
        let rotation = nalgebra::Rotation3::from_euler_angles(radians.x, radians.y, radians.z);
        let matrix = Matrix4f::new_translation(&translate)
            * rotation.to_homogeneous()
            * Matrix4f::new_nonuniform_scaling(&scale);
        Self::new(matrix)
    }

    pub fn matrix(&self) -> &Matrix4f {
        &self.matrix
    }

    pub fn inverse(&self) -> Transform {
        Self { matrix: self.inv_matrix, inv_matrix: self.matrix }
    }

    fn linear(m: &Matrix4f) -> Matrix3f {
        m.fixed_slice::<3, 3>(0, 0).into_owned()
    }

    fn point(m: &Matrix4f, p: &Vector3f) -> Vector3f {
        let h = m * p.push(1.0);
        let w = if h.w != 0.0 { h.w } else { 1.0 };
        Vector3f::new(h.x / w, h.y / w, h.z / w)
    }

    pub fn apply_point(&self, p: Vector3f) -> Vector3f {
        Self::point(&self.matrix, &p)
    }

    pub fn apply_vector(&self, v: Vector3f) -> Vector3f {
        Self::linear(&self.matrix) * v
    }

    // Normals transform with the inverse transpose so that n^T x = 0 survives:
    // (Sn)^T(Mx) = 0 gives S = (M^{-1})^T.
    pub fn apply_normal(&self, n: Vector3f) -> Vector3f {
        Self::linear(&self.inv_matrix).transpose() * n
    }

    pub fn apply_ray(&self, ray: &Ray3f) -> Ray3f {
        let new_p = self.apply_point(ray.origin());
        let new_d = self.apply_vector(ray.dir());

        Ray3f::new(new_p, new_d, Some(ray.min_t), Some(ray.max_t))
    }

    pub fn inv_apply_point(&self, p: Vector3f) -> Vector3f {
        Self::point(&self.inv_matrix, &p)
    }

    pub fn inv_apply_vector(&self, v: Vector3f) -> Vector3f {
        Self::linear(&self.inv_matrix) * v
    }

    pub fn inv_apply_normal(&self, n: Vector3f) -> Vector3f {
        Self::linear(&self.matrix).transpose() * n
    }

    /// Reparents a world ray into the local space of this transform. The
    /// direction is renormalized, so local parametric distances differ from
    /// world ones.
    pub fn inv_apply_ray(&self, ray: &Ray3f) -> Ray3f {
        let new_p = self.inv_apply_point(ray.origin());
        let new_d = self.inv_apply_vector(ray.dir());

        Ray3f::new(new_p, new_d, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trs_order() {
        let t = Transform::from_trs(Vector3f::new(1.0, 2.0, 3.0),
                                    Vector3f::new(0.0, 0.0, 90.0),
                                    Vector3f::new(2.0, 1.0, 1.0));
        // x is scaled by 2, rotated onto +y, then translated.
        let p = t.apply_point(Vector3f::new(1.0, 0.0, 0.0));
        assert!((p - Vector3f::new(1.0, 4.0, 3.0)).norm() < 1e-5);

        let back = t.inv_apply_point(p);
        assert!((back - Vector3f::new(1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_normal_stays_perpendicular() {
        let t = Transform::from_trs(Vector3f::zeros(),
                                    Vector3f::new(30.0, 0.0, 0.0),
                                    Vector3f::new(3.0, 1.0, 0.5));
        let tangent = t.apply_vector(Vector3f::new(1.0, 1.0, 0.0));
        let normal = t.apply_normal(Vector3f::new(0.0, 0.0, 1.0));
        assert!(tangent.dot(&normal).abs() < 1e-5);
    }
}
