// Copyright @yucwang 2023

use crate::math::constants::Vector3f;

/// Orthonormal shading basis at a surface point. Local +Z is the normal,
/// and every BxDF is evaluated in this space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: Vector3f,
    pub bitangent: Vector3f,
    pub normal: Vector3f,
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            tangent: Vector3f::new(1.0, 0.0, 0.0),
            bitangent: Vector3f::new(0.0, 1.0, 0.0),
            normal: Vector3f::new(0.0, 0.0, 1.0),
        }
    }
}

impl Frame {
    pub fn new(tangent: Vector3f, bitangent: Vector3f, normal: Vector3f) -> Frame {
        Frame { tangent, bitangent, normal }
    }

    pub fn from_normal(normal: Vector3f) -> Frame {
        let (tangent, bitangent) = coordinate_system(&normal);
        Frame { tangent, bitangent, normal }
    }

    /// World to local: the transpose of the local-to-world basis matrix.
    /// Directions only; points are never transformed with a frame.
    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.tangent), v.dot(&self.bitangent), v.dot(&self.normal))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}

/// Builds a tangent and bitangent completing `n` into a right-handed basis.
pub fn coordinate_system(n: &Vector3f) -> (Vector3f, Vector3f) {
    let up = if n.z.abs() < 0.999 {
        Vector3f::new(0.0, 0.0, 1.0)
    } else {
        Vector3f::new(1.0, 0.0, 0.0)
    };
    let tangent = up.cross(n).normalize();
    let bitangent = n.cross(&tangent).normalize();
    (tangent, bitangent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &Vector3f, b: &Vector3f) {
        assert!((a - b).norm() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_normal_maps_to_local_z() {
        let n = Vector3f::new(1.0, 2.0, -0.5).normalize();
        let frame = Frame::from_normal(n);
        assert_close(&frame.to_local(&n), &Vector3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_frame_is_orthonormal_and_right_handed() {
        for n in &[Vector3f::new(0.0, 0.0, 1.0),
                   Vector3f::new(0.0, 0.0, -1.0),
                   Vector3f::new(0.3, -0.8, 0.2).normalize()] {
            let frame = Frame::from_normal(*n);
            assert!(frame.tangent.dot(&frame.bitangent).abs() < 1e-5);
            assert!(frame.tangent.dot(&frame.normal).abs() < 1e-5);
            assert!(frame.bitangent.dot(&frame.normal).abs() < 1e-5);
            assert_close(&frame.tangent.cross(&frame.bitangent), &frame.normal);
        }
    }

    #[test]
    fn test_local_world_round_trip() {
        let frame = Frame::from_normal(Vector3f::new(-0.4, 0.1, 0.9).normalize());
        let v = Vector3f::new(0.25, -0.5, 0.75);
        assert_close(&frame.to_world(&frame.to_local(&v)), &v);
        assert_close(&frame.to_local(&frame.to_world(&v)), &v);
    }
}
