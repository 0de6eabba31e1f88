// Copyright @yucwang 2026

use crate::core::interaction::Intersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;

const HALF_EXTENT: Float = 0.5;

/// Unit square `[-0.5, 0.5]²` in the local z = 0 plane, facing +z.
pub struct SquarePlane {
    to_world: Transform,
    normal: Vector3f,
    tangent: Vector3f,
    bitangent: Vector3f,
    area: Float,
}

impl SquarePlane {
    pub fn new(to_world: Transform) -> Self {
        let dp_du = to_world.apply_vector(Vector3f::x());
        let dp_dv = to_world.apply_vector(Vector3f::y());
        let area = dp_du.cross(&dp_dv).norm();

        let normal = to_world.apply_normal(Vector3f::z()).normalize();
        let tangent = (dp_du - normal * normal.dot(&dp_du)).normalize();
        let bitangent = normal.cross(&tangent);

        Self { to_world, normal, tangent, bitangent, area }
    }

    fn intersect_local(&self, ray: &Ray3f) -> Option<Vector3f> {
        let ray_local = self.to_world.inv_apply_ray(ray);
        let dir = ray_local.dir();
        if dir.z.abs() < EPSILON {
            return None;
        }

        let t_local = -ray_local.origin().z / dir.z;
        if t_local <= 0.0 {
            return None;
        }
        let p_local = ray_local.at(t_local);
        if p_local.x.abs() > HALF_EXTENT || p_local.y.abs() > HALF_EXTENT {
            return None;
        }

        Some(p_local)
    }
}

impl Shape for SquarePlane {
    fn bounding_box(&self) -> AABB {
        let corners = [
            Vector3f::new(-HALF_EXTENT, -HALF_EXTENT, 0.0),
            Vector3f::new(-HALF_EXTENT,  HALF_EXTENT, 0.0),
            Vector3f::new( HALF_EXTENT, -HALF_EXTENT, 0.0),
            Vector3f::new( HALF_EXTENT,  HALF_EXTENT, 0.0),
        ];
        let mut bbox = AABB::default();
        for corner in &corners {
            bbox.expand_by_point(&self.to_world.apply_point(*corner));
        }
        bbox.p_min -= Vector3f::repeat(EPSILON);
        bbox.p_max += Vector3f::repeat(EPSILON);
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Intersection> {
        let p_local = self.intersect_local(ray)?;
        let p_world = self.to_world.apply_point(p_local);
        let t_world = (p_world - ray.origin()).dot(&ray.dir());
        if !ray.test_segment(t_world) {
            return None;
        }

        let uv = Vector2f::new(p_local.x + HALF_EXTENT, p_local.y + HALF_EXTENT);
        Some(Intersection::new(p_world, self.normal, self.tangent, self.bitangent, uv, t_world))
    }

    fn sample_area(&self, u: &Vector2f, in_world_space: bool) -> Vector3f {
        let p_local = Vector3f::new(u.x - HALF_EXTENT, u.y - HALF_EXTENT, 0.0);
        if in_world_space {
            self.to_world.apply_point(p_local)
        } else {
            p_local
        }
    }

    fn surface_area(&self) -> Float {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_follows_scale() {
        let plane = SquarePlane::new(Transform::from_trs(Vector3f::zeros(),
                                                         Vector3f::new(45.0, 10.0, 0.0),
                                                         Vector3f::new(2.0, 3.0, 1.0)));
        assert!((plane.surface_area() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_plane_intersection() {
        // Rotated to face +y.
        let plane = SquarePlane::new(Transform::from_trs(Vector3f::new(0.0, -1.0, 0.0),
                                                         Vector3f::new(-90.0, 0.0, 0.0),
                                                         Vector3f::repeat(2.0)));
        let ray = Ray3f::new(Vector3f::new(0.3, 2.0, -0.2), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let hit = plane.ray_intersection(&ray).expect("expected a hit");
        assert!((hit.t() - 3.0).abs() < 1e-4);
        assert!((hit.p() - Vector3f::new(0.3, -1.0, -0.2)).norm() < 1e-4);
        assert!((hit.normal() - Vector3f::y()).norm() < 1e-4);
        assert!((hit.tangent().cross(&hit.bitangent()) - hit.normal()).norm() < 1e-4);
    }

    #[test]
    fn test_samples_lie_on_plane() {
        let plane = SquarePlane::new(Transform::from_trs(Vector3f::new(0.0, 0.0, 2.0),
                                                         Vector3f::zeros(),
                                                         Vector3f::repeat(4.0)));
        let p = plane.sample_area(&Vector2f::new(0.0, 0.999), true);
        assert!((p.z - 2.0).abs() < 1e-5);
        assert!(p.x.abs() <= 2.0 && p.y.abs() <= 2.0);
    }

    #[test]
    fn test_ray_pdf_zero_for_miss_reference() {
        let plane = SquarePlane::new(Transform::default());
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = plane.ray_intersection(&ray).expect("expected a hit");
        assert_eq!(plane.ray_pdf(&Intersection::miss(), &ray, &hit), 0.0);
    }
}
