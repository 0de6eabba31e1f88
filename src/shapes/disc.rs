// Copyright @yucwang 2026

use crate::core::interaction::Intersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{EPSILON, PI, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::transform::Transform;
use crate::math::warp::square_to_disk_polar;

const RADIUS: Float = 0.5;

/// Disc of diameter 1 centred at the origin of the local z = 0 plane,
/// facing +z.
pub struct Disc {
    to_world: Transform,
    normal: Vector3f,
    tangent: Vector3f,
    bitangent: Vector3f,
    area: Float,
}

impl Disc {
    pub fn new(to_world: Transform) -> Self {
        let mut disc = Self {
            to_world,
            normal: Vector3f::z(),
            tangent: Vector3f::x(),
            bitangent: Vector3f::y(),
            area: 0.0,
        };
        disc.update_frame();
        disc.compute_area();
        disc
    }

    pub fn transform(&self) -> &Transform {
        &self.to_world
    }

    /// Moves the disc; the cached frame and area follow.
    pub fn set_transform(&mut self, to_world: Transform) {
        self.to_world = to_world;
        self.update_frame();
        self.compute_area();
    }

    fn update_frame(&mut self) {
        self.normal = self.to_world.apply_normal(Vector3f::z()).normalize();
        self.tangent = self.to_world.apply_vector(Vector3f::x()).normalize();
        // Re-orthogonalize, the world tangent is skewed under shear.
        self.tangent = (self.tangent - self.normal * self.normal.dot(&self.tangent)).normalize();
        self.bitangent = self.normal.cross(&self.tangent);
    }

    // Area of an ellipse with the transformed semi-axes.
    fn compute_area(&mut self) {
        let r1 = self.to_world.apply_vector(Vector3f::new(RADIUS, 0.0, 0.0)).norm();
        let r2 = self.to_world.apply_vector(Vector3f::new(0.0, RADIUS, 0.0)).norm();
        self.area = PI * r1 * r2;
    }
}

impl Shape for Disc {
    fn bounding_box(&self) -> AABB {
        let corners = [
            Vector3f::new(-RADIUS, -RADIUS, 0.0),
            Vector3f::new(-RADIUS,  RADIUS, 0.0),
            Vector3f::new( RADIUS, -RADIUS, 0.0),
            Vector3f::new( RADIUS,  RADIUS, 0.0),
        ];
        let world: Vec<Vector3f> = corners.iter().map(|c| self.to_world.apply_point(*c)).collect();
        let mut bbox = AABB::from_points(&world);
        // Flat shape; give the box some thickness.
        bbox.p_min -= Vector3f::repeat(EPSILON);
        bbox.p_max += Vector3f::repeat(EPSILON);
        bbox
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<Intersection> {
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
        if p_local.x * p_local.x + p_local.y * p_local.y > RADIUS * RADIUS {
            return None;
        }

        let p_world = self.to_world.apply_point(p_local);
        let t_world = (p_world - ray.origin()).dot(&ray.dir());
        if !ray.test_segment(t_world) {
            return None;
        }

        let uv = Vector2f::new(p_local.x + 0.5, p_local.y + 0.5);
        Some(Intersection::new(p_world, self.normal, self.tangent, self.bitangent, uv, t_world))
    }

    fn sample_area(&self, u: &Vector2f, in_world_space: bool) -> Vector3f {
        let d = square_to_disk_polar(u) * RADIUS;
        let p_local = Vector3f::new(d.x, d.y, 0.0);
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
