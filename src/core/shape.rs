// Copyright @yucwang 2023

use crate::core::interaction::Intersection;
use crate::core::scene::IntersectionEngine;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::ray::Ray3f;

// Below this |cos| a light is seen edge-on and its solid-angle density blows up.
const GRAZING_COS: Float = 1e-6;

pub trait Shape: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn bounding_box(&self) -> AABB;

    /// Geometric hit against this shape alone, in world space.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<Intersection>;

    /// Maps two uniform numbers onto the shape's area, uniformly in area.
    fn sample_area(&self, u: &Vector2f, in_world_space: bool) -> Vector3f;

    /// World-space area, cached by the shape.
    fn surface_area(&self) -> Float;

    /// Shoots a ray from `origin` towards a point drawn from `sample_area` and
    /// returns whatever the scene reports first. That can be a miss or a
    /// different surface standing in front of this one.
    fn sample_light(&self,
                    engine: &dyn IntersectionEngine,
                    origin: &Vector3f,
                    u: &Vector2f,
                    _normal: &Vector3f) -> Intersection {
        let target = self.sample_area(u, true);
        let ray = Ray3f::new(*origin, target - origin, None, None);
        engine.intersect(&ray)
    }

    /// Converts the uniform area density `1 / area` into solid angle as seen
    /// from `ray.origin()`.
    fn ray_pdf(&self, reference: &Intersection, ray: &Ray3f, light: &Intersection) -> Float {
        if !reference.is_hit() || !light.is_hit() {
            return 0.0;
        }

        let area = self.surface_area();
        let cos_theta = light.normal().dot(&(-ray.dir())).abs();
        if area <= 0.0 || cos_theta < GRAZING_COS {
            return 0.0;
        }

        let dist2 = (light.p() - ray.origin()).norm_squared();
        dist2 / (cos_theta * area)
    }
}
