// Copyright @yucwang 2026

use crate::core::bvh::BVH;
use crate::core::interaction::Intersection;
use crate::core::material::Material;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;
use std::sync::Arc;

/// Nearest-hit query over a whole scene.
pub trait IntersectionEngine: Sync {
    fn intersect(&self, ray: &Ray3f) -> Intersection;
}

/// A surface: shape plus the material it shares with other surfaces.
pub struct SceneObject {
    id: usize,
    name: String,
    shape: Arc<dyn Shape>,
    material: Arc<Material>,
}

impl SceneObject {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &dyn Shape {
        self.shape.as_ref()
    }

    pub fn material(&self) -> &Material {
        self.material.as_ref()
    }

    pub fn is_light(&self) -> bool {
        self.material.is_light_source()
    }
}

/// Immutable once rendering starts: surfaces, the lights among them and
/// the cameras.
pub struct Scene {
    objects: Vec<Arc<SceneObject>>,
    lights: Vec<Arc<SceneObject>>,
    sensors: Vec<Box<dyn Sensor>>,
    scene_bounds: AABB,
    bvh: Option<BVH>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            lights: Vec::new(),
            sensors: Vec::new(),
            scene_bounds: AABB::default(),
            bvh: None,
        }
    }

    /// Adds a surface and returns its id. Surfaces with an emissive material
    /// join the light list.
    pub fn add_object(&mut self, name: &str, shape: Arc<dyn Shape>, material: Arc<Material>) -> usize {
        let id = self.objects.len();
        let object = Arc::new(SceneObject { id, name: name.to_string(), shape, material });
        if object.is_light() {
            self.lights.push(object.clone());
        }
        self.objects.push(object);
        self.bvh = None;
        id
    }

    pub fn objects(&self) -> &[Arc<SceneObject>] {
        &self.objects
    }

    pub fn object(&self, id: usize) -> Option<&Arc<SceneObject>> {
        self.objects.get(id)
    }

    pub fn lights(&self) -> &[Arc<SceneObject>] {
        &self.lights
    }

    pub fn sensors(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    pub fn camera(&self, camera_id: usize) -> Option<&dyn Sensor> {
        self.sensors.get(camera_id).map(|s| s.as_ref())
    }

    pub fn take_sensor(&mut self, camera_id: usize) -> Option<Box<dyn Sensor>> {
        if camera_id < self.sensors.len() {
            Some(self.sensors.remove(camera_id))
        } else {
            None
        }
    }

    pub fn insert_sensor(&mut self, camera_id: usize, sensor: Box<dyn Sensor>) {
        if camera_id <= self.sensors.len() {
            self.sensors.insert(camera_id, sensor);
        } else {
            self.sensors.push(sensor);
        }
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn build_bvh(&mut self) {
        let mut prim_bounds = Vec::with_capacity(self.objects.len());
        let mut prim_centroids = Vec::with_capacity(self.objects.len());
        let mut scene_bounds = AABB::default();
        for obj in &self.objects {
            let bounds = obj.shape.bounding_box();
            prim_centroids.push(bounds.center());
            prim_bounds.push(bounds);
            scene_bounds.expand_by_aabb(&bounds);
        }

        self.bvh = Some(BVH::new(prim_bounds, prim_centroids));
        self.scene_bounds = scene_bounds;

        log::info!("Scene BVH built over {} surfaces, {} of them lights.",
                   self.objects.len(), self.lights.len());
        if self.lights.is_empty() {
            log::warn!("Scene has no lights; direct lighting will be black.");
        }
    }
}

impl IntersectionEngine for Scene {
    fn intersect(&self, ray: &Ray3f) -> Intersection {
        let bvh = self.bvh.as_ref().expect("BVH must be built before intersect");
        match bvh.ray_intersection(ray, |prim_idx, ray| {
            self.objects[prim_idx].shape.ray_intersection(ray).map(|h| {
                let t = h.t();
                (h, t)
            })
        }) {
            Some((idx, hit)) => hit.with_object(self.objects[idx].clone()),
            None => Intersection::miss(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bxdf::BxDF;
    use crate::materials::lambertian_diffuse::LambertBxDF;
    use crate::math::constants::Vector3f;
    use crate::math::spectrum::RGBSpectrum;
    use crate::math::transform::Transform;
    use crate::shapes::square_plane::SquarePlane;

    fn plane_at(z: f32) -> Arc<dyn Shape> {
        Arc::new(SquarePlane::new(Transform::from_trs(Vector3f::new(0.0, 0.0, z),
                                                      Vector3f::zeros(),
                                                      Vector3f::new(4.0, 4.0, 1.0))))
    }

    fn diffuse() -> Arc<Material> {
        let lobes: Vec<Arc<dyn BxDF>> = vec![Arc::new(LambertBxDF::default())];
        Arc::new(Material::new(RGBSpectrum::splat(0.5), lobes))
    }

    #[test]
    fn test_scene_intersect_closest_hit() {
        let mut scene = Scene::new();
        scene.add_object("far", plane_at(5.0), diffuse());
        let near = scene.add_object("near", plane_at(2.0), diffuse());
        scene.add_object("farther", plane_at(10.0), diffuse());
        scene.build_bvh();

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None);
        let hit = scene.intersect(&ray);

        assert!(hit.is_hit());
        assert!((hit.t() - 2.0).abs() < 1e-5);
        assert_eq!(hit.object().map(|o| o.id()), Some(near));
    }

    #[test]
    fn test_scene_intersect_miss() {
        let mut scene = Scene::new();
        scene.add_object("floor", plane_at(2.0), diffuse());
        scene.build_bvh();

        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.intersect(&ray);
        assert!(!hit.is_hit());
        assert!(hit.t() < 0.0);
    }

    #[test]
    fn test_lights_are_collected() {
        let mut scene = Scene::new();
        scene.add_object("floor", plane_at(0.0), diffuse());
        let lamp = scene.add_object("lamp", plane_at(3.0),
                                    Arc::new(Material::light(RGBSpectrum::white(), 2.0)));
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.lights()[0].id(), lamp);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_intersect_without_bvh_panics() {
        let mut scene = Scene::new();
        scene.add_object("floor", plane_at(0.0), diffuse());
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let _ = scene.intersect(&ray);
    }
}
