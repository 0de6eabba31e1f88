// Copyright @yucwang 2023

use crate::core::scene::SceneObject;
use crate::math::constants::{ EPSILON, Float, Vector2f, Vector3f };
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use std::sync::Arc;

/// Result of a ray query. A hit owns a handle to the surface it landed on;
/// without one every other field is meaningless.
#[derive(Clone)]
pub struct Intersection {
    p: Vector3f,
    normal: Vector3f,
    tangent: Vector3f,
    bitangent: Vector3f,
    uv: Vector2f,
    t: Float,
    texture_color: RGBSpectrum,
    object: Option<Arc<SceneObject>>,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            p: Vector3f::zeros(),
            normal: Vector3f::zeros(),
            tangent: Vector3f::zeros(),
            bitangent: Vector3f::zeros(),
            uv: Vector2f::zeros(),
            t: -1.0,
            texture_color: RGBSpectrum::white(),
            object: None,
        }
    }
}

impl std::fmt::Debug for Intersection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intersection")
            .field("p", &self.p)
            .field("normal", &self.normal)
            .field("t", &self.t)
            .field("object", &self.object.as_ref().map(|o| o.id()))
            .finish()
    }
}

impl Intersection {
    /// Geometric hit as reported by a shape; the owning surface is attached
    /// later by the scene.
    pub fn new(p: Vector3f,
               normal: Vector3f,
               tangent: Vector3f,
               bitangent: Vector3f,
               uv: Vector2f,
               t: Float) -> Self {
        Self { p, normal, tangent, bitangent, uv, t,
               texture_color: RGBSpectrum::white(), object: None }
    }

    pub fn miss() -> Self {
        Self::default()
    }

    pub fn is_hit(&self) -> bool {
        self.object.is_some()
    }

    pub fn object(&self) -> Option<&Arc<SceneObject>> {
        self.object.as_ref()
    }

    pub fn hits(&self, object: &SceneObject) -> bool {
        self.object.as_ref().map_or(false, |o| o.id() == object.id())
    }

    pub fn with_object(mut self, object: Arc<SceneObject>) -> Self {
        self.texture_color = object.material().texture_color(&self.uv);
        self.object = Some(object);
        self
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn tangent(&self) -> Vector3f {
        self.tangent
    }

    pub fn bitangent(&self) -> Vector3f {
        self.bitangent
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn texture_color(&self) -> RGBSpectrum {
        self.texture_color
    }

    /// Shading frame at the hit. Shapes that report no tangent get one
    /// built from the normal.
    pub fn frame(&self) -> Frame {
        if self.tangent.norm_squared() < EPSILON {
            return Frame::from_normal(self.normal);
        }
        Frame::new(self.tangent, self.bitangent, self.normal)
    }
}
