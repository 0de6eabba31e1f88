// Copyright @yucwang 2023

use crate::core::bxdf::{BxDF, BxDFSample, BxDFType};
use crate::core::interaction::Intersection;
use crate::core::rng::RandomSource;
use crate::core::texture::Texture;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use std::sync::Arc;

/// Surface appearance shared by every object that references it. Lobe
/// directions are always given in the local shading frame of the hit.
pub struct Material {
    name: String,
    base_color: RGBSpectrum,
    bxdfs: Vec<Arc<dyn BxDF>>,
    is_light_source: bool,
    intensity: Float,
    texture: Option<Arc<dyn Texture>>,
}

impl Material {
    /// Scattering material. Panics without at least one lobe.
    pub fn new(base_color: RGBSpectrum, bxdfs: Vec<Arc<dyn BxDF>>) -> Self {
        assert!(!bxdfs.is_empty(), "a scattering material needs at least one BxDF");
        Self {
            name: String::from("MATERIAL"),
            base_color,
            bxdfs,
            is_light_source: false,
            intensity: 0.0,
            texture: None,
        }
    }

    /// Emissive material. Lights are never scattered from, so they own no lobes.
    pub fn light(base_color: RGBSpectrum, intensity: Float) -> Self {
        Self {
            name: String::from("LIGHT"),
            base_color,
            bxdfs: Vec::new(),
            is_light_source: true,
            intensity,
            texture: None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_texture(mut self, texture: Arc<dyn Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_color(&self) -> RGBSpectrum {
        self.base_color
    }

    pub fn is_light_source(&self) -> bool {
        self.is_light_source
    }

    pub fn intensity(&self) -> Float {
        self.intensity
    }

    pub fn bxdfs(&self) -> &[Arc<dyn BxDF>] {
        &self.bxdfs
    }

    pub fn is_transmissive(&self) -> bool {
        self.bxdfs.iter().any(|b| b.bxdf_type().contains(BxDFType::TRANSMISSION))
    }

    pub fn texture_color(&self, uv: &Vector2f) -> RGBSpectrum {
        match &self.texture {
            Some(texture) => texture.eval(uv),
            None => RGBSpectrum::white(),
        }
    }

    // One lobe picked uniformly. With several lobes this is a one-sample
    // estimate of their sum, not the sum itself.
    fn pick_bxdf(&self, rng: &mut dyn RandomSource) -> &dyn BxDF {
        assert!(!self.bxdfs.is_empty(),
                "material '{}' has no BxDF to scatter with", self.name);
        self.bxdfs[rng.next_index(self.bxdfs.len())].as_ref()
    }

    pub fn evaluate_scattered_energy(&self,
                                     isx: &Intersection,
                                     wo: &Vector3f,
                                     wi: &Vector3f,
                                     rng: &mut dyn RandomSource) -> RGBSpectrum {
        self.pick_bxdf(rng).eval(wo, wi) * self.base_color * isx.texture_color()
    }

    pub fn sample_and_evaluate_scattered_energy(&self,
                                                isx: &Intersection,
                                                wo: &Vector3f,
                                                rng: &mut dyn RandomSource) -> BxDFSample {
        let u = rng.next_2d();
        let bxdf = self.pick_bxdf(rng);
        let mut sample = bxdf.sample_and_eval(wo, &u);
        if sample.is_degenerate() {
            return BxDFSample::default();
        }
        sample.value = sample.value * self.base_color * isx.texture_color();
        sample
    }

    /// Density of one randomly chosen lobe for the pair `(wo, wi)`.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f, rng: &mut dyn RandomSource) -> Float {
        self.pick_bxdf(rng).pdf(wo, wi)
    }

    /// Self-emitted energy at a point on a light, before the base colour.
    pub fn emitted_energy(&self, isx: &Intersection) -> RGBSpectrum {
        if !self.is_light_source {
            return RGBSpectrum::black();
        }
        isx.texture_color() * self.intensity
    }

    /// Radiance leaving a light towards any direction: base colour times
    /// self-emitted energy.
    pub fn emitted_radiance(&self, isx: &Intersection) -> RGBSpectrum {
        self.base_color * self.emitted_energy(isx)
    }
}
