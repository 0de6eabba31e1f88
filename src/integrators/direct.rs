// Copyright @yucwang 2026

use crate::core::config::{IntegratorConfig, LightingMode};
use crate::core::integrator::Integrator;
use crate::core::interaction::Intersection;
use crate::core::rng::RandomSource;
use crate::core::scene::{IntersectionEngine, Scene, SceneObject};
use crate::core::sensor::Sensor;
use crate::integrators::mis::power_heuristic;
use crate::integrators::path::{PathRecord, PathState};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

// Solid-angle densities below these are too unstable to divide by.
const LIGHT_PDF_CUTOFF: Float = 1e-3;
const BXDF_PDF_CUTOFF: Float = 1e-2;
const MIS_LIGHT_PDF_CUTOFF: Float = 1e-2;

// Transmissive surfaces a shadow query may pass through before giving up.
const MAX_TRANSMISSIVE_STEPS: usize = 8;

/// Direct illumination with multiple importance sampling, plus the
/// multi-bounce accumulator built on top of it.
pub struct DirectLightingIntegrator {
    config: IntegratorConfig,
}

impl Default for DirectLightingIntegrator {
    fn default() -> Self {
        Self::new(IntegratorConfig::default())
    }
}

impl DirectLightingIntegrator {
    pub fn new(config: IntegratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Direct-only estimate along a camera ray.
    pub fn trace_ray(&self,
                     scene: &Scene,
                     ray: &Ray3f,
                     depth: u32,
                     rng: &mut dyn RandomSource) -> RGBSpectrum {
        self.trace_ray_record(scene, ray, depth, rng).radiance
    }

    pub fn trace_ray_record(&self,
                            scene: &Scene,
                            ray: &Ray3f,
                            depth: u32,
                            rng: &mut dyn RandomSource) -> PathRecord {
        let isx = match self.enter(scene, ray, depth) {
            Ok(isx) => isx,
            Err(record) => return record,
        };

        let radiance = self.compute_direct_lighting(scene, ray, &isx, rng);
        PathRecord::terminated(radiance, PathState::TerminatedBounceLimit, 0)
    }

    /// Shared entry of both trace modes: depth check, camera hit, light hit.
    /// `Ok` carries a hit on a scattering surface.
    pub(crate) fn enter(&self, scene: &Scene, ray: &Ray3f, depth: u32)
        -> Result<Intersection, PathRecord> {
        if depth > self.config.max_depth {
            return Err(PathRecord::terminated(RGBSpectrum::black(),
                                              PathState::TerminatedDepth, 0));
        }

        let isx = scene.intersect(ray);
        let object = match isx.object() {
            Some(object) => object.clone(),
            None => return Err(PathRecord::terminated(RGBSpectrum::black(),
                                                      PathState::TerminatedMiss, 0)),
        };

        if object.is_light() {
            let radiance = object.material().emitted_radiance(&isx);
            return Err(PathRecord::terminated(radiance, PathState::TerminatedLightHit, 0));
        }

        Ok(isx)
    }

    /// Estimates light arriving directly from the emitters at `isx` and
    /// scattered back along `ray`. `isx` must be a hit on a non-emissive
    /// surface.
    pub fn compute_direct_lighting(&self,
                                   scene: &Scene,
                                   ray: &Ray3f,
                                   isx: &Intersection,
                                   rng: &mut dyn RandomSource) -> RGBSpectrum {
        let lights = scene.lights();
        if lights.is_empty() || !isx.is_hit() {
            return RGBSpectrum::black();
        }

        let light = &lights[rng.next_index(lights.len())];
        let light_sample = self.sample_light_strategy(scene, ray, isx, light, rng);
        let bxdf_sample = self.sample_bxdf_strategy(scene, ray, isx, light, rng);

        (light_sample + bxdf_sample) * lights.len() as Float
    }

    /// Light-sampling half of the MIS estimate.
    pub fn sample_light_strategy(&self,
                                 scene: &Scene,
                                 ray: &Ray3f,
                                 isx: &Intersection,
                                 light: &SceneObject,
                                 rng: &mut dyn RandomSource) -> RGBSpectrum {
        let material = match isx.object() {
            Some(object) => object.material(),
            None => return RGBSpectrum::black(),
        };
        let offset = self.config.ray_offset;
        // Shadow queries leave from the side the camera ray arrived on.
        let normal = if isx.normal().dot(&-ray.dir()) < 0.0 { -isx.normal() } else { isx.normal() };
        let origin = isx.p() + normal * offset;

        let u = rng.next_2d();
        let light_isx = match self.reach_light(scene,
                                               light.shape().sample_light(scene, &origin, &u, &normal),
                                               &origin,
                                               light) {
            Some(light_isx) => light_isx,
            None => return RGBSpectrum::black(),
        };

        let to_light = light_isx.p() - isx.p();
        if to_light.norm_squared() == 0.0 {
            return RGBSpectrum::black();
        }
        let ray_to_light = Ray3f::spawn(isx.p(), normal, to_light, offset);

        let light_pdf = light.shape().ray_pdf(isx, &ray_to_light, &light_isx);
        if !light_pdf.is_finite() || light_pdf.abs() < LIGHT_PDF_CUTOFF {
            return RGBSpectrum::black();
        }

        let frame = isx.frame();
        let wo = frame.to_local(&(-ray.dir()));
        let wi = frame.to_local(&ray_to_light.dir());

        let energy = material.evaluate_scattered_energy(isx, &wo, &wi, rng);
        let light_energy = light.material().emitted_radiance(&light_isx);
        let cos_theta = ray_to_light.dir().dot(&normal).abs();

        let bxdf_pdf = material.pdf(&wo, &wi, rng);
        if bxdf_pdf.abs() < BXDF_PDF_CUTOFF {
            return RGBSpectrum::black();
        }

        let weight = power_heuristic(light_pdf, bxdf_pdf);
        energy * light_energy * (cos_theta * weight / light_pdf)
    }

    /// BxDF-sampling half of the MIS estimate.
    pub fn sample_bxdf_strategy(&self,
                                scene: &Scene,
                                ray: &Ray3f,
                                isx: &Intersection,
                                light: &SceneObject,
                                rng: &mut dyn RandomSource) -> RGBSpectrum {
        let material = match isx.object() {
            Some(object) => object.material(),
            None => return RGBSpectrum::black(),
        };
        let frame = isx.frame();
        let wo = frame.to_local(&(-ray.dir()));

        let sample = material.sample_and_evaluate_scattered_energy(isx, &wo, rng);
        if sample.is_degenerate() {
            return RGBSpectrum::black();
        }

        let normal = isx.normal();
        let wi_world = frame.to_world(&sample.wi);
        let bxdf_ray = Ray3f::spawn(isx.p(), normal, wi_world, self.config.ray_offset);

        let light_isx = scene.intersect(&bxdf_ray);
        if !light_isx.hits(light) {
            return RGBSpectrum::black();
        }

        let light_energy = light.material().emitted_radiance(&light_isx);
        let cos_theta = bxdf_ray.dir().dot(&normal).abs();

        let light_pdf = light.shape().ray_pdf(isx, &bxdf_ray, &light_isx);
        if !light_pdf.is_finite() || light_pdf.abs() < MIS_LIGHT_PDF_CUTOFF {
            return RGBSpectrum::black();
        }

        let weight = power_heuristic(sample.pdf, light_pdf);
        sample.value * light_energy * (cos_theta * weight / sample.pdf)
    }

    // Follows a shadow query through transmissive surfaces. `None` when an
    // opaque surface or nothing at all is found before `light`.
    fn reach_light(&self,
                   scene: &Scene,
                   first: Intersection,
                   origin: &Vector3f,
                   light: &SceneObject) -> Option<Intersection> {
        let mut current = first;
        for _ in 0..MAX_TRANSMISSIVE_STEPS {
            let object = current.object()?;
            if object.id() == light.id() {
                return Some(current);
            }
            if !object.material().is_transmissive() {
                return None;
            }

            let dir = current.p() - origin;
            let next = Ray3f::spawn(current.p(), current.normal(), dir, self.config.ray_offset);
            current = scene.intersect(&next);
        }

        log::debug!("shadow query gave up after {} transmissive surfaces", MAX_TRANSMISSIVE_STEPS);
        None
    }
}

impl Integrator for DirectLightingIntegrator {
    fn trace_ray_forward(&self,
                         scene: &Scene,
                         sensor: &dyn Sensor,
                         pixel: Vector2f,
                         rng: &mut dyn RandomSource) -> RGBSpectrum {
        let (width, height) = {
            let bmp = sensor.bitmap();
            (bmp.width() as Float, bmp.height() as Float)
        };
        let jitter = rng.next_2d();
        let film = Vector2f::new((pixel.x + jitter.x) / width, (pixel.y + jitter.y) / height);
        let ray = sensor.sample_ray(&film);

        match self.config.mode {
            LightingMode::Direct => self.trace_ray(scene, &ray, 0, rng),
            LightingMode::Total => self.trace_ray_total_lighting(scene, &ray, 0, rng),
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        self.config.samples_per_pixel
    }
}
