// Copyright @yucwang 2026

use crate::core::config::BounceAttenuation;
use crate::core::rng::RandomSource;
use crate::core::scene::{IntersectionEngine, Scene};
use crate::integrators::direct::DirectLightingIntegrator;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

// Lowest termination probability once Russian roulette kicks in.
const MIN_RR_PROBABILITY: Float = 0.05;

/// Where a camera path stands. Every trace ends in one of the
/// `Terminated*` states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathState {
    Active,
    /// Entry depth exceeded the configured maximum.
    TerminatedDepth,
    TerminatedMiss,
    TerminatedLightHit,
    /// Bounce cap reached, or a direct-only estimate finished.
    TerminatedBounceLimit,
    /// The continuation sample carried no energy.
    TerminatedAbsorbed,
    TerminatedRussianRoulette,
}

impl PathState {
    pub fn is_terminated(&self) -> bool {
        *self != PathState::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRecord {
    pub radiance: RGBSpectrum,
    pub termination: PathState,
    /// Indirect bounces followed before termination.
    pub bounces: u32,
}

impl PathRecord {
    pub fn active() -> Self {
        Self { radiance: RGBSpectrum::black(), termination: PathState::Active, bounces: 0 }
    }

    pub fn terminated(radiance: RGBSpectrum, termination: PathState, bounces: u32) -> Self {
        Self { radiance, termination, bounces }
    }

    fn finish(mut self, termination: PathState) -> Self {
        self.termination = termination;
        log::trace!("path {:?} after {} bounces, L = {:?}",
                    termination, self.bounces, self.radiance);
        self
    }
}

impl DirectLightingIntegrator {
    /// Multi-bounce estimate: direct lighting gathered at every vertex of a
    /// path that keeps scattering off non-emissive surfaces.
    pub fn trace_ray_total_lighting(&self,
                                    scene: &Scene,
                                    ray: &Ray3f,
                                    depth: u32,
                                    rng: &mut dyn RandomSource) -> RGBSpectrum {
        self.trace_ray_total_lighting_record(scene, ray, depth, rng).radiance
    }

    /// `depth` is only checked on entry; the loop is bounded by
    /// `bounce_limit` on its own.
    pub fn trace_ray_total_lighting_record(&self,
                                           scene: &Scene,
                                           ray: &Ray3f,
                                           depth: u32,
                                           rng: &mut dyn RandomSource) -> PathRecord {
        let mut isx = match self.enter(scene, ray, depth) {
            Ok(isx) => isx,
            Err(record) => return record,
        };

        let config = self.config();
        let mut record = PathRecord::active();
        let mut multiplier = RGBSpectrum::white();
        let mut ray = *ray;

        loop {
            record.radiance += multiplier * self.compute_direct_lighting(scene, &ray, &isx, rng);

            if record.bounces >= config.bounce_limit {
                return record.finish(PathState::TerminatedBounceLimit);
            }

            let material = match isx.object() {
                Some(object) => object.material(),
                None => return record.finish(PathState::TerminatedMiss),
            };
            let frame = isx.frame();
            let wo = frame.to_local(&(-ray.dir()));
            let sample = material.sample_and_evaluate_scattered_energy(&isx, &wo, rng);
            if sample.is_degenerate() {
                return record.finish(PathState::TerminatedAbsorbed);
            }

            let wi_world = frame.to_world(&sample.wi);
            let bounced = Ray3f::spawn(isx.p(), isx.normal(), wi_world, config.ray_offset);
            let bounce_isx = scene.intersect(&bounced);
            match bounce_isx.object() {
                None => return record.finish(PathState::TerminatedMiss),
                // Emission here was already picked up by the direct estimate.
                Some(object) if object.is_light() =>
                    return record.finish(PathState::TerminatedLightHit),
                Some(_) => {}
            }

            match config.attenuation {
                BounceAttenuation::Halve => multiplier *= 0.5,
                BounceAttenuation::Throughput => {
                    let cos_theta = sample.wi.z.abs();
                    multiplier *= sample.value * (cos_theta / sample.pdf);
                    if record.bounces + 1 >= config.russian_roulette_start {
                        let q = (1.0 - multiplier.max_component()).max(MIN_RR_PROBABILITY);
                        if q >= 1.0 || rng.next_1d() < q {
                            record.bounces += 1;
                            return record.finish(PathState::TerminatedRussianRoulette);
                        }
                        multiplier = multiplier / (1.0 - q);
                    }
                }
            }

            ray = bounced;
            isx = bounce_isx;
            record.bounces += 1;
        }
    }
}
