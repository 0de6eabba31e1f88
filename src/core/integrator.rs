// Copyright @yucwang 2026

use crate::core::rng::RandomSource;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::Vector2f;
use crate::math::spectrum::RGBSpectrum;

pub trait Integrator: Sync {
    /// One radiance sample for the pixel at integer coordinates `pixel`.
    fn trace_ray_forward(&self,
                         scene: &Scene,
                         sensor: &dyn Sensor,
                         pixel: Vector2f,
                         rng: &mut dyn RandomSource) -> RGBSpectrum;
    fn samples_per_pixel(&self) -> u32;
}
