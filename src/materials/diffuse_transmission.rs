// Copyright @yucwang 2026

use crate::core::bxdf::{ BxDF, BxDFType };
use crate::math::constants::{ Float, INV_PI, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ same_hemisphere, square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf };

/// Lambertian transmission: scatters into the hemisphere opposite `wo`.
pub struct DiffuseTransmissionBxDF {
    transmittance: RGBSpectrum,
}

impl Default for DiffuseTransmissionBxDF {
    fn default() -> Self {
        Self { transmittance: RGBSpectrum::white() }
    }
}

impl DiffuseTransmissionBxDF {
    pub fn new(transmittance: RGBSpectrum) -> Self {
        Self { transmittance }
    }
}

impl BxDF for DiffuseTransmissionBxDF {
    fn bxdf_type(&self) -> BxDFType {
        BxDFType::TRANSMISSION | BxDFType::DIFFUSE
    }

    fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> RGBSpectrum {
        if same_hemisphere(wo, wi) || wi.z == 0.0 {
            return RGBSpectrum::black();
        }
        self.transmittance * INV_PI
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if same_hemisphere(wo, wi) || wi.z == 0.0 {
            return 0.0;
        }
        square_to_cosine_hemisphere_pdf(wi.z)
    }

    fn sample(&self, wo: &Vector3f, u: &Vector2f) -> Option<Vector3f> {
        if wo.z == 0.0 {
            return None;
        }
        let mut wi = square_to_cosine_hemisphere(u);
        if wo.z > 0.0 {
            wi.z *= -1.0;
        }
        Some(wi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmission_crosses_surface() {
        let bxdf = DiffuseTransmissionBxDF::new(RGBSpectrum::splat(0.5));
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        let sample = bxdf.sample_and_eval(&wo, &Vector2f::new(0.25, 0.75));
        assert!(sample.wi.z < 0.0);
        assert!(!sample.is_degenerate());
        let weight = sample.value * (sample.wi.z.abs() / sample.pdf);
        assert!((weight[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_transmission_ignores_reflection_side() {
        let bxdf = DiffuseTransmissionBxDF::default();
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        assert!(bxdf.eval(&wo, &wi).is_black());
        assert_eq!(bxdf.pdf(&wo, &wi), 0.0);
        assert!(bxdf.bxdf_type().contains(BxDFType::TRANSMISSION));
    }
}
