// Copyright @yucwang 2026

use crate::core::bxdf::{ BxDF, BxDFType };
use crate::materials::microfacet::{ blinn_d, blinn_pdf_h, reflect, sample_blinn, torrance_sparrow_g };
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::same_hemisphere;

/// Glossy reflection from a Blinn microfacet distribution. Larger exponents
/// give tighter highlights.
pub struct BlinnMicrofacetBxDF {
    exponent: Float,
    reflectance: RGBSpectrum,
}

impl BlinnMicrofacetBxDF {
    pub fn new(exponent: Float, reflectance: RGBSpectrum) -> Self {
        assert!(exponent >= 0.0, "Blinn exponent must be non-negative");
        Self { exponent, reflectance }
    }

    pub fn exponent(&self) -> Float {
        self.exponent
    }

    // Half vector between `wo` and `wi`, flipped to +z.
    fn half_vector(wo: &Vector3f, wi: &Vector3f) -> Option<Vector3f> {
        let h = wo + wi;
        if h.norm_squared() == 0.0 {
            return None;
        }
        let h = h.normalize();
        Some(if h.z < 0.0 { -h } else { h })
    }
}

impl BxDF for BlinnMicrofacetBxDF {
    fn bxdf_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::GLOSSY
    }

    fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> RGBSpectrum {
        let cos_o = wo.z.abs();
        let cos_i = wi.z.abs();
        if !same_hemisphere(wo, wi) || cos_o == 0.0 || cos_i == 0.0 {
            return RGBSpectrum::black();
        }
        let h = match Self::half_vector(wo, wi) {
            Some(h) => h,
            None => return RGBSpectrum::black(),
        };

        let d = blinn_d(h.z, self.exponent);
        let g = torrance_sparrow_g(wo, wi, &h);
        self.reflectance * (d * g / (4.0 * cos_o * cos_i))
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let h = match Self::half_vector(wo, wi) {
            Some(h) => h,
            None => return 0.0,
        };
        let wo_dot_h = wo.dot(&h).abs();
        if wo_dot_h == 0.0 {
            return 0.0;
        }
        blinn_pdf_h(h.z, self.exponent) / (4.0 * wo_dot_h)
    }

    fn sample(&self, wo: &Vector3f, u: &Vector2f) -> Option<Vector3f> {
        if wo.z == 0.0 {
            return None;
        }
        let mut h = sample_blinn(u, self.exponent);
        if wo.z < 0.0 {
            h = -h;
        }
        let wi = reflect(wo, &h);
        if !same_hemisphere(wo, &wi) {
            return None;
        }
        Some(wi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampled_pdf_matches_pdf_query() {
        let bxdf = BlinnMicrofacetBxDF::new(30.0, RGBSpectrum::white());
        let wo = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let sample = bxdf.sample_and_eval(&wo, &Vector2f::new(0.4, 0.35));
        assert!(!sample.is_degenerate());
        assert!(sample.wi.z > 0.0);
        assert!((sample.pdf - bxdf.pdf(&wo, &sample.wi)).abs() < 1e-3 * sample.pdf.max(1.0));
    }

    #[test]
    fn test_eval_is_reciprocal() {
        let bxdf = BlinnMicrofacetBxDF::new(12.0, RGBSpectrum::splat(0.7));
        let wo = Vector3f::new(0.2, 0.1, 0.95).normalize();
        let wi = Vector3f::new(-0.3, 0.05, 0.9).normalize();
        let a = bxdf.eval(&wo, &wi);
        let b = bxdf.eval(&wi, &wo);
        assert!((a[0] - b[0]).abs() < 1e-5);
        assert!(a[0] > 0.0);
    }

    #[test]
    fn test_no_transmission() {
        let bxdf = BlinnMicrofacetBxDF::new(12.0, RGBSpectrum::white());
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.0, 0.6, -0.8);
        assert!(bxdf.eval(&wo, &wi).is_black());
        assert_eq!(bxdf.pdf(&wo, &wi), 0.0);
    }
}
