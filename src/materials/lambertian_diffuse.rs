// Copyright @yucwang 2023

use crate::core::bxdf::{ BxDF, BxDFType };
use crate::math::constants::{ Float, INV_PI, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ same_hemisphere, square_to_cosine_hemisphere, square_to_cosine_hemisphere_pdf };

/// Ideal diffuse reflection, `R / pi` on the side of `wo`.
pub struct LambertBxDF {
    reflectance: RGBSpectrum,
}

impl Default for LambertBxDF {
    fn default() -> Self {
        Self { reflectance: RGBSpectrum::white() }
    }
}

impl LambertBxDF {
    pub fn new(reflectance: RGBSpectrum) -> Self {
        Self { reflectance }
    }
}

impl BxDF for LambertBxDF {
    fn bxdf_type(&self) -> BxDFType {
        BxDFType::REFLECTION | BxDFType::DIFFUSE
    }

    fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> RGBSpectrum {
        if !same_hemisphere(wo, wi) {
            return RGBSpectrum::black();
        }
        self.reflectance * INV_PI
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        square_to_cosine_hemisphere_pdf(wi.z)
    }

    fn sample(&self, wo: &Vector3f, u: &Vector2f) -> Option<Vector3f> {
        if wo.z == 0.0 {
            return None;
        }
        let mut wi = square_to_cosine_hemisphere(u);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        Some(wi)
    }
}
