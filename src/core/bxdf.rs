// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BxDFType(u8);

impl BxDFType {
    pub const NONE: Self = Self(0);
    pub const REFLECTION: Self = Self(1 << 0);
    pub const TRANSMISSION: Self = Self(1 << 1);
    pub const DIFFUSE: Self = Self(1 << 2);
    pub const GLOSSY: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for BxDFType {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

// Definitions of types used in BxDF sampling and eval
// processes. All directions live in the local shading frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BxDFSample {
    pub value: RGBSpectrum,
    pub wi: Vector3f,
    pub pdf: Float,
}

impl Default for BxDFSample {
    fn default() -> Self {
        Self {
            value: RGBSpectrum::default(),
            wi: Vector3f::zeros(),
            pdf: 0.0,
        }
    }
}

impl BxDFSample {
    pub fn new(value: RGBSpectrum, wi: Vector3f, pdf: Float) -> Self {
        Self { value, wi, pdf }
    }

    /// A sample that cannot carry energy: no density or no value.
    pub fn is_degenerate(&self) -> bool {
        !(self.pdf > 0.0) || self.value.is_black()
    }
}

/// One scattering lobe. Stateless, so a single instance is shared by every
/// material and thread that uses it.
pub trait BxDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn bxdf_type(&self) -> BxDFType;
    fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> RGBSpectrum;
    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float;
    /// Importance-samples an incoming direction, `None` when the lobe
    /// cannot produce one for this `wo` (grazing or wrong side).
    fn sample(&self, wo: &Vector3f, u: &Vector2f) -> Option<Vector3f>;

    fn sample_and_eval(&self, wo: &Vector3f, u: &Vector2f) -> BxDFSample {
        match self.sample(wo, u) {
            Some(wi) => BxDFSample::new(self.eval(wo, &wi), wi, self.pdf(wo, &wi)),
            None => BxDFSample::default(),
        }
    }
}
