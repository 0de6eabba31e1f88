// Copyright @yucwang 2026

use crate::math::constants::{ Float, INV_TWO_PI, PI, Vector2f, Vector3f };

/// Normalized Blinn distribution `D(h) = (e + 2) / (2 pi) cos^e(theta_h)`.
pub fn blinn_d(cos_theta_h: Float, exponent: Float) -> Float {
    if cos_theta_h <= 0.0 {
        return 0.0;
    }
    (exponent + 2.0) * INV_TWO_PI * cos_theta_h.powf(exponent)
}

/// Density of a half vector drawn by `sample_blinn`, in solid angle around `h`.
pub fn blinn_pdf_h(cos_theta_h: Float, exponent: Float) -> Float {
    if cos_theta_h <= 0.0 {
        return 0.0;
    }
    (exponent + 1.0) * INV_TWO_PI * cos_theta_h.powf(exponent)
}

/// Half vector about +z with `cos(theta) = u.x^(1 / (e + 1))`.
pub fn sample_blinn(u: &Vector2f, exponent: Float) -> Vector3f {
    let cos_theta = u.x.max(0.0).powf(1.0 / (exponent + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vector3f::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/// Torrance-Sparrow V-cavity shadowing-masking term.
pub fn torrance_sparrow_g(wo: &Vector3f, wi: &Vector3f, h: &Vector3f) -> Float {
    let wo_dot_h = wo.dot(h).abs();
    if wo_dot_h <= 0.0 {
        return 0.0;
    }
    let n_dot_h = h.z.abs();
    let masking = 2.0 * n_dot_h * wo.z.abs() / wo_dot_h;
    let shadowing = 2.0 * n_dot_h * wi.z.abs() / wo_dot_h;
    masking.min(shadowing).min(1.0)
}

pub fn reflect(wo: &Vector3f, h: &Vector3f) -> Vector3f {
    2.0 * wo.dot(h) * h - wo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blinn_sample_is_unit_upper_hemisphere() {
        for &(a, b) in &[(0.0, 0.0), (0.3, 0.8), (0.9, 0.1)] {
            let h = sample_blinn(&Vector2f::new(a, b), 20.0);
            assert!((h.norm() - 1.0).abs() < 1e-5);
            assert!(h.z >= 0.0);
        }
    }

    #[test]
    fn test_reflect_about_normal() {
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let wi = reflect(&wo, &Vector3f::z());
        assert!((wi - Vector3f::new(-0.6, 0.0, 0.8)).norm() < 1e-6);
    }

    #[test]
    fn test_geometry_term_is_one_at_normal_incidence() {
        let z = Vector3f::z();
        assert!((torrance_sparrow_g(&z, &z, &z) - 1.0).abs() < 1e-6);
    }
}
