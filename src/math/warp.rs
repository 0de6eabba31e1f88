// Copyright @yucwang 2023

use super::constants::{ INV_PI, PI, Float, Vector2f, Vector3f };

/// Polar mapping of the unit square onto the unit disk: `r = sqrt(u.x)`,
/// `theta = 2 pi u.y`.
pub fn square_to_disk_polar(u: &Vector2f) -> Vector2f {
    let r = u.x.max(0.0).sqrt();
    let theta = 2.0 * PI * u.y;
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vector2f::new(r * cos_theta, r * sin_theta)
}

pub fn square_to_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector2f::new(r * cos_phi, r * sin_phi)
}

pub fn square_to_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = square_to_disk_concentric(u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    Vector3f::new(p.x, p.y, z)
}

pub fn square_to_cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta.abs() * INV_PI
}

pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::ONE_MINUS_EPSILON;

    fn grid() -> Vec<Vector2f> {
        let values = [0.0, 0.25, 0.5, 0.75, ONE_MINUS_EPSILON];
        let mut samples = Vec::new();
        for x in values.iter() {
            for y in values.iter() {
                samples.push(Vector2f::new(*x, *y));
            }
        }
        samples
    }

    #[test]
    fn test_disk_samples_stay_in_unit_disk() {
        for u in grid() {
            assert!(square_to_disk_polar(&u).norm() <= 1.0 + 1e-6);
            assert!(square_to_disk_concentric(&u).norm() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_cosine_hemisphere_is_upper_and_unit() {
        for u in grid() {
            let w = square_to_cosine_hemisphere(&u);
            assert!(w.z >= 0.0);
            assert!((w.norm() - 1.0).abs() < 1e-4);
        }
        assert!((square_to_cosine_hemisphere_pdf(1.0) - INV_PI).abs() < 1e-6);
    }
}
