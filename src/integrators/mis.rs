// Copyright @yucwang 2026

use crate::math::constants::Float;

/// Power heuristic with exponent 2: weight of the strategy with density
/// `pdf_a` when combined with one of density `pdf_b`.
pub fn power_heuristic(pdf_a: Float, pdf_b: Float) -> Float {
    let a2 = pdf_a * pdf_a;
    let b2 = pdf_b * pdf_b;
    if a2 + b2 == 0.0 {
        return 0.0;
    }
    a2 / (a2 + b2)
}

#[cfg(test)]
mod tests {
    use super::power_heuristic;

    #[test]
    fn test_weights_sum_to_one() {
        let pairs = [(0.5, 0.5), (1e-3, 4.0), (2.5, 0.01), (1.27, 0.28), (100.0, 3.0)];
        for &(light_pdf, bxdf_pdf) in &pairs {
            let w_light = power_heuristic(light_pdf, bxdf_pdf);
            let w_bxdf = power_heuristic(bxdf_pdf, light_pdf);
            assert!((w_light + w_bxdf - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_dominant_strategy_takes_the_weight() {
        assert!(power_heuristic(10.0, 0.1) > 0.99);
        assert!(power_heuristic(0.1, 10.0) < 0.01);
        assert_eq!(power_heuristic(0.0, 0.0), 0.0);
    }
}
