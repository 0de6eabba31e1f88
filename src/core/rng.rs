// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, ONE_MINUS_EPSILON};

/// Source of independent uniform numbers in [0, 1). Every sampling call
/// takes one explicitly, so an estimate depends only on its inputs and the
/// stream it is handed.
pub trait RandomSource {
    fn next_1d(&mut self) -> Float;

    fn next_2d(&mut self) -> Vector2f {
        let x = self.next_1d();
        let y = self.next_1d();
        Vector2f::new(x, y)
    }

    /// Uniform index in `0..count`. `count` must be non-zero.
    fn next_index(&mut self, count: usize) -> usize {
        assert!(count > 0, "cannot pick an index out of an empty range");
        let idx = (self.next_1d() * count as Float) as usize;
        idx.min(count - 1)
    }
}

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    pub fn next_f32(&mut self) -> Float {
        // 24 bits fit the mantissa exactly, so the result never rounds up to 1.
        ((self.next_u32() >> 8) as Float) * (1.0 / 16777216.0)
    }
}

impl RandomSource for LcgRng {
    fn next_1d(&mut self) -> Float {
        self.next_f32()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
pub struct SequenceRng {
    values: Vec<Float>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<Float>) -> Self {
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        let values = values.into_iter().map(|v| v.max(0.0).min(ONE_MINUS_EPSILON)).collect();
        Self { values, cursor: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRng {
    fn next_1d(&mut self) -> Float {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

/// Per-pixel seed, so every pixel owns an independent stream regardless of
/// which worker renders it.
pub fn pixel_seed(seed: u64, x: usize, y: usize) -> u64 {
    ((seed & 0xFFF) << 32) | (((y as u64) & 0xFFFF) << 16) | ((x as u64) & 0xFFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_range() {
        let mut rng = LcgRng::new(7);
        for _ in 0..10000 {
            let v = rng.next_1d();
            assert!(v >= 0.0 && v < 1.0);
        }
    }

    #[test]
    fn test_lcg_is_reproducible() {
        let mut a = LcgRng::new(pixel_seed(3, 10, 20));
        let mut b = LcgRng::new(pixel_seed(3, 10, 20));
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_sequence_wraps_and_clamps() {
        let mut rng = SequenceRng::new(vec![0.25, 1.0]);
        assert_eq!(rng.next_1d(), 0.25);
        assert!(rng.next_1d() < 1.0);
        assert_eq!(rng.next_1d(), 0.25);
        assert_eq!(rng.consumed(), 3);
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = SequenceRng::new(vec![0.0, 0.5, 0.999999]);
        assert_eq!(rng.next_index(4), 0);
        assert_eq!(rng.next_index(4), 2);
        assert_eq!(rng.next_index(4), 3);
    }
}
