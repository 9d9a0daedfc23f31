//! SplitMix64 PRNG driving the download simulation
//!
//! Progress increments and speed labels are pseudo-random. Seeding the
//! generator makes a whole download replay identically, which is how the
//! session tests pin down tick sequences.

use super::traits::RandomSource;

/// SplitMix64 PRNG state
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seeded from the wall clock
    pub fn from_entropy() -> Self {
        Self::new(super::utils::entropy_seed())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

impl RandomSource for SplitMix64 {
    /// Upper 53 bits mapped to [0, 1)
    fn next_f64(&mut self) -> f64 {
        let mantissa = self.next_u64() >> 11;
        (mantissa as f64) * (1.0 / ((1u64 << 53) as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = SplitMix64::new(42);
        let mut b = SplitMix64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_range_helper() {
        let mut rng = SplitMix64::new(7);
        for _ in 0..1000 {
            let v = rng.next_range(1.0, 6.0);
            assert!((1.0..6.0).contains(&v), "{} out of range", v);
        }
    }
}
