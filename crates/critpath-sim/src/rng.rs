use serde::{Deserialize, Serialize};

/// Small seeded PCG-style generator.
///
/// Reproducible across platforms; one instance drives a whole suite so
/// datasets depend on their position in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    #[must_use]
    pub const fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // Output permutation: the low bits of a plain LCG cycle quickly.
        let x = self.state;
        (x ^ (x >> 33)).wrapping_mul(0xFF51_AFD7_ED55_8CCD) ^ (x >> 29)
    }

    /// Value in `[0, upper_exclusive)`; 0 when the bound is 0.
    #[must_use]
    pub const fn next_bounded(&mut self, upper_exclusive: u64) -> u64 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u64() % upper_exclusive
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Bernoulli trial with probability `p` (clamped to `[0, 1]`).
    #[must_use]
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_f64() < p
    }

    /// Uniform integer in `lo..=hi`.
    #[must_use]
    pub const fn next_in_range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        #[allow(clippy::cast_possible_truncation)]
        let offset = self.next_bounded(span) as u32;
        lo + offset
    }
}
