//! Seedable random sources.
//!
//! Small and dependency-free on purpose: every stochastic decision in an entity goes through a
//! [`DeterministicRng`] that tests can construct from a fixed seed. Not cryptographic.

pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform sample in `[0, 1)` with 24 bits of precision.
    fn next_f32_unit(&mut self) -> f32 {
        let x = self.next_u32() >> 8;
        (x as f32) / ((1u32 << 24) as f32)
    }

    /// Draw an index from a categorical distribution.
    ///
    /// `weights` need not be normalized. Non-positive and non-finite weights are never drawn.
    /// Returns `None` when no weight is positive.
    fn pick_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let usable = |w: f32| w.is_finite() && w > 0.0;
        let total: f32 = weights.iter().copied().filter(|w| usable(*w)).sum();
        if total <= 0.0 {
            return None;
        }

        let target = self.next_f32_unit() * total;
        let mut acc = 0.0f32;
        let mut last = None;
        for (i, w) in weights.iter().copied().enumerate() {
            if !usable(w) {
                continue;
            }
            acc += w;
            last = Some(i);
            if target < acc {
                return Some(i);
            }
        }

        // Float accumulation can leave `acc` a hair below `total`.
        last
    }
}

impl<R: DeterministicRng + ?Sized> DeterministicRng for Box<R> {
    fn next_u64(&mut self) -> u64 {
        (**self).next_u64()
    }
}

/// SplitMix64: tiny, fast, and good enough for gameplay sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Independent stream for one agent, derived from a world seed.
    pub fn for_agent(global_seed: u64, agent_id: u64, stream: u64) -> Self {
        Self::new(derive_seed(global_seed, agent_id, stream))
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        mix64(self.state)
    }
}

/// Weyl increment of SplitMix64 (2^64 divided by the golden ratio).
const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer: a bijective avalanche of `x`.
///
/// Nearby inputs map to unrelated outputs, which makes it suitable for turning small ids and tick
/// numbers into seeds.
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Seed for one agent's `stream` under a world seed.
///
/// Each part is mixed before combining, so swapping `agent_id` and `stream` gives a different
/// seed and agent `0` does not collapse onto the world seed.
pub fn derive_seed(global_seed: u64, agent_id: u64, stream: u64) -> u64 {
    mix64(global_seed ^ mix64(agent_id.wrapping_add(GOLDEN_GAMMA)) ^ mix64(stream))
}
