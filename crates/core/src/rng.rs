//! RNG module - explicit, seeded randomness for puzzle generation
//!
//! The engine never touches ambient entropy: every random draw comes from a
//! [`SimpleRng`] the caller seeded. Same seed, same puzzles.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Maps through the high bits (multiply-shift): the low bits of an LCG
    /// with a power-of-two modulus cycle with short periods, so `% max` would
    /// e.g. alternate strictly between 0 and 1 for `max = 2`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Generate random index in range [0, max)
    pub fn next_usize(&mut self, max: usize) -> usize {
        let bounded = max.min(u32::MAX as usize) as u32;
        self.next_range(bounded) as usize
    }

    /// Current internal state (the seed that would reproduce what follows).
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
