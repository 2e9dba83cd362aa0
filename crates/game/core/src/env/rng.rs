//! RNG oracle for deterministic random number generation.
//!
//! Every roll in the simulation (crits, skill triggers, drops, enhancement)
//! is derived from the game seed, the state nonce and a per-roll counter.
//! Because the nonce is part of the saved snapshot, a restored game produces
//! exactly the rolls the original would have.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }

    /// Uniform float in `[0, 1)`.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / (f64::from(u32::MAX) + 1.0)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. Stateless here; each
/// call maps one seed to one output, the caller supplies a fresh seed per roll.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute deterministic seed from game state components.
///
/// # Arguments
///
/// * `game_seed` - Base seed set when the save was created
/// * `nonce` - State sequence number (increments each resolved step)
/// * `stream` - Which subsystem is rolling (see [`RollStream`])
/// * `counter` - Roll index within the same step and stream
pub fn compute_seed(game_seed: u64, nonce: u64, stream: u32, counter: u32) -> u64 {
    // SplitMix64 / FxHash style mixing constants
    let mut hash = game_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (stream as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (counter as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Independent roll streams, so adding a roll in one subsystem does not shift
/// the rolls of another.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollStream {
    PlayerTurn = 1,
    MonsterTurn = 2,
    Drops = 3,
    Spawn = 4,
    Enhancement = 5,
}

/// A sequence of rolls for one step of the simulation.
///
/// Each call consumes one counter value; the same `(seed, nonce, stream)`
/// always yields the same sequence.
pub struct Dice<'a> {
    rng: &'a dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    stream: RollStream,
    counter: u32,
}

impl<'a> Dice<'a> {
    pub fn new(rng: &'a dyn RngOracle, game_seed: u64, nonce: u64, stream: RollStream) -> Self {
        Self {
            rng,
            game_seed,
            nonce,
            stream,
            counter: 0,
        }
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.game_seed, self.nonce, self.stream as u32, self.counter);
        self.counter += 1;
        seed
    }

    /// 1-100 inclusive.
    pub fn d100(&mut self) -> u32 {
        let seed = self.next_seed();
        self.rng.roll_d100(seed)
    }

    /// `true` with `percent` percent probability (`percent` may be fractional).
    pub fn percent(&mut self, percent: f64) -> bool {
        let seed = self.next_seed();
        self.rng.unit(seed) * 100.0 < percent
    }

    /// `true` with probability `chance` in `[0, 1]`.
    pub fn chance(&mut self, chance: f64) -> bool {
        let seed = self.next_seed();
        self.rng.unit(seed) < chance
    }

    /// Uniform integer in `[min, max]`.
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.rng.range(seed, min, max)
    }

    /// Uniform signed integer in `[-spread, spread]`.
    pub fn jitter(&mut self, spread: i32) -> i32 {
        let spread = spread.max(0);
        let span = self.range(0, (spread * 2) as u32) as i32;
        span - spread
    }

    /// Index picked proportionally to `weights`. Returns 0 for all-zero weights.
    pub fn weighted(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return 0;
        }
        let mut roll = self.range(1, total);
        for (index, &weight) in weights.iter().enumerate() {
            if roll <= weight {
                return index;
            }
            roll -= weight;
        }
        weights.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_same_rolls() {
        let rng = PcgRng;
        let mut a = Dice::new(&rng, 42, 7, RollStream::PlayerTurn);
        let mut b = Dice::new(&rng, 42, 7, RollStream::PlayerTurn);
        for _ in 0..16 {
            assert_eq!(a.d100(), b.d100());
        }
    }

    #[test]
    fn streams_are_independent() {
        let rng = PcgRng;
        let mut a = Dice::new(&rng, 42, 7, RollStream::PlayerTurn);
        let mut b = Dice::new(&rng, 42, 7, RollStream::Drops);
        let rolls_a: Vec<u32> = (0..8).map(|_| a.range(0, 1_000_000)).collect();
        let rolls_b: Vec<u32> = (0..8).map(|_| b.range(0, 1_000_000)).collect();
        assert_ne!(rolls_a, rolls_b);
    }

    #[test]
    fn rolls_stay_in_bounds() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 1, 1, RollStream::Spawn);
        for _ in 0..500 {
            let d = dice.d100();
            assert!((1..=100).contains(&d));
            let j = dice.jitter(3);
            assert!((-3..=3).contains(&j));
            let r = dice.range(2, 5);
            assert!((2..=5).contains(&r));
        }
    }

    #[test]
    fn weighted_skips_zero_weights() {
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 9, 3, RollStream::Drops);
        for _ in 0..200 {
            assert_eq!(dice.weighted(&[0, 5, 0]), 1);
        }
        assert_eq!(dice.weighted(&[0, 0]), 0);
    }
}
