//! Randomness is never ambient here: every stochastic call takes an rng, so a run seeded with
//! [WyRng::seeded] is reproducible end to end.

use crate::mutate::MutationKind;
use rand::{Rng, RngCore, SeedableRng};
use std::{
    fs::File,
    io::{self, Read},
};

/// Scale a probability in `[0, 1]` onto the full `u64` range, so that rolling it costs one
/// `next_u64`. Out of range values saturate
pub fn chance(p: f64) -> u64 {
    if p.is_nan() || p <= 0. {
        0
    } else if p >= 1. {
        u64::MAX
    } else {
        (p * u64::MAX as f64) as u64
    }
}

/// Something that knows how likely every [MutationKind] is, as a [chance] threshold
pub trait Probabilities {
    fn probability(&self, kind: MutationKind) -> u64;
}

pub trait Happens: RngCore {
    /// Roll against a [chance] threshold
    fn happens(&mut self, threshold: u64) -> bool {
        threshold > self.next_u64()
    }
}

impl<T: RngCore + ?Sized> Happens for T {}

/// A uniform draw from `[-1, 1]`, used for fresh weights, biases and perturbations
#[inline]
pub fn signed_unit(rng: &mut impl Rng) -> f64 {
    rng.random_range(-1.0..=1.0)
}

/// A fair coin, true meaning "take the left one"
#[inline]
pub fn coin(rng: &mut impl Rng) -> bool {
    rng.random_bool(0.5)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::seeded(state)
    }
}

pub fn seed_urandom() -> io::Result<u64> {
    let mut file = File::open("/dev/urandom")?;
    let mut buffer = [0u8; 8];
    file.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

/// An unseeded rng for when reproducibility doesn't matter. Falls back to the thread rng for a
/// seed on platforms without `/dev/urandom`
pub fn default_rng() -> WyRng {
    WyRng::seeded(seed_urandom().unwrap_or_else(|_| rand::random()))
}

#[cfg(test)]
mod test {
    use super::*;
    use core::iter::once;
    use rand::rngs::ThreadRng;

    fn assert_within_deviation(p: f64, range: f64, rng: &mut impl RngCore) {
        let samples = 10_000.;
        let expected = p * samples;
        let max_deviation = expected * range;
        let threshold = chance(p);
        for _ in 0..100 {
            let incidence = once(())
                .cycle()
                .take(samples as usize)
                .filter(|()| rng.happens(threshold))
                .count() as f64;
            assert!(
                (expected - incidence).abs() < max_deviation,
                "{p}: {incidence} != {expected} ± {max_deviation}"
            );
        }
    }

    // controll test - we are confident that rand generates good random numbers
    #[test]
    fn test_deviation_rand() {
        let mut rng = ThreadRng::default();
        for p in [0.02, 0.05, 0.1, 0.2, 0.5, 0.8] {
            assert_within_deviation(p, 0.33, &mut rng);
        }
    }

    #[test]
    fn test_deviation_wyrand() {
        let mut rng = WyRng::seeded(seed_urandom().unwrap());
        for p in [0.02, 0.05, 0.1, 0.2, 0.5, 0.8] {
            assert_within_deviation(p, 0.33, &mut rng);
        }
    }

    #[test]
    fn test_chance_bounds() {
        let mut rng = WyRng::seeded(7);
        for _ in 0..10_000 {
            assert!(!rng.happens(chance(0.)));
            assert!(!rng.happens(chance(-3.)));
            assert!(!rng.happens(chance(f64::NAN)));
            assert!(rng.happens(chance(1.)));
        }
        assert_eq!(chance(2.), u64::MAX);
        assert!(chance(0.5).abs_diff(u64::MAX / 2) < u64::MAX / 1000);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut l = WyRng::seeded(42);
        let mut r = WyRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert_eq!(l.next_u64(), r.next_u64());
        }

        let mut other = WyRng::from_seed(43u64.to_le_bytes());
        assert_ne!(WyRng::seeded(42).next_u64(), other.next_u64());
    }

    #[test]
    fn test_fill_bytes() {
        let mut rng = WyRng::seeded(1);
        let expected = {
            let mut twin = WyRng::seeded(1);
            let mut v = twin.next_u64().to_le_bytes().to_vec();
            v.extend_from_slice(&twin.next_u64().to_le_bytes()[..3]);
            v
        };

        let mut dst = [0u8; 11];
        rng.fill_bytes(&mut dst);
        assert_eq!(&dst[..], &expected[..]);

        rng.fill_bytes(&mut []);
    }

    #[test]
    fn test_signed_unit_range() {
        let mut rng = WyRng::seeded(3);
        for _ in 0..10_000 {
            let v = signed_unit(&mut rng);
            assert!((-1. ..=1.).contains(&v), "{v} out of range");
        }
    }
}
