// src/mimc.rs
//
// Native MiMC3 digest: binds (seed, seed_rand) to one public field element.
//
//   x_0     = seed + iv
//   x_{i+1} = (x_i + seed_rand + c_i)^e      for i in 0..rounds
//   digest  = x_rounds + seed_rand + seed
//
// c_0 = 0, the remaining constants and iv are derived from blake3 so that
// every party rebuilds the same schedule from (field, rounds) alone.

use ark_ff::{BigInteger, PrimeField};

use crate::error::{Result, ZkError};

/// Round count shared by every atomic_swap_vc circuit.
pub const ZKP_MIMC_COUNT: usize = 1024;

const ROUND_CONSTANT_TAG: &[u8] = b"atomic_swap_vc.mimc3.round";
const IV_TAG: &[u8] = b"atomic_swap_vc.mimc3.iv";

/// Odd primes tried, in order, as the MiMC exponent.
const EXPONENT_CANDIDATES: [u64; 10] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MimcParams<F: PrimeField> {
    exponent: u64,
    iv: F,
    round_constants: Vec<F>,
}

impl<F: PrimeField> MimcParams<F> {
    pub fn new(rounds: usize) -> Result<Self> {
        if rounds == 0 {
            return Err(ZkError::InvalidShape("MiMC needs at least one round".into()));
        }
        let exponent = permutation_exponent::<F>()?;

        let mut round_constants = Vec::with_capacity(rounds);
        round_constants.push(F::zero());
        for i in 1..rounds {
            let mut h = blake3::Hasher::new();
            h.update(ROUND_CONSTANT_TAG);
            h.update(&(i as u64).to_le_bytes());
            round_constants.push(F::from_le_bytes_mod_order(h.finalize().as_bytes()));
        }

        let iv = F::from_le_bytes_mod_order(blake3::hash(IV_TAG).as_bytes());

        Ok(Self {
            exponent,
            iv,
            round_constants,
        })
    }

    pub fn rounds(&self) -> usize {
        self.round_constants.len()
    }

    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    /// Fixed auxiliary third input of the digest.
    pub fn iv(&self) -> F {
        self.iv
    }

    pub fn round_constants(&self) -> &[F] {
        &self.round_constants
    }

    /// Feed every parameter into `hasher` in a fixed order.
    pub(crate) fn absorb_into(&self, hasher: &mut blake3::Hasher) {
        hasher.update(&self.exponent.to_le_bytes());
        hasher.update(&(self.rounds() as u64).to_le_bytes());
        hasher.update(&self.iv.into_bigint().to_bytes_le());
        for c in &self.round_constants {
            hasher.update(&c.into_bigint().to_bytes_le());
        }
    }
}

/// MiMC3(seed, seed_rand) under `params`.
pub fn mimc3<F: PrimeField>(params: &MimcParams<F>, seed: &F, seed_rand: &F) -> F {
    let mut x = *seed + params.iv;
    for c in &params.round_constants {
        x = (x + seed_rand + c).pow([params.exponent]);
    }
    x + seed_rand + seed
}

/// Smallest candidate e with gcd(e, p - 1) = 1, i.e. x -> x^e permutes F.
fn permutation_exponent<F: PrimeField>() -> Result<u64> {
    let modulus = F::MODULUS;
    EXPONENT_CANDIDATES
        .iter()
        .copied()
        .find(|&e| {
            // candidates are prime, so coprime <=> e does not divide p - 1
            let p_mod_e = mod_small(modulus.as_ref(), e);
            (p_mod_e + e - 1) % e != 0
        })
        .ok_or_else(|| {
            ZkError::InvalidShape("no small MiMC exponent is coprime with p - 1".into())
        })
}

/// Little-endian limbs reduced modulo a small integer.
fn mod_small(limbs: &[u64], m: u64) -> u64 {
    limbs.iter().rev().fold(0u128, |rem, &limb| {
        ((rem << 64) | limb as u128) % m as u128
    }) as u64
}
