// src/config.rs
//
// Circuit shape: the constants prover and verifier must agree on bit for bit.

use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{Result, ZkError};
use crate::mimc::{MimcParams, ZKP_MIMC_COUNT, mimc3};

const CIRCUIT_ID_TAG: &[u8] = b"atomic_swap_vc.circuit";

/// Shape of one atomic_swap_vc circuit instance.
///
/// `weights` selects the bilinear form enforced over `(o, w)`:
/// empty means the plain dot product, otherwise `Σ weights[i]·o[i]·w[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircuitShape {
    pub vector_len: usize,
    #[serde(default = "default_mimc_rounds")]
    pub mimc_rounds: usize,
    #[serde(default)]
    pub weights: Vec<u64>,
}

fn default_mimc_rounds() -> usize {
    ZKP_MIMC_COUNT
}

impl CircuitShape {
    /// Plain dot product over `vector_len` elements, 1024 MiMC rounds.
    pub fn new(vector_len: usize) -> Self {
        Self {
            vector_len,
            mimc_rounds: ZKP_MIMC_COUNT,
            weights: Vec::new(),
        }
    }

    pub fn with_weights(mut self, weights: Vec<u64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_mimc_rounds(mut self, rounds: usize) -> Self {
        self.mimc_rounds = rounds;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let shape: Self = serde_json::from_str(json)?;
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vector_len == 0 {
            return Err(ZkError::InvalidShape("vector_len must be positive".into()));
        }
        if self.mimc_rounds == 0 || self.mimc_rounds > ZKP_MIMC_COUNT {
            return Err(ZkError::InvalidShape(format!(
                "mimc_rounds must be in 1..={ZKP_MIMC_COUNT}, got {}",
                self.mimc_rounds
            )));
        }
        if !self.weights.is_empty() && self.weights.len() != self.vector_len {
            return Err(ZkError::InvalidShape(format!(
                "{} weights for vectors of length {}",
                self.weights.len(),
                self.vector_len
            )));
        }
        Ok(())
    }

    /// Same circuit, treating explicit all-ones weights as the plain dot product.
    pub fn compatible_with(&self, other: &CircuitShape) -> bool {
        self.vector_len == other.vector_len
            && self.mimc_rounds == other.mimc_rounds
            && self.effective_weights() == other.effective_weights()
    }

    fn effective_weights(&self) -> Vec<u64> {
        if self.weights.is_empty() {
            vec![1; self.vector_len]
        } else {
            self.weights.clone()
        }
    }

    /// o ‖ w ‖ digest ‖ inner_product
    pub fn public_input_count(&self) -> usize {
        2 * self.vector_len + 2
    }

    pub(crate) fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        (self.vector_len as u64).serialize_compressed(&mut writer)?;
        (self.mimc_rounds as u64).serialize_compressed(&mut writer)?;
        self.weights.serialize_compressed(&mut writer)?;
        Ok(())
    }

    pub(crate) fn read<R: Read>(mut reader: R) -> Result<Self> {
        let vector_len = read_usize(&mut reader, "vector_len")?;
        let mimc_rounds = read_usize(&mut reader, "mimc_rounds")?;
        let weights = Vec::<u64>::deserialize_compressed(&mut reader)?;
        let shape = Self {
            vector_len,
            mimc_rounds,
            weights,
        };
        shape.validate()?;
        Ok(shape)
    }
}

fn read_usize<R: Read>(reader: R, field: &str) -> Result<usize> {
    let raw = u64::deserialize_compressed(reader)?;
    usize::try_from(raw).map_err(|_| ZkError::InvalidShape(format!("{field} {raw} does not fit")))
}

/// Everything a shape expands to over a concrete field.
#[derive(Clone, Debug)]
pub struct CircuitParams<F: PrimeField> {
    shape: CircuitShape,
    mimc: MimcParams<F>,
    weights: Vec<F>,
    circuit_id: [u8; 32],
}

impl<F: PrimeField> CircuitParams<F> {
    pub fn new(shape: CircuitShape) -> Result<Self> {
        shape.validate()?;
        let mimc = MimcParams::new(shape.mimc_rounds)?;
        let weights: Vec<F> = if shape.weights.is_empty() {
            vec![F::one(); shape.vector_len]
        } else {
            shape.weights.iter().map(|&l| F::from(l)).collect()
        };

        let mut h = blake3::Hasher::new();
        h.update(CIRCUIT_ID_TAG);
        h.update(&(shape.vector_len as u64).to_le_bytes());
        for l in &weights {
            h.update(&l.into_bigint().to_bytes_le());
        }
        mimc.absorb_into(&mut h);
        let circuit_id = *h.finalize().as_bytes();

        Ok(Self {
            shape,
            mimc,
            weights,
            circuit_id,
        })
    }

    pub fn shape(&self) -> &CircuitShape {
        &self.shape
    }

    pub fn vector_len(&self) -> usize {
        self.shape.vector_len
    }

    pub fn mimc(&self) -> &MimcParams<F> {
        &self.mimc
    }

    pub fn weights(&self) -> &[F] {
        &self.weights
    }

    /// blake3 fingerprint of the shape and its MiMC schedule.
    pub fn circuit_id(&self) -> [u8; 32] {
        self.circuit_id
    }

    pub fn circuit_id_hex(&self) -> String {
        hex::encode(&self.circuit_id[..8])
    }

    pub fn digest(&self, seed: &F, seed_rand: &F) -> F {
        mimc3(&self.mimc, seed, seed_rand)
    }

    /// Σ λ_i·o_i·w_i. Callers check lengths first.
    pub fn inner_product(&self, o: &[F], w: &[F]) -> F {
        o.iter()
            .zip(w)
            .zip(&self.weights)
            .fold(F::zero(), |acc, ((oi, wi), l)| acc + *oi * wi * l)
    }
}
