// src/proof.rs

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use std::fmt;

use crate::DefaultBackend;
use crate::backend::SnarkBackend;
use crate::config::CircuitShape;
use crate::error::Result;

/// Opaque succinct proof plus the shape of the circuit it was produced for.
pub struct ZkProof<B: SnarkBackend = DefaultBackend> {
    shape: CircuitShape,
    proof: B::Proof,
}

impl<B: SnarkBackend> ZkProof<B> {
    pub(crate) fn new(shape: CircuitShape, proof: B::Proof) -> Self {
        Self { shape, proof }
    }

    pub fn shape(&self) -> &CircuitShape {
        &self.shape
    }

    pub fn inner(&self) -> &B::Proof {
        &self.proof
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.shape.write(&mut bytes)?;
        self.proof.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    /// Decodes and checks curve points; a malformed proof is an error here
    /// rather than a rejection later.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let shape = CircuitShape::read(&mut reader)?;
        let proof = <B::Proof as CanonicalDeserialize>::deserialize_compressed(&mut reader)?;
        Ok(Self { shape, proof })
    }
}

impl<B: SnarkBackend> Clone for ZkProof<B> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            proof: self.proof.clone(),
        }
    }
}

impl<B: SnarkBackend> PartialEq for ZkProof<B> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.proof == other.proof
    }
}

impl<B: SnarkBackend> fmt::Debug for ZkProof<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkProof")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}
