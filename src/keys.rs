// src/keys.rs
//
// Proving/verifying keys tagged with the circuit shape they were generated
// for. The tag is checked on construction, on load and on every use.
//
// Byte layout: shape tag ‖ circuit id (32 bytes) ‖ compressed key.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::rand::{CryptoRng, RngCore};
use std::fmt;
use std::io::{Read, Write};
use std::time::Instant;
use tracing::info;

use crate::DefaultBackend;
use crate::backend::SnarkBackend;
use crate::circuits::AtomicSwapVcCircuit;
use crate::config::{CircuitParams, CircuitShape};
use crate::error::{Result, ZkError};

pub struct ZkPk<B: SnarkBackend = DefaultBackend> {
    shape: CircuitShape,
    circuit_id: [u8; 32],
    key: B::ProvingKey,
}

pub struct ZkVk<B: SnarkBackend = DefaultBackend> {
    shape: CircuitShape,
    circuit_id: [u8; 32],
    key: B::VerifyingKey,
}

fn check_inputs(what: &str, shape: &CircuitShape, actual: usize) -> Result<()> {
    let expected = shape.public_input_count();
    if actual != expected {
        return Err(ZkError::KeyMismatch(format!(
            "{what} has {actual} public inputs, vector length {} needs {expected}",
            shape.vector_len
        )));
    }
    Ok(())
}

fn circuit_id_of<B: SnarkBackend>(shape: &CircuitShape) -> Result<[u8; 32]> {
    Ok(CircuitParams::<B::Fr>::new(shape.clone())?.circuit_id())
}

fn write_header<W: Write>(mut writer: W, shape: &CircuitShape, circuit_id: &[u8; 32]) -> Result<()> {
    shape.write(&mut writer)?;
    writer.write_all(circuit_id).map_err(SerializationError::from)?;
    Ok(())
}

/// Reads the shape tag and checks the recorded circuit id against the one
/// this build derives from it.
fn read_header<B: SnarkBackend, R: Read>(mut reader: R) -> Result<CircuitShape> {
    let shape = CircuitShape::read(&mut reader)?;
    let mut recorded = [0u8; 32];
    reader.read_exact(&mut recorded).map_err(SerializationError::from)?;
    if recorded != circuit_id_of::<B>(&shape)? {
        return Err(ZkError::KeyMismatch(
            "recorded circuit id does not match the shape tag".into(),
        ));
    }
    Ok(shape)
}

fn expect_shape(loaded: &CircuitShape, expected: &CircuitShape) -> Result<()> {
    if !loaded.compatible_with(expected) {
        return Err(ZkError::KeyMismatch(format!(
            "key is for {loaded:?}, expected {expected:?}"
        )));
    }
    Ok(())
}

impl<B: SnarkBackend> ZkPk<B> {
    /// Tags `key` with `shape`. Only the public-input count can be checked
    /// against the key itself; the tag is otherwise trusted.
    pub fn new(shape: CircuitShape, key: B::ProvingKey) -> Result<Self> {
        shape.validate()?;
        check_inputs("proving key", &shape, B::proving_key_inputs(&key))?;
        let circuit_id = circuit_id_of::<B>(&shape)?;
        Ok(Self {
            shape,
            circuit_id,
            key,
        })
    }

    pub fn shape(&self) -> &CircuitShape {
        &self.shape
    }

    pub fn key(&self) -> &B::ProvingKey {
        &self.key
    }

    pub fn circuit_id(&self) -> [u8; 32] {
        self.circuit_id
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        write_header(&mut bytes, &self.shape, &self.circuit_id)?;
        self.key.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let shape = read_header::<B, _>(&mut reader)?;
        let key = <B::ProvingKey as CanonicalDeserialize>::deserialize_compressed(&mut reader)?;
        Self::new(shape, key)
    }
}

impl<B: SnarkBackend> ZkVk<B> {
    /// Tags `key` with `shape`. Only the public-input count can be checked
    /// against the key itself; the tag is otherwise trusted, so verifiers
    /// loading third-party keys should go through [`ZkVk::from_bytes_for`].
    pub fn new(shape: CircuitShape, key: B::VerifyingKey) -> Result<Self> {
        shape.validate()?;
        check_inputs("verifying key", &shape, B::verifying_key_inputs(&key))?;
        let circuit_id = circuit_id_of::<B>(&shape)?;
        Ok(Self {
            shape,
            circuit_id,
            key,
        })
    }

    pub fn shape(&self) -> &CircuitShape {
        &self.shape
    }

    pub fn key(&self) -> &B::VerifyingKey {
        &self.key
    }

    pub fn circuit_id(&self) -> [u8; 32] {
        self.circuit_id
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        write_header(&mut bytes, &self.shape, &self.circuit_id)?;
        self.key.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let shape = read_header::<B, _>(&mut reader)?;
        let key = <B::VerifyingKey as CanonicalDeserialize>::deserialize_compressed(&mut reader)?;
        Self::new(shape, key)
    }

    /// Loads a key and refuses it unless it was generated for `expected`.
    pub fn from_bytes_for(bytes: &[u8], expected: &CircuitShape) -> Result<Self> {
        let vk = Self::from_bytes(bytes)?;
        expect_shape(&vk.shape, expected)?;
        Ok(vk)
    }

    /// Errors unless this key was generated for `expected`.
    pub fn ensure_shape(&self, expected: &CircuitShape) -> Result<()> {
        expect_shape(&self.shape, expected)
    }
}

impl<B: SnarkBackend> Clone for ZkPk<B> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            circuit_id: self.circuit_id,
            key: self.key.clone(),
        }
    }
}

impl<B: SnarkBackend> Clone for ZkVk<B> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape.clone(),
            circuit_id: self.circuit_id,
            key: self.key.clone(),
        }
    }
}

impl<B: SnarkBackend> fmt::Debug for ZkPk<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkPk").field("shape", &self.shape).finish_non_exhaustive()
    }
}

impl<B: SnarkBackend> fmt::Debug for ZkVk<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkVk").field("shape", &self.shape).finish_non_exhaustive()
    }
}

/// Circuit-specific key generation for `shape`.
///
/// Stands in for a setup ceremony in tests, benches and the demo; the
/// randomness used here is toxic waste and must not be kept.
pub fn setup<B, R>(shape: &CircuitShape, rng: &mut R) -> Result<(ZkPk<B>, ZkVk<B>)>
where
    B: SnarkBackend,
    R: RngCore + CryptoRng,
{
    let params = CircuitParams::<B::Fr>::new(shape.clone())?;
    let started = Instant::now();
    let (pk, vk) = B::setup(AtomicSwapVcCircuit::blank(params.clone()), rng)?;
    info!(
        circuit = %params.circuit_id_hex(),
        vector_len = shape.vector_len,
        mimc_rounds = shape.mimc_rounds,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "generated atomic_swap_vc keys"
    );
    Ok((ZkPk::new(shape.clone(), pk)?, ZkVk::new(shape.clone(), vk)?))
}
