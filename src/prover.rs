// src/prover.rs

use ark_std::rand::{CryptoRng, RngCore};
use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::backend::SnarkBackend;
use crate::circuits::AtomicSwapVcCircuit;
use crate::config::CircuitParams;
use crate::error::{Result, ZkError};
use crate::item::ZkpItem;
use crate::keys::{ZkPk, ZkVk};
use crate::proof::ZkProof;
use crate::verifier::try_verify_zk_proof;

/// Prove that `item` is well formed under `pk`, using thread-local randomness.
///
/// With `check_vk`, the fresh proof is verified against `item.public()`
/// before it is returned; if that fails the proof is discarded.
pub fn generate_zk_proof<B: SnarkBackend>(
    pk: &ZkPk<B>,
    item: &ZkpItem<B::Fr>,
    check_vk: Option<&ZkVk<B>>,
) -> Result<ZkProof<B>> {
    let mut rng = rand::thread_rng();
    generate_zk_proof_with_rng(pk, item, check_vk, &mut rng)
}

#[instrument(level = "debug", skip_all, fields(vector_len = item.len()))]
pub fn generate_zk_proof_with_rng<B, R>(
    pk: &ZkPk<B>,
    item: &ZkpItem<B::Fr>,
    check_vk: Option<&ZkVk<B>>,
    rng: &mut R,
) -> Result<ZkProof<B>>
where
    B: SnarkBackend,
    R: RngCore + CryptoRng,
{
    let shape = pk.shape();
    if item.len() != shape.vector_len {
        return Err(ZkError::ArityMismatch {
            expected: shape.vector_len,
            actual: item.len(),
        });
    }
    if !item.shape().compatible_with(shape) {
        return Err(ZkError::KeyMismatch(format!(
            "item was built for {:?}, proving key is for {:?}",
            item.shape(),
            shape
        )));
    }
    if let Some(vk) = check_vk {
        if !vk.shape().compatible_with(shape) {
            return Err(ZkError::KeyMismatch(format!(
                "check key is for {:?}, proving key is for {:?}",
                vk.shape(),
                shape
            )));
        }
    }

    let params = CircuitParams::<B::Fr>::new(shape.clone())?;
    let started = Instant::now();
    let circuit = AtomicSwapVcCircuit::with_witness(params.clone(), item);
    let proof = ZkProof::new(shape.clone(), B::prove(pk.key(), circuit, rng)?);
    debug!(
        circuit = %params.circuit_id_hex(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "atomic_swap_vc proof generated"
    );

    if let Some(vk) = check_vk {
        match try_verify_zk_proof(&proof, vk, &item.public()) {
            Ok(true) => debug!("self-check passed"),
            Ok(false) => {
                error!(circuit = %params.circuit_id_hex(), "self-check rejected fresh proof");
                return Err(ZkError::SelfCheckFailed);
            }
            Err(err) => {
                error!(error = %err, "self-check could not run");
                return Err(ZkError::SelfCheckFailed);
            }
        }
    }

    Ok(proof)
}
