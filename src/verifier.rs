// src/verifier.rs

use tracing::{debug, instrument, warn};

use crate::backend::SnarkBackend;
use crate::error::{Result, ZkError};
use crate::item::ZkvItem;
use crate::keys::ZkVk;
use crate::proof::ZkProof;

/// Check `proof` against `item` under `vk`.
///
/// Total: any mismatch, malformed input or misconfiguration yields `false`.
/// Use [`try_verify_zk_proof`] to tell a rejected item from a wiring error.
pub fn verify_zk_proof<B: SnarkBackend>(proof: &ZkProof<B>, vk: &ZkVk<B>, item: &ZkvItem<B::Fr>) -> bool {
    match try_verify_zk_proof(proof, vk, item) {
        Ok(accepted) => accepted,
        Err(err) => {
            warn!(error = %err, "atomic_swap_vc verification aborted");
            false
        }
    }
}

/// Like [`verify_zk_proof`], but key/proof/item shape disagreement is an
/// `Err` and only a genuine verification failure is `Ok(false)`.
#[instrument(level = "debug", skip_all, fields(vector_len = item.len()))]
pub fn try_verify_zk_proof<B: SnarkBackend>(
    proof: &ZkProof<B>,
    vk: &ZkVk<B>,
    item: &ZkvItem<B::Fr>,
) -> Result<bool> {
    let shape = vk.shape();
    if !proof.shape().compatible_with(shape) {
        return Err(ZkError::KeyMismatch(format!(
            "proof was made for {:?}, verifying key is for {:?}",
            proof.shape(),
            shape
        )));
    }
    if item.len() != shape.vector_len {
        return Err(ZkError::ArityMismatch {
            expected: shape.vector_len,
            actual: item.len(),
        });
    }

    let accepted = B::verify(vk.key(), &item.public_inputs(), proof.inner())?;
    debug!(accepted, "atomic_swap_vc proof checked");
    Ok(accepted)
}
