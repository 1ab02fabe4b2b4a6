// src/gadgets/inner_product.rs

use ark_ff::PrimeField;
use ark_r1cs_std::fields::{FieldVar, fp::FpVar};
use ark_relations::r1cs::SynthesisError;

/// Σ λ_i·o_i·w_i over allocated vectors; λ are circuit constants.
pub fn inner_product_gadget<F: PrimeField>(
    o: &[FpVar<F>],
    w: &[FpVar<F>],
    weights: &[F],
) -> Result<FpVar<F>, SynthesisError> {
    if o.len() != w.len() || o.len() != weights.len() {
        return Err(SynthesisError::Unsatisfiable);
    }
    let mut acc = FpVar::<F>::zero();
    for ((oi, wi), l) in o.iter().zip(w).zip(weights) {
        acc += (oi * wi) * *l;
    }
    Ok(acc)
}
