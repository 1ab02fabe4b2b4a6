// src/circuits/atomic_swap_vc.rs
//
// R1CS for the atomic_swap_vc relation:
//   public:  o[0..n], w[0..n], seed_mimc3_digest, inner_product
//   private: seed, seed_rand
//   enforce: seed_mimc3_digest == MiMC3(seed, seed_rand)
//            inner_product     == Σ λ_i·o_i·w_i

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use zeroize::Zeroize;

use crate::config::CircuitParams;
use crate::gadgets::{inner_product_gadget, mimc3_gadget};
use crate::item::ZkpItem;

#[derive(Clone)]
pub struct AtomicSwapVcCircuit<F: PrimeField> {
    params: CircuitParams<F>,
    o: Option<Vec<F>>,
    w: Option<Vec<F>>,
    seed: Option<F>,
    seed_rand: Option<F>,
    seed_mimc3_digest: Option<F>,
    inner_product: Option<F>,
}

impl<F: PrimeField> AtomicSwapVcCircuit<F> {
    /// Shape-only circuit for key generation; no assignments.
    pub fn blank(params: CircuitParams<F>) -> Self {
        Self {
            params,
            o: None,
            w: None,
            seed: None,
            seed_rand: None,
            seed_mimc3_digest: None,
            inner_product: None,
        }
    }

    /// Full assignment (public and private wires) taken from `item`.
    pub fn with_witness(params: CircuitParams<F>, item: &ZkpItem<F>) -> Self {
        Self {
            params,
            o: Some(item.o().to_vec()),
            w: Some(item.w().to_vec()),
            seed: Some(*item.seed()),
            seed_rand: Some(*item.seed_rand()),
            seed_mimc3_digest: Some(*item.seed_mimc3_digest()),
            inner_product: Some(*item.inner_product()),
        }
    }
}

impl<F: PrimeField> AtomicSwapVcCircuit<F> {
    /// Overwrite and forget the private witness.
    fn wipe_secrets(&mut self) {
        self.seed.zeroize();
        self.seed_rand.zeroize();
    }
}

impl<F: PrimeField> Drop for AtomicSwapVcCircuit<F> {
    fn drop(&mut self) {
        self.wipe_secrets();
    }
}

fn alloc_inputs<F: PrimeField>(
    cs: &ConstraintSystemRef<F>,
    values: &Option<Vec<F>>,
    n: usize,
) -> Result<Vec<FpVar<F>>, SynthesisError> {
    (0..n)
        .map(|i| {
            FpVar::new_input(cs.clone(), || {
                values
                    .as_ref()
                    .and_then(|v| v.get(i).copied())
                    .ok_or(SynthesisError::AssignmentMissing)
            })
        })
        .collect()
}

impl<F: PrimeField> ConstraintSynthesizer<F> for AtomicSwapVcCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        let n = self.params.vector_len();

        // Public inputs, in ZkvItem::public_inputs order
        let o = alloc_inputs(&cs, &self.o, n)?;
        let w = alloc_inputs(&cs, &self.w, n)?;
        let digest = FpVar::new_input(cs.clone(), || {
            self.seed_mimc3_digest.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let inner_product = FpVar::new_input(cs.clone(), || {
            self.inner_product.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // Private witness
        let seed = FpVar::new_witness(cs.clone(), || {
            self.seed.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let seed_rand = FpVar::new_witness(cs.clone(), || {
            self.seed_rand.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // 1. digest == MiMC3(seed, seed_rand)
        let computed = mimc3_gadget(self.params.mimc(), &seed, &seed_rand)?;
        computed.enforce_equal(&digest)?;

        // 2. inner_product == Σ λ_i·o_i·w_i
        let ip = inner_product_gadget(&o, &w, self.params.weights())?;
        ip.enforce_equal(&inner_product)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZkFr;
    use crate::config::CircuitShape;
    use ark_ff::One;
    use ark_relations::r1cs::ConstraintSystem;

    fn fr(v: u64) -> ZkFr {
        ZkFr::from(v)
    }

    fn params(rounds: usize) -> CircuitParams<ZkFr> {
        CircuitParams::new(CircuitShape::new(2).with_mimc_rounds(rounds)).unwrap()
    }

    #[test]
    fn test_valid_witness_satisfies() {
        let params = params(1024);
        let item = ZkpItem::new(&params, vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(17), fr(19)).unwrap();

        let cs = ConstraintSystem::<ZkFr>::new_ref();
        AtomicSwapVcCircuit::with_witness(params, &item)
            .generate_constraints(cs.clone())
            .unwrap();

        assert!(cs.is_satisfied().unwrap());
        // the constant one plus 2n + 2 public inputs
        assert_eq!(cs.num_instance_variables(), 1 + 6);
        assert!(cs.num_constraints() >= 5 * 1024);
    }

    #[test]
    fn test_wrong_inner_product_unsatisfied() {
        let params = params(32);
        let item = ZkpItem::new(&params, vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(17), fr(19)).unwrap();
        let mut circuit = AtomicSwapVcCircuit::with_witness(params, &item);
        circuit.inner_product = Some(fr(42));

        let cs = ConstraintSystem::<ZkFr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_wrong_seed_unsatisfied() {
        let params = params(32);
        let item = ZkpItem::new(&params, vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(17), fr(19)).unwrap();
        let mut circuit = AtomicSwapVcCircuit::with_witness(params, &item);
        circuit.seed = Some(fr(17) + ZkFr::one());

        let cs = ConstraintSystem::<ZkFr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }

    #[test]
    fn test_blank_circuit_synthesizes_in_setup_mode() {
        let cs = ConstraintSystem::<ZkFr>::new_ref();
        cs.set_mode(ark_relations::r1cs::SynthesisMode::Setup);
        AtomicSwapVcCircuit::blank(params(8))
            .generate_constraints(cs.clone())
            .unwrap();
        assert_eq!(cs.num_instance_variables(), 7);
        assert!(cs.num_witness_variables() > 2);
    }

    #[test]
    fn test_wiped_witness_cannot_be_proven() {
        let params = params(8);
        let item = ZkpItem::new(&params, vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(17), fr(19)).unwrap();
        let mut circuit = AtomicSwapVcCircuit::with_witness(params, &item);
        circuit.wipe_secrets();
        assert!(circuit.seed.is_none());
        assert!(circuit.seed_rand.is_none());

        let cs = ConstraintSystem::<ZkFr>::new_ref();
        assert!(matches!(
            circuit.generate_constraints(cs),
            Err(SynthesisError::AssignmentMissing)
        ));
    }
}
