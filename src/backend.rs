// src/backend.rs
//
// Narrow seam between the swap logic and the succinct-proof system.
// Everything above this trait only sees opaque keys and proofs.

use ark_ec::pairing::Pairing;
use ark_ff::PrimeField;
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_relations::r1cs::ConstraintSynthesizer;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::{CircuitSpecificSetupSNARK, SNARK};
use ark_std::rand::{CryptoRng, RngCore};
use std::marker::PhantomData;

use crate::error::Result;

pub trait SnarkBackend {
    type Fr: PrimeField;
    type ProvingKey: Clone + Send + Sync + CanonicalSerialize + CanonicalDeserialize;
    type VerifyingKey: Clone + Send + Sync + CanonicalSerialize + CanonicalDeserialize;
    type Proof: Clone + Send + Sync + PartialEq + CanonicalSerialize + CanonicalDeserialize;

    /// Circuit-specific key generation.
    fn setup<C, R>(circuit: C, rng: &mut R) -> Result<(Self::ProvingKey, Self::VerifyingKey)>
    where
        C: ConstraintSynthesizer<Self::Fr>,
        R: RngCore + CryptoRng;

    fn prove<C, R>(pk: &Self::ProvingKey, circuit: C, rng: &mut R) -> Result<Self::Proof>
    where
        C: ConstraintSynthesizer<Self::Fr>,
        R: RngCore + CryptoRng;

    fn verify(vk: &Self::VerifyingKey, public_inputs: &[Self::Fr], proof: &Self::Proof) -> Result<bool>;

    /// Number of public inputs the proving key was generated for.
    fn proving_key_inputs(pk: &Self::ProvingKey) -> usize;

    /// Number of public inputs the verifying key accepts.
    fn verifying_key_inputs(vk: &Self::VerifyingKey) -> usize;
}

/// Groth16 over any pairing engine.
pub struct Groth16Backend<E: Pairing>(PhantomData<E>);

impl<E: Pairing> SnarkBackend for Groth16Backend<E> {
    type Fr = E::ScalarField;
    type ProvingKey = ProvingKey<E>;
    type VerifyingKey = VerifyingKey<E>;
    type Proof = Proof<E>;

    fn setup<C, R>(circuit: C, rng: &mut R) -> Result<(ProvingKey<E>, VerifyingKey<E>)>
    where
        C: ConstraintSynthesizer<E::ScalarField>,
        R: RngCore + CryptoRng,
    {
        let (pk, vk) = Groth16::<E>::circuit_specific_setup(circuit, rng)?;
        Ok((pk, vk))
    }

    fn prove<C, R>(pk: &ProvingKey<E>, circuit: C, rng: &mut R) -> Result<Proof<E>>
    where
        C: ConstraintSynthesizer<E::ScalarField>,
        R: RngCore + CryptoRng,
    {
        let prf = Groth16::<E>::prove(pk, circuit, rng)?;
        Ok(prf)
    }

    fn verify(vk: &VerifyingKey<E>, public_inputs: &[E::ScalarField], proof: &Proof<E>) -> Result<bool> {
        Ok(Groth16::<E>::verify(vk, public_inputs, proof)?)
    }

    fn proving_key_inputs(pk: &ProvingKey<E>) -> usize {
        Self::verifying_key_inputs(&pk.vk)
    }

    // gamma_abc_g1 has one extra entry for the constant wire
    fn verifying_key_inputs(vk: &VerifyingKey<E>) -> usize {
        vk.gamma_abc_g1.len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultBackend;
    use ark_relations::lc;
    use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
    use ark_std::rand::{SeedableRng, rngs::StdRng};

    type Fr = <DefaultBackend as SnarkBackend>::Fr;

    // x * y = z with z public
    #[derive(Clone)]
    struct MulCircuit {
        x: Option<Fr>,
        y: Option<Fr>,
        z: Option<Fr>,
    }

    impl ConstraintSynthesizer<Fr> for MulCircuit {
        fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> std::result::Result<(), SynthesisError> {
            let x = cs.new_witness_variable(|| self.x.ok_or(SynthesisError::AssignmentMissing))?;
            let y = cs.new_witness_variable(|| self.y.ok_or(SynthesisError::AssignmentMissing))?;
            let z = cs.new_input_variable(|| self.z.ok_or(SynthesisError::AssignmentMissing))?;
            cs.enforce_constraint(lc!() + x, lc!() + y, lc!() + z)?;
            Ok(())
        }
    }

    #[test]
    fn test_groth16_roundtrip() {
        let mut rng = StdRng::seed_from_u64(7);
        let blank = MulCircuit { x: None, y: None, z: None };
        let (pk, vk) = DefaultBackend::setup(blank, &mut rng).unwrap();
        assert_eq!(DefaultBackend::proving_key_inputs(&pk), 1);
        assert_eq!(DefaultBackend::verifying_key_inputs(&vk), 1);

        let (x, y) = (Fr::from(12u64), Fr::from(17u64));
        let circuit = MulCircuit { x: Some(x), y: Some(y), z: Some(x * y) };
        let proof = DefaultBackend::prove(&pk, circuit, &mut rng).unwrap();

        assert!(DefaultBackend::verify(&vk, &[x * y], &proof).unwrap());
        assert!(!DefaultBackend::verify(&vk, &[x * y + Fr::from(1u64)], &proof).unwrap());
        // wrong number of public inputs is a key/input mismatch, not a rejection
        assert!(DefaultBackend::verify(&vk, &[x, y], &proof).is_err());
    }
}
