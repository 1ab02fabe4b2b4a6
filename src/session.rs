// src/session.rs
//
// Per-swap state machines for the two sides of an atomic_swap_vc exchange.
//
//   Uncommitted -> Committed -> Proved -> Verified -> SeedReleased
//                                      \-> Rejected
//
// The proof core itself does not care about ordering; these sessions are
// where "never release the seed before the counterparty verified" lives.

use ark_ff::PrimeField;
use ark_std::rand::{CryptoRng, RngCore};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::DefaultBackend;
use crate::backend::SnarkBackend;
use crate::config::{CircuitParams, CircuitShape};
use crate::error::{Result, ZkError};
use crate::item::{ZkpItem, ZkvItem};
use crate::keys::{ZkPk, ZkVk};
use crate::proof::ZkProof;
use crate::prover::generate_zk_proof_with_rng;
use crate::verifier::try_verify_zk_proof;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapState {
    Uncommitted,
    Committed,
    Proved,
    Verified,
    Rejected,
    SeedReleased,
}

/// The secret pair handed over once the counterparty has paid.
pub struct SeedReveal<F: PrimeField> {
    pub seed: F,
    pub seed_rand: F,
}

impl<F: PrimeField> Drop for SeedReveal<F> {
    fn drop(&mut self) {
        self.seed.zeroize();
        self.seed_rand.zeroize();
    }
}

impl<F: PrimeField> fmt::Debug for SeedReveal<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SeedReveal(<redacted>)")
    }
}

fn expect_state(current: SwapState, wanted: SwapState, action: &'static str) -> Result<()> {
    if current != wanted {
        return Err(ZkError::InvalidTransition {
            state: current,
            action,
        });
    }
    Ok(())
}

/// Prover side: commits to an item, proves it, releases the seed last.
pub struct AliceSession<B: SnarkBackend = DefaultBackend> {
    pk: Arc<ZkPk<B>>,
    params: CircuitParams<B::Fr>,
    state: SwapState,
    item: Option<ZkpItem<B::Fr>>,
    reveal: Option<SeedReveal<B::Fr>>,
}

impl<B: SnarkBackend> AliceSession<B> {
    pub fn new(pk: Arc<ZkPk<B>>) -> Result<Self> {
        let params = CircuitParams::new(pk.shape().clone())?;
        Ok(Self {
            pk,
            params,
            state: SwapState::Uncommitted,
            item: None,
            reveal: None,
        })
    }

    pub fn state(&self) -> SwapState {
        self.state
    }

    /// Build the private item and return its public projection for publishing.
    pub fn commit(
        &mut self,
        o: Vec<B::Fr>,
        w: Vec<B::Fr>,
        seed: B::Fr,
        seed_rand: B::Fr,
    ) -> Result<ZkvItem<B::Fr>> {
        expect_state(self.state, SwapState::Uncommitted, "commit")?;
        let item = ZkpItem::new(&self.params, o, w, seed, seed_rand)?;
        let public = item.public();
        self.reveal = Some(SeedReveal { seed, seed_rand });
        self.item = Some(item);
        self.state = SwapState::Committed;
        info!(circuit = %self.params.circuit_id_hex(), "alice committed item");
        Ok(public)
    }

    pub fn prove(&mut self, check_vk: Option<&ZkVk<B>>) -> Result<ZkProof<B>> {
        let mut rng = rand::thread_rng();
        self.prove_with_rng(check_vk, &mut rng)
    }

    /// The private item is dropped (and wiped) once the proof exists.
    pub fn prove_with_rng<R: RngCore + CryptoRng>(
        &mut self,
        check_vk: Option<&ZkVk<B>>,
        rng: &mut R,
    ) -> Result<ZkProof<B>> {
        expect_state(self.state, SwapState::Committed, "prove")?;
        let item = self.item.as_ref().ok_or(ZkError::InvalidTransition {
            state: self.state,
            action: "prove",
        })?;
        let proof = generate_zk_proof_with_rng(&self.pk, item, check_vk, rng)?;
        self.item = None;
        self.state = SwapState::Proved;
        Ok(proof)
    }

    /// Record the counterparty's verdict.
    pub fn acknowledge(&mut self, accepted: bool) -> Result<()> {
        expect_state(self.state, SwapState::Proved, "acknowledge")?;
        self.state = if accepted {
            SwapState::Verified
        } else {
            self.reveal = None;
            SwapState::Rejected
        };
        info!(accepted, "alice received verdict");
        Ok(())
    }

    /// Hand out the seed; only possible after an accepting verdict.
    pub fn release_seed(&mut self) -> Result<SeedReveal<B::Fr>> {
        expect_state(self.state, SwapState::Verified, "release seed")?;
        let reveal = self.reveal.take().ok_or(ZkError::InvalidTransition {
            state: self.state,
            action: "release seed",
        })?;
        self.state = SwapState::SeedReleased;
        info!("alice released seed");
        Ok(reveal)
    }
}

/// Verifier side: receives the item and proof, verifies, checks the seed.
pub struct BobSession<B: SnarkBackend = DefaultBackend> {
    vk: Arc<ZkVk<B>>,
    params: CircuitParams<B::Fr>,
    state: SwapState,
    item: Option<ZkvItem<B::Fr>>,
    proof: Option<ZkProof<B>>,
}

impl<B: SnarkBackend> fmt::Debug for BobSession<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BobSession")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<B: SnarkBackend> BobSession<B> {
    /// `expected` is the shape Bob agreed to pay for; a key generated for
    /// anything else (fewer MiMC rounds, other weights) is refused.
    pub fn new(vk: Arc<ZkVk<B>>, expected: &CircuitShape) -> Result<Self> {
        vk.ensure_shape(expected)?;
        let params = CircuitParams::new(vk.shape().clone())?;
        Ok(Self {
            vk,
            params,
            state: SwapState::Uncommitted,
            item: None,
            proof: None,
        })
    }

    pub fn state(&self) -> SwapState {
        self.state
    }

    pub fn item(&self) -> Option<&ZkvItem<B::Fr>> {
        self.item.as_ref()
    }

    pub fn receive_item(&mut self, item: ZkvItem<B::Fr>) -> Result<()> {
        expect_state(self.state, SwapState::Uncommitted, "receive item")?;
        if item.len() != self.params.vector_len() {
            return Err(ZkError::ArityMismatch {
                expected: self.params.vector_len(),
                actual: item.len(),
            });
        }
        self.item = Some(item);
        self.state = SwapState::Committed;
        Ok(())
    }

    pub fn receive_proof(&mut self, proof: ZkProof<B>) -> Result<()> {
        expect_state(self.state, SwapState::Committed, "receive proof")?;
        self.proof = Some(proof);
        self.state = SwapState::Proved;
        Ok(())
    }

    /// Misconfiguration errors leave the session in `Proved`.
    pub fn verify(&mut self) -> Result<bool> {
        expect_state(self.state, SwapState::Proved, "verify")?;
        let (Some(item), Some(proof)) = (self.item.as_ref(), self.proof.as_ref()) else {
            return Err(ZkError::InvalidTransition {
                state: self.state,
                action: "verify",
            });
        };
        let accepted = try_verify_zk_proof(proof, &self.vk, item)?;
        self.state = if accepted {
            SwapState::Verified
        } else {
            SwapState::Rejected
        };
        self.proof = None;
        info!(accepted, circuit = %self.params.circuit_id_hex(), "bob verified proof");
        Ok(accepted)
    }

    /// Accept the released seed if it opens the verified digest.
    pub fn accept_seed(&mut self, reveal: &SeedReveal<B::Fr>) -> Result<()> {
        expect_state(self.state, SwapState::Verified, "accept seed")?;
        let item = self.item.as_ref().ok_or(ZkError::InvalidTransition {
            state: self.state,
            action: "accept seed",
        })?;
        if self.params.digest(&reveal.seed, &reveal.seed_rand) != *item.seed_mimc3_digest() {
            warn!("revealed seed does not match committed digest");
            return Err(ZkError::SeedMismatch);
        }
        self.state = SwapState::SeedReleased;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZkFr;
    use crate::keys::setup;
    use ark_ff::One;
    use ark_std::rand::{SeedableRng, rngs::StdRng};

    fn fr(v: u64) -> ZkFr {
        ZkFr::from(v)
    }

    fn shape() -> CircuitShape {
        CircuitShape::new(2).with_mimc_rounds(16)
    }

    fn keys() -> (Arc<ZkPk>, Arc<ZkVk>) {
        let mut rng = StdRng::seed_from_u64(3);
        let (pk, vk) = setup(&shape(), &mut rng).unwrap();
        (Arc::new(pk), Arc::new(vk))
    }

    #[test]
    fn test_full_swap() {
        let (pk, vk) = keys();
        let mut rng = StdRng::seed_from_u64(4);
        let mut alice = AliceSession::new(pk).unwrap();
        let mut bob = BobSession::new(vk.clone(), &shape()).unwrap();

        let item = alice.commit(vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(99), fr(100)).unwrap();
        bob.receive_item(item).unwrap();
        let proof = alice.prove_with_rng(Some(&*vk), &mut rng).unwrap();
        bob.receive_proof(proof).unwrap();

        let accepted = bob.verify().unwrap();
        assert!(accepted);
        alice.acknowledge(accepted).unwrap();

        let reveal = alice.release_seed().unwrap();
        bob.accept_seed(&reveal).unwrap();
        assert_eq!(alice.state(), SwapState::SeedReleased);
        assert_eq!(bob.state(), SwapState::SeedReleased);
    }

    #[test]
    fn test_seed_not_released_before_verdict() {
        let (pk, _) = keys();
        let mut rng = StdRng::seed_from_u64(5);
        let mut alice = AliceSession::new(pk).unwrap();
        assert!(alice.release_seed().is_err());

        alice.commit(vec![fr(1), fr(2)], vec![fr(3), fr(4)], fr(5), fr(6)).unwrap();
        assert!(matches!(
            alice.release_seed(),
            Err(ZkError::InvalidTransition {
                state: SwapState::Committed,
                ..
            })
        ));

        alice.prove_with_rng(None, &mut rng).unwrap();
        assert!(alice.release_seed().is_err());

        alice.acknowledge(false).unwrap();
        assert_eq!(alice.state(), SwapState::Rejected);
        assert!(alice.release_seed().is_err());
    }

    #[test]
    fn test_forged_item_rejected_and_wrong_seed_refused() {
        let (pk, vk) = keys();
        let mut rng = StdRng::seed_from_u64(6);
        let mut alice = AliceSession::new(pk).unwrap();
        let honest = alice.commit(vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(8), fr(9)).unwrap();
        let proof = alice.prove_with_rng(None, &mut rng).unwrap();

        let forged = ZkvItem::new(
            vk.shape(),
            honest.o().to_vec(),
            honest.w().to_vec(),
            *honest.seed_mimc3_digest(),
            fr(42),
        )
        .unwrap();
        let mut bob = BobSession::new(vk.clone(), &shape()).unwrap();
        bob.receive_item(forged).unwrap();
        bob.receive_proof(proof.clone()).unwrap();
        assert!(!bob.verify().unwrap());
        assert_eq!(bob.state(), SwapState::Rejected);

        let mut bob = BobSession::new(vk, &shape()).unwrap();
        bob.receive_item(honest).unwrap();
        bob.receive_proof(proof).unwrap();
        assert!(bob.verify().unwrap());
        let wrong = SeedReveal {
            seed: fr(8) + ZkFr::one(),
            seed_rand: fr(9),
        };
        assert!(matches!(bob.accept_seed(&wrong), Err(ZkError::SeedMismatch)));
        assert_eq!(bob.state(), SwapState::Verified);
    }

    #[test]
    fn test_out_of_order_calls() {
        let (_, vk) = keys();
        let mut bob = BobSession::new(vk, &shape()).unwrap();
        assert!(bob.verify().is_err());
        assert!(
            bob.receive_item(
                ZkvItem::new(&CircuitShape::new(3), vec![fr(1); 3], vec![fr(1); 3], fr(0), fr(3))
                    .unwrap()
            )
            .is_err()
        );
        assert_eq!(bob.state(), SwapState::Uncommitted);
    }

    #[test]
    fn test_bob_refuses_weaker_key() {
        let (_, vk) = keys();
        let err = BobSession::new(vk, &CircuitShape::new(2)).unwrap_err();
        assert!(matches!(err, ZkError::KeyMismatch(_)));

        let mut rng = StdRng::seed_from_u64(7);
        let (_, weighted): (ZkPk, ZkVk) =
            setup(&shape().with_weights(vec![2, 3]), &mut rng).unwrap();
        assert!(BobSession::new(Arc::new(weighted), &shape()).is_err());
    }
}
