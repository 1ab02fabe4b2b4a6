//! Zero-knowledge proofs for a commit-then-reveal atomic swap of data.
//!
//! A holder (Alice) commits to two vectors `o`, `w` and a hidden seed, and
//! proves with Groth16 that
//!
//! * `seed_mimc3_digest = MiMC3(seed, seed_rand)` (1024 rounds), and
//! * `inner_product = Σ λ_i·o_i·w_i`,
//!
//! without revealing `seed` or `seed_rand`. The counterparty (Bob) verifies
//! before paying; the seed released afterwards is checked against the digest
//! the proof already bound.
//!
//! ```text
//! Alice: ZkpItem ──generate_zk_proof──> ZkProof ─┐
//!        ZkpItem::public() ──> ZkvItem ──────────┼──> verify_zk_proof ──> bool
//!                                                 │          (Bob pays if true)
//!        SeedReveal <──── release after verdict ──┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use swap_vc_snark::{CircuitShape, CircuitParams, ZkFr, ZkPk, ZkVk, ZkpItem, setup,
//!                     generate_zk_proof, verify_zk_proof};
//!
//! let shape = CircuitShape::new(2);
//! let (pk, vk): (ZkPk, ZkVk) = setup(&shape, &mut rand::thread_rng())?;
//! let params = CircuitParams::<ZkFr>::new(shape)?;
//! let item = ZkpItem::new(&params, o, w, seed, seed_rand)?;
//! let proof = generate_zk_proof(&pk, &item, Some(&vk))?;
//! assert!(verify_zk_proof(&proof, &vk, &item.public()));
//! ```

pub mod backend;
pub mod circuits;
pub mod config;
pub mod error;
pub mod gadgets;
pub mod item;
pub mod keys;
pub mod mimc;
pub mod proof;
pub mod prover;
pub mod session;
pub mod verifier;

use ark_bls12_377::Bls12_377;

pub use backend::{Groth16Backend, SnarkBackend};
pub use config::{CircuitParams, CircuitShape};
pub use error::{ErrorKind, Result, ZkError};
pub use item::{ZkpItem, ZkvItem};
pub use keys::{ZkPk, ZkVk, setup};
pub use mimc::{MimcParams, ZKP_MIMC_COUNT, mimc3};
pub use proof::ZkProof;
pub use prover::{generate_zk_proof, generate_zk_proof_with_rng};
pub use session::{AliceSession, BobSession, SeedReveal, SwapState};
pub use verifier::{try_verify_zk_proof, verify_zk_proof};

/// Pairing engine the default backend runs over.
pub type ZkCurve = Bls12_377;

/// Scalar field every item is expressed over by default.
pub type ZkFr = ark_bls12_377::Fr;

pub type DefaultBackend = Groth16Backend<ZkCurve>;
