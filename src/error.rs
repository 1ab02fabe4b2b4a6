// src/error.rs
//! Error types for the atomic-swap proof core.

use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;
use thiserror::Error;

use crate::session::SwapState;

/// Result type alias using ZkError
pub type Result<T> = std::result::Result<T, ZkError>;

/// Broad category of a [`ZkError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Vector lengths disagree with each other or with the circuit arity.
    Structural,
    /// A stated digest or inner product does not match its recomputation.
    Consistency,
    /// Keys, proofs, items or configuration belong to different circuits.
    Misconfiguration,
    /// The proof backend or the byte codec failed.
    Backend,
    /// A swap session was driven out of order.
    Protocol,
}

/// Errors that can occur while building items, proving or verifying.
///
/// Messages never carry secret values.
#[derive(Error, Debug)]
pub enum ZkError {
    #[error("vector length mismatch: o has {o} elements, w has {w}")]
    LengthMismatch { o: usize, w: usize },

    #[error("circuit arity mismatch: expected {expected} elements, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("stated inner product does not match o·w")]
    InnerProductMismatch,

    #[error("stated seed digest does not match MiMC3(seed, seed_rand)")]
    DigestMismatch,

    #[error("key/circuit mismatch: {0}")]
    KeyMismatch(String),

    #[error("invalid circuit shape: {0}")]
    InvalidShape(String),

    #[error("freshly generated proof failed self-verification")]
    SelfCheckFailed,

    #[error("constraint synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("cannot {action} in state {state:?}")]
    InvalidTransition {
        state: SwapState,
        action: &'static str,
    },

    #[error("revealed seed does not open the committed digest")]
    SeedMismatch,
}

impl ZkError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZkError::LengthMismatch { .. } | ZkError::ArityMismatch { .. } => ErrorKind::Structural,
            ZkError::InnerProductMismatch | ZkError::DigestMismatch => ErrorKind::Consistency,
            ZkError::KeyMismatch(_)
            | ZkError::InvalidShape(_)
            | ZkError::SelfCheckFailed
            | ZkError::Config(_) => ErrorKind::Misconfiguration,
            ZkError::Synthesis(_) | ZkError::Serialization(_) => ErrorKind::Backend,
            ZkError::InvalidTransition { .. } | ZkError::SeedMismatch => ErrorKind::Protocol,
        }
    }

    /// True when the failure points at setup or wiring rather than at the data.
    pub fn is_misconfiguration(&self) -> bool {
        self.kind() == ErrorKind::Misconfiguration
    }
}
