// src/circuits/mod.rs

pub mod atomic_swap_vc;

pub use atomic_swap_vc::AtomicSwapVcCircuit;
