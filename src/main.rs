use std::sync::Arc;

use anyhow::Context;
use ark_ff::{BigInteger, PrimeField, UniformRand};
use rand::thread_rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use swap_vc_snark::{
    AliceSession, BobSession, CircuitShape, ZkFr, ZkPk, ZkVk, ZkvItem, setup, verify_zk_proof,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = thread_rng();

    // --- Parameters ---
    // Two-element vectors, 1024 MiMC rounds, plain dot product.
    let shape = CircuitShape::new(2);
    let (pk, vk): (ZkPk, ZkVk) = setup(&shape, &mut rng).context("key generation")?;
    let (pk, vk) = (Arc::new(pk), Arc::new(vk));

    // --- Alice commits: o = [3, 5], w = [2, 7] => 3*2 + 5*7 = 41 ---
    let o = vec![ZkFr::from(3u64), ZkFr::from(5u64)];
    let w = vec![ZkFr::from(2u64), ZkFr::from(7u64)];
    let seed = ZkFr::rand(&mut rng);
    let seed_rand = ZkFr::rand(&mut rng);

    let mut alice = AliceSession::new(pk)?;
    let public = alice.commit(o, w, seed, seed_rand)?;
    info!(
        inner_product = %public.inner_product(),
        digest = %hex::encode(public.seed_mimc3_digest().into_bigint().to_bytes_le()),
        "item published"
    );

    // --- Alice proves, self-checking against the verifying key ---
    let proof = alice.prove(Some(&*vk))?;
    info!(bytes = proof.to_bytes()?.len(), "proof published");

    // --- A forged copy claiming 42 must not verify ---
    let forged = ZkvItem::new(
        vk.shape(),
        public.o().to_vec(),
        public.w().to_vec(),
        *public.seed_mimc3_digest(),
        ZkFr::from(42u64),
    )?;
    if verify_zk_proof(&proof, &*vk, &forged) {
        warn!("forged item verified");
    } else {
        info!("forged item rejected");
    }

    // --- Bob verifies, then Alice releases the seed ---
    let mut bob = BobSession::new(vk, &shape)?;
    bob.receive_item(public)?;
    bob.receive_proof(proof)?;
    let accepted = bob.verify()?;
    alice.acknowledge(accepted)?;
    if !accepted {
        anyhow::bail!("honest proof was rejected");
    }

    let reveal = alice.release_seed()?;
    bob.accept_seed(&reveal)?;
    info!(alice = ?alice.state(), bob = ?bob.state(), "swap complete");

    Ok(())
}
