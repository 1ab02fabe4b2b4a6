// src/item.rs
//
// Prover-side and verifier-side views of one committed item. They are
// separate types so seed material cannot end up in a transmitted value.

use ark_ff::PrimeField;
use std::fmt;
use zeroize::Zeroize;

use crate::ZkFr;
use crate::config::{CircuitParams, CircuitShape};
use crate::error::{Result, ZkError};

/// Private witness: public fields plus `seed` and `seed_rand`.
///
/// Seed material is wiped when the item is dropped.
pub struct ZkpItem<F: PrimeField = ZkFr> {
    shape: CircuitShape,
    o: Vec<F>,
    w: Vec<F>,
    seed: F,
    seed_rand: F,
    seed_mimc3_digest: F,
    inner_product: F,
}

/// Public projection of a [`ZkpItem`]; safe to send to the counterparty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZkvItem<F: PrimeField = ZkFr> {
    o: Vec<F>,
    w: Vec<F>,
    seed_mimc3_digest: F,
    inner_product: F,
}

fn check_lengths<F>(shape: &CircuitShape, o: &[F], w: &[F]) -> Result<()> {
    if o.len() != w.len() {
        return Err(ZkError::LengthMismatch {
            o: o.len(),
            w: w.len(),
        });
    }
    if o.len() != shape.vector_len {
        return Err(ZkError::ArityMismatch {
            expected: shape.vector_len,
            actual: o.len(),
        });
    }
    Ok(())
}

impl<F: PrimeField> ZkpItem<F> {
    /// Build an item, deriving the digest and inner product.
    pub fn new(params: &CircuitParams<F>, o: Vec<F>, w: Vec<F>, seed: F, seed_rand: F) -> Result<Self> {
        check_lengths(params.shape(), &o, &w)?;
        let inner_product = params.inner_product(&o, &w);
        let seed_mimc3_digest = params.digest(&seed, &seed_rand);
        Ok(Self {
            shape: params.shape().clone(),
            o,
            w,
            seed,
            seed_rand,
            seed_mimc3_digest,
            inner_product,
        })
    }

    /// Build an item from externally supplied values, checking every invariant.
    pub fn from_parts(
        params: &CircuitParams<F>,
        o: Vec<F>,
        w: Vec<F>,
        seed: F,
        seed_rand: F,
        seed_mimc3_digest: F,
        inner_product: F,
    ) -> Result<Self> {
        let item = Self::new(params, o, w, seed, seed_rand)?;
        if item.inner_product != inner_product {
            return Err(ZkError::InnerProductMismatch);
        }
        if item.seed_mimc3_digest != seed_mimc3_digest {
            return Err(ZkError::DigestMismatch);
        }
        Ok(item)
    }

    /// Shape the item was validated against.
    pub fn shape(&self) -> &CircuitShape {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.o.len()
    }

    pub fn is_empty(&self) -> bool {
        self.o.is_empty()
    }

    pub fn o(&self) -> &[F] {
        &self.o
    }

    pub fn w(&self) -> &[F] {
        &self.w
    }

    pub fn seed(&self) -> &F {
        &self.seed
    }

    pub fn seed_rand(&self) -> &F {
        &self.seed_rand
    }

    pub fn seed_mimc3_digest(&self) -> &F {
        &self.seed_mimc3_digest
    }

    pub fn inner_product(&self) -> &F {
        &self.inner_product
    }

    pub fn public(&self) -> ZkvItem<F> {
        ZkvItem {
            o: self.o.clone(),
            w: self.w.clone(),
            seed_mimc3_digest: self.seed_mimc3_digest,
            inner_product: self.inner_product,
        }
    }
}

impl<F: PrimeField> Drop for ZkpItem<F> {
    fn drop(&mut self) {
        self.seed.zeroize();
        self.seed_rand.zeroize();
    }
}

impl<F: PrimeField> fmt::Debug for ZkpItem<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkpItem")
            .field("o", &self.o)
            .field("w", &self.w)
            .field("seed", &"<redacted>")
            .field("seed_rand", &"<redacted>")
            .field("seed_mimc3_digest", &self.seed_mimc3_digest)
            .field("inner_product", &self.inner_product)
            .finish()
    }
}

impl<F: PrimeField> ZkvItem<F> {
    /// Assemble a received item. Only lengths are checked; whether the
    /// values are consistent is what the proof decides.
    pub fn new(
        shape: &CircuitShape,
        o: Vec<F>,
        w: Vec<F>,
        seed_mimc3_digest: F,
        inner_product: F,
    ) -> Result<Self> {
        check_lengths(shape, &o, &w)?;
        Ok(Self {
            o,
            w,
            seed_mimc3_digest,
            inner_product,
        })
    }

    pub fn len(&self) -> usize {
        self.o.len()
    }

    pub fn is_empty(&self) -> bool {
        self.o.is_empty()
    }

    pub fn o(&self) -> &[F] {
        &self.o
    }

    pub fn w(&self) -> &[F] {
        &self.w
    }

    pub fn seed_mimc3_digest(&self) -> &F {
        &self.seed_mimc3_digest
    }

    pub fn inner_product(&self) -> &F {
        &self.inner_product
    }

    /// Public inputs in circuit order: o ‖ w ‖ digest ‖ inner_product.
    pub fn public_inputs(&self) -> Vec<F> {
        let mut inputs = Vec::with_capacity(2 * self.o.len() + 2);
        inputs.extend_from_slice(&self.o);
        inputs.extend_from_slice(&self.w);
        inputs.push(self.seed_mimc3_digest);
        inputs.push(self.inner_product);
        inputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::One;

    fn fr(v: u64) -> ZkFr {
        ZkFr::from(v)
    }

    fn params() -> CircuitParams<ZkFr> {
        CircuitParams::new(CircuitShape::new(2)).unwrap()
    }

    #[test]
    fn test_scenario_inner_product() {
        let params = params();
        let item = ZkpItem::new(&params, vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(11), fr(13)).unwrap();
        assert_eq!(*item.inner_product(), fr(41));
        assert_eq!(*item.seed_mimc3_digest(), params.digest(&fr(11), &fr(13)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = ZkpItem::new(&params(), vec![fr(3), fr(5)], vec![fr(2)], fr(1), fr(2)).unwrap_err();
        assert!(matches!(err, ZkError::LengthMismatch { o: 2, w: 1 }));

        let err = ZkvItem::new(&CircuitShape::new(2), vec![fr(3)], vec![fr(2), fr(7)], fr(0), fr(0))
            .unwrap_err();
        assert!(matches!(err, ZkError::LengthMismatch { o: 1, w: 2 }));
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let err = ZkpItem::new(
            &params(),
            vec![fr(1), fr(2), fr(3)],
            vec![fr(4), fr(5), fr(6)],
            fr(1),
            fr(2),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ZkError::ArityMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_from_parts_checks_consistency() {
        let params = params();
        let d = params.digest(&fr(11), &fr(13));
        let o = vec![fr(3), fr(5)];
        let w = vec![fr(2), fr(7)];

        ZkpItem::from_parts(&params, o.clone(), w.clone(), fr(11), fr(13), d, fr(41)).unwrap();

        let err = ZkpItem::from_parts(&params, o.clone(), w.clone(), fr(11), fr(13), d, fr(42))
            .unwrap_err();
        assert!(matches!(err, ZkError::InnerProductMismatch));

        let err = ZkpItem::from_parts(&params, o, w, fr(11), fr(13), d + ZkFr::one(), fr(41))
            .unwrap_err();
        assert!(matches!(err, ZkError::DigestMismatch));
    }

    #[test]
    fn test_public_projection() {
        let item = ZkpItem::new(&params(), vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(11), fr(13)).unwrap();
        let public = item.public();
        assert_eq!(public.o(), item.o());
        assert_eq!(public.w(), item.w());
        assert_eq!(public.seed_mimc3_digest(), item.seed_mimc3_digest());
        assert_eq!(
            public.public_inputs(),
            vec![fr(3), fr(5), fr(2), fr(7), *item.seed_mimc3_digest(), fr(41)]
        );
    }

    #[test]
    fn test_debug_redacts_seed() {
        let item = ZkpItem::new(&params(), vec![fr(3), fr(5)], vec![fr(2), fr(7)], fr(987654321), fr(13)).unwrap();
        let dbg = format!("{:?}", item);
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("987654321"));
    }
}
