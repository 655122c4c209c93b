use rand::{CryptoRng, RngCore};

use crate::Element;

impl Element {
    /// Generate a uniformly-ish random canonical element
    ///
    /// The 256 random bits are reduced modulo [`Element::MODULUS`]. The bias this introduces is
    /// negligible for blinding factors and private keys.
    ///
    /// ```rust
    /// # use zk_primitives::*;
    /// let element = Element::secure_random(rand::thread_rng());
    /// assert!(element.is_canonical());
    /// ```
    #[must_use]
    pub fn secure_random<R: RngCore + CryptoRng>(mut rng: R) -> Self {
        let mut bytes = [0; 32];
        rng.fill_bytes(&mut bytes);

        let mut element = Self::from_be_bytes(bytes);
        element.canonicalize();
        element
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

    use super::*;

    #[test]
    fn random_elements_are_canonical_and_distinct() {
        let mut rng = ChaChaRng::from_seed([7; 32]);

        let a = Element::secure_random(&mut rng);
        let b = Element::secure_random(&mut rng);

        assert!(a.is_canonical());
        assert!(b.is_canonical());
        assert_ne!(a, b);
    }
}
