use accumulator::MembershipWitness;
use rand::{CryptoRng, RngCore};
use zk_primitives::{hash_merge, Element};

use crate::data::{InputNote, Keypair, Note};

impl Keypair {
    pub fn new(private_key: Element) -> Self {
        Self {
            private_key,
            public_key: hash_merge([private_key, Element::ZERO]),
        }
    }

    pub fn random(rng: impl RngCore + CryptoRng) -> Self {
        Self::new(Element::secure_random(rng))
    }

    /// The owner-derived secret mixed into a nullifier
    ///
    /// Only the holder of the private key can compute this, so only they can compute the nullifier
    pub fn sign(&self, commitment: Element, index: u64) -> Element {
        hash_merge([self.private_key, commitment, Element::new(index)])
    }
}

impl core::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl Note {
    /// A fresh note with a random blinding
    pub fn new(owner: Element, amount: u64, rng: impl RngCore + CryptoRng) -> Self {
        Self::restore(owner, amount, Element::secure_random(rng))
    }

    pub fn restore(owner: Element, amount: u64, blinding: Element) -> Self {
        Self {
            amount,
            blinding,
            owner,
            index: None,
        }
    }

    /// Record where the note's commitment landed in the accumulator
    #[must_use]
    pub fn with_index(mut self, index: u64) -> Self {
        self.index = Some(index);
        self
    }

    /// A zero-amount note for an owner nobody knows the key of
    ///
    /// Blinding and owner are random, so two padding notes never share a commitment
    pub fn padding(mut rng: impl RngCore + CryptoRng) -> Self {
        let owner = Keypair::random(&mut rng).public_key;
        Self::new(owner, 0, rng)
    }

    /// Hash/commitment for the note
    pub fn commitment(&self) -> Element {
        hash_merge([Element::new(self.amount), self.owner, self.blinding])
    }

    /// The nullifier revealed when this note is spent
    ///
    /// A note without an index uses index 0, which is only meaningful for padding notes
    pub fn nullifier(&self, keypair: &Keypair) -> Element {
        let commitment = self.commitment();
        let index = self.index.unwrap_or(0);

        hash_merge([
            commitment,
            Element::new(index),
            keypair.sign(commitment, index),
        ])
    }

    pub fn is_padding(&self) -> bool {
        self.amount == 0
    }
}

impl InputNote {
    pub fn new(note: Note, keypair: Keypair, witness: MembershipWitness) -> Self {
        Self {
            note,
            keypair,
            witness: Some(witness),
        }
    }

    /// A zero-amount input with a fresh keypair, so its nullifier is unique
    pub fn padding(mut rng: impl RngCore + CryptoRng) -> Self {
        let keypair = Keypair::random(&mut rng);
        let note = Note::new(keypair.public_key, 0, rng);

        Self {
            note,
            keypair,
            witness: None,
        }
    }

    pub fn nullifier(&self) -> Element {
        self.note.nullifier(&self.keypair)
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::{rand_core::SeedableRng, ChaChaRng};
    use test_strategy::proptest;

    use super::*;

    fn rng() -> ChaChaRng {
        ChaChaRng::seed_from_u64(7)
    }

    #[test]
    fn test_serde_note() {
        let mut rng = rng();
        let keypair = Keypair::random(&mut rng);
        let note = Note::new(keypair.public_key, 100, &mut rng).with_index(3);

        let note_json = serde_json::to_string(&note).unwrap();
        let deserialized_note: Note = serde_json::from_str(&note_json).unwrap();

        assert_eq!(note, deserialized_note);
        assert_eq!(note.commitment(), deserialized_note.commitment());
    }

    #[test]
    fn commitment_binds_every_field() {
        let note = Note::restore(Element::new(1), 10, Element::new(2));

        let others = [
            Note::restore(Element::new(9), 10, Element::new(2)),
            Note::restore(Element::new(1), 11, Element::new(2)),
            Note::restore(Element::new(1), 10, Element::new(3)),
        ];

        for other in others {
            assert_ne!(note.commitment(), other.commitment());
        }

        // the index is not part of the commitment
        assert_eq!(note.commitment(), note.clone().with_index(5).commitment());
    }

    #[test]
    fn nullifier_depends_on_key_and_index() {
        let mut rng = rng();
        let keypair = Keypair::random(&mut rng);
        let other = Keypair::random(&mut rng);

        let note = Note::new(keypair.public_key, 100, &mut rng).with_index(0);

        let nullifier = note.nullifier(&keypair);
        assert_ne!(nullifier, note.nullifier(&other));
        assert_ne!(nullifier, note.clone().with_index(1).nullifier(&keypair));
        assert_eq!(nullifier, note.nullifier(&keypair));
    }

    #[test]
    fn padding_is_unique() {
        let mut rng = rng();
        let a = InputNote::padding(&mut rng);
        let b = InputNote::padding(&mut rng);

        assert!(a.note.is_padding());
        assert_ne!(a.nullifier(), b.nullifier());
        assert_ne!(Note::padding(&mut rng).commitment(), Note::padding(&mut rng).commitment());
    }

    #[test]
    fn debug_hides_private_key() {
        let keypair = Keypair::new(Element::new(0x1234_5678));
        let debug = format!("{keypair:?}");

        assert!(!debug.contains("12345678"));
        assert!(debug.contains("public_key"));
    }

    #[proptest(cases = 32)]
    fn public_key_is_deterministic(private_key: Element) {
        assert_eq!(
            Keypair::new(private_key).public_key,
            Keypair::new(private_key).public_key
        );
    }
}
