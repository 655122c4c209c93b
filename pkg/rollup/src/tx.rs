use primitives::{Signature, Signer};
use secp256k1::PublicKey;

/// A signed transfer between two plain accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupTransaction {
    /// The sender, who signs the transaction
    pub from: PublicKey,
    /// The receiver, whose account is created if needed
    pub to: PublicKey,
    /// The amount moved
    pub amount: u64,
    /// Must equal the sender's current nonce
    pub nonce: u32,
}

impl RollupTransaction {
    /// A transfer of `amount` from `from` to `to`
    #[must_use]
    pub fn new(from: PublicKey, to: PublicKey, amount: u64, nonce: u32) -> Self {
        Self {
            from,
            to,
            amount,
            nonce,
        }
    }

    /// The bytes the sender signs: both compressed keys, then the big-endian amount and nonce
    #[must_use]
    pub fn message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(33 + 33 + 8 + 4);
        message.extend_from_slice(&self.from.serialize());
        message.extend_from_slice(&self.to.serialize());
        message.extend_from_slice(&self.amount.to_be_bytes());
        message.extend_from_slice(&self.nonce.to_be_bytes());
        message
    }

    /// Sign [`RollupTransaction::message`]
    #[must_use]
    pub fn sign(&self, signer: &Signer) -> Signature {
        signer.sign(&self.message())
    }
}

#[cfg(test)]
mod tests {
    use primitives::{Secp256k1Verifier, SignatureVerifier};

    use super::*;

    #[test]
    fn signature_covers_every_field() {
        let alice = Signer::random();
        let bob = Signer::random();

        let tx = RollupTransaction::new(alice.public_key(), bob.public_key(), 5, 0);
        let sig = tx.sign(&alice);

        assert!(Secp256k1Verifier.verify(&alice.public_key(), &tx.message(), &sig));

        let altered = [
            RollupTransaction { amount: 6, ..tx },
            RollupTransaction { nonce: 1, ..tx },
            RollupTransaction { to: alice.public_key(), ..tx },
        ];

        for other in altered {
            assert!(!Secp256k1Verifier.verify(&alice.public_key(), &other.message(), &sig));
        }
    }
}
