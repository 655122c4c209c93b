use crate::address::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use secp256k1::{
    ecdsa::{self, RecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::str::FromStr;

const DOMAIN: &str = "ShieldedRollup";

/// Keccak256 over the length-prefixed domain tag and the message
fn digest(msg: &[u8]) -> Message {
    let mut hasher = Keccak256::new();
    hasher.update(DOMAIN.len().to_be_bytes());
    hasher.update(DOMAIN);
    hasher.update(msg);
    Message::from_digest(hasher.finalize().into())
}

/// A recoverable secp256k1 signature: 64 compact bytes followed by the recovery id
#[derive(Debug, Clone, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(#[serde(with = "hex::serde")] pub [u8; 65]);

impl Signature {
    pub fn inner(&self) -> &[u8] {
        &self.0
    }

    /// The public key that produced this signature over `msg`, if the signature is well-formed
    pub fn recover(&self, msg: &[u8]) -> Option<PublicKey> {
        let recovery = RecoveryId::from_i32(i32::from(self.0[64])).ok()?;
        let sig = ecdsa::RecoverableSignature::from_compact(&self.0[0..64], recovery).ok()?;

        SECP256K1.recover_ecdsa(&digest(msg), &sig).ok()
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 65])
    }
}

/// Authenticates plain (non-shielded) rollup transactions
pub trait SignatureVerifier: Send + Sync {
    /// Whether `signature` is a signature over `message` by `public_key`
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// [`SignatureVerifier`] for recoverable secp256k1 signatures over a Keccak256 digest
#[derive(Debug, Default, Clone, Copy)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        signature.recover(message).as_ref() == Some(public_key)
    }
}

/// A secp256k1 key pair that can sign rollup transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl Signer {
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            public_key: PublicKey::from_secret_key(SECP256K1, &secret_key),
            secret_key,
        }
    }

    pub fn random() -> Self {
        Self::new(SecretKey::new(&mut rand::thread_rng()))
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key)
    }

    pub fn sign(&self, msg: &[u8]) -> Signature {
        let sig = SECP256K1.sign_ecdsa_recoverable(&digest(msg), &self.secret_key);
        let (recovery, compact) = sig.serialize_compact();

        let mut bytes = [0; 65];
        bytes[0..64].copy_from_slice(&compact);
        // recovery ids are always in 0..=3
        bytes[64] = recovery.to_i32() as u8;

        Signature(bytes)
    }
}

impl FromStr for Signer {
    type Err = secp256k1::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let secret_key = SecretKey::from_str(s)?;
        Ok(Self::new(secret_key))
    }
}
