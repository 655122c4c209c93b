//! Non-field primitives: external addresses and secp256k1 signatures

pub mod address;
pub mod sig;

pub use address::Address;
pub use sig::{Secp256k1Verifier, Signature, SignatureVerifier, Signer};
