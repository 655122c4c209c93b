use borsh::{BorshDeserialize, BorshSerialize};
use secp256k1::PublicKey;
use serde::{Deserialize, Deserializer, Serialize};
use sha3::{Digest, Keccak256};
use std::{fmt::Display, str::FromStr};

/// A 20 byte external account, the recipient of withdrawals and the source of deposits
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize,
)]
pub struct Address([u8; 20]);

#[derive(Debug, thiserror::Error)]
pub enum ParseAddressError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("expected 20 bytes, got {0}")]
    Length(usize),
}

impl Address {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_public_key(public_key: &PublicKey) -> Address {
        let serialized_pubkey = public_key.serialize_uncompressed();

        // strip the 0x04 prefix, the address is the last 20 bytes of the keccak hash
        let hashed_pubkey = Keccak256::digest(&serialized_pubkey[1..]);

        let mut address = [0u8; 20];
        address.copy_from_slice(&hashed_pubkey[hashed_pubkey.len() - 20..]);
        Self(address)
    }

    pub fn into_inner(self) -> [u8; 20] {
        self.0
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        let bytes = <[u8; 20]>::try_from(bytes.as_slice())
            .map_err(|_| ParseAddressError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.to_string(), serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = <std::string::String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_checksummed_and_plain() {
        let address: Address = "0xDeaDbeefdEAdbeefdEadbEEFdeadbeEFdEaDbeeF".parse().unwrap();
        assert_eq!(address.to_string(), "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef");

        let again: Address = "deadbeefdeadbeefdeadbeefdeadbeefdeadbeef".parse().unwrap();
        assert_eq!(address, again);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            "0xdead".parse::<Address>(),
            Err(ParseAddressError::Length(2))
        ));
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(ParseAddressError::Hex(_))
        ));
    }

    #[test]
    fn serde_uses_hex_string() {
        let address = Address::new([0xab; 20]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(20)));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), address);
    }
}
