use std::fmt::{Debug, Display, LowerHex, UpperHex};

use ethnum::U256;

use crate::Element;

macro_rules! fmt_impl {
    ($t:ident, $u:ident) => {
        impl $u for Element {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                <U256 as $t>::fmt(&self.0, f)
            }
        }
    };
}

fmt_impl!(LowerHex, Display);
fmt_impl!(LowerHex, Debug);
fmt_impl!(LowerHex, LowerHex);
fmt_impl!(UpperHex, UpperHex);

/// Elements are encoded as 32 big-endian bytes with borsh
#[cfg(feature = "borsh")]
mod borsh_impls {
    use borsh::{BorshDeserialize, BorshSerialize};
    use ethnum::U256;

    use crate::Element;

    impl BorshSerialize for Element {
        fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
            writer.write_all(&self.0.to_be_bytes())
        }
    }

    impl BorshDeserialize for Element {
        fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
            let mut bytes = [0; 32];
            reader.read_exact(&mut bytes)?;
            Ok(Self(U256::from_be_bytes(bytes)))
        }
    }
}

/// Elements are encoded as 0x-prefixed hex strings with serde
#[cfg(feature = "serde")]
pub(super) mod hex_u256 {
    use ethnum::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(u: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(u.to_be_bytes())))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);

        // shorter strings are allowed, they are left-padded with zeroes
        if s.len() > 64 {
            return Err(serde::de::Error::custom("hex string longer than 32 bytes"));
        }

        U256::from_str_radix(s, 16).map_err(serde::de::Error::custom)
    }
}
