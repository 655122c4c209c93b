use ethnum::U256;

mod convert;
mod encoding;
mod field;
mod lsb;

#[cfg(feature = "rand")]
mod rand_impls;

pub use lsb::Lsb;

/// A 256-bit unsigned integer
///
/// This type is a wrapper around a [`U256`], so can represent any value in the range `0..=(2^256 -
/// 1)`.
/// However, whenever it is hashed it is converted to a [`Base`], which is an integer modulo
/// "some large prime". This restricts the set of usable values to something approximating a `u254`
///
/// [`Base`]: crate::Base
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Element(#[cfg_attr(feature = "serde", serde(with = "encoding::hex_u256"))] pub(crate) U256);

impl Element {
    /// The zero element (the additive identity)
    pub const ZERO: Self = Self(U256::ZERO);

    /// The one element (the multiplicative identity)
    pub const ONE: Self = Self(U256::ONE);

    /// The largest possible element (note that this is not canonical)
    pub const MAX: Self = Self(U256::MAX);

    /// The value of an unset leaf, and of an empty slot in any tree
    pub const NULL_HASH: Self = Self::ZERO;

    /// The [`Element`] used as the initialization vector when hashing bytes
    pub(crate) const BYTE_HASH_IV: Self = Self(U256::new(2));

    /// Create a new [`Element`] from a u64
    #[inline]
    #[must_use]
    pub fn new(i: u64) -> Self {
        Self(U256::from(i))
    }

    /// Convert this [`Element`] to the underlying [`U256`]
    #[inline]
    #[must_use]
    pub fn to_u256(self) -> U256 {
        self.0
    }

    /// If this element is zero, returns true
    #[inline]
    #[must_use]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! partial_eq_impl {
    ($int:ty) => {
        impl PartialEq<$int> for Element {
            fn eq(&self, other: &$int) -> bool {
                *self == Element::from(*other)
            }
        }
    };
}

partial_eq_impl!(u32);
partial_eq_impl!(u64);
partial_eq_impl!(u128);

#[cfg(any(test, feature = "proptest"))]
pub mod proptest {
    use super::Element;
    use ::proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};
    use ethnum::U256;

    impl Arbitrary for Element {
        type Strategy = Map<StrategyFor<[u8; 32]>, fn([u8; 32]) -> Self>;
        type Parameters = ();

        fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
            any::<[u8; 32]>().prop_map(|array| Self(U256::from_be_bytes(array)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Element;

    #[test]
    fn display_is_lower_hex() {
        assert_eq!(Element::new(1).to_string(), "1");
        assert_eq!(Element::new(100).to_string(), "64");
        assert_eq!(Element::new(123).to_string(), "7b");
    }

    #[test]
    fn int_comparisons() {
        assert_eq!(Element::new(5), 5u64);
        assert_eq!(Element::new(5), 5u32);
        assert!(Element::ZERO.is_zero());
        assert!(!Element::ONE.is_zero());
    }
}
