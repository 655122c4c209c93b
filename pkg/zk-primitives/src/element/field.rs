use ethnum::{uint, U256};
use halo2curves_axiom::ff::PrimeField;

use crate::{hash_merge, Base, Element};

impl Element {
    /// The modulus of the underlying prime field (the BN254 scalar field)
    pub const MODULUS: Element = Element(uint!(
        "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001"
    ));

    /// Return the result of hash-merging this value with `other`
    ///
    /// This element is considered to be on the left:
    /// ```rust
    /// # use zk_primitives::*;
    /// let a = Element::new(1);
    /// let b = Element::new(2);
    ///
    /// assert_eq!(a.hashed_with(b), hash_merge([a, b]));
    /// ```
    #[inline]
    #[must_use = "this function doesn't modify self"]
    pub fn hashed_with(self, other: Element) -> Self {
        hash_merge([self, other])
    }

    /// Convert this [`Element`] to its equivalent [`Base`] representation
    ///
    /// Non-canonical elements are reduced first
    #[inline]
    #[must_use]
    pub fn to_base(self) -> Base {
        let mut canonical = self;
        canonical.canonicalize();

        let mut repr = <Base as PrimeField>::Repr::default();
        repr.as_mut().copy_from_slice(&canonical.0.to_le_bytes());

        Option::from(Base::from_repr(repr)).expect("canonical elements are valid field elements")
    }

    /// Create an [`Element`] from a [`Base`]
    #[inline]
    #[must_use]
    pub fn from_base(base: Base) -> Element {
        let repr = base.to_repr();
        let mut bytes = [0; 32];
        bytes.copy_from_slice(repr.as_ref());
        Self(U256::from_le_bytes(bytes))
    }

    /// Reduce this element to its canonical form
    ///
    /// Elements in canonical form are guaranteed to be unchanged when converting to/from a [`Base`]
    #[inline]
    pub fn canonicalize(&mut self) {
        self.0 %= Self::MODULUS.0;
    }

    /// Whether this [`Element`] is in its canonical form (i.e. less than [`Element::MODULUS`])
    #[inline]
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.0 < Self::MODULUS.0
    }

    /// Addition modulo [`Element::MODULUS`]
    #[inline]
    #[must_use]
    pub fn field_add(self, other: Element) -> Element {
        Self::from_base(self.to_base() + other.to_base())
    }

    /// Subtraction modulo [`Element::MODULUS`]
    ///
    /// ```rust
    /// # use zk_primitives::*;
    /// let minus_one = Element::ZERO.field_sub(Element::ONE);
    /// assert_eq!(minus_one.field_add(Element::ONE), Element::ZERO);
    /// assert!(minus_one.is_canonical());
    /// ```
    #[inline]
    #[must_use]
    pub fn field_sub(self, other: Element) -> Element {
        Self::from_base(self.to_base() - other.to_base())
    }

    /// Additive inverse modulo [`Element::MODULUS`]
    #[inline]
    #[must_use]
    pub fn field_neg(self) -> Element {
        Self::from_base(-self.to_base())
    }
}

impl From<Base> for Element {
    fn from(value: Base) -> Self {
        Element::from_base(value)
    }
}

impl From<Element> for Base {
    fn from(value: Element) -> Self {
        value.to_base()
    }
}
