use std::ops::Deref;

use bitvec::{
    prelude::{BitArray, Msb0},
    slice::BitSlice,
};

use crate::Element;

/// A handle to the `count` least significant bits of an element
///
/// Sparse trees use these bits as the position of a key: the first bit chooses the child of the
/// root, the last bit chooses the leaf. Two keys with equal [`Lsb`]s occupy the same slot.
#[derive(Debug, Clone, Copy)]
#[doc(alias = "least_significant_bits")]
pub struct Lsb {
    /// All the bits of the element, most significant first
    bits: BitArray<[u8; 32], Msb0>,
    count: usize,
}

impl Lsb {
    /// The bits as a [`BitSlice`], root-first
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &BitSlice<u8, Msb0> {
        &self.bits[self.bits.len() - self.count..]
    }

    /// The bits in leaf-first order, which is the order siblings of a merkle path are stored in
    #[must_use]
    pub fn leaf_first(&self) -> Vec<bool> {
        self.as_slice().iter().by_vals().rev().collect()
    }
}

impl PartialEq for Lsb {
    #[inline]
    fn eq(&self, other: &Lsb) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Lsb {}

impl std::hash::Hash for Lsb {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl Deref for Lsb {
    type Target = BitSlice<u8, Msb0>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl Element {
    /// Get the `count` least significant bits, most significant first
    ///
    /// ```rust
    /// # use zk_primitives::*;
    /// let element = Element::new(5);  // 0b000...000101
    /// let bits: Vec<bool> = element.lsb(4).iter().by_vals().collect();
    ///
    /// assert_eq!(bits, vec![false, true, false, true]);
    /// ```
    #[doc(alias = "least_significant_bits")]
    #[inline]
    #[must_use]
    pub fn lsb(&self, count: usize) -> Lsb {
        assert!(count <= 256, "an element only has 256 bits");

        Lsb {
            bits: BitArray::new(self.0.to_be_bytes()),
            count,
        }
    }
}
