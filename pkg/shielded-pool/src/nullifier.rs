use std::collections::HashSet;

use zk_primitives::Element;

use crate::{Error, Result};

/// Every nullifier the pool has ever seen
///
/// A nullifier is never removed, so a note can only be spent once
#[derive(Debug, Clone, Default)]
pub struct NullifierSet {
    spent: HashSet<Element>,
}

impl NullifierSet {
    /// An empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `nullifier` has been revealed
    #[must_use]
    pub fn is_spent(&self, nullifier: Element) -> bool {
        self.spent.contains(&nullifier)
    }

    /// Record `nullifier`, failing if it was already recorded
    pub fn mark_spent(&mut self, nullifier: Element) -> Result<()> {
        match self.spent.insert(nullifier) {
            true => Ok(()),
            false => Err(Error::AlreadySpent(nullifier)),
        }
    }

    /// Check that none of `nullifiers` are spent, and that none repeat, without recording them
    pub fn ensure_unspent(&self, nullifiers: &[Element]) -> Result<()> {
        let mut seen = HashSet::with_capacity(nullifiers.len());

        for nullifier in nullifiers {
            if self.is_spent(*nullifier) || !seen.insert(*nullifier) {
                return Err(Error::AlreadySpent(*nullifier));
            }
        }

        Ok(())
    }

    /// Record nullifiers that have passed [`NullifierSet::ensure_unspent`]
    pub fn mark_all(&mut self, nullifiers: &[Element]) {
        self.spent.extend(nullifiers);
    }

    /// The number of spent nullifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    /// Whether nothing has been spent yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_spent_once() {
        let mut set = NullifierSet::new();
        let nullifier = Element::new(1);

        assert!(!set.is_spent(nullifier));
        set.mark_spent(nullifier).unwrap();
        assert!(set.is_spent(nullifier));

        assert!(matches!(
            set.mark_spent(nullifier),
            Err(Error::AlreadySpent(n)) if n == nullifier
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn ensure_unspent_does_not_mutate() {
        let mut set = NullifierSet::new();
        set.mark_spent(Element::new(1)).unwrap();

        set.ensure_unspent(&[Element::new(2), Element::new(3)])
            .unwrap();
        assert!(!set.is_spent(Element::new(2)));

        assert!(matches!(
            set.ensure_unspent(&[Element::new(2), Element::new(1)]),
            Err(Error::AlreadySpent(n)) if n == Element::new(1)
        ));
        assert!(matches!(
            set.ensure_unspent(&[Element::new(4), Element::new(4)]),
            Err(Error::AlreadySpent(n)) if n == Element::new(4)
        ));

        set.mark_all(&[Element::new(2), Element::new(3)]);
        assert_eq!(set.len(), 3);
    }
}
