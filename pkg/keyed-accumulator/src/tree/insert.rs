use crate::{hash_merge, Element, Error, LeafHash, Tree};

impl<const DEPTH: usize, V: LeafHash> Tree<DEPTH, V> {
    /// Insert a new entry
    ///
    /// Fails with [`Error::KeyExists`] if `key` already has a value, and with
    /// [`Error::Collision`] if another key occupies the same leaf. The tree is unchanged on error.
    ///
    /// ```rust
    /// # use keyed_accumulator::*;
    /// let mut tree = Tree::<64, u64>::new();
    ///
    /// tree.insert(Element::new(1), 10).unwrap();
    ///
    /// let error = tree.insert(Element::new(1), 20).unwrap_err();
    /// assert_eq!(error, Error::KeyExists(Element::new(1)));
    /// assert_eq!(tree.get(Element::new(1)), Some(&10));
    /// ```
    pub fn insert(&mut self, key: Element, value: V) -> Result<(), Error> {
        self.ensure_insertable(key)?;
        self.write(key, value)?;
        Ok(())
    }

    /// Check that [`Tree::insert`] would succeed for `key`, without changing anything
    pub fn ensure_insertable(&self, key: Element) -> Result<(), Error> {
        if self.contains_key(key) {
            return Err(Error::KeyExists(key));
        }

        self.check_collision(key)
    }

    /// Insert or replace the value at `key`, returning the previous value
    ///
    /// ```rust
    /// # use keyed_accumulator::*;
    /// let mut tree = Tree::<64, u64>::new();
    ///
    /// assert_eq!(tree.upsert(Element::new(1), 10).unwrap(), None);
    /// assert_eq!(tree.upsert(Element::new(1), 20).unwrap(), Some(10));
    /// ```
    pub fn upsert(&mut self, key: Element, value: V) -> Result<Option<V>, Error> {
        self.write(key, value)
    }

    /// The leaf hash stored in the tree for this entry
    #[must_use]
    pub fn leaf_for(key: Element, value: &V) -> Element {
        hash_merge([key, value.leaf_hash()])
    }

    fn check_collision(&self, key: Element) -> Result<(), Error> {
        match self.tree.occupant(&key.lsb(DEPTH - 1)) {
            Some(in_tree) if in_tree != key => Err(crate::Collision {
                in_tree,
                inserted: key,
                depth: DEPTH,
            }
            .into()),
            _ => Ok(()),
        }
    }

    fn write(&mut self, key: Element, value: V) -> Result<Option<V>, Error> {
        // check first, so that a collision leaves the tree untouched
        self.check_collision(key)?;

        let bits = key.lsb(DEPTH - 1);
        let leaf = Self::leaf_for(key, &value);
        self.tree.set_without_hashing::<DEPTH>(key, leaf, &bits)?;
        self.tree.recalculate_hashes();

        Ok(self.entries.insert(key, value))
    }
}
