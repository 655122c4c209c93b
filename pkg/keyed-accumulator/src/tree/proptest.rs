use std::collections::BTreeMap;

use ::proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};

use crate::{Element, LeafHash, Tree};

/// Entries whose leaf is already taken are skipped, so the tree may hold fewer entries than
/// were generated
impl<const DEPTH: usize, V> Arbitrary for Tree<DEPTH, V>
where
    V: Arbitrary + LeafHash,
{
    type Parameters = ();
    type Strategy = Map<StrategyFor<BTreeMap<Element, V>>, fn(BTreeMap<Element, V>) -> Self>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        any::<BTreeMap<Element, V>>().prop_map(|entries| {
            let mut tree = Tree::new();
            for (key, value) in entries {
                let _ = tree.insert(key, value);
            }
            tree
        })
    }
}
