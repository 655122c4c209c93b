use std::sync::OnceLock;

use ethnum::U256;
use halo2curves_axiom::ff::Field;
use poseidon_primitives::poseidon::primitives::{ConstantLength, Hash, Spec};

use crate::{Base, Element};

const WIDTH: usize = 3;
const RATE: usize = 2;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 57;

type RoundConstants = (Vec<[Base; WIDTH]>, [[Base; WIDTH]; WIDTH], [[Base; WIDTH]; WIDTH]);

/// Poseidon with the x^5 sbox, 8 full rounds and 57 partial rounds
///
/// Round constants come from the Grain LFSR, which is slow enough that we only want to run it
/// once per process, so they are cached in [`PoolSpec::constants`]
#[derive(Debug, Clone, Copy)]
struct PoolSpec;

/// Same parameters as [`PoolSpec`], but uses the default (uncached) constant generation
#[derive(Debug, Clone, Copy)]
struct GrainSpec;

macro_rules! spec_params {
    () => {
        fn full_rounds() -> usize {
            FULL_ROUNDS
        }

        fn partial_rounds() -> usize {
            PARTIAL_ROUNDS
        }

        fn sbox(val: Base) -> Base {
            val.pow_vartime([5])
        }

        fn secure_mds() -> usize {
            0
        }
    };
}

impl Spec<Base, WIDTH, RATE> for GrainSpec {
    spec_params!();
}

impl Spec<Base, WIDTH, RATE> for PoolSpec {
    spec_params!();

    fn constants() -> RoundConstants {
        static CONSTANTS: OnceLock<RoundConstants> = OnceLock::new();
        CONSTANTS.get_or_init(GrainSpec::constants).clone()
    }
}

/// Hash `N` elements together
///
/// Tree nodes are `hash_merge([left, right])`, note commitments are
/// `hash_merge([amount, owner, blinding])`, and so on. Inputs are reduced into the field first,
/// so two elements that only differ by a multiple of [`Element::MODULUS`] hash identically.
///
/// ```rust
/// # use zk_primitives::*;
/// let a = hash_merge([Element::new(1), Element::new(2)]);
/// let b = hash_merge([Element::new(1), Element::new(3)]);
/// let c = hash_merge([Element::new(1), Element::new(2), Element::new(3)]);
///
/// assert_ne!(a, b);
/// assert_ne!(a, c);
/// ```
/// The order of the inputs matters:
/// ```rust
/// # use zk_primitives::*;
/// let a = Element::new(1);
/// let b = Element::new(2);
///
/// assert_ne!(hash_merge([a, b]), hash_merge([b, a]));
/// ```
#[inline]
#[must_use]
pub fn hash_merge<const N: usize>(elements: [Element; N]) -> Element {
    let hash = Hash::<Base, PoolSpec, ConstantLength<N>, WIDTH, RATE>::init()
        .hash(elements.map(Element::to_base));

    Element::from_base(hash)
}

/// Hash a slice of bytes
///
/// Bytes are absorbed 16 at a time, each chunk is chained onto the running hash with
/// [`hash_merge`]. The empty slice hashes to [`Element::BYTE_HASH_IV`].
///
/// ```rust
/// # use zk_primitives::*;
/// let hash_1 = hash_bytes(&[1, 2, 3, 4]);
/// let hash_2 = hash_bytes(&[1, 2, 3, 5]);
///
/// assert_ne!(hash_1, hash_2);
/// ```
#[inline]
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> Element {
    bytes
        .chunks(core::mem::size_of::<u128>())
        .map(chunk_to_element)
        .fold(Element::BYTE_HASH_IV, |acc, chunk| hash_merge([acc, chunk]))
}

/// Convert a chunk of `1..=16` bytes to an [`Element`], padding the low bytes with zeroes
///
/// The chunk length is mixed into the top bits so that `[0]` and `[0, 0]` don't collide
fn chunk_to_element(bytes: &[u8]) -> Element {
    let mut padded = [0; 16];
    padded[..bytes.len()].copy_from_slice(bytes);

    let value = U256::from(u128::from_be_bytes(padded));
    let length = U256::from(bytes.len() as u64) << 128;

    Element::from(value | length)
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand_chacha::{rand_core::SeedableRng, ChaChaRng};
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn hash_merge_is_deterministic() {
        let mut rng = ChaChaRng::from_seed([0; 32]);

        for _ in 0..20 {
            let left = Element::secure_random(&mut rng);
            let right = Element::secure_random(&mut rng);

            assert_eq!(hash_merge([left, right]), hash_merge([left, right]));
            assert_ne!(hash_merge([left, right]), hash_merge([right, left]));
        }
    }

    #[test]
    fn hash_output_is_canonical() {
        let hash = hash_merge([Element::MAX, Element::MAX]);
        assert!(hash.is_canonical());
    }

    #[test]
    fn merge_of_zeros_is_not_zero() {
        assert_ne!(hash_merge([Element::ZERO, Element::ZERO]), Element::ZERO);
        assert_ne!(
            hash_merge([Element::ZERO, Element::ZERO]),
            hash_merge([Element::ZERO, Element::ZERO, Element::ZERO]),
        );
    }

    #[test]
    fn hash_bytes_separates_lengths() {
        assert_eq!(hash_bytes(&[]), Element::BYTE_HASH_IV);
        assert_ne!(hash_bytes(&[0]), hash_bytes(&[0, 0]));
        assert_ne!(hash_bytes(&[0; 16]), hash_bytes(&[0; 17]));
    }

    #[test]
    fn hash_bytes_random_inputs_differ() {
        let mut rng = ChaChaRng::from_seed([1; 32]);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..32 {
            let mut bytes = [0u8; 40];
            rng.fill(&mut bytes);
            assert!(seen.insert(hash_bytes(&bytes)));
        }
    }

    #[proptest(cases = 32)]
    fn reduced_inputs_hash_identically(element: Element) {
        let mut canonical = element;
        canonical.canonicalize();

        assert_eq!(
            hash_merge([element, Element::ONE]),
            hash_merge([canonical, Element::ONE])
        );
    }
}
