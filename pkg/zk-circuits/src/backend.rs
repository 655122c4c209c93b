//! The seam between statements and proof systems

use rand::{CryptoRng, RngCore};
use zk_primitives::{hash_merge, Element};

use crate::{CircuitKind, Error, Proof, Result};

/// A statement that can be proven
pub trait Provable {
    /// Which circuit this statement belongs to
    fn kind(&self) -> CircuitKind;

    /// The values a verifier sees, in circuit order
    fn public_inputs(&self) -> Vec<Element>;

    /// The witness, flattened into elements
    fn private_inputs(&self) -> Vec<Element>;

    /// Check every constraint of the circuit against the witness
    ///
    /// A proof backend must refuse to prove a statement for which this fails
    fn check_constraints(&self) -> Result<()>;
}

/// Something that can produce and check proofs of [`Provable`] statements
pub trait ProofBackend: Send + Sync {
    /// Prove `statement`, failing with [`Error::Constraint`] if it is not satisfied
    fn prove(&self, statement: &dyn Provable) -> Result<Proof>;

    /// Check that `proof` attests to a statement of `kind` with these public inputs
    fn verify(&self, kind: CircuitKind, public_inputs: &[Element], proof: &Proof) -> Result<()>;
}

/// A proof backend that attests to statements it has checked itself
///
/// A proof is a keyed Poseidon transcript over the circuit kind and the public inputs. The key
/// never leaves the backend, so a proof can only come from [`TranscriptBackend::prove`], which
/// only signs statements whose constraints hold. Anyone holding the same backend can verify.
///
/// ```rust
/// # use zk_circuits::*;
/// struct IsEven(u64);
///
/// impl Provable for IsEven {
///     fn kind(&self) -> CircuitKind { CircuitKind::RollupMerge }
///     fn public_inputs(&self) -> Vec<Element> { vec![Element::ZERO; 4] }
///     fn private_inputs(&self) -> Vec<Element> { vec![Element::new(self.0)] }
///     fn check_constraints(&self) -> Result<()> {
///         match self.0 % 2 {
///             0 => Ok(()),
///             _ => Err(Error::Constraint("odd".to_string())),
///         }
///     }
/// }
///
/// let backend = TranscriptBackend::new(Element::new(42));
///
/// let proof = backend.prove(&IsEven(2)).unwrap();
/// backend.verify(CircuitKind::RollupMerge, &[Element::ZERO; 4], &proof).unwrap();
///
/// assert!(backend.prove(&IsEven(3)).is_err());
/// ```
#[derive(Clone)]
pub struct TranscriptBackend {
    key: Element,
}

impl TranscriptBackend {
    pub fn new(key: Element) -> Self {
        Self { key }
    }

    pub fn random(rng: impl RngCore + CryptoRng) -> Self {
        Self::new(Element::secure_random(rng))
    }

    fn transcript(&self, kind: CircuitKind, public_inputs: &[Element]) -> Element {
        let len = Element::new(public_inputs.len() as u64);
        let start = hash_merge([self.key, kind.tag(), len]);

        public_inputs
            .iter()
            .fold(start, |acc, input| hash_merge([acc, *input]))
    }
}

impl core::fmt::Debug for TranscriptBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TranscriptBackend").finish_non_exhaustive()
    }
}

impl ProofBackend for TranscriptBackend {
    fn prove(&self, statement: &dyn Provable) -> Result<Proof> {
        statement.check_constraints()?;

        let kind = statement.kind();
        let public_inputs = statement.public_inputs();
        check_input_count(kind, &public_inputs)?;

        let tag = self.transcript(kind, &public_inputs);
        Ok(Proof::new(tag.to_be_bytes().to_vec()))
    }

    fn verify(&self, kind: CircuitKind, public_inputs: &[Element], proof: &Proof) -> Result<()> {
        check_input_count(kind, public_inputs)?;

        let bytes: [u8; 32] = proof
            .as_bytes()
            .try_into()
            .map_err(|_| Error::Encoding(format!("proof is {} bytes", proof.as_bytes().len())))?;

        match Element::from_be_bytes(bytes) == self.transcript(kind, public_inputs) {
            true => Ok(()),
            false => Err(Error::InvalidProof(kind)),
        }
    }
}

fn check_input_count(kind: CircuitKind, public_inputs: &[Element]) -> Result<()> {
    let expected = kind.public_input_count();

    match public_inputs.len() == expected {
        true => Ok(()),
        false => Err(Error::Encoding(format!(
            "{kind} expects {expected} public inputs, got {}",
            public_inputs.len()
        ))),
    }
}
