use accumulator::Accumulator;
use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

use crate::{
    backend::{ProofBackend, TranscriptBackend},
    data::{InputNote, Keypair, Note, Transaction, TransactionPublicInputs},
    CircuitKind, Element, Error, Provable,
};

struct Setup {
    rng: ChaChaRng,
    tree: Accumulator,
    keypair: Keypair,
}

impl Setup {
    fn new() -> Self {
        let mut rng = ChaChaRng::seed_from_u64(1);
        let keypair = Keypair::random(&mut rng);

        Self {
            rng,
            tree: Accumulator::new(8, 4).unwrap(),
            keypair,
        }
    }

    /// Insert a note for `keypair`
    fn deposit(&mut self, amount: u64) -> Note {
        let note = Note::new(self.keypair.public_key, amount, &mut self.rng);
        let index = self.tree.insert(note.commitment()).unwrap();

        note.with_index(index)
    }

    /// A spendable input, with a witness against the current root
    fn spend(&self, note: Note) -> InputNote {
        let index = note.index.unwrap();
        let witness = self.tree.get_path(index).unwrap();

        InputNote::new(note, self.keypair.clone(), witness)
    }

    /// Deposit and immediately spend
    fn input(&mut self, amount: u64) -> InputNote {
        let note = self.deposit(amount);
        self.spend(note)
    }

    fn output(&mut self, amount: u64) -> Note {
        let owner = Keypair::random(&mut self.rng).public_key;
        Note::new(owner, amount, &mut self.rng)
    }

    fn padding_input(&mut self) -> InputNote {
        InputNote::padding(&mut self.rng)
    }
}

fn public_amount(deposit: u64, withdrawal: u64) -> Element {
    Element::new(deposit).field_sub(Element::new(withdrawal))
}

#[test]
fn transfer_satisfies_constraints() {
    let mut setup = Setup::new();
    let a = setup.deposit(30);
    let b = setup.deposit(20);
    let (a, b) = (setup.spend(a), setup.spend(b));
    let outputs = [setup.output(45), setup.output(5)];

    let tx = Transaction::new(
        [a, b],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    tx.check_constraints().unwrap();
    assert_eq!(tx.public_inputs().len(), 7);
}

#[test]
fn deposit_and_withdrawal_balance_through_public_amount() {
    let mut setup = Setup::new();

    let inputs = [setup.padding_input(), setup.padding_input()];
    let outputs = [setup.output(80), setup.output(0)];
    let deposit = Transaction::new(
        inputs,
        outputs,
        setup.tree.root(),
        public_amount(80, 0),
        Element::ZERO,
    );
    deposit.check_constraints().unwrap();

    let input = setup.input(80);
    let inputs = [input, setup.padding_input()];
    let outputs = [setup.output(30), setup.output(0)];
    let withdrawal = Transaction::new(
        inputs,
        outputs,
        setup.tree.root(),
        public_amount(0, 50),
        Element::ZERO,
    );
    withdrawal.check_constraints().unwrap();
}

#[test]
fn unbalanced_transaction_fails() {
    let mut setup = Setup::new();
    let input = setup.input(10);
    let inputs = [input, setup.padding_input()];
    let outputs = [setup.output(11), setup.output(0)];

    let tx = Transaction::new(
        inputs,
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    assert!(matches!(tx.check_constraints(), Err(Error::Constraint(_))));
}

#[test]
fn input_must_be_in_tree() {
    let mut setup = Setup::new();
    let mut input = setup.input(10);

    // same witness, but for a note that was never inserted
    input.note.amount = 11;
    let outputs = [setup.output(11), setup.output(0)];
    let tx = Transaction::new(
        [input, setup.padding_input()],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    assert!(matches!(tx.check_constraints(), Err(Error::Constraint(_))));
}

#[test]
fn root_must_match_witness() {
    let mut setup = Setup::new();
    let input = setup.input(10);
    let outputs = [setup.output(10), setup.output(0)];

    let tx = Transaction::new(
        [input, setup.padding_input()],
        outputs,
        Element::new(12345),
        Element::ZERO,
        Element::ZERO,
    );

    assert!(matches!(tx.check_constraints(), Err(Error::Constraint(_))));
}

#[test]
fn input_must_be_owned_by_key() {
    let mut setup = Setup::new();
    let mut input = setup.input(10);
    input.keypair = Keypair::random(&mut setup.rng);
    let outputs = [setup.output(10), setup.output(0)];

    let tx = Transaction::new(
        [input, setup.padding_input()],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    assert!(matches!(tx.check_constraints(), Err(Error::Constraint(_))));
}

#[test]
fn claimed_public_key_without_private_key_is_rejected() {
    let mut setup = Setup::new();
    let input = setup.input(10);
    let owner = setup.keypair.public_key;

    for i in 0..3 {
        let mut stolen = input.clone();
        stolen.keypair = Keypair {
            private_key: Element::new(1000 + i),
            public_key: owner,
        };

        let outputs = [setup.output(10), setup.output(0)];
        let tx = Transaction::new(
            [stolen, setup.padding_input()],
            outputs,
            setup.tree.root(),
            Element::ZERO,
            Element::ZERO,
        );

        assert_eq!(
            tx.check_constraints(),
            Err(Error::Constraint(
                "input 0 is not owned by the spending key".to_string()
            ))
        );
    }
}

#[test]
fn padding_input_must_be_owned_too() {
    let mut setup = Setup::new();
    let input = setup.input(10);

    let mut padding = setup.padding_input();
    padding.keypair.private_key = Element::new(5);
    let outputs = [setup.output(10), setup.output(0)];

    let tx = Transaction::new(
        [input, padding],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    assert!(matches!(tx.check_constraints(), Err(Error::Constraint(_))));
}

#[test]
fn same_note_twice_is_rejected() {
    let mut setup = Setup::new();
    let input = setup.input(10);
    let outputs = [setup.output(20), setup.output(0)];

    let tx = Transaction::new(
        [input.clone(), input],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    assert_eq!(
        tx.check_constraints(),
        Err(Error::Constraint(
            "input nullifiers must be distinct".to_string()
        ))
    );
}

#[test]
fn non_zero_input_needs_a_witness() {
    let mut setup = Setup::new();
    let mut input = setup.input(10);
    input.witness = None;
    let outputs = [setup.output(10), setup.output(0)];

    let tx = Transaction::new(
        [input, setup.padding_input()],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::ZERO,
    );

    assert!(matches!(tx.check_constraints(), Err(Error::Constraint(_))));
}

#[test]
fn proof_round_trip_through_backend() {
    let mut setup = Setup::new();
    let backend = TranscriptBackend::random(&mut setup.rng);

    let input = setup.input(10);
    let outputs = [setup.output(7), setup.output(3)];
    let tx = Transaction::new(
        [input, setup.padding_input()],
        outputs,
        setup.tree.root(),
        Element::ZERO,
        Element::new(99),
    );

    let proof = backend.prove(&tx).unwrap();
    let public = tx.public();

    backend
        .verify(CircuitKind::Transaction, &public.to_vec(), &proof)
        .unwrap();

    let decoded = TransactionPublicInputs::from_slice(&public.to_vec()).unwrap();
    assert_eq!(decoded, public);

    let mut tampered = public;
    tampered.ext_data_hash = Element::new(100);
    assert_eq!(
        backend.verify(CircuitKind::Transaction, &tampered.to_vec(), &proof),
        Err(Error::InvalidProof(CircuitKind::Transaction))
    );
}

#[test]
fn public_inputs_need_the_right_length() {
    assert!(matches!(
        TransactionPublicInputs::from_slice(&[Element::ZERO; 6]),
        Err(Error::Encoding(_))
    ));
}
