use zk_primitives::Element;

use crate::{
    data::{InputNote, Keypair, Note, Transaction, TransactionPublicInputs},
    CircuitKind, Error, Provable, Result, UTXO_INPUTS, UTXO_OUTPUTS,
};

#[cfg(test)]
mod tests;

impl TransactionPublicInputs {
    pub fn to_vec(&self) -> Vec<Element> {
        let mut inputs = vec![self.root, self.public_amount, self.ext_data_hash];
        inputs.extend(self.nullifiers);
        inputs.extend(self.commitments);
        inputs
    }

    pub fn from_slice(inputs: &[Element]) -> Result<Self> {
        let expected = CircuitKind::Transaction.public_input_count();
        if inputs.len() != expected {
            return Err(Error::Encoding(format!(
                "expected {expected} transaction public inputs, got {}",
                inputs.len()
            )));
        }

        let (head, rest) = inputs.split_at(3);
        let (nullifiers, commitments) = rest.split_at(UTXO_INPUTS);

        Ok(Self {
            root: head[0],
            public_amount: head[1],
            ext_data_hash: head[2],
            nullifiers: core::array::from_fn(|i| nullifiers[i]),
            commitments: core::array::from_fn(|i| commitments[i]),
        })
    }
}

impl Transaction {
    pub fn new(
        inputs: [InputNote; UTXO_INPUTS],
        outputs: [Note; UTXO_OUTPUTS],
        root: Element,
        public_amount: Element,
        ext_data_hash: Element,
    ) -> Self {
        Self {
            inputs,
            outputs,
            root,
            public_amount,
            ext_data_hash,
        }
    }

    pub fn nullifiers(&self) -> [Element; UTXO_INPUTS] {
        core::array::from_fn(|i| self.inputs[i].nullifier())
    }

    pub fn commitments(&self) -> [Element; UTXO_OUTPUTS] {
        core::array::from_fn(|i| self.outputs[i].commitment())
    }

    pub fn public(&self) -> TransactionPublicInputs {
        TransactionPublicInputs {
            root: self.root,
            public_amount: self.public_amount,
            ext_data_hash: self.ext_data_hash,
            nullifiers: self.nullifiers(),
            commitments: self.commitments(),
        }
    }

    fn check_input(&self, position: usize, input: &InputNote) -> Result<()> {
        let note = &input.note;

        // the public key is derived here, a claimed `keypair.public_key` proves nothing
        if Keypair::new(input.keypair.private_key).public_key != note.owner {
            return Err(Error::constraint(format!(
                "input {position} is not owned by the spending key"
            )));
        }

        let Some(witness) = &input.witness else {
            return match note.is_padding() {
                true => Ok(()),
                false => Err(Error::constraint(format!(
                    "input {position} has no membership witness"
                ))),
            };
        };

        if witness.leaf != note.commitment() {
            return Err(Error::constraint(format!(
                "input {position} witness is for a different commitment"
            )));
        }

        if note.index != Some(witness.index) {
            return Err(Error::constraint(format!(
                "input {position} index does not match its witness"
            )));
        }

        if !witness.verify(self.root) {
            return Err(Error::constraint(format!(
                "input {position} is not included under root {}",
                self.root
            )));
        }

        Ok(())
    }
}

impl Provable for Transaction {
    fn kind(&self) -> CircuitKind {
        CircuitKind::Transaction
    }

    fn public_inputs(&self) -> Vec<Element> {
        self.public().to_vec()
    }

    fn private_inputs(&self) -> Vec<Element> {
        let mut private = Vec::new();

        for input in &self.inputs {
            let note = &input.note;
            private.extend([
                Element::new(note.amount),
                note.blinding,
                note.owner,
                input.keypair.private_key,
                Element::new(note.index.unwrap_or(0)),
            ]);

            if let Some(witness) = &input.witness {
                private.extend(&witness.siblings);
            }
        }

        for note in &self.outputs {
            private.extend([Element::new(note.amount), note.blinding, note.owner]);
        }

        private
    }

    fn check_constraints(&self) -> Result<()> {
        for (position, input) in self.inputs.iter().enumerate() {
            self.check_input(position, input)?;
        }

        let [first, second] = self.nullifiers();
        if first == second {
            return Err(Error::constraint("input nullifiers must be distinct"));
        }

        let add = |acc: Element, amount: u64| acc.field_add(Element::new(amount));

        let inputs = self
            .inputs
            .iter()
            .map(|input| input.note.amount)
            .fold(Element::ZERO, add);
        let outputs = self
            .outputs
            .iter()
            .map(|note| note.amount)
            .fold(Element::ZERO, add);

        if inputs.field_add(self.public_amount) != outputs {
            return Err(Error::constraint(
                "inputs plus public amount must equal outputs",
            ));
        }

        Ok(())
    }
}
