/// Every transaction spends exactly this many notes, padding with zero-amount notes if needed
pub const UTXO_INPUTS: usize = 2;
/// Every transaction creates exactly this many notes, padding with zero-amount notes if needed
pub const UTXO_OUTPUTS: usize = 2;

/// `root, public_amount, ext_data_hash, nullifiers, commitments`
pub const TRANSACTION_PUBLIC_INPUTS: usize = 3 + UTXO_INPUTS + UTXO_OUTPUTS;

/// `source.pending, source.accounts, target.pending, target.accounts`
pub const TRANSITION_PUBLIC_INPUTS: usize = 4;
