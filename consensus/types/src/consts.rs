//! Phase 0 list and vector bounds, from the mainnet preset.

pub const MAX_VALIDATORS_PER_COMMITTEE: usize = 2048;
pub const MAX_PROPOSER_SLASHINGS: usize = 16;
pub const MAX_ATTESTER_SLASHINGS: usize = 2;
pub const MAX_ATTESTATIONS: usize = 128;
pub const MAX_DEPOSITS: usize = 16;
pub const MAX_VOLUNTARY_EXITS: usize = 16;

pub const DEPOSIT_CONTRACT_TREE_DEPTH: usize = 32;
/// The deposit proof includes the mixed-in deposit count.
pub const DEPOSIT_PROOF_LEN: usize = DEPOSIT_CONTRACT_TREE_DEPTH + 1;
