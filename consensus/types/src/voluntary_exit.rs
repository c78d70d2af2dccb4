use crate::{Epoch, ValidatorIndex};

/// An exit voluntarily submitted a validator who wishes to withdraw.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct VoluntaryExit {
    /// Earliest epoch when voluntary exit can be processed.
    pub epoch: Epoch,
    pub validator_index: ValidatorIndex,
}

impl_ssz_container!(VoluntaryExit {
    epoch: Epoch,
    validator_index: ValidatorIndex,
});

impl_test_random_for_container!(VoluntaryExit {
    epoch,
    validator_index
});

#[cfg(test)]
mod tests {
    use super::*;

    ssz_and_tree_hash_tests!(VoluntaryExit);
}
