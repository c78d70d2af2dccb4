use crate::SignedBeaconBlockHeader;

/// Two conflicting proposals from the same proposer (validator).
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

impl ProposerSlashing {
    /// Get proposer index, assuming slashing validity has already been checked.
    pub fn proposer_index(&self) -> u64 {
        self.signed_header_1.message.proposer_index
    }
}

impl_ssz_container!(ProposerSlashing {
    signed_header_1: SignedBeaconBlockHeader,
    signed_header_2: SignedBeaconBlockHeader,
});

impl_test_random_for_container!(ProposerSlashing {
    signed_header_1,
    signed_header_2
});

#[cfg(test)]
mod tests {
    use super::*;

    ssz_and_tree_hash_tests!(ProposerSlashing);
}
