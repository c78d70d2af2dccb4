use crate::{BeaconBlockHeader, SignatureBytes};

/// A signed header of a `BeaconBlock`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: SignatureBytes,
}

impl_ssz_container!(SignedBeaconBlockHeader {
    message: BeaconBlockHeader,
    signature: SignatureBytes,
});

impl_test_random_for_container!(SignedBeaconBlockHeader { message, signature });

#[cfg(test)]
mod tests {
    use super::*;

    ssz_and_tree_hash_tests!(SignedBeaconBlockHeader);
}
