use crate::{Hash256, SignatureBytes, SignedBeaconBlockHeader, Slot, ValidatorIndex};
use tree_hash::TreeHash;

/// A header of a `BeaconBlock`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Default)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body_root: Hash256,
}

impl BeaconBlockHeader {
    /// Returns the `tree_hash_root` of the header.
    pub fn canonical_root(&self) -> Result<Hash256, tree_hash::Error> {
        self.tree_hash_root()
    }

    /// Attach a signature to the header, consuming it.
    pub fn into_signed(self, signature: SignatureBytes) -> SignedBeaconBlockHeader {
        SignedBeaconBlockHeader {
            message: self,
            signature,
        }
    }
}

impl_ssz_container!(BeaconBlockHeader {
    slot: Slot,
    proposer_index: ValidatorIndex,
    parent_root: Hash256,
    state_root: Hash256,
    body_root: Hash256,
});

impl_test_random_for_container!(BeaconBlockHeader {
    slot,
    proposer_index,
    parent_root,
    state_root,
    body_root
});
