use crate::{Checkpoint, CommitteeIndex, Hash256, Slot};

/// The data upon which an attestation is based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AttestationData {
    pub slot: Slot,
    pub index: CommitteeIndex,

    // LMD GHOST vote
    pub beacon_block_root: Hash256,

    // FFG Vote
    pub source: Checkpoint,
    pub target: Checkpoint,
}

impl_ssz_container!(AttestationData {
    slot: Slot,
    index: CommitteeIndex,
    beacon_block_root: Hash256,
    source: Checkpoint,
    target: Checkpoint,
});

impl_test_random_for_container!(AttestationData {
    slot,
    index,
    beacon_block_root,
    source,
    target
});
