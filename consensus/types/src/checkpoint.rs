use crate::{Epoch, Hash256};

/// Casper FFG checkpoint, used in attestations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Hash256,
}

impl_ssz_container!(Checkpoint {
    epoch: Epoch,
    root: Hash256,
});

impl_test_random_for_container!(Checkpoint { epoch, root });
