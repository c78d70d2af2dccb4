use crate::{Epoch, Version};

/// Specifies a fork of the `BeaconChain`, to prevent replay attacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

impl Fork {
    /// Return the fork version of the given ``epoch``.
    pub fn get_fork_version(&self, epoch: Epoch) -> Version {
        if epoch < self.epoch {
            return self.previous_version;
        }
        self.current_version
    }
}

impl_ssz_container!(Fork {
    previous_version: Version,
    current_version: Version,
    epoch: Epoch,
});

impl_test_random_for_container!(Fork {
    previous_version,
    current_version,
    epoch
});
