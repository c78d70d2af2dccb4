use crate::Hash256;

/// Contains data obtained from the Eth1 chain.
#[derive(Debug, PartialEq, Clone, Default, Eq, Hash)]
pub struct Eth1Data {
    pub deposit_root: Hash256,
    pub deposit_count: u64,
    pub block_hash: Hash256,
}

impl_ssz_container!(Eth1Data {
    deposit_root: Hash256,
    deposit_count: u64,
    block_hash: Hash256,
});

impl_test_random_for_container!(Eth1Data {
    deposit_root,
    deposit_count,
    block_hash
});
