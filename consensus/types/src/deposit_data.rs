use crate::{Gwei, Hash256, PublicKeyBytes, SignatureBytes};

/// The data supplied by the user to the deposit contract.
#[derive(Debug, PartialEq, Hash, Clone)]
pub struct DepositData {
    pub pubkey: PublicKeyBytes,
    pub withdrawal_credentials: Hash256,
    pub amount: Gwei,
    pub signature: SignatureBytes,
}

impl_ssz_container!(DepositData {
    pubkey: PublicKeyBytes,
    withdrawal_credentials: Hash256,
    amount: Gwei,
    signature: SignatureBytes,
});

impl_test_random_for_container!(DepositData {
    pubkey,
    withdrawal_credentials,
    amount,
    signature
});
