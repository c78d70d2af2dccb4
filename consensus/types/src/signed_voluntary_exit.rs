use crate::{SignatureBytes, VoluntaryExit};

/// An exit voluntarily submitted a validator who wishes to withdraw.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: SignatureBytes,
}

impl_ssz_container!(SignedVoluntaryExit {
    message: VoluntaryExit,
    signature: SignatureBytes,
});

impl_test_random_for_container!(SignedVoluntaryExit { message, signature });

#[cfg(test)]
mod tests {
    use super::*;

    ssz_and_tree_hash_tests!(SignedVoluntaryExit);
}
