use crate::IndexedAttestation;

/// Two conflicting attestations.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

impl_ssz_container!(AttesterSlashing {
    attestation_1: IndexedAttestation,
    attestation_2: IndexedAttestation,
});

impl_test_random_for_container!(AttesterSlashing {
    attestation_1,
    attestation_2
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_VALIDATORS_PER_COMMITTEE;
    use crate::test_utils::{SeedableRng, TestRandom, XorShiftRng};
    use ssz::{Decode, Encode};

    ssz_and_tree_hash_tests!(AttesterSlashing);

    #[test]
    fn errors_carry_field_path() {
        let mut rng = XorShiftRng::from_seed([42; 16]);
        let mut slashing = AttesterSlashing::random_for_test(&mut rng);
        slashing.attestation_2.attesting_indices = vec![0; MAX_VALIDATORS_PER_COMMITTEE + 1];

        let e = slashing.as_ssz_bytes().unwrap_err();
        assert_eq!(
            e.to_string(),
            "attestation_2.attesting_indices: max size violation: got 2049, max is 2048"
        );

        // The second offset points before the first.
        let mut bytes = AttesterSlashing::random_for_test(&mut rng)
            .as_ssz_bytes()
            .unwrap();
        bytes[4] = 7;
        bytes[5] = 0;
        assert!(AttesterSlashing::from_ssz_bytes(&bytes)
            .unwrap_err()
            .is_offset_violation());
    }
}
