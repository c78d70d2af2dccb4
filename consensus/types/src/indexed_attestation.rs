use crate::consts::MAX_VALIDATORS_PER_COMMITTEE;
use crate::list::{append_list, decode_list, list_bytes_len};
use crate::test_utils::{random_list, RngCore, TestRandom};
use crate::{AttestationData, SignatureBytes, ValidatorIndex};
use ssz::{Decode, Encode, Error, SszDecoderBuilder, SszEncoder, BYTES_PER_LENGTH_OFFSET};
use tree_hash::{Hash256, PackedEncoding, TreeHash, TreeHashType};

/// Details an attestation that can be slashable.
///
/// To be included in an `AttesterSlashing`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct IndexedAttestation {
    /// Lists validator registry indices, not committee indices.
    pub attesting_indices: Vec<ValidatorIndex>,
    pub data: AttestationData,
    pub signature: SignatureBytes,
}

impl IndexedAttestation {
    /// Check if ``attestation_data_1`` and ``attestation_data_2`` have the same target.
    pub fn is_double_vote(&self, other: &Self) -> bool {
        self.data.target.epoch == other.data.target.epoch && self.data != other.data
    }

    /// Check if ``attestation_data_1`` surrounds ``attestation_data_2``.
    pub fn is_surround_vote(&self, other: &Self) -> bool {
        self.data.source.epoch < other.data.source.epoch
            && other.data.target.epoch < self.data.target.epoch
    }

    fn num_fixed_bytes() -> usize {
        BYTES_PER_LENGTH_OFFSET
            + <AttestationData as Encode>::ssz_fixed_len()
            + <SignatureBytes as Encode>::ssz_fixed_len()
    }
}

impl Encode for IndexedAttestation {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        Self::num_fixed_bytes() + list_bytes_len(&self.attesting_indices)
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        let mut encoder = SszEncoder::container(buf, Self::num_fixed_bytes());

        encoder
            .append_parameterized(false, |buf| {
                append_list(&self.attesting_indices, MAX_VALIDATORS_PER_COMMITTEE, buf)
            })
            .map_err(|e| e.in_field("attesting_indices"))?;
        encoder.append_field("data", &self.data)?;
        encoder.append_field("signature", &self.signature)?;

        encoder.finalize();
        Ok(())
    }
}

impl Decode for IndexedAttestation {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let num_fixed_bytes = Self::num_fixed_bytes();
        if bytes.len() < num_fixed_bytes {
            return Err(Error::size_violation(bytes.len(), num_fixed_bytes));
        }

        let mut builder = SszDecoderBuilder::new(bytes);

        builder.register_type_parameterized(false, BYTES_PER_LENGTH_OFFSET)?;
        builder.register_type::<AttestationData>()?;
        builder.register_type::<SignatureBytes>()?;

        let mut decoder = builder.build()?;

        Ok(Self {
            attesting_indices: decoder
                .decode_next_with(|slice| decode_list(slice, MAX_VALIDATORS_PER_COMMITTEE))
                .map_err(|e| e.in_field("attesting_indices"))?,
            data: decoder.decode_field("data")?,
            signature: decoder.decode_field("signature")?,
        })
    }
}

impl TreeHash for IndexedAttestation {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Container
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        unreachable!("Container should never be packed.")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("Container should never be packed.")
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        tree_hash::container_root(&[
            tree_hash::list_root(&self.attesting_indices, MAX_VALIDATORS_PER_COMMITTEE)
                .map_err(|e| e.in_field("attesting_indices"))?,
            self.data
                .tree_hash_root()
                .map_err(|e| e.in_field("data"))?,
            self.signature
                .tree_hash_root()
                .map_err(|e| e.in_field("signature"))?,
        ])
    }
}

impl TestRandom for IndexedAttestation {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        Self {
            attesting_indices: random_list(rng, MAX_VALIDATORS_PER_COMMITTEE),
            data: AttestationData::random_for_test(rng),
            signature: SignatureBytes::random_for_test(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SeedableRng, XorShiftRng};
    use crate::Epoch;

    ssz_and_tree_hash_tests!(IndexedAttestation);

    #[test]
    pub fn test_is_double_vote_true() {
        let indexed_vote_first = create_indexed_attestation(3, 1);
        let indexed_vote_second = create_indexed_attestation(3, 2);

        assert!(indexed_vote_first.is_double_vote(&indexed_vote_second))
    }

    #[test]
    pub fn test_is_double_vote_false() {
        let indexed_vote_first = create_indexed_attestation(1, 1);
        let indexed_vote_second = create_indexed_attestation(2, 1);

        assert!(!indexed_vote_first.is_double_vote(&indexed_vote_second));
    }

    #[test]
    pub fn test_is_surround_vote_true() {
        let indexed_vote_first = create_indexed_attestation(2, 1);
        let indexed_vote_second = create_indexed_attestation(1, 2);

        assert!(indexed_vote_first.is_surround_vote(&indexed_vote_second));
    }

    #[test]
    pub fn test_is_surround_vote_false_source_epoch_fails() {
        let indexed_vote_first = create_indexed_attestation(2, 2);
        let indexed_vote_second = create_indexed_attestation(1, 1);

        assert!(!indexed_vote_first.is_surround_vote(&indexed_vote_second));
    }

    #[test]
    fn max_attesting_indices() {
        let mut attestation = create_indexed_attestation(1, 1);
        attestation.attesting_indices = (0..MAX_VALIDATORS_PER_COMMITTEE as u64).collect();

        let bytes = attestation.as_ssz_bytes().unwrap();
        assert_eq!(IndexedAttestation::from_ssz_bytes(&bytes), Ok(attestation.clone()));
        assert!(attestation.tree_hash_root().is_ok());

        attestation.attesting_indices.push(0);
        let e = Error::max_size_violation(2049, 2048).in_field("attesting_indices");
        assert_eq!(attestation.as_ssz_bytes(), Err(e.clone()));
        assert_eq!(attestation.tree_hash_root(), Err(e));
    }

    fn create_indexed_attestation(target_epoch: Epoch, source_epoch: Epoch) -> IndexedAttestation {
        let mut rng = XorShiftRng::from_seed([42; 16]);
        let mut indexed_vote = IndexedAttestation::random_for_test(&mut rng);

        indexed_vote.data.source.epoch = source_epoch;
        indexed_vote.data.target.epoch = target_epoch;
        indexed_vote
    }
}
