use crate::consts::MAX_VALIDATORS_PER_COMMITTEE;
use crate::test_utils::{RngCore, TestRandom};
use crate::{AttestationData, SignatureBytes};
use ssz::{
    Bitlist, Decode, Encode, Error, SszDecoderBuilder, SszEncoder, BYTES_PER_LENGTH_OFFSET,
};
use tree_hash::{Hash256, PackedEncoding, TreeHash, TreeHashType};

/// Details an attestation that can be slashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attestation {
    pub aggregation_bits: Bitlist,
    pub data: AttestationData,
    pub signature: SignatureBytes,
}

impl Attestation {
    /// Are the aggregation bitfields of these attestations disjoint?
    pub fn signers_disjoint_from(&self, other: &Self) -> bool {
        self.aggregation_bits
            .iter()
            .zip(other.aggregation_bits.iter())
            .all(|(a, b)| !(a && b))
    }

    fn num_fixed_bytes() -> usize {
        BYTES_PER_LENGTH_OFFSET
            + <AttestationData as Encode>::ssz_fixed_len()
            + <SignatureBytes as Encode>::ssz_fixed_len()
    }
}

impl Encode for Attestation {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        Self::num_fixed_bytes() + self.aggregation_bits.ssz_bytes_len()
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        let mut encoder = SszEncoder::container(buf, Self::num_fixed_bytes());

        encoder
            .append_parameterized(false, |buf| {
                self.aggregation_bits
                    .check_max(MAX_VALIDATORS_PER_COMMITTEE)?;
                self.aggregation_bits.ssz_append(buf)
            })
            .map_err(|e| e.in_field("aggregation_bits"))?;
        encoder.append_field("data", &self.data)?;
        encoder.append_field("signature", &self.signature)?;

        encoder.finalize();
        Ok(())
    }
}

impl Decode for Attestation {
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
            aggregation_bits: decoder
                .decode_next_with(|slice| {
                    Bitlist::from_raw_bytes(slice, MAX_VALIDATORS_PER_COMMITTEE)
                })
                .map_err(|e| e.in_field("aggregation_bits"))?,
            data: decoder.decode_field("data")?,
            signature: decoder.decode_field("signature")?,
        })
    }
}

impl TreeHash for Attestation {
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
            tree_hash::bitlist_root(&self.aggregation_bits, MAX_VALIDATORS_PER_COMMITTEE)
                .map_err(|e| e.in_field("aggregation_bits"))?,
            self.data
                .tree_hash_root()
                .map_err(|e| e.in_field("data"))?,
            self.signature
                .tree_hash_root()
                .map_err(|e| e.in_field("signature"))?,
        ])
    }
}

impl TestRandom for Attestation {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        Self {
            aggregation_bits: Bitlist::random_for_test(rng),
            data: AttestationData::random_for_test(rng),
            signature: SignatureBytes::random_for_test(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{SeedableRng, XorShiftRng};
    use ssz::ErrorKind;

    ssz_and_tree_hash_tests!(Attestation);

    fn attestation(bits: &[bool]) -> Attestation {
        let mut rng = XorShiftRng::from_seed([42; 16]);
        Attestation {
            aggregation_bits: Bitlist::from_bools(bits),
            ..Attestation::random_for_test(&mut rng)
        }
    }

    #[test]
    fn signers_disjoint() {
        let a = attestation(&[true, false, false]);
        let b = attestation(&[false, true, true]);
        let c = attestation(&[false, true, false]);

        assert!(a.signers_disjoint_from(&b));
        assert!(!b.signers_disjoint_from(&c));
    }

    #[test]
    fn bitlist_bounds() {
        let full = attestation(&[true; MAX_VALIDATORS_PER_COMMITTEE]);
        let bytes = full.as_ssz_bytes().unwrap();
        assert_eq!(Attestation::from_ssz_bytes(&bytes), Ok(full));

        let over = attestation(&[true; MAX_VALIDATORS_PER_COMMITTEE + 1]);
        let e = Error::max_size_violation(2049, 2048).in_field("aggregation_bits");
        assert_eq!(over.as_ssz_bytes(), Err(e.clone()));
        assert_eq!(over.tree_hash_root(), Err(e));
    }

    #[test]
    fn missing_delimiter() {
        let mut bytes = attestation(&[]).as_ssz_bytes().unwrap();
        assert_eq!(bytes.len(), 4 + 128 + 96 + 1);

        // Drop the only bitlist byte, leaving an empty variable region.
        bytes.pop();
        let e = Attestation::from_ssz_bytes(&bytes).unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::EmptyBitlist);
        assert_eq!(e, Error::from(ErrorKind::EmptyBitlist).in_field("aggregation_bits"));
    }
}
