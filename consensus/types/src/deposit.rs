use crate::consts::DEPOSIT_PROOF_LEN;
use crate::test_utils::{random_vector, RngCore, TestRandom};
use crate::{DepositData, Hash256};
use ssz::{Decode, Encode, Error, SszDecoderBuilder, SszEncoder};
use tree_hash::{PackedEncoding, TreeHash, TreeHashType};

/// A deposit to potentially become a beacon chain validator.
#[derive(Debug, PartialEq, Hash, Clone)]
pub struct Deposit {
    /// Exactly `DEPOSIT_PROOF_LEN` hashes.
    pub proof: Vec<Hash256>,
    pub data: DepositData,
}

impl Deposit {
    const PROOF_BYTES: usize = DEPOSIT_PROOF_LEN * 32;
}

impl Encode for Deposit {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        Self::PROOF_BYTES + <DepositData as Encode>::ssz_fixed_len()
    }

    fn ssz_bytes_len(&self) -> usize {
        <Self as Encode>::ssz_fixed_len()
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        let mut encoder = SszEncoder::container(buf, <Self as Encode>::ssz_fixed_len());

        encoder
            .append_parameterized(true, |buf| {
                ssz::check_vector_len(self.proof.len(), DEPOSIT_PROOF_LEN)?;
                ssz::sequence_ssz_append(self.proof.iter(), buf)
            })
            .map_err(|e| e.in_field("proof"))?;
        encoder.append_field("data", &self.data)?;

        encoder.finalize();
        Ok(())
    }
}

impl Decode for Deposit {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        <Self as Encode>::ssz_fixed_len()
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let num_fixed_bytes = <Self as Decode>::ssz_fixed_len();
        if bytes.len() < num_fixed_bytes {
            return Err(Error::size_violation(bytes.len(), num_fixed_bytes));
        }

        let mut builder = SszDecoderBuilder::new(bytes);

        builder.register_type_parameterized(true, Self::PROOF_BYTES)?;
        builder.register_type::<DepositData>()?;

        let mut decoder = builder.build()?;

        Ok(Self {
            proof: decoder
                .decode_next_with(|slice| {
                    ssz::decode_vector_with(slice, DEPOSIT_PROOF_LEN, 32, Hash256::from_ssz_bytes)
                })
                .map_err(|e| e.in_field("proof"))?,
            data: decoder.decode_field("data")?,
        })
    }
}

impl TreeHash for Deposit {
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
            tree_hash::vector_root(&self.proof, DEPOSIT_PROOF_LEN)
                .map_err(|e| e.in_field("proof"))?,
            self.data
                .tree_hash_root()
                .map_err(|e| e.in_field("data"))?,
        ])
    }
}

impl TestRandom for Deposit {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        Self {
            proof: random_vector(rng, DEPOSIT_PROOF_LEN),
            data: DepositData::random_for_test(rng),
        }
    }
}
