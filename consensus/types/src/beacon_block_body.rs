use crate::consts::{
    MAX_ATTESTATIONS, MAX_ATTESTER_SLASHINGS, MAX_DEPOSITS, MAX_PROPOSER_SLASHINGS,
    MAX_VOLUNTARY_EXITS,
};
use crate::list::{append_list, decode_list, list_bytes_len};
use crate::test_utils::{random_list, RngCore, TestRandom};
use crate::*;
use ssz::{Decode, Encode, Error, SszDecoderBuilder, SszEncoder, BYTES_PER_LENGTH_OFFSET};
use tree_hash::{PackedEncoding, TreeHash, TreeHashType};

/// The body of a `BeaconChain` block, containing operations.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconBlockBody {
    pub randao_reveal: SignatureBytes,
    pub eth1_data: Eth1Data,
    pub graffiti: Graffiti,
    pub proposer_slashings: Vec<ProposerSlashing>,
    pub attester_slashings: Vec<AttesterSlashing>,
    pub attestations: Vec<Attestation>,
    pub deposits: Vec<Deposit>,
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
}

impl BeaconBlockBody {
    /// The fixed fields plus one offset per operation list.
    fn num_fixed_bytes() -> usize {
        <SignatureBytes as Encode>::ssz_fixed_len()
            + <Eth1Data as Encode>::ssz_fixed_len()
            + <Graffiti as Encode>::ssz_fixed_len()
            + 5 * BYTES_PER_LENGTH_OFFSET
    }
}

impl Encode for BeaconBlockBody {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        Self::num_fixed_bytes()
            + list_bytes_len(&self.proposer_slashings)
            + list_bytes_len(&self.attester_slashings)
            + list_bytes_len(&self.attestations)
            + list_bytes_len(&self.deposits)
            + list_bytes_len(&self.voluntary_exits)
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        let mut encoder = SszEncoder::container(buf, Self::num_fixed_bytes());

        encoder.append_field("randao_reveal", &self.randao_reveal)?;
        encoder.append_field("eth1_data", &self.eth1_data)?;
        encoder.append_field("graffiti", &self.graffiti)?;
        encoder
            .append_parameterized(false, |buf| {
                append_list(&self.proposer_slashings, MAX_PROPOSER_SLASHINGS, buf)
            })
            .map_err(|e| e.in_field("proposer_slashings"))?;
        encoder
            .append_parameterized(false, |buf| {
                append_list(&self.attester_slashings, MAX_ATTESTER_SLASHINGS, buf)
            })
            .map_err(|e| e.in_field("attester_slashings"))?;
        encoder
            .append_parameterized(false, |buf| {
                append_list(&self.attestations, MAX_ATTESTATIONS, buf)
            })
            .map_err(|e| e.in_field("attestations"))?;
        encoder
            .append_parameterized(false, |buf| append_list(&self.deposits, MAX_DEPOSITS, buf))
            .map_err(|e| e.in_field("deposits"))?;
        encoder
            .append_parameterized(false, |buf| {
                append_list(&self.voluntary_exits, MAX_VOLUNTARY_EXITS, buf)
            })
            .map_err(|e| e.in_field("voluntary_exits"))?;

        encoder.finalize();
        Ok(())
    }
}

impl Decode for BeaconBlockBody {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let num_fixed_bytes = Self::num_fixed_bytes();
        if bytes.len() < num_fixed_bytes {
            return Err(Error::size_violation(bytes.len(), num_fixed_bytes));
        }

        let mut builder = SszDecoderBuilder::new(bytes);

        builder.register_type::<SignatureBytes>()?;
        builder.register_type::<Eth1Data>()?;
        builder.register_type::<Graffiti>()?;
        for _ in 0..5 {
            builder.register_type_parameterized(false, BYTES_PER_LENGTH_OFFSET)?;
        }

        let mut decoder = builder.build()?;

        Ok(Self {
            randao_reveal: decoder.decode_field("randao_reveal")?,
            eth1_data: decoder.decode_field("eth1_data")?,
            graffiti: decoder.decode_field("graffiti")?,
            proposer_slashings: decoder
                .decode_next_with(|slice| decode_list(slice, MAX_PROPOSER_SLASHINGS))
                .map_err(|e| e.in_field("proposer_slashings"))?,
            attester_slashings: decoder
                .decode_next_with(|slice| decode_list(slice, MAX_ATTESTER_SLASHINGS))
                .map_err(|e| e.in_field("attester_slashings"))?,
            attestations: decoder
                .decode_next_with(|slice| decode_list(slice, MAX_ATTESTATIONS))
                .map_err(|e| e.in_field("attestations"))?,
            deposits: decoder
                .decode_next_with(|slice| decode_list(slice, MAX_DEPOSITS))
                .map_err(|e| e.in_field("deposits"))?,
            voluntary_exits: decoder
                .decode_next_with(|slice| decode_list(slice, MAX_VOLUNTARY_EXITS))
                .map_err(|e| e.in_field("voluntary_exits"))?,
        })
    }
}

impl TreeHash for BeaconBlockBody {
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
            self.randao_reveal
                .tree_hash_root()
                .map_err(|e| e.in_field("randao_reveal"))?,
            self.eth1_data
                .tree_hash_root()
                .map_err(|e| e.in_field("eth1_data"))?,
            self.graffiti
                .tree_hash_root()
                .map_err(|e| e.in_field("graffiti"))?,
            tree_hash::list_root(&self.proposer_slashings, MAX_PROPOSER_SLASHINGS)
                .map_err(|e| e.in_field("proposer_slashings"))?,
            tree_hash::list_root(&self.attester_slashings, MAX_ATTESTER_SLASHINGS)
                .map_err(|e| e.in_field("attester_slashings"))?,
            tree_hash::list_root(&self.attestations, MAX_ATTESTATIONS)
                .map_err(|e| e.in_field("attestations"))?,
            tree_hash::list_root(&self.deposits, MAX_DEPOSITS)
                .map_err(|e| e.in_field("deposits"))?,
            tree_hash::list_root(&self.voluntary_exits, MAX_VOLUNTARY_EXITS)
                .map_err(|e| e.in_field("voluntary_exits"))?,
        ])
    }
}

impl TestRandom for BeaconBlockBody {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        Self {
            randao_reveal: SignatureBytes::random_for_test(rng),
            eth1_data: Eth1Data::random_for_test(rng),
            graffiti: Graffiti::random_for_test(rng),
            proposer_slashings: random_list(rng, MAX_PROPOSER_SLASHINGS),
            attester_slashings: random_list(rng, MAX_ATTESTER_SLASHINGS),
            attestations: random_list(rng, MAX_ATTESTATIONS),
            deposits: random_list(rng, MAX_DEPOSITS),
            voluntary_exits: random_list(rng, MAX_VOLUNTARY_EXITS),
        }
    }
}
