//! Phase 0 containers, rendered into `types::generated::phase0` by `build.rs`.
//!
//! List and vector bounds use the mainnet preset.

pub type Slot = u64;
pub type Epoch = u64;
pub type CommitteeIndex = u64;
pub type ValidatorIndex = u64;
pub type Gwei = u64;
pub type Root = [u8; 32];
pub type Version = [u8; 4];
pub type BLSPubkey = [u8; 48];
pub type BLSSignature = [u8; 96];

#[derive(Debug, Clone, PartialEq)]
pub struct Fork {
    pub previous_version: Version,
    pub current_version: Version,
    pub epoch: Epoch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub epoch: Epoch,
    pub root: Root,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Eth1Data {
    pub deposit_root: Root,
    pub deposit_count: u64,
    pub block_hash: Root,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttestationData {
    pub slot: Slot,
    pub index: CommitteeIndex,
    pub beacon_block_root: Root,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedAttestation {
    #[ssz(max = "2048")]
    pub attesting_indices: Vec<ValidatorIndex>,
    pub data: AttestationData,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attestation {
    #[ssz(max = "2048")]
    pub aggregation_bits: Bitlist,
    pub data: AttestationData,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttesterSlashing {
    pub attestation_1: IndexedAttestation,
    pub attestation_2: IndexedAttestation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeaconBlockHeader {
    pub slot: Slot,
    pub proposer_index: ValidatorIndex,
    pub parent_root: Root,
    pub state_root: Root,
    pub body_root: Root,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedBeaconBlockHeader {
    pub message: BeaconBlockHeader,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProposerSlashing {
    pub signed_header_1: SignedBeaconBlockHeader,
    pub signed_header_2: SignedBeaconBlockHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositData {
    pub pubkey: BLSPubkey,
    pub withdrawal_credentials: Root,
    pub amount: Gwei,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    #[ssz(size = "33")]
    pub proof: Vec<Root>,
    pub data: DepositData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoluntaryExit {
    pub epoch: Epoch,
    pub validator_index: ValidatorIndex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignedVoluntaryExit {
    pub message: VoluntaryExit,
    pub signature: BLSSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeaconBlockBody {
    pub randao_reveal: BLSSignature,
    pub eth1_data: Eth1Data,
    pub graffiti: [u8; 32],
    #[ssz(max = "16")]
    pub proposer_slashings: Vec<ProposerSlashing>,
    #[ssz(max = "2")]
    pub attester_slashings: Vec<AttesterSlashing>,
    #[ssz(max = "128")]
    pub attestations: Vec<Attestation>,
    #[ssz(max = "16")]
    pub deposits: Vec<Deposit>,
    #[ssz(max = "16")]
    pub voluntary_exits: Vec<SignedVoluntaryExit>,
}
