//! Phase 0 consensus containers with hand-written SSZ and tree hash implementations.
//!
//! The same containers are rendered from `schema/phase0.rs` by `sszgen` at build time and exposed
//! in `generated::phase0`. Both produce identical bytes and roots; the hand-written types are the
//! reference.

#[macro_use]
mod macros;

pub mod attestation;
pub mod attestation_data;
pub mod attester_slashing;
pub mod beacon_block_body;
pub mod beacon_block_header;
pub mod checkpoint;
pub mod consts;
pub mod deposit;
pub mod deposit_data;
pub mod eth1_data;
pub mod fork;
pub mod indexed_attestation;
pub mod list;
pub mod proposer_slashing;
pub mod signed_beacon_block_header;
pub mod signed_voluntary_exit;
pub mod test_utils;
pub mod voluntary_exit;

/// Types rendered by `sszgen` from the modules under `schema/`.
pub mod generated {
    pub mod phase0 {
        #![allow(unused_parens, clippy::all)]
        include!(concat!(env!("OUT_DIR"), "/phase0.rs"));
    }
}

pub use crate::attestation::Attestation;
pub use crate::attestation_data::AttestationData;
pub use crate::attester_slashing::AttesterSlashing;
pub use crate::beacon_block_body::BeaconBlockBody;
pub use crate::beacon_block_header::BeaconBlockHeader;
pub use crate::checkpoint::Checkpoint;
pub use crate::deposit::Deposit;
pub use crate::deposit_data::DepositData;
pub use crate::eth1_data::Eth1Data;
pub use crate::fork::Fork;
pub use crate::indexed_attestation::IndexedAttestation;
pub use crate::proposer_slashing::ProposerSlashing;
pub use crate::signed_beacon_block_header::SignedBeaconBlockHeader;
pub use crate::signed_voluntary_exit::SignedVoluntaryExit;
pub use crate::voluntary_exit::VoluntaryExit;

pub use ssz::{Bitlist, Hash256};

pub type Slot = u64;
pub type Epoch = u64;
pub type CommitteeIndex = u64;
pub type ValidatorIndex = u64;
pub type Gwei = u64;
pub type Graffiti = [u8; 32];
pub type Version = [u8; 4];
pub type PublicKeyBytes = [u8; 48];
pub type SignatureBytes = [u8; 96];
