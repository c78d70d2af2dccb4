//! The types rendered by `sszgen` must agree with the hand-written ones, byte for byte and root
//! for root.
use ssz::{Decode, Encode, Error};
use tree_hash::TreeHash;
use types::generated::phase0;
use types::test_utils::{SeedableRng, TestRandom, XorShiftRng};
use types::*;

/// Encode `original` with its hand-written impl, decode and re-encode with the generated type `G`,
/// then decode the result with the hand-written impl again.
fn check_agreement<T, G>(original: &T)
where
    T: Encode + Decode + TreeHash + PartialEq + std::fmt::Debug,
    G: Encode + Decode + TreeHash,
{
    let bytes = original.as_ssz_bytes().unwrap();

    let generated = G::from_ssz_bytes(&bytes).unwrap();
    assert_eq!(generated.ssz_bytes_len(), bytes.len());
    assert_eq!(generated.as_ssz_bytes().unwrap(), bytes);
    assert_eq!(
        generated.tree_hash_root().unwrap(),
        original.tree_hash_root().unwrap()
    );

    assert_eq!(&T::from_ssz_bytes(&bytes).unwrap(), original);
    assert_eq!(<T as Decode>::is_ssz_fixed_len(), <G as Decode>::is_ssz_fixed_len());
    assert_eq!(<T as Encode>::ssz_fixed_len(), <G as Encode>::ssz_fixed_len());
}

macro_rules! agreement_test {
    ($name: ident, $type: ident) => {
        #[test]
        fn $name() {
            let mut rng = XorShiftRng::from_seed([42; 16]);

            for _ in 0..16 {
                check_agreement::<$type, phase0::$type>(&$type::random_for_test(&mut rng));
            }
        }
    };
}

agreement_test!(checkpoint, Checkpoint);
agreement_test!(fork, Fork);
agreement_test!(eth1_data, Eth1Data);
agreement_test!(attestation_data, AttestationData);
agreement_test!(indexed_attestation, IndexedAttestation);
agreement_test!(attestation, Attestation);
agreement_test!(attester_slashing, AttesterSlashing);
agreement_test!(beacon_block_header, BeaconBlockHeader);
agreement_test!(signed_beacon_block_header, SignedBeaconBlockHeader);
agreement_test!(proposer_slashing, ProposerSlashing);
agreement_test!(deposit_data, DepositData);
agreement_test!(deposit, Deposit);
agreement_test!(voluntary_exit, VoluntaryExit);
agreement_test!(signed_voluntary_exit, SignedVoluntaryExit);
agreement_test!(beacon_block_body, BeaconBlockBody);

fn populated_body() -> BeaconBlockBody {
    let mut rng = XorShiftRng::from_seed([42; 16]);
    let mut body = BeaconBlockBody::random_for_test(&mut rng);

    // Ensure every list holds containers, including variable-size ones.
    body.attester_slashings = vec![AttesterSlashing::random_for_test(&mut rng)];
    body.attestations = (0..3)
        .map(|_| Attestation::random_for_test(&mut rng))
        .collect();
    body.proposer_slashings = vec![ProposerSlashing::random_for_test(&mut rng)];
    body.deposits = vec![Deposit::random_for_test(&mut rng)];
    body.voluntary_exits = vec![SignedVoluntaryExit::random_for_test(&mut rng)];
    body
}

#[test]
fn beacon_block_body_round_trip() {
    let body = populated_body();
    let bytes = body.as_ssz_bytes().unwrap();

    let generated = phase0::BeaconBlockBody::from_ssz_bytes(&bytes).unwrap();
    assert_eq!(generated.attestations.len(), 3);
    assert_eq!(
        generated.attestations[1].aggregation_bits,
        body.attestations[1].aggregation_bits
    );
    assert_eq!(generated.randao_reveal, body.randao_reveal);
    assert_eq!(
        generated.eth1_data.deposit_root,
        body.eth1_data.deposit_root.to_fixed_bytes()
    );

    assert_eq!(generated.as_ssz_bytes().unwrap(), bytes);
    assert_eq!(
        generated.tree_hash_root().unwrap(),
        body.tree_hash_root().unwrap()
    );
}

#[test]
fn same_errors_for_invalid_bytes() {
    let bytes = populated_body().as_ssz_bytes().unwrap();

    let cases: Vec<Vec<u8>> = vec![
        bytes[..bytes.len() - 1].to_vec(),
        bytes[..100].to_vec(),
        {
            // First offset pointing into the fixed region.
            let mut bytes = bytes.clone();
            bytes[200] = 0;
            bytes[201] = 0;
            bytes
        },
        {
            // Attestation offsets now precede the attester slashing offset.
            let mut bytes = bytes.clone();
            bytes.copy_within(200..204, 208);
            bytes
        },
        vec![],
    ];

    for case in cases {
        let hand_written = BeaconBlockBody::from_ssz_bytes(&case).map(|_| ());
        let generated = phase0::BeaconBlockBody::from_ssz_bytes(&case).map(|_| ());
        assert!(hand_written.is_err());
        assert_eq!(hand_written, generated);
    }
}

#[test]
fn same_errors_for_invalid_values() {
    let mut body = populated_body();
    body.attestations[2].aggregation_bits = Bitlist::from_bools(&[false; 2049]);

    let bytes = body.as_ssz_bytes();
    assert_eq!(
        bytes,
        Err(Error::max_size_violation(2049, 2048)
            .in_field("aggregation_bits")
            .at_index(2)
            .in_field("attestations"))
    );

    let mut generated =
        phase0::BeaconBlockBody::from_ssz_bytes(&populated_body().as_ssz_bytes().unwrap())
            .unwrap();
    generated.attestations[2].aggregation_bits = Bitlist::from_bools(&[false; 2049]);

    assert_eq!(generated.as_ssz_bytes(), bytes);
    assert_eq!(generated.tree_hash_root(), body.tree_hash_root());
}
