/// Implements `Encode`, `Decode` and `TreeHash` for a container whose field types fully describe
/// their own SSZ layout (i.e., no field is a bounded list held in a `Vec`).
macro_rules! impl_ssz_container {
    ($type: ident { $($field: ident: $field_type: ty),+ $(,)? }) => {
        impl ssz::Encode for $type {
            fn is_ssz_fixed_len() -> bool {
                $(<$field_type as ssz::Encode>::is_ssz_fixed_len())&&+
            }

            fn ssz_fixed_len() -> usize {
                if <Self as ssz::Encode>::is_ssz_fixed_len() {
                    0 $(+ <$field_type as ssz::Encode>::ssz_fixed_len())+
                } else {
                    ssz::BYTES_PER_LENGTH_OFFSET
                }
            }

            fn ssz_bytes_len(&self) -> usize {
                let mut len = 0;
                $(
                    len += if <$field_type as ssz::Encode>::is_ssz_fixed_len() {
                        <$field_type as ssz::Encode>::ssz_fixed_len()
                    } else {
                        ssz::BYTES_PER_LENGTH_OFFSET + ssz::Encode::ssz_bytes_len(&self.$field)
                    };
                )+
                len
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), ssz::Error> {
                let num_fixed_bytes = 0 $(+ <$field_type as ssz::Encode>::ssz_fixed_len())+;
                let mut encoder = ssz::SszEncoder::container(buf, num_fixed_bytes);

                $(encoder.append_field(stringify!($field), &self.$field)?;)+

                encoder.finalize();
                Ok(())
            }
        }

        impl ssz::Decode for $type {
            fn is_ssz_fixed_len() -> bool {
                $(<$field_type as ssz::Decode>::is_ssz_fixed_len())&&+
            }

            fn ssz_fixed_len() -> usize {
                if <Self as ssz::Decode>::is_ssz_fixed_len() {
                    0 $(+ <$field_type as ssz::Decode>::ssz_fixed_len())+
                } else {
                    ssz::BYTES_PER_LENGTH_OFFSET
                }
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::Error> {
                let num_fixed_bytes = 0 $(+ <$field_type as ssz::Decode>::ssz_fixed_len())+;
                if bytes.len() < num_fixed_bytes {
                    return Err(ssz::Error::size_violation(bytes.len(), num_fixed_bytes));
                }

                let mut builder = ssz::SszDecoderBuilder::new(bytes);
                $(builder.register_type::<$field_type>()?;)+

                let mut decoder = builder.build()?;

                Ok(Self {
                    $($field: decoder.decode_field(stringify!($field))?,)+
                })
            }
        }

        impl tree_hash::TreeHash for $type {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                tree_hash::TreeHashType::Container
            }

            fn tree_hash_packed_encoding(&self) -> tree_hash::PackedEncoding {
                unreachable!("Container should never be packed.")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("Container should never be packed.")
            }

            fn tree_hash_root(&self) -> Result<tree_hash::Hash256, tree_hash::Error> {
                tree_hash::container_root(&[
                    $(
                        tree_hash::TreeHash::tree_hash_root(&self.$field)
                            .map_err(|e| e.in_field(stringify!($field)))?,
                    )+
                ])
            }
        }
    };
}

/// Implements `TestRandom` by generating each field in turn.
macro_rules! impl_test_random_for_container {
    ($type: ident { $($field: ident),+ $(,)? }) => {
        impl $crate::test_utils::TestRandom for $type {
            fn random_for_test(rng: &mut impl rand::RngCore) -> Self {
                Self {
                    $($field: $crate::test_utils::TestRandom::random_for_test(rng),)+
                }
            }
        }
    };
}

#[cfg(test)]
macro_rules! ssz_and_tree_hash_tests {
    ($type: ty) => {
        #[test]
        pub fn test_ssz_round_trip() {
            use crate::test_utils::{SeedableRng, TestRandom, XorShiftRng};
            use ssz::{Decode, Encode};

            let mut rng = XorShiftRng::from_seed([42; 16]);

            for _ in 0..8 {
                let original = <$type>::random_for_test(&mut rng);

                let bytes = original.as_ssz_bytes().unwrap();
                assert_eq!(bytes.len(), original.ssz_bytes_len());

                let decoded = <$type>::from_ssz_bytes(&bytes).unwrap();
                assert_eq!(original, decoded);
            }
        }

        #[test]
        pub fn test_tree_hash_root() {
            use crate::test_utils::{SeedableRng, TestRandom, XorShiftRng};
            use tree_hash::TreeHash;

            let mut rng = XorShiftRng::from_seed([42; 16]);

            let original = <$type>::random_for_test(&mut rng);
            let root = original.tree_hash_root().unwrap();

            assert_eq!(original.clone().tree_hash_root().unwrap(), root);

            let other = <$type>::random_for_test(&mut rng);
            if other != original {
                assert_ne!(other.tree_hash_root().unwrap(), root);
            }
        }

        #[test]
        pub fn test_truncated_bytes_rejected() {
            use crate::test_utils::{SeedableRng, TestRandom, XorShiftRng};
            use ssz::{Decode, Encode};

            let mut rng = XorShiftRng::from_seed([42; 16]);
            let bytes = <$type>::random_for_test(&mut rng).as_ssz_bytes().unwrap();

            assert!(<$type>::from_ssz_bytes(&bytes[..<$type as Decode>::ssz_fixed_len() - 1]).is_err());
        }
    };
}
