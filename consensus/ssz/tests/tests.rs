use ethereum_types::{H256, U256};
use ssz::{
    decode_list_of_fixed_length_items, decode_list_of_variable_length_items, Bitlist, Decode,
    Encode, Error, ErrorKind, OffsetError, SszDecoderBuilder, SszEncoder,
};

mod round_trip {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn round_trip<T: Encode + Decode + std::fmt::Debug + PartialEq>(items: Vec<T>) {
        for item in items {
            let encoded = &item.as_ssz_bytes().unwrap();
            assert_eq!(item.ssz_bytes_len(), encoded.len());
            assert_eq!(T::from_ssz_bytes(encoded), Ok(item));
        }
    }

    #[test]
    fn bool() {
        let items: Vec<bool> = vec![true, false];

        round_trip(items);
    }

    #[test]
    fn u8_array_4() {
        let items: Vec<[u8; 4]> = vec![[0, 0, 0, 0], [1, 0, 0, 0], [1, 2, 3, 4], [1, 2, 0, 4]];

        round_trip(items);
    }

    #[test]
    fn h256() {
        let items: Vec<H256> = vec![H256::zero(), H256::from([1; 32]), H256::repeat_byte(0xab)];

        round_trip(items);
    }

    #[test]
    fn u256() {
        let items: Vec<U256> = vec![U256::zero(), U256::one(), U256::MAX, U256::from(u64::MAX)];

        round_trip(items);
    }

    #[test]
    fn vec_u16() {
        let items: Vec<Vec<u16>> = vec![
            vec![],
            vec![255],
            vec![0, 1, 2],
            vec![100; 64],
            vec![255, 0, 255],
        ];

        round_trip(items);
    }

    #[test]
    fn vec_of_vec_u16() {
        let items: Vec<Vec<Vec<u16>>> = vec![
            vec![],
            vec![vec![]],
            vec![vec![1, 2, 3]],
            vec![vec![], vec![]],
            vec![vec![], vec![1, 2, 3]],
            vec![vec![1, 2, 3], vec![1, 2, 3]],
            vec![vec![1, 2, 3], vec![], vec![1, 2, 3]],
            vec![vec![], vec![], vec![1, 2, 3]],
            vec![vec![], vec![1], vec![1, 2, 3]],
            vec![vec![], vec![1], vec![1, 2, 3]],
        ];

        round_trip(items);
    }

    #[test]
    fn boxed() {
        let items: Vec<Box<u64>> = vec![Box::new(0), Box::new(42), Box::new(u64::MAX)];

        round_trip(items);
    }

    #[derive(Debug, PartialEq)]
    struct FixedLen {
        a: u16,
        b: u64,
        c: u32,
    }

    impl Encode for FixedLen {
        fn is_ssz_fixed_len() -> bool {
            true
        }

        fn ssz_fixed_len() -> usize {
            2 + 8 + 4
        }

        fn ssz_bytes_len(&self) -> usize {
            <Self as Encode>::ssz_fixed_len()
        }

        fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
            let mut encoder = SszEncoder::container(buf, <Self as Encode>::ssz_fixed_len());
            encoder.append_field("a", &self.a)?;
            encoder.append_field("b", &self.b)?;
            encoder.append_field("c", &self.c)?;
            encoder.finalize();
            Ok(())
        }
    }

    impl Decode for FixedLen {
        fn is_ssz_fixed_len() -> bool {
            true
        }

        fn ssz_fixed_len() -> usize {
            2 + 8 + 4
        }

        fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
            let mut builder = SszDecoderBuilder::new(bytes);
            builder.register_type::<u16>()?;
            builder.register_type::<u64>()?;
            builder.register_type::<u32>()?;

            let mut decoder = builder.build()?;

            Ok(Self {
                a: decoder.decode_field("a")?,
                b: decoder.decode_field("b")?,
                c: decoder.decode_field("c")?,
            })
        }
    }

    #[test]
    fn fixed_len_struct_encoding() {
        let items: Vec<FixedLen> = vec![
            FixedLen { a: 0, b: 0, c: 0 },
            FixedLen { a: 1, b: 1, c: 1 },
            FixedLen { a: 1, b: 0, c: 1 },
        ];

        let expected_encodings = vec![
            //  | u16--| u64----------------------------| u32----------|
            vec![00, 00, 00, 00, 00, 00, 00, 00, 00, 00, 00, 00, 00, 00],
            vec![01, 00, 01, 00, 00, 00, 00, 00, 00, 00, 01, 00, 00, 00],
            vec![01, 00, 00, 00, 00, 00, 00, 00, 00, 00, 01, 00, 00, 00],
        ];

        for i in 0..items.len() {
            assert_eq!(
                items[i].as_ssz_bytes().unwrap(),
                expected_encodings[i],
                "Failed on {}",
                i
            );
        }
    }

    #[test]
    fn fixed_len_excess_bytes() {
        let fixed = FixedLen { a: 1, b: 2, c: 3 };

        let mut bytes = fixed.as_ssz_bytes().unwrap();
        bytes.append(&mut vec![0]);

        assert_eq!(
            FixedLen::from_ssz_bytes(&bytes),
            Err(Error::size_violation(15, 14))
        );
    }

    #[test]
    fn vec_of_fixed_len_struct() {
        let items: Vec<FixedLen> = vec![
            FixedLen { a: 0, b: 0, c: 0 },
            FixedLen { a: 1, b: 1, c: 1 },
            FixedLen { a: 1, b: 0, c: 1 },
        ];

        round_trip(items);
    }

    #[derive(Debug, PartialEq)]
    struct VariableLen {
        a: u16,
        b: Vec<u16>,
        c: u32,
    }

    impl Encode for VariableLen {
        fn is_ssz_fixed_len() -> bool {
            false
        }

        fn ssz_bytes_len(&self) -> usize {
            2 + ssz::BYTES_PER_LENGTH_OFFSET + 4 + self.b.ssz_bytes_len()
        }

        fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
            let mut encoder = SszEncoder::container(buf, 2 + ssz::BYTES_PER_LENGTH_OFFSET + 4);
            encoder.append_field("a", &self.a)?;
            encoder.append_field("b", &self.b)?;
            encoder.append_field("c", &self.c)?;
            encoder.finalize();
            Ok(())
        }
    }

    impl Decode for VariableLen {
        fn is_ssz_fixed_len() -> bool {
            false
        }

        fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
            let mut builder = SszDecoderBuilder::new(bytes);
            builder.register_type::<u16>()?;
            builder.register_type::<Vec<u16>>()?;
            builder.register_type::<u32>()?;

            let mut decoder = builder.build()?;

            Ok(Self {
                a: decoder.decode_field("a")?,
                b: decoder.decode_next_with(|slice| {
                    decode_list_of_fixed_length_items(slice, Some(4)).map_err(|e| e.in_field("b"))
                })?,
                c: decoder.decode_field("c")?,
            })
        }
    }

    #[test]
    fn offset_into_fixed_bytes() {
        let bytes = vec![
            //  1   2   3   4   5   6   7   8   9   10  11  12  13  14  15
            //      | offset        | u32           | variable
            01, 00, 09, 00, 00, 00, 01, 00, 00, 00, 00, 00, 01, 00, 02, 00,
        ];

        assert_eq!(
            VariableLen::from_ssz_bytes(&bytes),
            Err(OffsetError::IntoFixedPortion(9).into())
        );
    }

    #[test]
    fn variable_len_excess_bytes() {
        let variable = VariableLen {
            a: 1,
            b: vec![2],
            c: 3,
        };

        let mut bytes = variable.as_ssz_bytes().unwrap();
        bytes.append(&mut vec![0]);

        // The error message triggered is not so helpful, it's caught by a side-effect. Just
        // checking there is _some_ error is fine.
        assert!(VariableLen::from_ssz_bytes(&bytes).is_err());
    }

    #[test]
    fn first_offset_skips_byte() {
        let bytes = vec![
            //  1   2   3   4   5   6   7   8   9   10  11  12  13  14  15
            //      | offset        | u32           | variable
            01, 00, 11, 00, 00, 00, 01, 00, 00, 00, 00, 00, 01, 00, 02, 00,
        ];

        assert_eq!(
            VariableLen::from_ssz_bytes(&bytes),
            Err(OffsetError::SkipsVariableBytes(11).into())
        );
    }

    #[test]
    fn variable_len_struct_encoding() {
        let items: Vec<VariableLen> = vec![
            VariableLen {
                a: 0,
                b: vec![],
                c: 0,
            },
            VariableLen {
                a: 1,
                b: vec![0],
                c: 1,
            },
            VariableLen {
                a: 1,
                b: vec![0, 1, 2],
                c: 1,
            },
        ];

        let expected_encodings = vec![
            //   00..................................09
            //  | u16--| vec offset-----| u32------------| vec payload --------|
            vec![00, 00, 10, 00, 00, 00, 00, 00, 00, 00],
            vec![01, 00, 10, 00, 00, 00, 01, 00, 00, 00, 00, 00],
            vec![
                01, 00, 10, 00, 00, 00, 01, 00, 00, 00, 00, 00, 01, 00, 02, 00,
            ],
        ];

        for i in 0..items.len() {
            assert_eq!(
                items[i].as_ssz_bytes().unwrap(),
                expected_encodings[i],
                "Failed on {}",
                i
            );
        }
    }

    #[test]
    fn vec_of_variable_len_struct() {
        let items: Vec<VariableLen> = vec![
            VariableLen {
                a: 0,
                b: vec![],
                c: 0,
            },
            VariableLen {
                a: 255,
                b: vec![0, 1, 2, 3],
                c: 99,
            },
            VariableLen {
                a: 255,
                b: vec![0],
                c: 99,
            },
            VariableLen {
                a: 50,
                b: vec![0],
                c: 0,
            },
        ];

        round_trip(items);
    }

    #[test]
    fn nested_error_path() {
        let bytes = vec![
            //  | u16| offset        | u32           | five u16s, one over the max
            01, 00, 10, 00, 00, 00, 01, 00, 00, 00, 00, 00, 01, 00, 02, 00, 03, 00, 04, 00,
        ];

        let list_bytes = {
            let mut list = vec![];
            // Offset table for a list of two `VariableLen`.
            list.extend_from_slice(&8_u32.to_le_bytes());
            list.extend_from_slice(&(8 + bytes.len() as u32).to_le_bytes());
            list.extend_from_slice(&bytes);
            list.extend_from_slice(&bytes);
            list
        };

        let e = decode_list_of_variable_length_items::<VariableLen>(&list_bytes, None)
            .unwrap_err();
        assert_eq!(e.kind(), &ErrorKind::MaxSizeViolation { len: 5, max: 4 });
        assert_eq!(e.path().to_string(), "[0].b");
    }

    #[quickcheck]
    fn quickcheck_vec_u64(items: Vec<u64>) -> bool {
        let bytes = items.as_ssz_bytes().unwrap();
        bytes.len() == items.len() * 8 && Vec::<u64>::from_ssz_bytes(&bytes) == Ok(items)
    }

    #[quickcheck]
    fn quickcheck_vec_of_vec_u8(items: Vec<Vec<u8>>) -> bool {
        let bytes = items.as_ssz_bytes().unwrap();
        bytes.len() == items.ssz_bytes_len()
            && Vec::<Vec<u8>>::from_ssz_bytes(&bytes) == Ok(items)
    }

    #[quickcheck]
    fn quickcheck_fixed_len_struct(a: u16, b: u64, c: u32) -> bool {
        let item = FixedLen { a, b, c };
        FixedLen::from_ssz_bytes(&item.as_ssz_bytes().unwrap()) == Ok(item)
    }

    #[quickcheck]
    fn quickcheck_bitlist(bits: Vec<bool>) -> bool {
        let bitlist = Bitlist::from_bools(&bits);
        let bytes = bitlist.as_ssz_bytes().unwrap();
        let decoded = Bitlist::from_raw_bytes(&bytes, bits.len()).unwrap();
        decoded.iter().collect::<Vec<_>>() == bits && decoded == bitlist
    }
}

mod known_encodings {
    use super::*;

    fn bytes(hex: &str) -> Vec<u8> {
        hex::decode(hex).unwrap()
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(258u16.as_ssz_bytes().unwrap(), bytes("0201"));
        assert_eq!(0x0102_0304u32.as_ssz_bytes().unwrap(), bytes("04030201"));
        assert_eq!(u64::MAX.as_ssz_bytes().unwrap(), bytes("ffffffffffffffff"));
        assert_eq!(
            U256::from(1).as_ssz_bytes().unwrap(),
            bytes("0100000000000000000000000000000000000000000000000000000000000000")
        );
        assert_eq!(u32::from_ssz_bytes(&bytes("04030201")), Ok(0x0102_0304));
    }

    #[test]
    fn lists() {
        assert_eq!(vec![1u32, 2].as_ssz_bytes().unwrap(), bytes("0100000002000000"));
        assert_eq!(Vec::<u32>::new().as_ssz_bytes().unwrap(), bytes(""));

        // Two offsets (8 and 9) followed by the single byte of the first item.
        let nested: Vec<Vec<u8>> = vec![vec![1], vec![]];
        assert_eq!(nested.as_ssz_bytes().unwrap(), bytes("080000000900000001"));
        assert_eq!(
            <Vec<Vec<u8>>>::from_ssz_bytes(&bytes("080000000900000001")),
            Ok(nested)
        );
    }

    #[test]
    fn bitlist_sentinel() {
        let bitlist = Bitlist::from_bools(&[true, false, true]);
        assert_eq!(bitlist.as_ssz_bytes().unwrap(), bytes("0d"));
        assert_eq!(Bitlist::from_raw_bytes(&bytes("0d"), 3), Ok(bitlist));

        let full_byte = Bitlist::from_bools(&[true; 8]);
        assert_eq!(full_byte.as_ssz_bytes().unwrap(), bytes("ff01"));
    }
}
