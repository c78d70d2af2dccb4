use super::*;
use ethereum_types::{H256, U256};

fn int_to_hash256(int: u64) -> Hash256 {
    let mut bytes = [0; HASHSIZE];
    bytes[0..8].copy_from_slice(&int.to_le_bytes());
    Hash256::from_slice(&bytes)
}

macro_rules! impl_for_bitsize {
    ($type: ident, $bit_size: expr) => {
        impl TreeHash for $type {
            fn tree_hash_type() -> TreeHashType {
                TreeHashType::Basic
            }

            fn tree_hash_packed_encoding(&self) -> PackedEncoding {
                PackedEncoding::from_slice(&self.to_le_bytes())
            }

            fn tree_hash_packing_factor() -> usize {
                HASHSIZE / ($bit_size / 8)
            }

            #[allow(clippy::cast_lossless)] // Lint does not apply to all uses of this macro.
            fn tree_hash_root(&self) -> Result<Hash256, Error> {
                Ok(int_to_hash256(*self as u64))
            }
        }
    };
}

impl_for_bitsize!(u8, 8);
impl_for_bitsize!(u16, 16);
impl_for_bitsize!(u32, 32);
impl_for_bitsize!(u64, 64);

impl TreeHash for u128 {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Basic
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        PackedEncoding::from_slice(&self.to_le_bytes())
    }

    fn tree_hash_packing_factor() -> usize {
        2
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        let mut result = [0; HASHSIZE];
        result[0..16].copy_from_slice(&self.to_le_bytes());
        Ok(Hash256::from_slice(&result))
    }
}

impl TreeHash for bool {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Basic
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        (*self as u8).tree_hash_packed_encoding()
    }

    fn tree_hash_packing_factor() -> usize {
        u8::tree_hash_packing_factor()
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        Ok(int_to_hash256(*self as u64))
    }
}

/// A fixed-length byte vector (`bytesN`).
impl<const N: usize> TreeHash for [u8; N] {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        unreachable!("bytesN should never be packed.")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("bytesN should never be packed.")
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        merkle_root(&self[..], (N + HASHSIZE - 1) / HASHSIZE)
    }
}

impl TreeHash for U256 {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Basic
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        let mut result = [0; 32];
        self.to_little_endian(&mut result);
        PackedEncoding::from_slice(&result)
    }

    fn tree_hash_packing_factor() -> usize {
        1
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        let mut result = [0; 32];
        self.to_little_endian(&mut result[..]);
        Ok(Hash256::from_slice(&result))
    }
}

impl TreeHash for H256 {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        PackedEncoding::from_slice(self.as_bytes())
    }

    fn tree_hash_packing_factor() -> usize {
        1
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        Ok(*self)
    }
}

/// Boxing does not change the root.
impl<T: TreeHash> TreeHash for Box<T> {
    fn tree_hash_type() -> TreeHashType {
        T::tree_hash_type()
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        self.as_ref().tree_hash_packed_encoding()
    }

    fn tree_hash_packing_factor() -> usize {
        T::tree_hash_packing_factor()
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        self.as_ref().tree_hash_root()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bool() {
        let mut true_bytes: Vec<u8> = vec![1];
        true_bytes.append(&mut vec![0; 31]);

        let false_bytes: Vec<u8> = vec![0; 32];

        assert_eq!(
            true.tree_hash_root().unwrap().as_bytes(),
            true_bytes.as_slice()
        );
        assert_eq!(
            false.tree_hash_root().unwrap().as_bytes(),
            false_bytes.as_slice()
        );
    }

    #[test]
    fn int_to_bytes() {
        assert_eq!(int_to_hash256(0).as_bytes(), &[0; 32]);
        assert_eq!(
            int_to_hash256(1).as_bytes(),
            &[
                1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0
            ]
        );
        assert_eq!(
            int_to_hash256(u64::max_value()).as_bytes(),
            &[
                255, 255, 255, 255, 255, 255, 255, 255, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0
            ]
        );
    }

    #[test]
    fn u128_and_u256() {
        let mut expected = [0; 32];
        expected[0..16].copy_from_slice(&u128::MAX.to_le_bytes());
        assert_eq!(u128::MAX.tree_hash_root().unwrap().as_bytes(), &expected);

        let value = U256::from(258);
        let mut expected = [0; 32];
        expected[0] = 2;
        expected[1] = 1;
        assert_eq!(value.tree_hash_root().unwrap().as_bytes(), &expected);
    }

    #[test]
    fn byte_arrays() {
        let mut expected = [0; 32];
        expected[0..4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!([1_u8, 2, 3, 4].tree_hash_root().unwrap().as_bytes(), &expected);

        assert_eq!(
            [9_u8; 32].tree_hash_root().unwrap(),
            Hash256::repeat_byte(9)
        );

        // A 96-byte signature spans three chunks, padded to four.
        let sig = [1_u8; 96];
        assert_eq!(sig.tree_hash_root(), merkle_root(&sig, 4));
    }

    #[test]
    fn packing() {
        assert_eq!(u8::tree_hash_packing_factor(), 32);
        assert_eq!(u64::tree_hash_packing_factor(), 4);
        assert_eq!(u128::tree_hash_packing_factor(), 2);
        assert_eq!(
            Box::new(7_u16).tree_hash_packed_encoding().as_slice(),
            &[7, 0]
        );
    }
}
