use super::*;
use ethereum_types::{H256, U256};

macro_rules! impl_encodable_for_uint {
    ($type: ident, $bit_size: expr) => {
        impl Encode for $type {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $bit_size / 8
            }

            fn ssz_bytes_len(&self) -> usize {
                $bit_size / 8
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
                buf.extend_from_slice(&self.to_le_bytes());
                Ok(())
            }
        }
    };
}

impl_encodable_for_uint!(u8, 8);
impl_encodable_for_uint!(u16, 16);
impl_encodable_for_uint!(u32, 32);
impl_encodable_for_uint!(u64, 64);
impl_encodable_for_uint!(u128, 128);

impl Encode for bool {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        1
    }

    fn ssz_bytes_len(&self) -> usize {
        1
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        buf.push(*self as u8);
        Ok(())
    }
}

impl Encode for H256 {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn ssz_bytes_len(&self) -> usize {
        32
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        buf.extend_from_slice(self.as_bytes());
        Ok(())
    }
}

impl Encode for U256 {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn ssz_bytes_len(&self) -> usize {
        32
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        let n = <Self as Encode>::ssz_fixed_len();
        let s = buf.len();

        buf.resize(s + n, 0);
        self.to_little_endian(&mut buf[s..]);

        Ok(())
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        N
    }

    fn ssz_bytes_len(&self) -> usize {
        N
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        buf.extend_from_slice(&self[..]);
        Ok(())
    }
}

impl<T: Encode> Encode for Box<T> {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        T::ssz_fixed_len()
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        self.as_ref().ssz_append(buf)
    }

    fn ssz_bytes_len(&self) -> usize {
        self.as_ref().ssz_bytes_len()
    }
}

// Encode transparently through references.
impl<'a, T: Encode> Encode for &'a T {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        T::ssz_fixed_len()
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        T::ssz_append(self, buf)
    }

    fn ssz_bytes_len(&self) -> usize {
        T::ssz_bytes_len(self)
    }
}

/// A bitlist is always variable-length. The maximum length is not known to the type, see
/// `Bitlist::check_max`.
impl Encode for Bitlist {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        self.as_raw_bytes().len()
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        buf.extend_from_slice(self.as_raw_bytes());
        Ok(())
    }
}

/// Compute the encoded length of a vector-like sequence of `T`.
pub fn sequence_ssz_bytes_len<I, T>(iter: I) -> usize
where
    I: Iterator<Item = T> + ExactSizeIterator,
    T: Encode,
{
    // Compute length before doing any iteration.
    let length = iter.len();
    if <T as Encode>::is_ssz_fixed_len() {
        <T as Encode>::ssz_fixed_len() * length
    } else {
        let mut len = iter.map(|item| item.ssz_bytes_len()).sum();
        len += BYTES_PER_LENGTH_OFFSET * length;
        len
    }
}

/// Encode a vector-like sequence of `T`.
///
/// Errors from individual items are annotated with the index of that item.
pub fn sequence_ssz_append<I, T>(iter: I, buf: &mut Vec<u8>) -> Result<(), Error>
where
    I: Iterator<Item = T> + ExactSizeIterator,
    T: Encode,
{
    if T::is_ssz_fixed_len() {
        buf.reserve(T::ssz_fixed_len() * iter.len());

        for (i, item) in iter.enumerate() {
            item.ssz_append(buf).map_err(|e| e.at_index(i))?;
        }
    } else {
        let mut encoder = SszEncoder::container(buf, iter.len() * BYTES_PER_LENGTH_OFFSET);

        for (i, item) in iter.enumerate() {
            encoder.append(&item).map_err(|e| e.at_index(i))?;
        }

        encoder.finalize();
    }

    Ok(())
}

/// Returns an error if a list of `len` items exceeds `max_len`.
pub fn check_list_len(len: usize, max_len: usize) -> Result<(), Error> {
    if len > max_len {
        Err(Error::max_size_violation(len, max_len))
    } else {
        Ok(())
    }
}

/// Returns an error if a vector of `len` items does not have exactly `expected` items.
pub fn check_vector_len(len: usize, expected: usize) -> Result<(), Error> {
    if len != expected {
        Err(Error::size_violation(len, expected))
    } else {
        Ok(())
    }
}

/// An unbounded list. Types with a declared maximum should call `check_list_len` first.
impl<T: Encode> Encode for Vec<T> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_bytes_len(&self) -> usize {
        sequence_ssz_bytes_len(self.iter())
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
        sequence_ssz_append(self.iter(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_of_u8() {
        let vec: Vec<u8> = vec![];
        assert_eq!(vec.as_ssz_bytes().unwrap(), vec![]);

        let vec: Vec<u8> = vec![1];
        assert_eq!(vec.as_ssz_bytes().unwrap(), vec![1]);

        let vec: Vec<u8> = vec![0, 1, 2, 3];
        assert_eq!(vec.as_ssz_bytes().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn vec_of_vec_of_u8() {
        let vec: Vec<Vec<u8>> = vec![];
        assert_eq!(vec.as_ssz_bytes().unwrap(), vec![]);

        let vec: Vec<Vec<u8>> = vec![vec![]];
        assert_eq!(vec.as_ssz_bytes().unwrap(), vec![4, 0, 0, 0]);

        let vec: Vec<Vec<u8>> = vec![vec![], vec![]];
        assert_eq!(vec.as_ssz_bytes().unwrap(), vec![8, 0, 0, 0, 8, 0, 0, 0]);

        let vec: Vec<Vec<u8>> = vec![vec![0, 1, 2], vec![11, 22, 33]];
        assert_eq!(
            vec.as_ssz_bytes().unwrap(),
            vec![8, 0, 0, 0, 11, 0, 0, 0, 0, 1, 2, 11, 22, 33]
        );
    }

    #[test]
    fn ssz_encode_u16() {
        assert_eq!(1_u16.as_ssz_bytes().unwrap(), vec![1, 0]);
        assert_eq!(100_u16.as_ssz_bytes().unwrap(), vec![100, 0]);
        assert_eq!((1_u16 << 8).as_ssz_bytes().unwrap(), vec![0, 1]);
        assert_eq!(65535_u16.as_ssz_bytes().unwrap(), vec![255, 255]);
    }

    #[test]
    fn ssz_encode_u64() {
        assert_eq!(1_u64.as_ssz_bytes().unwrap(), vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            (!0_u64).as_ssz_bytes().unwrap(),
            vec![255, 255, 255, 255, 255, 255, 255, 255]
        );
    }

    #[test]
    fn ssz_encode_u256() {
        let mut expected = vec![0; 32];
        expected[0] = 1;
        expected[31] = 0x80;
        let value = U256::one() + (U256::one() << 255);
        assert_eq!(value.as_ssz_bytes().unwrap(), expected);
        assert_eq!(value.ssz_bytes_len(), 32);
    }

    #[test]
    fn ssz_encode_bool() {
        assert_eq!(true.as_ssz_bytes().unwrap(), vec![1]);
        assert_eq!(false.as_ssz_bytes().unwrap(), vec![0]);
    }

    #[test]
    fn ssz_encode_u8_array() {
        assert_eq!([1_u8, 2, 3, 4].as_ssz_bytes().unwrap(), vec![1, 2, 3, 4]);
        assert_eq!([7_u8; 96].as_ssz_bytes().unwrap(), vec![7; 96]);
        assert_eq!(<[u8; 96] as Encode>::ssz_fixed_len(), 96);
    }

    #[test]
    fn list_and_vector_len_checks() {
        assert!(check_list_len(4, 4).is_ok());
        assert_eq!(check_list_len(5, 4), Err(Error::max_size_violation(5, 4)));
        assert!(check_vector_len(32, 32).is_ok());
        assert_eq!(check_vector_len(31, 32), Err(Error::size_violation(31, 32)));
    }

    #[test]
    fn vec_of_bitlists() {
        let bitlists = vec![Bitlist::with_capacity(2), Bitlist::with_capacity(3)];
        assert_eq!(bitlists.ssz_bytes_len(), 8 + 1 + 1);
        assert_eq!(
            bitlists.as_ssz_bytes().unwrap(),
            vec![8, 0, 0, 0, 9, 0, 0, 0, 0b0000_0100, 0b0000_1000]
        );
    }
}
