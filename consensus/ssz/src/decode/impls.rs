use super::*;
use ethereum_types::{H256, U256};

macro_rules! impl_decodable_for_uint {
    ($type: ident, $bit_size: expr) => {
        impl Decode for $type {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $bit_size / 8
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
                let len = bytes.len();
                let expected = <Self as Decode>::ssz_fixed_len();

                if len != expected {
                    Err(Error::size_violation(len, expected))
                } else {
                    let mut array: [u8; $bit_size / 8] = std::default::Default::default();
                    array.clone_from_slice(bytes);

                    Ok(Self::from_le_bytes(array))
                }
            }
        }
    };
}

impl_decodable_for_uint!(u8, 8);
impl_decodable_for_uint!(u16, 16);
impl_decodable_for_uint!(u32, 32);
impl_decodable_for_uint!(u64, 64);
impl_decodable_for_uint!(u128, 128);

impl Decode for bool {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        1
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let len = bytes.len();
        let expected = <Self as Decode>::ssz_fixed_len();

        if len != expected {
            Err(Error::size_violation(len, expected))
        } else {
            match bytes[0] {
                0b0000_0000 => Ok(false),
                0b0000_0001 => Ok(true),
                _ => Err(ErrorKind::BytesInvalid(format!(
                    "Out-of-range for boolean: {}",
                    bytes[0]
                ))
                .into()),
            }
        }
    }
}

impl Decode for H256 {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let len = bytes.len();
        let expected = <Self as Decode>::ssz_fixed_len();

        if len != expected {
            Err(Error::size_violation(len, expected))
        } else {
            Ok(H256::from_slice(bytes))
        }
    }
}

impl Decode for U256 {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        32
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let len = bytes.len();
        let expected = <Self as Decode>::ssz_fixed_len();

        if len != expected {
            Err(Error::size_violation(len, expected))
        } else {
            Ok(U256::from_little_endian(bytes))
        }
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        N
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let len = bytes.len();

        if len != N {
            Err(Error::size_violation(len, N))
        } else {
            let mut array = [0; N];
            array.copy_from_slice(bytes);

            Ok(array)
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn is_ssz_fixed_len() -> bool {
        T::is_ssz_fixed_len()
    }

    fn ssz_fixed_len() -> usize {
        T::ssz_fixed_len()
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        T::from_ssz_bytes(bytes).map(Box::new)
    }
}

/// An unbounded list. Types with a declared maximum should use
/// `decode_list_of_fixed_length_items` or `decode_list_of_variable_length_items` directly.
impl<T: Decode> Decode for Vec<T> {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if T::is_ssz_fixed_len() {
            decode_list_of_fixed_length_items(bytes, None)
        } else {
            decode_list_of_variable_length_items(bytes, None)
        }
    }
}

/// Decodes `bytes` as if it were a list of fixed-length items, each decoded with `T`.
///
/// The `max_len` parameter can be used to ensure that the count of items does not exceed a
/// certain bound.
pub fn decode_list_of_fixed_length_items<T: Decode>(
    bytes: &[u8],
    max_len: Option<usize>,
) -> Result<Vec<T>, Error> {
    decode_fixed_length_items_with(bytes, T::ssz_fixed_len(), max_len, T::from_ssz_bytes)
}

/// Decodes `bytes` as if it were a list of variable-length items, each decoded with `T`.
///
/// The `max_len` parameter can be used to ensure that the count of items does not exceed a
/// certain bound.
pub fn decode_list_of_variable_length_items<T: Decode>(
    bytes: &[u8],
    max_len: Option<usize>,
) -> Result<Vec<T>, Error> {
    decode_variable_length_items_with(bytes, max_len, T::from_ssz_bytes)
}

/// Splits `bytes` into `item_len`-sized chunks, decoding each with `f`.
///
/// Fails if `bytes` is not a multiple of `item_len`, then if the number of items exceeds
/// `max_len`. Item errors are annotated with the index of the item.
pub fn decode_fixed_length_items_with<T, F>(
    bytes: &[u8],
    item_len: usize,
    max_len: Option<usize>,
    mut f: F,
) -> Result<Vec<T>, Error>
where
    F: FnMut(&[u8]) -> Result<T, Error>,
{
    if item_len == 0 {
        return Err(ErrorKind::BytesInvalid("zero-length list item".to_string()).into());
    }

    if bytes.len() % item_len != 0 {
        return Err(ErrorKind::AlignmentViolation {
            len: bytes.len(),
            element_size: item_len,
        }
        .into());
    }

    let num_items = bytes.len() / item_len;

    if let Some(max) = max_len {
        check_list_len(num_items, max)?;
    }

    bytes
        .chunks(item_len)
        .enumerate()
        .map(|(i, chunk)| f(chunk).map_err(|e| e.at_index(i)))
        .collect()
}

/// Decodes exactly `len` items of `item_len` bytes each.
pub fn decode_vector_with<T, F>(
    bytes: &[u8],
    len: usize,
    item_len: usize,
    f: F,
) -> Result<Vec<T>, Error>
where
    F: FnMut(&[u8]) -> Result<T, Error>,
{
    let expected = len * item_len;

    if bytes.len() != expected {
        return Err(Error::size_violation(bytes.len(), expected));
    }

    decode_fixed_length_items_with(bytes, item_len, None, f)
}

/// Decodes `bytes` as a list of variable-length items, where the list is prefixed by a table of
/// offsets (one per item). The byte-length of that table gives the number of items.
///
/// Item errors are annotated with the index of the item.
pub fn decode_variable_length_items_with<T, F>(
    bytes: &[u8],
    max_len: Option<usize>,
    mut f: F,
) -> Result<Vec<T>, Error>
where
    F: FnMut(&[u8]) -> Result<T, Error>,
{
    if bytes.is_empty() {
        return Ok(vec![]);
    }

    let first_offset = read_offset(bytes)?;
    sanitize_offset(first_offset, None, bytes.len(), Some(first_offset))?;

    if first_offset % BYTES_PER_LENGTH_OFFSET != 0 || first_offset < BYTES_PER_LENGTH_OFFSET {
        return Err(OffsetError::InvalidListFixedBytesLen(first_offset).into());
    }

    let num_items = first_offset / BYTES_PER_LENGTH_OFFSET;

    if let Some(max) = max_len {
        check_list_len(num_items, max)?;
    }

    let mut values = Vec::with_capacity(num_items);
    let mut offset = first_offset;

    for i in 1..=num_items {
        let slice_option = if i == num_items {
            bytes.get(offset..)
        } else {
            let start = offset;

            let next_offset = read_offset(&bytes[(i * BYTES_PER_LENGTH_OFFSET)..])?;
            offset = sanitize_offset(next_offset, Some(offset), bytes.len(), Some(first_offset))?;

            bytes.get(start..offset)
        };

        let slice = slice_option.ok_or(OffsetError::OutOfBounds(offset))?;

        values.push(f(slice).map_err(|e| e.at_index(i - 1))?);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: decoding of valid bytes is generally tested "indirectly" in the `/tests` dir, by
    // encoding then decoding the element.

    #[test]
    fn invalid_u8_array_4() {
        assert_eq!(
            <[u8; 4]>::from_ssz_bytes(&[0; 3]),
            Err(Error::size_violation(3, 4))
        );

        assert_eq!(
            <[u8; 4]>::from_ssz_bytes(&[0; 5]),
            Err(Error::size_violation(5, 4))
        );
    }

    #[test]
    fn invalid_bool() {
        assert_eq!(bool::from_ssz_bytes(&[0; 2]), Err(Error::size_violation(2, 1)));

        assert_eq!(bool::from_ssz_bytes(&[]), Err(Error::size_violation(0, 1)));

        if let Err(e) = bool::from_ssz_bytes(&[2]) {
            assert!(matches!(e.kind(), ErrorKind::BytesInvalid(_)));
        } else {
            panic!("Did not return error on invalid bool val")
        }
    }

    #[test]
    fn invalid_h256() {
        assert_eq!(H256::from_ssz_bytes(&[0; 33]), Err(Error::size_violation(33, 32)));

        assert_eq!(H256::from_ssz_bytes(&[0; 31]), Err(Error::size_violation(31, 32)));
    }

    #[test]
    fn empty_list() {
        let vec: Vec<Vec<u16>> = vec![];
        let bytes = vec.as_ssz_bytes().unwrap();
        assert!(bytes.is_empty());
        assert_eq!(Vec::from_ssz_bytes(&bytes), Ok(vec),);
    }

    #[test]
    fn first_length_points_backwards() {
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[0, 0, 0, 0]),
            Err(OffsetError::InvalidListFixedBytesLen(0).into())
        );

        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[1, 0, 0, 0]),
            Err(OffsetError::InvalidListFixedBytesLen(1).into())
        );

        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[2, 0, 0, 0]),
            Err(OffsetError::InvalidListFixedBytesLen(2).into())
        );

        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[3, 0, 0, 0]),
            Err(OffsetError::InvalidListFixedBytesLen(3).into())
        );
    }

    #[test]
    fn lengths_are_decreasing() {
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[12, 0, 0, 0, 14, 0, 0, 0, 12, 0, 0, 0, 1, 0, 1, 0]),
            Err(OffsetError::Decreasing(12).into())
        );
    }

    #[test]
    fn awkward_fixed_length_portion() {
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[10, 0, 0, 0, 10, 0, 0, 0, 0, 0]),
            Err(OffsetError::InvalidListFixedBytesLen(10).into())
        );
    }

    #[test]
    fn length_out_of_bounds() {
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[5, 0, 0, 0]),
            Err(OffsetError::OutOfBounds(5).into())
        );
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[8, 0, 0, 0, 9, 0, 0, 0]),
            Err(OffsetError::OutOfBounds(9).into())
        );
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[8, 0, 0, 0, 16, 0, 0, 0]),
            Err(OffsetError::OutOfBounds(16).into())
        );
    }

    #[test]
    fn vec_of_vec_of_u16() {
        assert_eq!(
            <Vec<Vec<u16>>>::from_ssz_bytes(&[4, 0, 0, 0]),
            Ok(vec![vec![]])
        );

        assert_eq!(
            <Vec<u16>>::from_ssz_bytes(&[0, 0, 1, 0, 2, 0, 3, 0]),
            Ok(vec![0, 1, 2, 3])
        );
        assert_eq!(<u16>::from_ssz_bytes(&[16, 0]), Ok(16));
        assert_eq!(<u16>::from_ssz_bytes(&[0, 1]), Ok(256));
        assert_eq!(<u16>::from_ssz_bytes(&[255, 255]), Ok(65535));

        assert_eq!(
            <u16>::from_ssz_bytes(&[255]),
            Err(Error::size_violation(1, 2))
        );

        assert_eq!(
            <u16>::from_ssz_bytes(&[]),
            Err(Error::size_violation(0, 2))
        );

        assert_eq!(
            <u16>::from_ssz_bytes(&[0, 1, 2]),
            Err(Error::size_violation(3, 2))
        );
    }

    #[test]
    fn misaligned_fixed_length_list() {
        assert_eq!(
            <Vec<u16>>::from_ssz_bytes(&[0, 0, 1]),
            Err(ErrorKind::AlignmentViolation {
                len: 3,
                element_size: 2
            }
            .into())
        );
    }

    #[test]
    fn max_len_boundaries() {
        let bytes = [1, 0, 2, 0, 3, 0, 4, 0];
        assert_eq!(
            decode_list_of_fixed_length_items::<u16>(&bytes, Some(4)),
            Ok(vec![1, 2, 3, 4])
        );
        assert_eq!(
            decode_list_of_fixed_length_items::<u16>(&bytes, Some(3)),
            Err(Error::max_size_violation(4, 3))
        );

        let nested = vec![vec![1_u16], vec![2, 3]].as_ssz_bytes().unwrap();
        assert!(decode_list_of_variable_length_items::<Vec<u16>>(&nested, Some(2)).is_ok());
        assert_eq!(
            decode_list_of_variable_length_items::<Vec<u16>>(&nested, Some(1)),
            Err(Error::max_size_violation(2, 1))
        );
    }

    #[test]
    fn item_errors_carry_index() {
        // Second item has an odd number of bytes.
        let bytes = [8, 0, 0, 0, 10, 0, 0, 0, 1, 0, 2];
        let e = <Vec<Vec<u16>>>::from_ssz_bytes(&bytes).unwrap_err();
        assert_eq!(e.path().to_string(), "[1]");
        assert!(matches!(e.kind(), ErrorKind::AlignmentViolation { .. }));
    }

    #[test]
    fn vector_len() {
        let bytes = [1, 0, 2, 0];
        assert_eq!(
            decode_vector_with(&bytes, 2, 2, u16::from_ssz_bytes),
            Ok(vec![1, 2])
        );
        assert_eq!(
            decode_vector_with(&bytes, 3, 2, u16::from_ssz_bytes),
            Err(Error::size_violation(4, 6))
        );
    }

    #[test]
    fn u256() {
        let mut bytes = [0; 32];
        bytes[1] = 1;
        assert_eq!(U256::from_ssz_bytes(&bytes), Ok(U256::from(256)));
    }
}
