//! Helpers for fields which are SSZ lists with a maximum length, held as a `Vec`.
use ssz::{Decode, Encode, Error};

/// Append `items` as a list, failing if there are more than `max_len` of them.
pub fn append_list<T: Encode>(items: &[T], max_len: usize, buf: &mut Vec<u8>) -> Result<(), Error> {
    ssz::check_list_len(items.len(), max_len)?;
    ssz::sequence_ssz_append(items.iter(), buf)
}

pub fn list_bytes_len<T: Encode>(items: &[T]) -> usize {
    ssz::sequence_ssz_bytes_len(items.iter())
}

/// Decode a list of at most `max_len` items.
pub fn decode_list<T: Decode>(bytes: &[u8], max_len: usize) -> Result<Vec<T>, Error> {
    if T::is_ssz_fixed_len() {
        ssz::decode_list_of_fixed_length_items(bytes, Some(max_len))
    } else {
        ssz::decode_list_of_variable_length_items(bytes, Some(max_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz::ErrorKind;

    #[test]
    fn max_len_is_inclusive() {
        let mut buf = vec![];
        append_list(&[1u16, 2, 3], 3, &mut buf).unwrap();
        assert_eq!(buf, vec![1, 0, 2, 0, 3, 0]);
        assert_eq!(list_bytes_len(&[1u16, 2, 3]), 6);
        assert_eq!(decode_list::<u16>(&buf, 3), Ok(vec![1, 2, 3]));

        assert_eq!(
            append_list(&[1u16, 2, 3], 2, &mut vec![]),
            Err(Error::max_size_violation(3, 2))
        );
        assert_eq!(
            decode_list::<u16>(&buf, 2),
            Err(Error::max_size_violation(3, 2))
        );
    }

    #[test]
    fn variable_length_items() {
        let items = vec![vec![1u8], vec![], vec![2, 3]];
        let mut buf = vec![];
        append_list(&items, 4, &mut buf).unwrap();

        assert_eq!(buf.len(), list_bytes_len(&items));
        assert_eq!(decode_list::<Vec<u8>>(&buf, 4), Ok(items));

        // The first offset must be a multiple of the offset size.
        assert_eq!(
            decode_list::<Vec<u8>>(&[5, 0, 0, 0, 0], 4).unwrap_err().kind(),
            &ErrorKind::OffsetViolation(ssz::OffsetError::InvalidListFixedBytesLen(5))
        );
    }
}
