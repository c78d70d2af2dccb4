use crate::{Error, ErrorKind};
use smallvec::{smallvec, SmallVec};

/// Bitfields of up to 256 bits live on the stack.
type BitBytes = SmallVec<[u8; 32]>;

fn bytes_for_bit_len(bit_len: usize) -> usize {
    (bit_len + 7) / 8
}

fn get_bit(bytes: &[u8], i: usize) -> Option<bool> {
    bytes.get(i / 8).map(|byte| (byte >> (i % 8)) & 1 == 1)
}

fn set_bit(bytes: &mut [u8], i: usize, value: bool) -> Option<()> {
    let byte = bytes.get_mut(i / 8)?;
    if value {
        *byte |= 1 << (i % 8)
    } else {
        *byte &= !(1 << (i % 8))
    }
    Some(())
}

/// A variable-length collection of bits, stored in its SSZ form.
///
/// The final byte contains a "delimiter" bit one place above the highest bit of the list, so the
/// bit-length is recoverable from the bytes alone. The bytes are therefore never empty.
///
/// The maximum length is part of the schema of the enclosing type, not of this struct. See
/// `Bitlist::from_raw_bytes` and `Bitlist::check_max`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bitlist {
    bytes: BitBytes,
}

impl Bitlist {
    /// Instantiate a bitlist of `len` bits, all `false`.
    pub fn with_capacity(len: usize) -> Self {
        let mut bytes: BitBytes = smallvec![0; len / 8 + 1];
        bytes[len / 8] |= 1 << (len % 8);
        Self { bytes }
    }

    /// Instantiate a bitlist from a slice of bits.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut bitlist = Self::with_capacity(bits.len());
        for (i, bit) in bits.iter().enumerate() {
            if *bit {
                bitlist.bytes[i / 8] |= 1 << (i % 8);
            }
        }
        bitlist
    }

    /// Instantiate from SSZ bytes, ensuring the delimiter bit is present and the bit-length does
    /// not exceed `max_bits`.
    pub fn from_raw_bytes(bytes: &[u8], max_bits: usize) -> Result<Self, Error> {
        let last = *bytes.last().ok_or(ErrorKind::EmptyBitlist)?;

        if last == 0 {
            return Err(
                ErrorKind::BytesInvalid("bitlist is missing its delimiter bit".to_string()).into(),
            );
        }

        let bitlist = Self {
            bytes: SmallVec::from_slice(bytes),
        };
        bitlist.check_max(max_bits)?;

        Ok(bitlist)
    }

    /// Returns an error if this bitlist has more than `max_bits` bits.
    pub fn check_max(&self, max_bits: usize) -> Result<(), Error> {
        let len = self.len();
        if len > max_bits {
            Err(Error::max_size_violation(len, max_bits))
        } else {
            Ok(())
        }
    }

    /// The number of bits in the list, excluding the delimiter.
    pub fn len(&self) -> usize {
        let last = self.bytes.last().copied().unwrap_or(1);
        let highest_bit = 7 - last.leading_zeros() as usize;
        (self.bytes.len() - 1) * 8 + highest_bit
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `None` if `i` is out of bounds.
    pub fn get(&self, i: usize) -> Option<bool> {
        if i < self.len() {
            get_bit(&self.bytes, i)
        } else {
            None
        }
    }

    /// Returns `None` if `i` is out of bounds.
    pub fn set(&mut self, i: usize, value: bool) -> Option<()> {
        if i < self.len() {
            set_bit(&mut self.bytes, i, value)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| get_bit(&self.bytes, i).unwrap_or(false))
    }

    pub fn num_set_bits(&self) -> usize {
        self.bytes
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum::<usize>()
            .saturating_sub(1)
    }

    /// The SSZ encoding of the list, including the delimiter bit.
    pub fn as_raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_raw_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// The bits of the list packed into `ceil(len / 8)` bytes, without the delimiter bit.
    pub fn bytes_without_delimiter(&self) -> Vec<u8> {
        let len = self.len();
        let mut bytes = self.bytes.to_vec();
        let _ = set_bit(&mut bytes, len, false);
        bytes.truncate(bytes_for_bit_len(len));
        bytes
    }
}

impl Default for Bitlist {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

/// A fixed-length collection of bits, stored in its SSZ form (with no delimiter).
///
/// The bit-length is part of the schema of the enclosing type; the bytes only imply an upper bound
/// on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bitvector {
    bytes: BitBytes,
}

impl Bitvector {
    /// Instantiate a bitvector that can hold `bit_len` bits, all `false`.
    pub fn new(bit_len: usize) -> Self {
        Self {
            bytes: smallvec![0; bytes_for_bit_len(bit_len)],
        }
    }

    /// Instantiate from SSZ bytes, ensuring they have the exact length required by `bit_len`.
    pub fn from_raw_bytes(bytes: &[u8], bit_len: usize) -> Result<Self, Error> {
        let bitvector = Self {
            bytes: SmallVec::from_slice(bytes),
        };
        bitvector.check_len(bit_len)?;
        Ok(bitvector)
    }

    /// Returns an error if the bytes are not exactly the length required by `bit_len`.
    pub fn check_len(&self, bit_len: usize) -> Result<(), Error> {
        let expected = bytes_for_bit_len(bit_len);
        if self.bytes.len() != expected {
            Err(Error::size_violation(self.bytes.len(), expected))
        } else {
            Ok(())
        }
    }

    /// Returns `None` if `i` is beyond the stored bytes.
    pub fn get(&self, i: usize) -> Option<bool> {
        get_bit(&self.bytes, i)
    }

    /// Returns `None` if `i` is beyond the stored bytes.
    pub fn set(&mut self, i: usize, value: bool) -> Option<()> {
        set_bit(&mut self.bytes, i, value)
    }

    pub fn num_set_bits(&self) -> usize {
        self.bytes.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    pub fn as_raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_raw_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitlist_delimiter() {
        assert_eq!(Bitlist::with_capacity(0).as_raw_bytes(), &[0b0000_0001]);
        assert_eq!(Bitlist::with_capacity(1).as_raw_bytes(), &[0b0000_0010]);
        assert_eq!(Bitlist::with_capacity(8).as_raw_bytes(), &[0, 0b0000_0001]);
        assert_eq!(Bitlist::with_capacity(9).as_raw_bytes(), &[0, 0b0000_0010]);

        for len in 0..20 {
            assert_eq!(Bitlist::with_capacity(len).len(), len);
        }
    }

    #[test]
    fn bitlist_get_set() {
        let mut bitlist = Bitlist::with_capacity(10);
        assert_eq!(bitlist.set(9, true), Some(()));
        assert_eq!(bitlist.set(10, true), None);
        assert_eq!(bitlist.get(9), Some(true));
        assert_eq!(bitlist.get(8), Some(false));
        assert_eq!(bitlist.get(10), None);
        assert_eq!(bitlist.num_set_bits(), 1);
        assert_eq!(bitlist.len(), 10);
        assert_eq!(bitlist.as_raw_bytes(), &[0, 0b0000_0110]);
    }

    #[test]
    fn bitlist_from_bools() {
        let bitlist = Bitlist::from_bools(&[true, false, true]);
        assert_eq!(bitlist.as_raw_bytes(), &[0b0000_1101]);
        assert_eq!(bitlist.iter().collect::<Vec<_>>(), vec![true, false, true]);
    }

    #[test]
    fn bitlist_from_raw_bytes() {
        assert_eq!(
            Bitlist::from_raw_bytes(&[], 8).unwrap_err().kind(),
            &ErrorKind::EmptyBitlist
        );
        assert!(matches!(
            Bitlist::from_raw_bytes(&[1, 0], 8).unwrap_err().kind(),
            ErrorKind::BytesInvalid(_)
        ));

        // Eight bits is fine for a max of eight, but not seven.
        assert_eq!(Bitlist::from_raw_bytes(&[0xff, 0x01], 8).unwrap().len(), 8);
        assert_eq!(
            Bitlist::from_raw_bytes(&[0xff, 0x01], 7),
            Err(Error::max_size_violation(8, 7))
        );
    }

    #[test]
    fn bitlist_without_delimiter() {
        let bitlist = Bitlist::from_bools(&[true; 8]);
        assert_eq!(bitlist.as_raw_bytes(), &[0xff, 0x01]);
        assert_eq!(bitlist.bytes_without_delimiter(), vec![0xff]);

        let bitlist = Bitlist::from_bools(&[true, true, false]);
        assert_eq!(bitlist.bytes_without_delimiter(), vec![0b0000_0011]);

        assert!(Bitlist::default().bytes_without_delimiter().is_empty());
    }

    #[test]
    fn bitvector_len() {
        let mut bitvector = Bitvector::new(4);
        assert_eq!(bitvector.as_raw_bytes(), &[0]);
        bitvector.set(3, true).unwrap();
        assert_eq!(bitvector.as_raw_bytes(), &[0b0000_1000]);
        assert_eq!(bitvector.num_set_bits(), 1);

        assert!(Bitvector::from_raw_bytes(&[0, 0], 9).is_ok());
        assert_eq!(
            Bitvector::from_raw_bytes(&[0, 0], 8),
            Err(Error::size_violation(2, 1))
        );
        assert_eq!(
            Bitvector::from_raw_bytes(&[0], 9),
            Err(Error::size_violation(1, 2))
        );
    }
}
