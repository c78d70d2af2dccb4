use super::*;

pub mod impls;

/// Provides SSZ encoding (serialization) via the `as_ssz_bytes(&self)` method.
///
/// Encoding is fallible: types whose wire shape depends on a declared bound (e.g., a `Vec<u64>`
/// standing in for a list with a maximum length) must reject values which violate that bound.
pub trait Encode {
    /// Returns `true` if this object has a fixed-length.
    ///
    /// I.e., there are no variable length items in this object or any of it's contained objects.
    fn is_ssz_fixed_len() -> bool;

    /// Append the encoding `self` to `buf`.
    ///
    /// Note, variable length objects need only to append their "variable length" portion, they do
    /// not need to provide their offset.
    fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error>;

    /// The number of bytes this object occupies in the fixed-length portion of the SSZ bytes.
    ///
    /// By default, this is set to `BYTES_PER_LENGTH_OFFSET` which is suitable for variable length
    /// objects, but not fixed-length objects. Fixed-length objects _must_ return a value which
    /// represents their length.
    fn ssz_fixed_len() -> usize {
        BYTES_PER_LENGTH_OFFSET
    }

    /// Returns the size (in bytes) when `self` is serialized.
    ///
    /// Returns the same value as `self.as_ssz_bytes().len()` but this method is significantly more
    /// efficient.
    fn ssz_bytes_len(&self) -> usize;

    /// Returns the full-form encoding of this object.
    ///
    /// The default implementation of this method should suffice for most cases.
    fn as_ssz_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(self.ssz_bytes_len());

        self.ssz_append(&mut buf)?;

        Ok(buf)
    }
}

/// Allow for encoding an ordered series of distinct or indistinct objects as SSZ bytes.
///
/// **You must call `finalize(..)` after the final `append(..)` call** to ensure the bytes are
/// written to `buf`.
///
/// ## Example
///
/// Use `SszEncoder` to produce identical output to `foo.as_ssz_bytes()`:
///
/// ```rust
/// use ssz::{Encode, SszEncoder};
///
/// let a: u64 = 42;
/// let b: Vec<u16> = vec![1, 3, 3, 7];
///
/// let mut buf = vec![];
/// let offset = <u64 as Encode>::ssz_fixed_len() + <Vec<u16> as Encode>::ssz_fixed_len();
///
/// let mut encoder = SszEncoder::container(&mut buf, offset);
/// encoder.append(&a).unwrap();
/// encoder.append(&b).unwrap();
/// encoder.finalize();
///
/// assert_eq!(buf, vec![42, 0, 0, 0, 0, 0, 0, 0, 12, 0, 0, 0, 1, 0, 3, 0, 3, 0, 7, 0]);
/// ```
pub struct SszEncoder<'a> {
    offset: usize,
    buf: &'a mut Vec<u8>,
    variable_bytes: Vec<u8>,
}

impl<'a> SszEncoder<'a> {
    /// Instantiate a new encoder for encoding a SSZ container.
    pub fn container(buf: &'a mut Vec<u8>, num_fixed_bytes: usize) -> Self {
        buf.reserve(num_fixed_bytes);

        Self {
            offset: num_fixed_bytes,
            buf,
            variable_bytes: vec![],
        }
    }

    /// Append some `item` to the SSZ bytes.
    pub fn append<T: Encode>(&mut self, item: &T) -> Result<(), Error> {
        self.append_parameterized(T::is_ssz_fixed_len(), |buf| item.ssz_append(buf))
    }

    /// As per `Self::append`, but annotates any error with the field `name`.
    pub fn append_field<T: Encode>(&mut self, name: &str, item: &T) -> Result<(), Error> {
        self.append(item).map_err(|e| e.in_field(name))
    }

    /// Uses `ssz_append` to append the encoding of some item to the SSZ bytes.
    pub fn append_parameterized<F>(
        &mut self,
        is_ssz_fixed_len: bool,
        ssz_append: F,
    ) -> Result<(), Error>
    where
        F: FnOnce(&mut Vec<u8>) -> Result<(), Error>,
    {
        if is_ssz_fixed_len {
            ssz_append(self.buf)
        } else {
            write_offset(self.buf, self.offset + self.variable_bytes.len())?;

            ssz_append(&mut self.variable_bytes)
        }
    }

    /// Write the variable bytes to `self.bytes`.
    ///
    /// This method must be called after the final `append(..)` call when serializing
    /// variable-length items.
    pub fn finalize(&mut self) -> &mut Vec<u8> {
        self.buf.append(&mut self.variable_bytes);

        self.buf
    }
}

/// Append `offset` to `buf` as `BYTES_PER_LENGTH_OFFSET` little-endian bytes.
///
/// Returns an error if `offset` cannot be represented in `BYTES_PER_LENGTH_OFFSET` bytes.
pub fn write_offset(buf: &mut Vec<u8>, offset: usize) -> Result<(), Error> {
    if offset > MAX_LENGTH_VALUE {
        return Err(Error::max_size_violation(offset, MAX_LENGTH_VALUE));
    }

    buf.extend_from_slice(&offset.to_le_bytes()[0..BYTES_PER_LENGTH_OFFSET]);

    Ok(())
}
