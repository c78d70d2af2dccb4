//! Provides encoding (serialization) and decoding (deserialization) in the SimpleSerialize (SSZ)
//! format designed for use in Ethereum 2.0.
//!
//! Adheres to the Ethereum 2.0 [SSZ
//! specification](https://github.com/ethereum/consensus-specs/blob/v1.0.0/ssz/simple-serialize.md).
//!
//! ## Example
//!
//! ```rust
//! use ssz::{Decode, Encode, Error, SszDecoderBuilder, SszEncoder};
//!
//! #[derive(PartialEq, Debug)]
//! struct Foo {
//!     a: u64,
//!     b: Vec<u16>,
//! }
//!
//! impl Encode for Foo {
//!     fn is_ssz_fixed_len() -> bool {
//!         false
//!     }
//!
//!     fn ssz_bytes_len(&self) -> usize {
//!         8 + ssz::BYTES_PER_LENGTH_OFFSET + self.b.ssz_bytes_len()
//!     }
//!
//!     fn ssz_append(&self, buf: &mut Vec<u8>) -> Result<(), Error> {
//!         let mut encoder = SszEncoder::container(buf, 8 + ssz::BYTES_PER_LENGTH_OFFSET);
//!         encoder.append_field("a", &self.a)?;
//!         encoder.append_field("b", &self.b)?;
//!         encoder.finalize();
//!         Ok(())
//!     }
//! }
//!
//! impl Decode for Foo {
//!     fn is_ssz_fixed_len() -> bool {
//!         false
//!     }
//!
//!     fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, Error> {
//!         let mut builder = SszDecoderBuilder::new(bytes);
//!         builder.register_type::<u64>()?;
//!         builder.register_type::<Vec<u16>>()?;
//!
//!         let mut decoder = builder.build()?;
//!
//!         Ok(Self {
//!             a: decoder.decode_field("a")?,
//!             b: decoder.decode_field("b")?,
//!         })
//!     }
//! }
//!
//! let foo = Foo { a: 42, b: vec![1, 3, 3, 7] };
//! let bytes = foo.as_ssz_bytes().unwrap();
//! assert_eq!(Foo::from_ssz_bytes(&bytes).unwrap(), foo);
//! ```

mod bitfield;
mod decode;
mod encode;
mod error;
mod union_selector;

pub use bitfield::{Bitlist, Bitvector};
pub use decode::{
    impls::{
        decode_fixed_length_items_with, decode_list_of_fixed_length_items,
        decode_list_of_variable_length_items, decode_variable_length_items_with,
        decode_vector_with,
    },
    read_offset, sanitize_offset, split_union_bytes, Decode, SszDecoder, SszDecoderBuilder,
};
pub use encode::{
    impls::{check_list_len, check_vector_len, sequence_ssz_append, sequence_ssz_bytes_len},
    write_offset, Encode, SszEncoder,
};
pub use error::{Error, ErrorKind, FieldPath, OffsetError, PathSegment};
pub use ethereum_types::{H256 as Hash256, U256};
pub use union_selector::UnionSelector;

/// The number of bytes used to represent an offset.
pub const BYTES_PER_LENGTH_OFFSET: usize = 4;
/// The maximum value that can be represented using `BYTES_PER_LENGTH_OFFSET`.
#[cfg(target_pointer_width = "32")]
pub const MAX_LENGTH_VALUE: usize = (std::u32::MAX >> (8 * (4 - BYTES_PER_LENGTH_OFFSET))) as usize;
#[cfg(target_pointer_width = "64")]
pub const MAX_LENGTH_VALUE: usize = (std::u64::MAX >> (8 * (8 - BYTES_PER_LENGTH_OFFSET))) as usize;

/// The number of bytes used to indicate the variant of a union.
pub const BYTES_PER_UNION_SELECTOR: usize = 1;
/// The highest possible union selector value (higher values are reserved for backwards compatible
/// extensions).
pub const MAX_UNION_SELECTOR: u8 = 127;

/// Convenience function to SSZ encode an object supporting ssz::Encode.
///
/// Equivalent to `val.as_ssz_bytes()`.
pub fn ssz_encode<T>(val: &T) -> Result<Vec<u8>, Error>
where
    T: Encode,
{
    val.as_ssz_bytes()
}
