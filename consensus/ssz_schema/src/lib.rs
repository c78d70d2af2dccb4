//! A runtime description of SSZ types (`Schema`) with a generic codec and merkleizer over
//! dynamically-typed values (`Value`).
//!
//! Every SSZ type can be described as a `Schema`, so the functions in this crate serve as the
//! reference that typed, generated code is checked against.
//!
//! ## Example
//!
//! ```rust
//! use ssz_schema::{decode, encode, hash_tree_root, Field, Schema, Value};
//!
//! let schema = Schema::container(
//!     "Foo",
//!     vec![
//!         Field::new("a", Schema::uint(64).unwrap()),
//!         Field::new("b", Schema::list(Schema::uint(64).unwrap(), 4).unwrap()),
//!     ],
//! )
//! .unwrap();
//!
//! let value = Value::Container(vec![
//!     Value::uint(42),
//!     Value::Sequence(vec![Value::uint(1), Value::uint(2)]),
//! ]);
//!
//! let bytes = encode(&schema, &value).unwrap();
//! assert_eq!(bytes.len(), 8 + 4 + 16);
//! assert_eq!(decode(&schema, &bytes).unwrap(), value);
//! assert!(hash_tree_root(&schema, &value).is_ok());
//! ```

mod codec;
mod error;
mod merkleize;
mod schema;
mod value;

pub use codec::{decode, encode, size_of};
pub use error::SchemaError;
pub use merkleize::hash_tree_root;
pub use schema::{
    Container, Field, Overlay, OverlayKind, Schema, UintSize, Union, Variant, MAX_UNION_VARIANTS,
};
pub use value::Value;
