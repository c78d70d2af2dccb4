//! Generates SSZ `Encode`, `Decode` and `TreeHash` implementations from Rust type declarations.
//!
//! Declarations are read from source text rather than compiled types, so the generator can run
//! from a build script. Sequence lengths are given with `#[ssz(size = "..", max = "..")]`
//! annotations, one comma-separated entry per dimension with `?` marking a list:
//!
//! ```rust
//! use sszgen::{render, Config, SourceIndex, TypeCache};
//!
//! let source = r#"
//!     pub struct Attestation {
//!         #[ssz(max = "2048")]
//!         pub aggregation_bits: Bitlist,
//!         #[ssz(size = "?,32", max = "16")]
//!         pub roots: Vec<Vec<u8>>,
//!     }
//! "#;
//!
//! let index = SourceIndex::from_sources(vec![("phase0", source)]).unwrap();
//! let log = logging::test_logger();
//! let out = render(&index, &TypeCache::new(), &Config::default(), "phase0", &log).unwrap();
//!
//! assert!(out.contains("impl ssz :: Encode for Attestation"));
//! ```
//!
//! The mapping from Rust types to schemas is:
//!
//! - `bool`, `u8`, `u16`, `u32`, `u64`, `u128` and `U256` are basic types.
//! - `[T; N]` is a vector and `Vec<T>` is a vector or list, depending on its annotation.
//! - `Bitlist` and `Bitvector` are bitfields, sized by their annotation.
//! - `Box<T>` is transparent.
//! - Structs with named fields are containers. Only `pub` fields are serialized.
//! - Enums are unions. Only the first variant may be a unit variant, all others wrap one type.
//! - Type aliases are transparent overlays.

mod cache;
mod config;
mod error;
mod extract;
mod index;
mod render;

pub use cache::TypeCache;
pub use config::Config;
pub use error::Error;
pub use extract::Extractor;
pub use index::{Module, SourceIndex, TypeItem, TypeKey};
pub use render::{render, render_to_file};
