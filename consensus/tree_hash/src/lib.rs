//! Computes the `hash_tree_root` of SSZ values.
//!
//! Types implement `TreeHash` directly for basic values. Composite values (vectors, lists,
//! bitfields and containers) have no type-level knowledge of their declared bounds, so their roots
//! are computed with the helpers in this crate (`vector_root`, `list_root`, `bitlist_root`, etc.)
//! which take the bound as an argument.

pub mod impls;
pub mod merkle_hasher;
mod pool;

pub use merkle_hasher::MerkleHasher;
pub use pool::{ChunkPool, PooledBuffer, CHUNK_POOL, MAX_POOLED_BUFFERS};
pub use ssz::Error;

use ethereum_hashing::{hash32_concat, hash_fixed, ZERO_HASHES, ZERO_HASHES_MAX_INDEX};
use smallvec::SmallVec;
use ssz::{check_list_len, check_vector_len, Bitlist, Bitvector, ErrorKind};

pub const BYTES_PER_CHUNK: usize = 32;
pub const HASHSIZE: usize = 32;
pub const MERKLE_HASH_CHUNK: usize = 2 * BYTES_PER_CHUNK;
pub const MAX_UNION_SELECTOR: u8 = ssz::MAX_UNION_SELECTOR;

pub type Hash256 = ethereum_types::H256;
pub type PackedEncoding = SmallVec<[u8; BYTES_PER_CHUNK]>;

/// Convenience method for `MerkleHasher` which also provides some fast-paths for small trees.
///
/// `minimum_leaf_count` will only be used if it is greater than or equal to the minimum number of
/// leaves that can be created from `bytes`.
pub fn merkle_root(bytes: &[u8], minimum_leaf_count: usize) -> Result<Hash256, Error> {
    let leaves = std::cmp::max(
        (bytes.len() + (HASHSIZE - 1)) / HASHSIZE,
        minimum_leaf_count,
    );

    if leaves == 0 {
        // If there are no bytes then the hash is always zero.
        Ok(Hash256::zero())
    } else if leaves == 1 {
        // If there is only one leaf, the hash is always those leaf bytes padded out to 32-bytes.
        let mut hash = [0; HASHSIZE];
        hash[0..bytes.len()].copy_from_slice(bytes);
        Ok(Hash256::from_slice(&hash))
    } else if leaves == 2 {
        // If there are only two leaves (this is common with BLS pubkeys), we can avoid some
        // overhead with `MerkleHasher` and just do a simple 3-node tree here.
        let mut leaves = [0; HASHSIZE * 2];
        leaves[0..bytes.len()].copy_from_slice(bytes);

        Ok(Hash256::from_slice(&hash_fixed(&leaves)))
    } else {
        // If there are 3 or more leaves, use `MerkleHasher`.
        let mut hasher = MerkleHasher::with_leaves(leaves);
        hasher.write(bytes)?;
        Ok(hasher.finish()?)
    }
}

/// Returns the node created by hashing `root` and `length`.
///
/// Used in `TreeHash` for inserting the length of a list above it's root.
pub fn mix_in_length(root: &Hash256, length: usize) -> Hash256 {
    let usize_len = std::mem::size_of::<usize>();

    let mut length_bytes = [0; BYTES_PER_CHUNK];
    length_bytes[0..usize_len].copy_from_slice(&length.to_le_bytes());

    Hash256::from_slice(&hash32_concat(root.as_bytes(), &length_bytes)[..])
}

/// Returns the root created by hashing `root` and `selector`.
///
/// ## Errors
///
/// Returns an error if `selector > MAX_UNION_SELECTOR`.
///
/// ## Specification
///
/// ```ignore,text
/// mix_in_selector: Given a Merkle root root and a type selector selector ("uint256" little-endian
/// serialization) return hash(root + selector).
/// ```
///
/// https://github.com/ethereum/consensus-specs/blob/v1.1.0-beta.3/ssz/simple-serialize.md#union
pub fn mix_in_selector(root: &Hash256, selector: u8) -> Result<Hash256, Error> {
    if selector > MAX_UNION_SELECTOR {
        return Err(ErrorKind::UnionSelectorInvalid(selector).into());
    }

    let mut chunk = [0; BYTES_PER_CHUNK];
    chunk[0] = selector;

    let root = hash32_concat(root.as_bytes(), &chunk);
    Ok(Hash256::from_slice(&root))
}

/// Returns a cached padding node for a given height, if the height is supported.
pub fn get_zero_hash(height: usize) -> Option<&'static [u8]> {
    if height <= ZERO_HASHES_MAX_INDEX {
        Some(&ZERO_HASHES[height])
    } else {
        None
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum TreeHashType {
    Basic,
    Vector,
    List,
    Container,
}

pub trait TreeHash {
    fn tree_hash_type() -> TreeHashType;

    fn tree_hash_packed_encoding(&self) -> PackedEncoding;

    fn tree_hash_packing_factor() -> usize;

    fn tree_hash_root(&self) -> Result<Hash256, Error>;
}

/// Punch through references.
impl<'a, T> TreeHash for &'a T
where
    T: TreeHash,
{
    fn tree_hash_type() -> TreeHashType {
        T::tree_hash_type()
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        T::tree_hash_packed_encoding(*self)
    }

    fn tree_hash_packing_factor() -> usize {
        T::tree_hash_packing_factor()
    }

    fn tree_hash_root(&self) -> Result<Hash256, Error> {
        T::tree_hash_root(*self)
    }
}

/// Merkleize `items`, padded to `capacity` items.
///
/// Basic items are packed into chunks, composite items contribute their own root.
fn sequence_root<T: TreeHash>(items: &[T], capacity: usize) -> Result<Hash256, Error> {
    if T::tree_hash_type() == TreeHashType::Basic {
        let factor = T::tree_hash_packing_factor();
        let minimum_leaf_count = (capacity + factor - 1) / factor;

        let mut buf = CHUNK_POOL.acquire();
        buf.reserve(items.len() * HASHSIZE / factor);
        for item in items {
            buf.extend_from_slice(&item.tree_hash_packed_encoding());
        }

        merkle_root(&buf, minimum_leaf_count)
    } else {
        sequence_root_with(items, capacity, |item| item.tree_hash_root())
    }
}

fn sequence_root_with<T, F>(items: &[T], capacity: usize, f: F) -> Result<Hash256, Error>
where
    F: Fn(&T) -> Result<Hash256, Error>,
{
    let mut hasher = MerkleHasher::with_leaves(capacity);

    for (i, item) in items.iter().enumerate() {
        let root = f(item).map_err(|e| e.at_index(i))?;
        hasher.write(root.as_bytes())?;
    }

    Ok(hasher.finish()?)
}

/// Returns the root of a vector which must contain exactly `len` items.
pub fn vector_root<T: TreeHash>(items: &[T], len: usize) -> Result<Hash256, Error> {
    check_vector_len(items.len(), len)?;
    sequence_root(items, len)
}

/// Returns the root of a vector of `len` composite items, each of which is hashed with `f`.
///
/// Used where the item root depends on a bound that `T` does not know about (e.g., nested lists).
pub fn vector_root_with<T, F>(items: &[T], len: usize, f: F) -> Result<Hash256, Error>
where
    F: Fn(&T) -> Result<Hash256, Error>,
{
    check_vector_len(items.len(), len)?;
    sequence_root_with(items, len, f)
}

/// Returns the root of a list with a maximum of `max_len` items, including the length mix-in.
pub fn list_root<T: TreeHash>(items: &[T], max_len: usize) -> Result<Hash256, Error> {
    check_list_len(items.len(), max_len)?;
    let root = sequence_root(items, max_len)?;
    Ok(mix_in_length(&root, items.len()))
}

/// As per `list_root`, but each (composite) item is hashed with `f`.
pub fn list_root_with<T, F>(items: &[T], max_len: usize, f: F) -> Result<Hash256, Error>
where
    F: Fn(&T) -> Result<Hash256, Error>,
{
    check_list_len(items.len(), max_len)?;
    let root = sequence_root_with(items, max_len, f)?;
    Ok(mix_in_length(&root, items.len()))
}

/// Returns the root of a bitlist with a maximum of `max_bits` bits.
///
/// The delimiter bit is excluded, the bits are padded to the chunk count of `max_bits` and the
/// bit-length is mixed in.
pub fn bitlist_root(bitlist: &Bitlist, max_bits: usize) -> Result<Hash256, Error> {
    bitlist.check_max(max_bits)?;
    let bytes = bitlist.bytes_without_delimiter();
    let root = merkle_root(&bytes, (max_bits + 255) / 256)?;
    Ok(mix_in_length(&root, bitlist.len()))
}

/// Returns the root of a bitvector of exactly `bits` bits.
pub fn bitvector_root(bitvector: &Bitvector, bits: usize) -> Result<Hash256, Error> {
    bitvector.check_len(bits)?;
    merkle_root(bitvector.as_raw_bytes(), (bits + 255) / 256)
}

/// Returns the root of a container with the given field roots, in field order.
pub fn container_root(field_roots: &[Hash256]) -> Result<Hash256, Error> {
    let mut hasher = MerkleHasher::with_leaves(field_roots.len());

    for root in field_roots {
        hasher.write(root.as_bytes())?;
    }

    Ok(hasher.finish()?)
}
