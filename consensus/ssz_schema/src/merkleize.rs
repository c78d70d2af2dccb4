use crate::codec::{container_fields, encode_into, union_variant, Items};
use crate::{Overlay, OverlayKind, Schema, Value};
use ssz::{check_list_len, check_vector_len, Bitlist, Bitvector, Error};
use tree_hash::{
    bitlist_root, bitvector_root, container_root, merkle_root, mix_in_length, mix_in_selector,
    Hash256, MerkleHasher, BYTES_PER_CHUNK, CHUNK_POOL,
};

/// Returns the SSZ hash tree root of `value`.
///
/// Performs the same validation as `encode`, so any value which can be encoded can be hashed and
/// vice versa.
pub fn hash_tree_root(schema: &Schema, value: &Value) -> Result<Hash256, Error> {
    match (schema, value) {
        (Schema::Pointer(referent), Value::Null) => {
            hash_tree_root(referent, &referent.default_value())
        }
        (Schema::Pointer(referent), value) => hash_tree_root(referent, value),
        (Schema::Overlay(overlay), value) => overlay_root(overlay, value),
        (Schema::Bool, _) | (Schema::Byte, _) | (Schema::Uint(_), _) => {
            let mut chunk = Vec::with_capacity(BYTES_PER_CHUNK);
            encode_into(schema, value, &mut chunk)?;
            chunk.resize(BYTES_PER_CHUNK, 0);
            Ok(Hash256::from_slice(&chunk))
        }
        (Schema::Vector { element, len }, value) => {
            let items = Items::new(element, value)?;
            check_vector_len(items.len(), *len)?;
            sequence_root(element, &items, *len)
        }
        (Schema::List { element, max_len }, value) => {
            let items = Items::new(element, value)?;
            check_list_len(items.len(), *max_len)?;
            let root = sequence_root(element, &items, *max_len)?;
            Ok(mix_in_length(&root, items.len()))
        }
        (Schema::Container(container), Value::Container(values)) => {
            let roots = container_fields(container, values)?
                .map(|(field, value)| {
                    hash_tree_root(&field.schema, value).map_err(|e| e.in_field(&field.name))
                })
                .collect::<Result<Vec<_>, _>>()?;

            container_root(&roots)
        }
        (Schema::Union(union), Value::Union { selector, value }) => {
            let (variant, value) = union_variant(union, *selector, value.as_deref())?;
            let root = match (&variant.schema, value) {
                (Some(schema), Some(value)) => {
                    hash_tree_root(schema, value).map_err(|e| e.in_field(&variant.name))?
                }
                (None, None) => Hash256::zero(),
                _ => return Err(Error::value_mismatch("union")),
            };

            mix_in_selector(&root, *selector)
        }
        (schema, _) => Err(Error::value_mismatch(schema.shape())),
    }
}

fn overlay_root(overlay: &Overlay, value: &Value) -> Result<Hash256, Error> {
    match (overlay.kind(), value) {
        (OverlayKind::Plain, value) => hash_tree_root(overlay.underlying(), value),
        (OverlayKind::Bitlist { max_bits }, Value::Bytes(bytes)) => {
            bitlist_root(&Bitlist::from_raw_bytes(bytes, max_bits)?, max_bits)
        }
        (OverlayKind::Bitvector { bits }, Value::Bytes(bytes)) => {
            bitvector_root(&Bitvector::from_raw_bytes(bytes, bits)?, bits)
        }
        _ => Err(Error::value_mismatch("bytes")),
    }
}

/// Merkleizes `items`, padded to `capacity` elements.
///
/// Basic elements are packed into chunks, composite elements each contribute one leaf.
fn sequence_root(element: &Schema, items: &Items, capacity: usize) -> Result<Hash256, Error> {
    if element.is_basic() {
        let element_size = element.fixed_size();
        let minimum_leaf_count = (capacity * element_size + BYTES_PER_CHUNK - 1) / BYTES_PER_CHUNK;

        let mut buf = CHUNK_POOL.acquire();
        match items {
            Items::Bytes(bytes) => buf.extend_from_slice(bytes),
            Items::Values(values) => {
                buf.reserve(values.len() * element_size);
                for (i, value) in values.iter().enumerate() {
                    encode_into(element, value, &mut buf).map_err(|e| e.at_index(i))?;
                }
            }
        }

        merkle_root(&buf, minimum_leaf_count)
    } else {
        let values = match items {
            Items::Values(values) => values,
            Items::Bytes(_) => return Err(Error::value_mismatch("sequence")),
        };

        let mut hasher = MerkleHasher::with_leaves(capacity);
        for (i, value) in values.iter().enumerate() {
            let root = hash_tree_root(element, value).map_err(|e| e.at_index(i))?;
            hasher.write(root.as_bytes())?;
        }

        Ok(hasher.finish()?)
    }
}
