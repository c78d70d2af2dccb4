use crate::TypeKey;
use parking_lot::RwLock;
use ssz_schema::Schema;
use std::collections::HashMap;

/// Schemas which have already been extracted, keyed by their declaration.
///
/// The cache may be shared between threads. Whichever thread inserts a key first wins; later
/// inserts for the same key return the existing schema.
#[derive(Default)]
pub struct TypeCache {
    schemas: RwLock<HashMap<TypeKey, Schema>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &TypeKey) -> Option<Schema> {
        self.schemas.read().get(key).cloned()
    }

    /// Insert `schema` unless `key` is already present, returning the cached schema.
    pub fn insert(&self, key: TypeKey, schema: Schema) -> Schema {
        self.schemas.write().entry(key).or_insert(schema).clone()
    }

    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
