use crate::{SchemaError, Value};
use ssz::{BYTES_PER_LENGTH_OFFSET, MAX_UNION_SELECTOR};
use std::collections::HashSet;
use std::sync::Arc;

/// The maximum number of variants in a union.
pub const MAX_UNION_VARIANTS: usize = MAX_UNION_SELECTOR as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UintSize {
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
}

impl UintSize {
    pub fn from_bits(bits: usize) -> Result<Self, SchemaError> {
        match bits {
            8 => Ok(UintSize::U8),
            16 => Ok(UintSize::U16),
            32 => Ok(UintSize::U32),
            64 => Ok(UintSize::U64),
            128 => Ok(UintSize::U128),
            256 => Ok(UintSize::U256),
            bits => Err(SchemaError::InvalidUintSize { bits }),
        }
    }

    pub fn bits(self) -> usize {
        match self {
            UintSize::U8 => 8,
            UintSize::U16 => 16,
            UintSize::U32 => 32,
            UintSize::U64 => 64,
            UintSize::U128 => 128,
            UintSize::U256 => 256,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() / 8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// A named, ordered sequence of fields. Build with `Schema::container`.
#[derive(Debug, PartialEq)]
pub struct Container {
    name: String,
    fields: Vec<Field>,
}

impl Container {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The byte-length of the fixed region of an encoded container.
    pub fn fixed_region_len(&self) -> usize {
        self.fields.iter().map(|f| f.schema.ssz_fixed_len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub name: String,
    /// Only the first variant may be `None`.
    pub schema: Option<Schema>,
}

impl Variant {
    pub fn new(name: impl Into<String>, schema: Option<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// An SSZ union. Build with `Schema::union`.
#[derive(Debug, PartialEq)]
pub struct Union {
    name: String,
    variants: Vec<Variant>,
}

impl Union {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    /// A named alias which behaves exactly as the underlying schema.
    Plain,
    Bitlist { max_bits: usize },
    Bitvector { bits: usize },
}

/// A named type layered over another schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    name: String,
    kind: OverlayKind,
    underlying: Box<Schema>,
}

impl Overlay {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    pub fn underlying(&self) -> &Schema {
        &self.underlying
    }
}

/// Describes the SSZ layout of a type.
///
/// Variants carrying invariants (`Container`, `Union`, `Overlay`) can only be built with the
/// constructor functions, which validate them. Schemas are immutable once built and cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Container(Arc<Container>),
    Vector { element: Box<Schema>, len: usize },
    List { element: Box<Schema>, max_len: usize },
    Union(Arc<Union>),
    Overlay(Overlay),
    /// An indirection which is transparent to encoding and hashing.
    Pointer(Box<Schema>),
    Bool,
    Byte,
    Uint(UintSize),
}

impl Schema {
    pub fn uint(bits: usize) -> Result<Self, SchemaError> {
        UintSize::from_bits(bits).map(Schema::Uint)
    }

    pub fn vector(element: Schema, len: usize) -> Result<Self, SchemaError> {
        if len == 0 {
            return Err(SchemaError::ZeroLength {
                type_name: format!("Vector[{}]", element.type_name()),
            });
        }

        if element.is_variable_size() {
            return Err(SchemaError::VariableSizeVectorElement {
                element: element.type_name(),
            });
        }

        Ok(Schema::Vector {
            element: Box::new(element),
            len,
        })
    }

    pub fn list(element: Schema, max_len: usize) -> Result<Self, SchemaError> {
        if max_len == 0 {
            return Err(SchemaError::ZeroLength {
                type_name: format!("List[{}]", element.type_name()),
            });
        }

        Ok(Schema::List {
            element: Box::new(element),
            max_len,
        })
    }

    pub fn container(name: impl Into<String>, fields: Vec<Field>) -> Result<Self, SchemaError> {
        let name = name.into();

        if fields.is_empty() {
            return Err(SchemaError::EmptyContainer { container: name });
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    container: name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(Schema::Container(Arc::new(Container { name, fields })))
    }

    pub fn union(name: impl Into<String>, variants: Vec<Variant>) -> Result<Self, SchemaError> {
        let name = name.into();

        let invalid = |reason: String| SchemaError::InvalidUnion {
            union: name.clone(),
            reason,
        };

        if variants.is_empty() {
            return Err(invalid("no variants".to_string()));
        }

        if variants.len() > MAX_UNION_VARIANTS {
            return Err(invalid(format!(
                "{} variants exceeds the maximum of {}",
                variants.len(),
                MAX_UNION_VARIANTS
            )));
        }

        if let Some((i, variant)) = variants
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, v)| v.schema.is_none())
        {
            return Err(invalid(format!(
                "only the first variant may be empty, {} is variant {}",
                variant.name, i
            )));
        }

        Ok(Schema::Union(Arc::new(Union { name, variants })))
    }

    /// A named alias for `underlying`.
    pub fn alias(name: impl Into<String>, underlying: Schema) -> Self {
        Schema::Overlay(Overlay {
            name: name.into(),
            kind: OverlayKind::Plain,
            underlying: Box::new(underlying),
        })
    }

    /// A bitlist of up to `max_bits` bits, stored as a byte list with a delimiter bit.
    pub fn bitlist(name: impl Into<String>, max_bits: usize) -> Result<Self, SchemaError> {
        let name = name.into();

        if max_bits == 0 {
            return Err(SchemaError::ZeroLength { type_name: name });
        }

        Ok(Schema::Overlay(Overlay {
            name,
            kind: OverlayKind::Bitlist { max_bits },
            underlying: Box::new(Schema::list(Schema::Byte, max_bits / 8 + 1)?),
        }))
    }

    /// A bitvector of exactly `bits` bits, stored as `ceil(bits / 8)` bytes.
    pub fn bitvector(name: impl Into<String>, bits: usize) -> Result<Self, SchemaError> {
        let name = name.into();

        if bits == 0 {
            return Err(SchemaError::ZeroLength { type_name: name });
        }

        Ok(Schema::Overlay(Overlay {
            name,
            kind: OverlayKind::Bitvector { bits },
            underlying: Box::new(Schema::vector(Schema::Byte, (bits + 7) / 8)?),
        }))
    }

    pub fn pointer(referent: Schema) -> Self {
        Schema::Pointer(Box::new(referent))
    }

    pub fn is_variable_size(&self) -> bool {
        match self {
            Schema::Container(c) => c.fields.iter().any(|f| f.schema.is_variable_size()),
            Schema::Vector { element, .. } => element.is_variable_size(),
            Schema::List { .. } | Schema::Union(_) => true,
            Schema::Overlay(o) => o.underlying.is_variable_size(),
            Schema::Pointer(referent) => referent.is_variable_size(),
            Schema::Bool | Schema::Byte | Schema::Uint(_) => false,
        }
    }

    /// The encoded length of any value of this schema, or 0 if it is variable-size.
    pub fn fixed_size(&self) -> usize {
        if self.is_variable_size() {
            return 0;
        }

        match self {
            Schema::Container(c) => c.fields.iter().map(|f| f.schema.fixed_size()).sum(),
            Schema::Vector { element, len } => element.fixed_size() * len,
            Schema::Overlay(o) => o.underlying.fixed_size(),
            Schema::Pointer(referent) => referent.fixed_size(),
            Schema::Bool | Schema::Byte => 1,
            Schema::Uint(size) => size.bytes(),
            Schema::List { .. } | Schema::Union(_) => 0,
        }
    }

    /// The number of bytes this schema occupies in the fixed region of an enclosing container.
    pub fn ssz_fixed_len(&self) -> usize {
        if self.is_variable_size() {
            BYTES_PER_LENGTH_OFFSET
        } else {
            self.fixed_size()
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Schema::Container(c) => c.name.clone(),
            Schema::Vector { element, len } => format!("Vector[{}, {}]", element.type_name(), len),
            Schema::List { element, max_len } => {
                format!("List[{}, {}]", element.type_name(), max_len)
            }
            Schema::Union(u) => u.name.clone(),
            Schema::Overlay(o) => o.name.clone(),
            Schema::Pointer(referent) => referent.type_name(),
            Schema::Bool => "bool".to_string(),
            Schema::Byte => "byte".to_string(),
            Schema::Uint(size) => format!("uint{}", size.bits()),
        }
    }

    /// A short description of the value shape this schema accepts.
    pub(crate) fn shape(&self) -> &'static str {
        match self {
            Schema::Container(_) => "container",
            Schema::Vector { .. } => "vector",
            Schema::List { .. } => "list",
            Schema::Union(_) => "union",
            Schema::Overlay(o) => match o.kind {
                OverlayKind::Plain => o.underlying.shape(),
                OverlayKind::Bitlist { .. } => "bitlist",
                OverlayKind::Bitvector { .. } => "bitvector",
            },
            Schema::Pointer(referent) => referent.shape(),
            Schema::Bool => "bool",
            Schema::Byte => "byte",
            Schema::Uint(_) => "uint",
        }
    }

    /// The value which decodes from an all-zero fixed region (with empty variable fields).
    ///
    /// Pointers default to `Value::Null`, which the codec and merkleizer treat as the default of
    /// the referent.
    pub fn default_value(&self) -> Value {
        match self {
            Schema::Container(c) => {
                Value::Container(c.fields.iter().map(|f| f.schema.default_value()).collect())
            }
            Schema::Vector { element, len } => {
                if element.is_byte() {
                    Value::Bytes(vec![0; *len])
                } else {
                    Value::Sequence(vec![element.default_value(); *len])
                }
            }
            Schema::List { element, .. } => {
                if element.is_byte() {
                    Value::Bytes(vec![])
                } else {
                    Value::Sequence(vec![])
                }
            }
            Schema::Union(u) => Value::Union {
                selector: 0,
                value: u.variants[0]
                    .schema
                    .as_ref()
                    .map(|s| Box::new(s.default_value())),
            },
            Schema::Overlay(o) => match o.kind {
                OverlayKind::Plain => o.underlying.default_value(),
                // An empty bitlist is just the delimiter bit.
                OverlayKind::Bitlist { .. } => Value::Bytes(vec![1]),
                OverlayKind::Bitvector { bits } => Value::Bytes(vec![0; (bits + 7) / 8]),
            },
            Schema::Pointer(_) => Value::Null,
            Schema::Bool => Value::Bool(false),
            Schema::Byte => Value::Byte(0),
            Schema::Uint(_) => Value::Uint(Default::default()),
        }
    }

    /// Strips pointers and plain overlays, which do not affect encoding or hashing.
    pub fn resolve_transparent(&self) -> &Schema {
        let mut schema = self;
        loop {
            match schema {
                Schema::Pointer(referent) => schema = referent,
                Schema::Overlay(o) if o.kind == OverlayKind::Plain => schema = &o.underlying,
                other => return other,
            }
        }
    }

    /// Returns `true` for schemas that are packed into chunks when merkleized.
    pub fn is_basic(&self) -> bool {
        matches!(
            self.resolve_transparent(),
            Schema::Bool | Schema::Byte | Schema::Uint(_)
        )
    }

    /// Returns `true` if this is a single byte, i.e., sequences of it are represented as
    /// `Value::Bytes`.
    pub fn is_byte(&self) -> bool {
        matches!(self.resolve_transparent(), Schema::Byte)
    }
}
