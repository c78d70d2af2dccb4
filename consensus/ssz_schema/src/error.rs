use std::fmt;

/// Returned when a `Schema` would violate a structural invariant.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SchemaError {
    /// A vector, list or bitfield was declared with a zero length or maximum.
    ZeroLength { type_name: String },
    DuplicateField { container: String, field: String },
    EmptyContainer { container: String },
    /// A vector element must be fixed-size.
    VariableSizeVectorElement { element: String },
    InvalidUnion { union: String, reason: String },
    InvalidUintSize { bits: usize },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::ZeroLength { type_name } => {
                write!(f, "{} must have a non-zero length", type_name)
            }
            SchemaError::DuplicateField { container, field } => {
                write!(f, "container {} has duplicate field {}", container, field)
            }
            SchemaError::EmptyContainer { container } => {
                write!(f, "container {} has no fields", container)
            }
            SchemaError::VariableSizeVectorElement { element } => {
                write!(f, "vector element {} is variable-size", element)
            }
            SchemaError::InvalidUnion { union, reason } => {
                write!(f, "invalid union {}: {}", union, reason)
            }
            SchemaError::InvalidUintSize { bits } => write!(f, "unsupported uint size {}", bits),
        }
    }
}

impl std::error::Error for SchemaError {}
