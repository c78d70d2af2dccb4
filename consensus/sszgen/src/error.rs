use ssz_schema::SchemaError;
use std::fmt;
use std::io;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// A module or type could not be found in the `SourceIndex`.
    UnresolvedType {
        path: String,
        name: String,
    },
    /// An `#[ssz(..)]` annotation is missing, unparsable, zero or does not fit the field type.
    MalformedAnnotation {
        path: String,
        reason: String,
    },
    /// A Rust type form with no SSZ mapping (e.g., references, tuples, `usize`).
    UnsupportedType {
        path: String,
        ty: String,
    },
    /// A type contains itself through some chain of fields.
    CyclicType {
        path: String,
        name: String,
    },
    /// A schema was extracted but cannot be rendered as Rust code.
    UnsupportedSchema {
        name: String,
        reason: String,
    },
    Schema(SchemaError),
    Parse {
        module: String,
        error: String,
    },
    Io(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnresolvedType { path, name } => {
                write!(f, "{}: unable to resolve type {}", path, name)
            }
            Error::MalformedAnnotation { path, reason } => {
                write!(f, "{}: malformed annotation: {}", path, reason)
            }
            Error::UnsupportedType { path, ty } => write!(f, "{}: unsupported type {}", path, ty),
            Error::CyclicType { path, name } => {
                write!(f, "{}: type {} contains itself", path, name)
            }
            Error::UnsupportedSchema { name, reason } => {
                write!(f, "unable to render {}: {}", name, reason)
            }
            Error::Schema(e) => write!(f, "invalid schema: {}", e),
            Error::Parse { module, error } => write!(f, "unable to parse {}: {}", module, error),
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Config(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<SchemaError> for Error {
    fn from(e: SchemaError) -> Self {
        Error::Schema(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}
