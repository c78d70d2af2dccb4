use std::fmt;

/// A problem with an offset read from (or written to) the fixed-length portion of some SSZ bytes.
///
/// The checks are derived from this document:
///
/// https://notes.ethereum.org/ruKvDXl6QOW3gnqVYb8ezA?view
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum OffsetError {
    /// An offset points "backwards" into the fixed-bytes portion of the message, essentially
    /// double-decoding bytes that will also be decoded as fixed-length.
    IntoFixedPortion(usize),
    /// The first offset does not point to the byte that follows the fixed byte portion,
    /// essentially skipping a variable-length byte.
    SkipsVariableBytes(usize),
    /// An offset references byte indices that do not exist in the source bytes.
    OutOfBounds(usize),
    /// An offset points to bytes prior to the previous offset.
    Decreasing(usize),
    /// A variable-length list does not have a fixed portion that is cleanly divisible by
    /// `BYTES_PER_LENGTH_OFFSET`.
    InvalidListFixedBytesLen(usize),
}

/// The reason some encode, decode or hashing operation failed.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// A fixed-length item did not have the expected length.
    SizeViolation { len: usize, expected: usize },
    /// A list (or bitlist) exceeded its declared maximum.
    MaxSizeViolation { len: usize, max: usize },
    /// The bytes of a list of fixed-length items were not a multiple of the item length.
    AlignmentViolation { len: usize, element_size: usize },
    OffsetViolation(OffsetError),
    /// A bitlist was given zero bytes, so it cannot contain the length delimiter bit.
    EmptyBitlist,
    /// The union selector is out of bounds.
    UnionSelectorInvalid(u8),
    /// The bytes were invalid for some other reason.
    BytesInvalid(String),
    /// A dynamic value did not have the shape required by its schema.
    ValueMismatch { expected: &'static str },
}

/// One step in the path from the outermost value to the value that caused an error.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// The location of an error inside some nested value, e.g. `[3].data.attesting_indices[17]`.
///
/// Segments are stored innermost-first since errors gain segments as they propagate outwards.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Iterate the segments from the outermost to the innermost.
    pub fn iter(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push_outer(&mut self, segment: PathSegment) {
        self.segments.push(segment)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, segment) in self.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

/// Returned when SSZ encoding, decoding or hashing fails.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Error {
    kind: ErrorKind,
    path: FieldPath,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: FieldPath::default(),
        }
    }

    pub fn size_violation(len: usize, expected: usize) -> Self {
        ErrorKind::SizeViolation { len, expected }.into()
    }

    pub fn max_size_violation(len: usize, max: usize) -> Self {
        ErrorKind::MaxSizeViolation { len, max }.into()
    }

    pub fn value_mismatch(expected: &'static str) -> Self {
        ErrorKind::ValueMismatch { expected }.into()
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Record that this error happened inside the field `name` of some container.
    pub fn in_field(mut self, name: &str) -> Self {
        self.path.push_outer(PathSegment::Field(name.to_string()));
        self
    }

    /// Record that this error happened inside the element at `index` of some sequence.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push_outer(PathSegment::Index(index));
        self
    }

    pub fn is_offset_violation(&self) -> bool {
        matches!(self.kind, ErrorKind::OffsetViolation(_))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<OffsetError> for Error {
    fn from(e: OffsetError) -> Self {
        Self::new(ErrorKind::OffsetViolation(e))
    }
}

impl fmt::Display for OffsetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OffsetError::IntoFixedPortion(o) => write!(f, "offset {} points into fixed portion", o),
            OffsetError::SkipsVariableBytes(o) => write!(f, "offset {} skips variable bytes", o),
            OffsetError::OutOfBounds(o) => write!(f, "offset {} is out of bounds", o),
            OffsetError::Decreasing(o) => write!(f, "offset {} is less than the previous", o),
            OffsetError::InvalidListFixedBytesLen(o) => {
                write!(f, "list offset table length {} is invalid", o)
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::SizeViolation { len, expected } => {
                write!(f, "size violation: got {}, expected {}", len, expected)
            }
            ErrorKind::MaxSizeViolation { len, max } => {
                write!(f, "max size violation: got {}, max is {}", len, max)
            }
            ErrorKind::AlignmentViolation { len, element_size } => write!(
                f,
                "misaligned bytes: length {} is not a multiple of {}",
                len, element_size
            ),
            ErrorKind::OffsetViolation(e) => write!(f, "offset violation: {}", e),
            ErrorKind::EmptyBitlist => write!(f, "bitlist has no bytes"),
            ErrorKind::UnionSelectorInvalid(s) => write!(f, "invalid union selector {}", s),
            ErrorKind::BytesInvalid(s) => write!(f, "invalid bytes: {}", s),
            ErrorKind::ValueMismatch { expected } => write!(f, "value is not a {}", expected),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for Error {}
