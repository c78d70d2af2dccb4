use ssz::U256;

/// A dynamically-typed value, interpreted according to some `Schema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Uint(U256),
    /// A vector or list of bytes, or the raw SSZ bytes of a bitlist or bitvector.
    Bytes(Vec<u8>),
    /// A vector or list of anything other than bytes.
    Sequence(Vec<Value>),
    /// Field values, in field order.
    Container(Vec<Value>),
    Union {
        selector: u8,
        value: Option<Box<Value>>,
    },
    /// An absent pointer referent, equivalent to the referent's default value.
    Null,
}

impl Value {
    pub fn uint(value: u64) -> Self {
        Value::Uint(value.into())
    }

    pub fn union(selector: u8, value: Option<Value>) -> Self {
        Value::Union {
            selector,
            value: value.map(Box::new),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::uint(n)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}
