//! Decoded value model.

use indexmap::IndexMap;

/// A value decoded from a Storable stream.
///
/// Hashes preserve insertion order; equality between hashes is
/// order-insensitive (map semantics).
#[derive(Debug, Clone, PartialEq)]
pub enum StorableValue {
    /// Perl `undef`.
    Undef,
    /// Immortal boolean (`PL_sv_yes` / `PL_sv_no`).
    Bool(bool),
    /// Signed integer scalar.
    Integer(i64),
    /// IEEE-754 double scalar.
    Double(f64),
    /// Text scalar.
    Str(String),
    /// Opaque byte string that is neither ASCII nor converted.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    Array(Vec<StorableValue>),
    /// Hash with insertion order preserved.
    Hash(IndexMap<String, StorableValue>),
    /// Class-tagged array or hash.
    Blessed(Box<Blessed>),
    /// Backreference into a value still under construction when it was
    /// referenced (a cycle). The index is the SeenTable slot of the target.
    Backref(usize),
}

/// A structural value tagged with a class (package) name.
#[derive(Debug, Clone, PartialEq)]
pub struct Blessed {
    pub class: String,
    pub value: StorableValue,
}

impl Blessed {
    pub fn new(class: impl Into<String>, value: StorableValue) -> Self {
        Self {
            class: class.into(),
            value,
        }
    }

    /// The class (package) name this value was blessed into.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// The underlying elements when the blessed value is array-shaped.
    pub fn as_array(&self) -> Option<&[StorableValue]> {
        match &self.value {
            StorableValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The underlying entries when the blessed value is hash-shaped.
    pub fn as_hash(&self) -> Option<&IndexMap<String, StorableValue>> {
        match &self.value {
            StorableValue::Hash(map) => Some(map),
            _ => None,
        }
    }
}

impl StorableValue {
    pub fn is_undef(&self) -> bool {
        matches!(self, StorableValue::Undef)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StorableValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            StorableValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StorableValue]> {
        match self {
            StorableValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&IndexMap<String, StorableValue>> {
        match self {
            StorableValue::Hash(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_blessed(&self) -> Option<&Blessed> {
        match self {
            StorableValue::Blessed(b) => Some(b),
            _ => None,
        }
    }
}

impl From<i64> for StorableValue {
    fn from(v: i64) -> Self {
        StorableValue::Integer(v)
    }
}

impl From<f64> for StorableValue {
    fn from(v: f64) -> Self {
        StorableValue::Double(v)
    }
}

impl From<bool> for StorableValue {
    fn from(v: bool) -> Self {
        StorableValue::Bool(v)
    }
}

impl From<&str> for StorableValue {
    fn from(v: &str) -> Self {
        StorableValue::Str(v.to_owned())
    }
}

impl From<String> for StorableValue {
    fn from(v: String) -> Self {
        StorableValue::Str(v)
    }
}
