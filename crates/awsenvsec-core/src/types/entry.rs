//! Entry, value and pair types

use serde::Serialize;

/// Which remote store an entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    /// Secrets vault (values resolved one by one)
    Secrets,
    /// Hierarchical parameter store (values returned decrypted with the listing)
    Parameters,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Secrets => "Secrets Manager",
            StoreKind::Parameters => "Parameter Store",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named parameter as returned by a parameter listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One listed item before its value has been decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Full hierarchical name, e.g. `product/dev/DB_PASSWORD`
    pub name: String,
    /// Value carried by the listing itself, if any
    pub inline_value: Option<String>,
}

impl RawEntry {
    /// An entry whose value still has to be resolved
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inline_value: None,
        }
    }

    /// An entry that already carries its value
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inline_value: Some(value.into()),
        }
    }
}

impl From<Parameter> for RawEntry {
    fn from(parameter: Parameter) -> Self {
        Self::with_value(parameter.name, parameter.value)
    }
}

/// Classification of a resolved value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Opaque string, keyed by the entry's own name
    Scalar(String),
    /// Top-level fields of a JSON object, in document order, values stringified
    Structured(Vec<(String, String)>),
}

impl DecodedValue {
    pub fn is_structured(&self) -> bool {
        matches!(self, DecodedValue::Structured(_))
    }
}

/// A key/value pair ready to be merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedPair {
    pub key: String,
    pub value: String,
}

impl NormalizedPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
