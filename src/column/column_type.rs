use serde::{Deserialize, Serialize};

/// The column type represents the column type.
#[derive(Hash, Eq, PartialEq, Debug, Clone, Copy, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Signed integer column.
    I64,
    /// Unsigned integer column.
    U64,
    /// Floating point column.
    F64,
    /// Raw terms, without a term dictionary.
    Bytes,
    /// Dictionary encoded strings.
    Str,
    /// Booleans.
    Bool,
    /// Ip addresses.
    IpAddr,
}

impl ColumnType {
    /// Returns true for term-like columns (`Str` and `Bytes`).
    pub fn is_bytes(&self) -> bool {
        matches!(self, ColumnType::Bytes | ColumnType::Str)
    }
}
