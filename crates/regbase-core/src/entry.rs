//! Entry model: one registry key/value and its comparison rules
//!
//! An [`Entry`] is addressed by its [`Identity`], the case-insensitive
//! `(path, name)` pair. Values are compared through
//! [`Entry::canonical_data`], which renders binary data as uppercase
//! space-separated hex and numeric data as fixed-width `0x` hex, so that
//! `"0a0b"` and `"0A 0B"` are the same binary value.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Sentinel type name meaning "type is not authoritative for this entry".
pub const NOT_APPLICABLE: &str = "N/A";

/// Placeholder written in place of blank or intentionally hidden data.
pub const PLACEHOLDER: &str = "-";

/// Registry value type.
///
/// Unknown type names are preserved verbatim in [`ValueType::Other`] so a
/// baseline written by a newer tool still round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    None,
    String,
    ExpandString,
    Binary,
    DWord,
    DWordBigEndian,
    Link,
    MultiString,
    ResourceList,
    FullResourceDescriptor,
    ResourceRequirementsList,
    QWord,
    /// The `"N/A"` sentinel
    NotApplicable,
    Other(String),
}

impl ValueType {
    /// Canonical type name as written to baseline files.
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "REG_NONE",
            Self::String => "REG_SZ",
            Self::ExpandString => "REG_EXPAND_SZ",
            Self::Binary => "REG_BINARY",
            Self::DWord => "REG_DWORD_LITTLE_ENDIAN",
            Self::DWordBigEndian => "REG_DWORD_BIG_ENDIAN",
            Self::Link => "REG_LINK",
            Self::MultiString => "REG_MULTI_SZ",
            Self::ResourceList => "REG_RESOURCE_LIST",
            Self::FullResourceDescriptor => "REG_FULL_RESOURCE_DESCRIPTOR",
            Self::ResourceRequirementsList => "REG_RESOURCE_REQUIREMENTS_LIST",
            Self::QWord => "REG_QWORD_LITTLE_ENDIAN",
            Self::NotApplicable => NOT_APPLICABLE,
            Self::Other(name) => name,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl From<&str> for ValueType {
    fn from(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "REG_NONE" => Self::None,
            "REG_SZ" => Self::String,
            "REG_EXPAND_SZ" => Self::ExpandString,
            "REG_BINARY" => Self::Binary,
            "REG_DWORD" | "REG_DWORD_LITTLE_ENDIAN" => Self::DWord,
            "REG_DWORD_BIG_ENDIAN" => Self::DWordBigEndian,
            "REG_LINK" => Self::Link,
            "REG_MULTI_SZ" => Self::MultiString,
            "REG_RESOURCE_LIST" => Self::ResourceList,
            "REG_FULL_RESOURCE_DESCRIPTOR" => Self::FullResourceDescriptor,
            "REG_RESOURCE_REQUIREMENTS_LIST" => Self::ResourceRequirementsList,
            "REG_QWORD" | "REG_QWORD_LITTLE_ENDIAN" => Self::QWord,
            "N/A" => Self::NotApplicable,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl From<String> for ValueType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<ValueType> for String {
    fn from(value: ValueType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw value data.
///
/// Files carry data as strings; live reads may hand over raw bytes.
/// Either form is written back out as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryData {
    Text(String),
    Bytes(Vec<u8>),
}

impl EntryData {
    /// Human-readable form: text verbatim, bytes as uppercase hex.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Bytes(bytes) => hex_string(bytes),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

impl From<&str> for EntryData {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for EntryData {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for EntryData {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl Serialize for EntryData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl<'de> Deserialize<'de> for EntryData {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
            Bytes(Vec<u8>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self::Text(text),
            Raw::Number(n) => Self::Text(n.to_string()),
            Raw::Bytes(bytes) => Self::Bytes(bytes),
        })
    }
}

/// Data that cannot be brought into canonical form for its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("'{value}' is not valid hex data")]
    InvalidHex { value: String },

    #[error("'{value}' is not a valid {value_type} value")]
    InvalidNumber { value: String, value_type: String },
}

/// Case-insensitive `(path, name)` key used for matching entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    path: String,
    name: String,
}

impl Identity {
    pub fn new(path: &str, name: &str) -> Self {
        Self {
            path: path.trim_end_matches('\\').to_lowercase(),
            name: name.to_lowercase(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}", self.path, self.name)
    }
}

/// One configuration entry.
///
/// Serialized as the 4-tuple `[path, name, data, type]` used by baseline
/// and snapshot files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryTuple", into = "EntryTuple")]
pub struct Entry {
    pub path: String,
    /// Value name; empty means the key's default value
    pub name: String,
    pub value_type: ValueType,
    pub data: EntryData,
}

#[derive(Serialize, Deserialize)]
struct EntryTuple(String, String, EntryData, ValueType);

impl From<EntryTuple> for Entry {
    fn from(EntryTuple(path, name, data, value_type): EntryTuple) -> Self {
        Self {
            path,
            name,
            value_type,
            data,
        }
    }
}

impl From<Entry> for EntryTuple {
    fn from(entry: Entry) -> Self {
        EntryTuple(entry.path, entry.name, entry.data, entry.value_type)
    }
}

impl Entry {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        value_type: impl Into<ValueType>,
        data: impl Into<EntryData>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            value_type: value_type.into(),
            data: data.into(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::new(&self.path, &self.name)
    }

    /// Report map key: `{path}\{name}`
    pub fn report_key(&self) -> String {
        format!("{}\\{}", self.path, self.name)
    }

    /// Data in canonical comparison form for this entry's type.
    pub fn canonical_data(&self) -> Result<String, DataError> {
        if let EntryData::Text(text) = &self.data
            && text == PLACEHOLDER
        {
            return Ok(PLACEHOLDER.to_string());
        }

        match self.value_type {
            ValueType::Binary => match &self.data {
                EntryData::Bytes(bytes) => Ok(hex_string(bytes)),
                EntryData::Text(text) => parse_hex(text).map(|bytes| hex_string(&bytes)),
            },
            ValueType::DWord | ValueType::DWordBigEndian => {
                let big_endian = self.value_type == ValueType::DWordBigEndian;
                let value = self.numeric(4, big_endian)?;
                Ok(format!("0x{:08x}", value))
            }
            ValueType::QWord => {
                let value = self.numeric(8, false)?;
                Ok(format!("0x{:016x}", value))
            }
            _ => Ok(self.data.display()),
        }
    }

    fn numeric(&self, width: usize, big_endian: bool) -> Result<u64, DataError> {
        let invalid = || DataError::InvalidNumber {
            value: self.data.display(),
            value_type: self.value_type.to_string(),
        };

        let value = match &self.data {
            EntryData::Bytes(bytes) => {
                if bytes.len() > width {
                    return Err(invalid());
                }
                let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
                if big_endian {
                    bytes.iter().fold(0, fold)
                } else {
                    bytes.iter().rev().fold(0, fold)
                }
            }
            EntryData::Text(text) => {
                let text = text.trim();
                let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => text.parse::<u64>(),
                };
                parsed.map_err(|_| invalid())?
            }
        };

        if width < 8 && value >> (width * 8) != 0 {
            return Err(invalid());
        }
        Ok(value)
    }
}

/// Render bytes as uppercase space-separated hex (`"0A FF 10"`).
pub fn hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse hex text in any common spelling: spaced or packed, any case,
/// optional `0x` prefix, comma separators.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, DataError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if digits.len() % 2 != 0 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DataError::InvalidHex {
            value: text.to_string(),
        });
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| DataError::InvalidHex {
                value: text.to_string(),
            })
        })
        .collect()
}
