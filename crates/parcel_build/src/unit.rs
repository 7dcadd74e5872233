//! The compiled-unit binary format.
//!
//! A unit is a named type with a trivial base type and an ordered list of
//! fields. The builder writes one per source and one facade per group. On
//! disk a unit is a 4-byte little-endian header length, a bincode header
//! (magic bytes plus a checksum of the payload) and the bincode payload.
//! Encoding has no timestamps or other ambient input, so the same unit always
//! produces the same bytes.

use parcel_common::ContentHash;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Magic bytes identifying a Parcel compiled unit.
const UNIT_MAGIC: [u8; 4] = *b"PRCL";

/// The base type every generated unit extends.
pub const BASE_TYPE: &str = "parcel/Object";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnitHeader {
    magic: [u8; 4],
    checksum: ContentHash,
}

/// A field of a compiled unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Qualified name of the field's type.
    pub type_name: String,
}

/// An in-memory compiled unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledUnit {
    /// Internal name, `/`-separated (`a/b/Alpha`).
    pub name: String,
    /// Internal name of the base type.
    pub super_name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDecl>,
}

impl CompiledUnit {
    /// Creates a unit with no fields extending [`BASE_TYPE`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_name: BASE_TYPE.to_string(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn with_field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    /// Dotted form of [`name`](Self::name).
    pub fn qualified_name(&self) -> String {
        self.name.replace('/', ".")
    }

    /// Serializes the unit with its header.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BuildError> {
        let config = bincode::config::standard();
        let payload = bincode::serde::encode_to_vec(self, config).map_err(|e| BuildError::Encode {
            reason: e.to_string(),
        })?;
        let header = UnitHeader {
            magic: UNIT_MAGIC,
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes =
            bincode::serde::encode_to_vec(&header, config).map_err(|e| BuildError::Encode {
                reason: e.to_string(),
            })?;

        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);
        Ok(output)
    }

    /// Decodes and validates a unit produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(raw: &[u8]) -> Result<Self, BuildError> {
        let invalid = |reason: &str| BuildError::InvalidUnit {
            reason: reason.to_string(),
        };
        let config = bincode::config::standard();

        let len_bytes: [u8; 4] = raw
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| invalid("truncated header length"))?;
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        let header_raw = raw
            .get(4..4 + header_len)
            .ok_or_else(|| invalid("truncated header"))?;

        let (header, _): (UnitHeader, usize) = bincode::serde::decode_from_slice(header_raw, config)
            .map_err(|e| BuildError::InvalidUnit {
                reason: e.to_string(),
            })?;
        if header.magic != UNIT_MAGIC {
            return Err(invalid("bad magic bytes"));
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return Err(invalid("checksum mismatch"));
        }

        let (unit, _): (CompiledUnit, usize) = bincode::serde::decode_from_slice(payload, config)
            .map_err(|e| BuildError::InvalidUnit {
                reason: e.to_string(),
            })?;
        Ok(unit)
    }
}
