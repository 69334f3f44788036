//! CBOR value trees
//!
//! Component state comes back from the wallet daemon as a JSON rendering of
//! the engine's CBOR value, one externally tagged node per value. This module
//! walks those trees and flattens them into plain JSON, turning the engine's
//! binary tags into the usual `component_`/`resource_`/`vault_` strings.

use crate::error::{Result, TariswapError};
use crate::ledger::address::{ComponentAddress, ResourceAddress, TemplateAddress, VaultId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A single node of a CBOR value tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CborValue {
    Integer(i128),
    Bytes(Vec<u8>),
    Float(f64),
    Text(String),
    Array(Vec<CborValue>),
    Map(Vec<(CborValue, CborValue)>),
    Tag(u64, Box<CborValue>),
    Bool(bool),
    Null,
}

/// Tags the engine uses for its own binary types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryTag {
    ComponentAddress = 128,
    Metadata = 129,
    NonFungibleAddress = 130,
    ResourceAddress = 131,
    VaultId = 132,
    BucketId = 133,
    TransactionReceipt = 134,
    ProofId = 135,
    UnclaimedConfidentialOutputAddress = 136,
    TemplateAddress = 137,
    ValidatorNodeFeePool = 138,
}

impl TryFrom<u64> for BinaryTag {
    type Error = u64;

    fn try_from(tag: u64) -> std::result::Result<Self, u64> {
        Ok(match tag {
            128 => Self::ComponentAddress,
            129 => Self::Metadata,
            130 => Self::NonFungibleAddress,
            131 => Self::ResourceAddress,
            132 => Self::VaultId,
            133 => Self::BucketId,
            134 => Self::TransactionReceipt,
            135 => Self::ProofId,
            136 => Self::UnclaimedConfidentialOutputAddress,
            137 => Self::TemplateAddress,
            138 => Self::ValidatorNodeFeePool,
            other => return Err(other),
        })
    }
}

impl CborValue {
    pub fn as_map(&self) -> Option<&[(CborValue, CborValue)]> {
        match self {
            CborValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[CborValue]> {
        match self {
            CborValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CborValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Flatten into plain JSON
    pub fn to_json(&self) -> Value {
        convert(self)
    }
}

/// Convert a CBOR tree into plain JSON.
///
/// Maps become objects; non-text keys are converted and, when they are not
/// strings, rendered as their JSON text.
pub fn convert(value: &CborValue) -> Value {
    match value {
        CborValue::Integer(n) => integer_to_json(*n),
        CborValue::Bytes(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
        CborValue::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
        CborValue::Text(s) => Value::String(s.clone()),
        CborValue::Array(items) => Value::Array(items.iter().map(convert).collect()),
        CborValue::Map(entries) => {
            let mut object = Map::with_capacity(entries.len());
            for (key, val) in entries {
                object.insert(key_string(key), convert(val));
            }
            Value::Object(object)
        }
        CborValue::Tag(tag, inner) => convert_tagged(*tag, inner),
        CborValue::Bool(b) => Value::Bool(*b),
        CborValue::Null => Value::Null,
    }
}

fn integer_to_json(n: i128) -> Value {
    if let Ok(v) = i64::try_from(n) {
        Value::from(v)
    } else if let Ok(v) = u64::try_from(n) {
        Value::from(v)
    } else {
        Value::String(n.to_string())
    }
}

fn convert_tagged(tag: u64, inner: &CborValue) -> Value {
    let bytes = match inner {
        CborValue::Bytes(bytes) => Some(bytes.as_slice()),
        _ => None,
    };
    match (BinaryTag::try_from(tag), bytes) {
        (Ok(BinaryTag::ComponentAddress), Some(b)) => {
            Value::String(ComponentAddress::from_bytes(b).to_string())
        }
        (Ok(BinaryTag::ResourceAddress), Some(b)) => {
            Value::String(ResourceAddress::from_bytes(b).to_string())
        }
        (Ok(BinaryTag::VaultId), Some(b)) => Value::String(VaultId::from_bytes(b).to_string()),
        (Ok(BinaryTag::TemplateAddress), Some(b)) => {
            Value::String(TemplateAddress::from_bytes(b).to_string())
        }
        _ => convert(inner),
    }
}

fn key_string(key: &CborValue) -> String {
    match convert(key) {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Find the entry of a map whose key converts to `name`
pub fn find_field<'a>(entries: &'a [(CborValue, CborValue)], name: &str) -> Option<&'a CborValue> {
    entries
        .iter()
        .find(|(key, _)| key_string(key) == name)
        .map(|(_, value)| value)
}

/// Select the node at a `$.a.b.0` style path without converting it
///
/// The path must start at the root `$` and every segment must be non-empty.
pub fn select_path<'a>(root: &'a CborValue, path: &str) -> Result<&'a CborValue> {
    let mut segments = path.split('.');
    if segments.next() != Some("$") {
        return Err(TariswapError::InvalidPath {
            path: path.to_string(),
        });
    }

    let mut current = root;
    for segment in segments {
        if segment.is_empty() {
            return Err(TariswapError::InvalidPath {
                path: path.to_string(),
            });
        }
        let next = match current {
            CborValue::Map(entries) => find_field(entries, segment),
            CborValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or_else(|| TariswapError::PathNotFound {
            path: path.to_string(),
        })?;
    }
    Ok(current)
}

/// Look up `path` in a CBOR tree and convert the result to JSON
pub fn get_value_by_path(root: &CborValue, path: &str) -> Result<Value> {
    select_path(root, path).map(convert)
}
