//! Instruction records understood by the engine

use crate::ledger::{Amount, ComponentAddress, ResourceAddress, TemplateAddress};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Key of a transaction-local workspace slot.
///
/// A bare key is a single byte. Tuple outputs stored in a slot are addressed
/// as `<slot>.<index>`, encoded as ASCII after the slot byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WorkspaceKey(Vec<u8>);

impl WorkspaceKey {
    pub fn id(slot: u8) -> Self {
        Self(vec![slot])
    }

    /// Element `index` of the tuple stored at `slot`
    pub fn field(slot: u8, index: usize) -> Self {
        let mut bytes = vec![slot, b'.'];
        bytes.extend_from_slice(index.to_string().as_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for WorkspaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_first() {
            Some((slot, rest)) => write!(f, "{}{}", slot, String::from_utf8_lossy(rest)),
            None => Ok(()),
        }
    }
}

/// Argument passed to a function or method call
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Value previously put on the workspace
    Workspace(WorkspaceKey),
    /// Literal value, encoded by the wallet
    Literal(Value),
}

impl Serialize for Arg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Arg::Workspace(key) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Workspace", key)?;
                map.end()
            }
            Arg::Literal(value) => value.serialize(serializer),
        }
    }
}

impl From<WorkspaceKey> for Arg {
    fn from(key: WorkspaceKey) -> Self {
        Arg::Workspace(key)
    }
}

impl From<&ResourceAddress> for Arg {
    fn from(addr: &ResourceAddress) -> Self {
        Arg::Literal(Value::String(addr.to_string()))
    }
}

impl From<&ComponentAddress> for Arg {
    fn from(addr: &ComponentAddress) -> Self {
        Arg::Literal(Value::String(addr.to_string()))
    }
}

impl From<Amount> for Arg {
    fn from(amount: Amount) -> Self {
        Arg::Literal(Value::from(amount.value()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Instruction {
    CallFunction {
        template_address: TemplateAddress,
        function: String,
        args: Vec<Arg>,
    },
    CallMethod {
        component_address: ComponentAddress,
        method: String,
        args: Vec<Arg>,
    },
    PutLastInstructionOutputOnWorkspace {
        key: WorkspaceKey,
    },
}
