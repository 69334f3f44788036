//! Ledger substate shapes returned by the wallet daemon
//!
//! Only the parts the pool operations read are typed. Everything else is kept
//! as raw JSON so unknown fields never break deserialization.

use crate::error::{Result, TariswapError};
use crate::ledger::address::{ComponentAddress, ResourceAddress, TemplateAddress, VaultId};
use crate::ledger::amount::Amount;
use crate::ledger::cbor::CborValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Identifier of a substate, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubstateId {
    Component(ComponentAddress),
    Resource(ResourceAddress),
    Vault(VaultId),
    NonFungible(Value),
    NonFungibleIndex(Value),
    UnclaimedConfidentialOutput(Value),
    TransactionReceipt(Value),
    FeeClaim(Value),
    ValidatorFeePool(Value),
    Template(Value),
}

impl SubstateId {
    pub fn as_component(&self) -> Option<&ComponentAddress> {
        match self {
            SubstateId::Component(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceAddress> {
        match self {
            SubstateId::Resource(addr) => Some(addr),
            _ => None,
        }
    }
}

impl FromStr for SubstateId {
    type Err = TariswapError;

    /// Parse the text form, dispatching on the kind prefix
    fn from_str(s: &str) -> Result<Self> {
        let raw = || Value::String(s.to_string());
        let (prefix, _) = s.split_once('_').ok_or_else(|| TariswapError::InvalidAddress {
            kind: "substate",
            value: s.to_string(),
        })?;
        Ok(match prefix {
            "component" => SubstateId::Component(s.parse()?),
            "resource" => SubstateId::Resource(s.parse()?),
            "vault" => SubstateId::Vault(s.parse()?),
            "nft" => SubstateId::NonFungible(raw()),
            "commitment" => SubstateId::UnclaimedConfidentialOutput(raw()),
            "txreceipt" => SubstateId::TransactionReceipt(raw()),
            "feeclaim" => SubstateId::FeeClaim(raw()),
            "vnfp" => SubstateId::ValidatorFeePool(raw()),
            "template" => SubstateId::Template(raw()),
            _ => {
                return Err(TariswapError::InvalidAddress {
                    kind: "substate",
                    value: s.to_string(),
                })
            }
        })
    }
}

impl fmt::Display for SubstateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstateId::Component(addr) => write!(f, "{}", addr),
            SubstateId::Resource(addr) => write!(f, "{}", addr),
            SubstateId::Vault(id) => write!(f, "{}", id),
            SubstateId::NonFungible(v)
            | SubstateId::NonFungibleIndex(v)
            | SubstateId::UnclaimedConfidentialOutput(v)
            | SubstateId::TransactionReceipt(v)
            | SubstateId::FeeClaim(v)
            | SubstateId::ValidatorFeePool(v)
            | SubstateId::Template(v) => match v {
                Value::String(s) => f.write_str(s),
                other => write!(f, "{}", other),
            },
        }
    }
}

/// A versioned substate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substate {
    pub substate: SubstateValue,
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubstateValue {
    Component(ComponentHeader),
    Resource(ResourceSubstate),
    Vault(VaultSubstate),
    NonFungible(Value),
    NonFungibleIndex(Value),
    UnclaimedConfidentialOutput(Value),
    TransactionReceipt(Value),
    FeeClaim(Value),
    ValidatorFeePool(Value),
    Template(Value),
}

impl SubstateValue {
    fn kind(&self) -> &'static str {
        match self {
            SubstateValue::Component(_) => "Component",
            SubstateValue::Resource(_) => "Resource",
            SubstateValue::Vault(_) => "Vault",
            SubstateValue::NonFungible(_) => "NonFungible",
            SubstateValue::NonFungibleIndex(_) => "NonFungibleIndex",
            SubstateValue::UnclaimedConfidentialOutput(_) => "UnclaimedConfidentialOutput",
            SubstateValue::TransactionReceipt(_) => "TransactionReceipt",
            SubstateValue::FeeClaim(_) => "FeeClaim",
            SubstateValue::ValidatorFeePool(_) => "ValidatorFeePool",
            SubstateValue::Template(_) => "Template",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHeader {
    #[serde(default)]
    pub template_address: Option<TemplateAddress>,
    #[serde(default)]
    pub module_name: Option<String>,
    pub body: ComponentBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentBody {
    pub state: CborValue,
}

/// Resource definition. `total_supply` is only present for fungible resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSubstate {
    pub resource_type: String,
    #[serde(default)]
    pub total_supply: Option<Amount>,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default)]
    pub owner_key: Option<Value>,
}

impl ResourceSubstate {
    /// Token symbol from the resource metadata, if set
    pub fn token_symbol(&self) -> Option<&str> {
        self.metadata.get("token_symbol").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSubstate {
    pub resource_container: ResourceContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceContainer {
    Fungible {
        address: ResourceAddress,
        amount: Amount,
        #[serde(default)]
        locked_amount: Amount,
    },
    NonFungible {
        address: ResourceAddress,
        #[serde(default)]
        token_ids: Vec<Value>,
    },
    Confidential {
        address: ResourceAddress,
        #[serde(default)]
        revealed_amount: Amount,
    },
}

impl ResourceContainer {
    pub fn resource_address(&self) -> &ResourceAddress {
        match self {
            ResourceContainer::Fungible { address, .. }
            | ResourceContainer::NonFungible { address, .. }
            | ResourceContainer::Confidential { address, .. } => address,
        }
    }

    /// Amount held, for fungible containers only
    pub fn fungible_amount(&self) -> Option<Amount> {
        match self {
            ResourceContainer::Fungible { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

/// Response of a substate lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstateResponse {
    pub address: SubstateId,
    pub value: Substate,
}

impl SubstateResponse {
    fn unexpected(&self, expected: &'static str) -> TariswapError {
        tracing::debug!(
            "Substate {} is a {}, expected {}",
            self.address,
            self.value.substate.kind(),
            expected
        );
        TariswapError::UnexpectedSubstate {
            id: self.address.to_string(),
            expected,
        }
    }

    pub fn as_component(&self) -> Result<&ComponentHeader> {
        match &self.value.substate {
            SubstateValue::Component(header) => Ok(header),
            _ => Err(self.unexpected("Component")),
        }
    }

    pub fn as_vault(&self) -> Result<&VaultSubstate> {
        match &self.value.substate {
            SubstateValue::Vault(vault) => Ok(vault),
            _ => Err(self.unexpected("Vault")),
        }
    }

    pub fn as_resource(&self) -> Result<&ResourceSubstate> {
        match &self.value.substate {
            SubstateValue::Resource(resource) => Ok(resource),
            _ => Err(self.unexpected("Resource")),
        }
    }

    /// Component state tree
    pub fn component_state(&self) -> Result<&CborValue> {
        Ok(&self.as_component()?.body.state)
    }
}
