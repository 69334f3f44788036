//! Typed ledger addresses
//!
//! Substate addresses travel as hex strings with a kind prefix
//! (`component_`, `resource_`, `vault_`). Template addresses are bare hex.

use crate::error::{Result, TariswapError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

fn parse_hex_body<'a>(kind: &'static str, prefix: &str, value: &'a str) -> Result<&'a str> {
    let body = value.strip_prefix(prefix).ok_or_else(|| TariswapError::InvalidAddress {
        kind,
        value: value.to_string(),
    })?;
    if body.is_empty() || hex::decode(body).is_err() {
        return Err(TariswapError::InvalidAddress {
            kind,
            value: value.to_string(),
        });
    }
    Ok(body)
}

macro_rules! prefixed_address {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Build from raw address bytes
            pub fn from_bytes(bytes: &[u8]) -> Self {
                Self(hex::encode(bytes))
            }

            /// Hex body without the kind prefix
            pub fn as_hex(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = TariswapError;

            fn from_str(s: &str) -> Result<Self> {
                let body = parse_hex_body($kind, $prefix, s)?;
                Ok(Self(body.to_ascii_lowercase()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

prefixed_address!(
    /// Address of a component (an instantiated template)
    ComponentAddress,
    "component",
    "component_"
);

prefixed_address!(
    /// Address of a resource (token definition)
    ResourceAddress,
    "resource",
    "resource_"
);

prefixed_address!(
    /// Id of a vault holding a single resource
    VaultId,
    "vault",
    "vault_"
);

/// Address of a published template. Displayed as bare hex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateAddress(String);

impl TemplateAddress {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl FromStr for TemplateAddress {
    type Err = TariswapError;

    fn from_str(s: &str) -> Result<Self> {
        let prefix = if s.starts_with("template_") { "template_" } else { "" };
        let body = parse_hex_body("template", prefix, s)?;
        Ok(Self(body.to_ascii_lowercase()))
    }
}

impl fmt::Display for TemplateAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TemplateAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TemplateAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
