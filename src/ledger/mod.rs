//! Ledger data model: addresses, amounts, CBOR state trees and substates

pub mod address;
pub mod amount;
pub mod cbor;
pub mod substate;

pub use address::{ComponentAddress, ResourceAddress, TemplateAddress, VaultId};
pub use amount::Amount;
pub use cbor::{convert as convert_cbor_value, get_value_by_path, CborValue};
pub use substate::{ResourceContainer, ResourceSubstate, Substate, SubstateId, SubstateResponse, SubstateValue};
