use crate::transaction::builder::Transaction;
use crate::transaction::instruction::Instruction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A substate the transaction must be able to read or write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstateRequirement {
    pub substate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

impl SubstateRequirement {
    /// Any version of the substate
    pub fn unversioned(substate_id: impl fmt::Display) -> Self {
        Self {
            substate_id: substate_id.to_string(),
            version: None,
        }
    }
}

/// Request accepted by the wallet daemon's `transactions.submit`
#[derive(Debug, Clone, Serialize)]
pub struct SubmitTransactionRequest {
    pub signing_key_index: Option<u64>,
    pub fee_instructions: Vec<Instruction>,
    pub instructions: Vec<Instruction>,
    pub inputs: Vec<SubstateRequirement>,
    pub override_inputs: bool,
    pub detect_inputs: bool,
    pub is_dry_run: bool,
    pub proof_ids: Vec<u32>,
    pub min_epoch: Option<u64>,
    pub max_epoch: Option<u64>,
}

/// Wrap a built transaction into a submit request signed by `account_id`
pub fn build_transaction_request(
    transaction: Transaction,
    account_id: u64,
    required_substates: Vec<SubstateRequirement>,
) -> SubmitTransactionRequest {
    SubmitTransactionRequest {
        signing_key_index: Some(account_id),
        fee_instructions: Vec::new(),
        instructions: transaction.instructions,
        inputs: required_substates,
        override_inputs: false,
        detect_inputs: true,
        is_dry_run: false,
        proof_ids: Vec::new(),
        min_epoch: None,
        max_epoch: None,
    }
}
