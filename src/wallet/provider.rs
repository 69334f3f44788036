//! Wallet provider interface and the shapes it exchanges

use crate::error::Result;
use crate::ledger::{ComponentAddress, Substate, SubstateId, SubstateResponse};
use crate::transaction::SubmitTransactionRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The wallet's default account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub address: ComponentAddress,
    /// Key index the wallet signs with for this account
    pub account_id: u64,
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitTransactionResponse {
    pub transaction_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    New,
    DryRun,
    Pending,
    Accepted,
    Rejected,
    InvalidTransaction,
    OnlyFeeAccepted,
}

impl TransactionStatus {
    /// Whether the transaction will not change status any more
    pub fn is_final(&self) -> bool {
        !matches!(self, TransactionStatus::New | TransactionStatus::Pending)
    }
}

/// Substates created and destroyed by a transaction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubstateDiff {
    #[serde(default)]
    pub up_substates: Vec<(SubstateId, Substate)>,
    #[serde(default)]
    pub down_substates: Vec<(SubstateId, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransactionResult {
    Accept(SubstateDiff),
    AcceptFeeRejectRest(SubstateDiff, Value),
    Reject(Value),
}

impl TransactionResult {
    /// Diff of the accepted part, if any was accepted
    pub fn accepted_diff(&self) -> Option<&SubstateDiff> {
        match self {
            TransactionResult::Accept(diff) => Some(diff),
            TransactionResult::AcceptFeeRejectRest(diff, _) => Some(diff),
            TransactionResult::Reject(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<&Value> {
        match self {
            TransactionResult::AcceptFeeRejectRest(_, reason) | TransactionResult::Reject(reason) => {
                Some(reason)
            }
            TransactionResult::Accept(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeResult {
    #[serde(default)]
    pub transaction_hash: Option<Value>,
    pub result: TransactionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResultResponse {
    pub transaction_id: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub result: Option<FinalizeResult>,
}

/// Connection to a wallet that owns the signing keys
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn get_account(&self) -> Result<Account>;

    async fn get_substate(&self, substate_id: &str) -> Result<SubstateResponse>;

    async fn submit_transaction(
        &self,
        request: &SubmitTransactionRequest,
    ) -> Result<SubmitTransactionResponse>;

    async fn get_transaction_result(&self, transaction_id: &str) -> Result<TransactionResultResponse>;
}
