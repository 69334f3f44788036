//! In-memory wallet provider for tests

use crate::error::{Result, TariswapError};
use crate::ledger::{Substate, SubstateId, SubstateResponse, SubstateValue};
use crate::transaction::SubmitTransactionRequest;
use crate::wallet::provider::{
    Account, FinalizeResult, SubmitTransactionResponse, SubstateDiff, TransactionResult,
    TransactionResultResponse, TransactionStatus, WalletProvider,
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const TEST_ACCOUNT: &str = "component_acc0acc0";

#[derive(Default)]
struct State {
    substates: HashMap<String, SubstateValue>,
    results: VecDeque<(TransactionStatus, Option<TransactionResult>)>,
    submitted: Vec<SubmitTransactionRequest>,
    result_polls: usize,
    substate_reads: Vec<String>,
}

/// Serves canned substates and transaction results, and records what it was sent.
///
/// When no result is queued, transactions are accepted with an empty diff.
pub struct RecordingProvider {
    account: Account,
    state: Mutex<State>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            account: Account {
                address: TEST_ACCOUNT.parse().unwrap(),
                account_id: 3,
                public_key: None,
            },
            state: Mutex::new(State::default()),
        }
    }

    pub fn insert_substate(&self, id: &str, value: SubstateValue) {
        self.state.lock().unwrap().substates.insert(id.to_string(), value);
    }

    pub fn push_status(&self, status: TransactionStatus) {
        self.state.lock().unwrap().results.push_back((status, None));
    }

    pub fn push_accept(&self, up_substates: Vec<(SubstateId, Substate)>) {
        let diff = SubstateDiff {
            up_substates,
            down_substates: Vec::new(),
        };
        self.state
            .lock()
            .unwrap()
            .results
            .push_back((TransactionStatus::Accepted, Some(TransactionResult::Accept(diff))));
    }

    pub fn push_reject(&self, reason: &str) {
        let result = TransactionResult::Reject(json!({ "ExecutionFailure": reason }));
        self.state
            .lock()
            .unwrap()
            .results
            .push_back((TransactionStatus::Rejected, Some(result)));
    }

    pub fn submitted(&self) -> Vec<SubmitTransactionRequest> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn result_polls(&self) -> usize {
        self.state.lock().unwrap().result_polls
    }

    pub fn substate_reads(&self) -> Vec<String> {
        self.state.lock().unwrap().substate_reads.clone()
    }
}

#[async_trait]
impl WalletProvider for RecordingProvider {
    async fn get_account(&self) -> Result<Account> {
        Ok(self.account.clone())
    }

    async fn get_substate(&self, substate_id: &str) -> Result<SubstateResponse> {
        let mut state = self.state.lock().unwrap();
        state.substate_reads.push(substate_id.to_string());
        let value = state.substates.get(substate_id).cloned().ok_or_else(|| TariswapError::Rpc {
            code: 404,
            message: format!("Substate {} not found", substate_id),
        })?;
        Ok(SubstateResponse {
            address: substate_id.parse()?,
            value: Substate {
                substate: value,
                version: 0,
            },
        })
    }

    async fn submit_transaction(
        &self,
        request: &SubmitTransactionRequest,
    ) -> Result<SubmitTransactionResponse> {
        let mut state = self.state.lock().unwrap();
        state.submitted.push(request.clone());
        Ok(SubmitTransactionResponse {
            transaction_id: format!("tx_{}", state.submitted.len()),
        })
    }

    async fn get_transaction_result(&self, transaction_id: &str) -> Result<TransactionResultResponse> {
        let mut state = self.state.lock().unwrap();
        state.result_polls += 1;
        let (status, result) = state.results.pop_front().unwrap_or_else(|| {
            (
                TransactionStatus::Accepted,
                Some(TransactionResult::Accept(SubstateDiff::default())),
            )
        });
        Ok(TransactionResultResponse {
            transaction_id: transaction_id.to_string(),
            status,
            result: result.map(|result| FinalizeResult {
                transaction_hash: None,
                result,
            }),
        })
    }
}
