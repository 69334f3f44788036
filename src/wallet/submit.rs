//! Submitting transactions and waiting for them to finalize

use crate::config::PollConfig;
use crate::error::{Result, TariswapError};
use crate::ledger::SubstateResponse;
use crate::transaction::SubmitTransactionRequest;
use crate::wallet::provider::{FinalizeResult, TransactionStatus, WalletProvider};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Final state of a submitted transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutcome {
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub result: Option<FinalizeResult>,
    pub finalized_at: DateTime<Utc>,
}

/// Submit a transaction and poll until it reaches a final status.
///
/// A `Rejected` status is returned as an error. Other final statuses,
/// including `InvalidTransaction` and `OnlyFeeAccepted`, are returned as is.
pub async fn submit_and_wait_for_transaction<P: WalletProvider + ?Sized>(
    provider: &P,
    request: &SubmitTransactionRequest,
    poll: &PollConfig,
) -> Result<TransactionOutcome> {
    info!(
        "Submitting transaction with {} instructions ({} fee)",
        request.instructions.len(),
        request.fee_instructions.len()
    );
    let submitted = provider.submit_transaction(request).await?;
    let transaction_id = submitted.transaction_id;
    info!("Transaction submitted: {}", transaction_id);

    let mut attempts = 0u32;
    loop {
        let resp = provider.get_transaction_result(&transaction_id).await?;
        attempts += 1;
        debug!("Transaction {} status {:?} (poll {})", transaction_id, resp.status, attempts);

        if resp.status == TransactionStatus::Rejected {
            let reason = resp
                .result
                .as_ref()
                .and_then(|r| r.result.reject_reason())
                .map(|r| r.to_string())
                .unwrap_or_else(|| "no reason given".to_string());
            warn!("Transaction {} rejected: {}", transaction_id, reason);
            return Err(TariswapError::TransactionRejected {
                transaction_id,
                reason,
            });
        }

        if resp.status.is_final() {
            info!("Transaction {} finalized: {:?}", transaction_id, resp.status);
            return Ok(TransactionOutcome {
                transaction_id,
                status: resp.status,
                result: resp.result,
                finalized_at: Utc::now(),
            });
        }

        if let Some(max) = poll.max_attempts {
            if attempts >= max {
                return Err(TariswapError::TransactionTimeout {
                    transaction_id,
                    attempts,
                });
            }
        }

        tokio::time::sleep(poll.interval()).await;
    }
}

/// Fetch a substate by its text id
pub async fn get_substate<P: WalletProvider + ?Sized>(
    provider: &P,
    substate_id: &str,
) -> Result<SubstateResponse> {
    debug!("Fetching substate {}", substate_id);
    provider.get_substate(substate_id).await
}
