//! Wallet provider seam and transaction submission

pub mod json_rpc;
pub mod provider;
pub mod submit;

#[cfg(test)]
pub(crate) mod testing;

pub use json_rpc::JsonRpcWalletProvider;
pub use provider::{
    Account, FinalizeResult, SubmitTransactionResponse, SubstateDiff, TransactionResult,
    TransactionResultResponse, TransactionStatus, WalletProvider,
};
pub use submit::{get_substate, submit_and_wait_for_transaction, TransactionOutcome};
