//! JSON-RPC client for the wallet daemon

use crate::error::{Result, TariswapError};
use crate::ledger::{Substate, SubstateId, SubstateResponse};
use crate::transaction::SubmitTransactionRequest;
use crate::wallet::provider::{
    Account, SubmitTransactionResponse, TransactionResultResponse, WalletProvider,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    result: Option<R>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct DefaultAccountResponse {
    account: WalletAccount,
    #[serde(default)]
    public_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WalletAccount {
    address: SubstateId,
    key_index: u64,
}

#[derive(Debug, Deserialize)]
struct GetSubstateResponse {
    value: Substate,
}

#[derive(Debug, Serialize)]
struct GetSubstateParams<'a> {
    substate_id: &'a str,
}

#[derive(Debug, Serialize)]
struct GetResultParams<'a> {
    transaction_id: &'a str,
}

/// Wallet provider backed by a wallet daemon's JSON-RPC endpoint
pub struct JsonRpcWalletProvider {
    client: reqwest::Client,
    url: String,
    auth_token: Option<String>,
    next_id: AtomicU64,
}

impl JsonRpcWalletProvider {
    pub fn new(url: &str, auth_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            auth_token,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!("JSON-RPC #{} -> {}", id, method);

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": serde_json::to_value(params)?,
        });

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        // JSON-RPC error bodies can arrive with a non-2xx status
        let response = request.send().await?;
        let status_error = response.error_for_status_ref().err();
        let bytes = response.bytes().await?;

        let decoded: JsonRpcResponse<R> = match serde_json::from_slice(&bytes) {
            Ok(decoded) => decoded,
            Err(err) => {
                return Err(match status_error {
                    Some(http) => TariswapError::Http(http),
                    None => TariswapError::Json(err),
                })
            }
        };

        if let Some(err) = decoded.error {
            return Err(TariswapError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        if let Some(http) = status_error {
            return Err(TariswapError::Http(http));
        }
        decoded.result.ok_or_else(|| TariswapError::Rpc {
            code: 0,
            message: format!("{} returned neither result nor error", method),
        })
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWalletProvider {
    async fn get_account(&self) -> Result<Account> {
        let resp: DefaultAccountResponse = self.call("accounts.get_default", json!({})).await?;
        let address = resp
            .account
            .address
            .as_component()
            .cloned()
            .ok_or_else(|| TariswapError::UnexpectedSubstate {
                id: resp.account.address.to_string(),
                expected: "Component",
            })?;

        Ok(Account {
            address,
            account_id: resp.account.key_index,
            public_key: resp.public_key,
        })
    }

    async fn get_substate(&self, substate_id: &str) -> Result<SubstateResponse> {
        let address: SubstateId = substate_id.parse()?;
        let resp: GetSubstateResponse = self
            .call("substates.get", GetSubstateParams { substate_id })
            .await?;
        Ok(SubstateResponse {
            address,
            value: resp.value,
        })
    }

    async fn submit_transaction(
        &self,
        request: &SubmitTransactionRequest,
    ) -> Result<SubmitTransactionResponse> {
        self.call("transactions.submit", request).await
    }

    async fn get_transaction_result(&self, transaction_id: &str) -> Result<TransactionResultResponse> {
        self.call("transactions.get_result", GetResultParams { transaction_id })
            .await
    }
}
