//! Tariswap client
//!
//! Builds instruction sequences for the Tariswap liquidity pool template,
//! submits them through a wallet daemon and reads pool state back from the
//! ledger's CBOR substates.

pub mod config;
pub mod error;
pub mod ledger;
pub mod tariswap;
pub mod transaction;
pub mod wallet;

pub use config::TariswapConfig;
pub use error::{Result, TariswapError};
pub use tariswap::TariswapClient;
pub use wallet::{JsonRpcWalletProvider, WalletProvider};
