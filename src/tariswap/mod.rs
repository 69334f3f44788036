//! Tariswap pool client

pub mod pool;
pub mod summary;

pub use pool::{CreatedPool, LpToken, PoolBalances, PoolEntry, PoolVaults, TariswapClient};
pub use summary::{format_pool_summary, print_pool_summary};
