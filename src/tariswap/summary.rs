//! Terminal summaries of pool state

use crate::ledger::ComponentAddress;
use crate::tariswap::pool::{LpToken, PoolBalances, PoolVaults};

/// Format pool vaults and balances as a boxed text summary
pub fn format_pool_summary(
    component: &ComponentAddress,
    vaults: &PoolVaults,
    balances: &PoolBalances,
    lp_token: Option<&LpToken>,
) -> String {
    let mut out = String::new();
    out.push_str("╔══════════════════════════════════════════════════════════════════╗\n");
    out.push_str("║            TARISWAP POOL                                         ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════════════╝\n");
    out.push_str(&format!("  Component:  {}\n", component));
    out.push('\n');

    for (resource, amount) in balances {
        let vault = vaults
            .get(resource)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("  {}\n", resource));
        out.push_str(&format!("    Balance:  {:>20}\n", amount));
        out.push_str(&format!("    Vault:    {}\n", vault));
    }

    if let Some(lp) = lp_token {
        out.push('\n');
        out.push_str(&format!("  LP token:   {}\n", lp.address));
        if let Some(symbol) = lp.resource.token_symbol() {
            out.push_str(&format!("    Symbol:   {}\n", symbol));
        }
        if let Some(supply) = lp.resource.total_supply {
            out.push_str(&format!("    Supply:   {:>20}\n", supply));
        }
    }

    out.push_str(&format!(
        "\nGenerated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

/// Print a pool summary to the terminal
pub fn print_pool_summary(
    component: &ComponentAddress,
    vaults: &PoolVaults,
    balances: &PoolBalances,
    lp_token: Option<&LpToken>,
) {
    println!("{}", format_pool_summary(component, vaults, balances, lp_token));
}
