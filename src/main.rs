//! Tariswap CLI
//!
//! Command-line interface for creating and trading against Tariswap pools
//! through a wallet daemon.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use tariswap_client::{
    config::{addresses, TariswapConfig},
    ledger::{Amount, ComponentAddress, ResourceAddress},
    tariswap::{print_pool_summary, TariswapClient},
    wallet::JsonRpcWalletProvider,
};

#[derive(Parser)]
#[command(name = "tariswap")]
#[command(author = "Tariswap Team")]
#[command(version = "0.1.0")]
#[command(about = "Tariswap liquidity pool client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Wallet daemon JSON-RPC endpoint
    #[arg(long, global = true, env = "TARISWAP_WALLET_URL")]
    wallet_url: Option<String>,

    /// Bearer token for the wallet daemon
    #[arg(long, global = true, env = "TARISWAP_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Instantiate a pool for the configured token pair
    CreatePool,

    /// Deposit both pool tokens
    AddLiquidity {
        /// Amount of the first token
        amount_a: i64,
        /// Amount of the second token
        amount_b: i64,
    },

    /// Burn LP tokens for both pool tokens
    RemoveLiquidity {
        /// Amount of LP tokens
        amount_lp: i64,
    },

    /// Swap one pool token for the other
    Swap {
        /// Resource to sell
        #[arg(long)]
        input: ResourceAddress,
        /// Amount to sell
        #[arg(long)]
        amount: i64,
        /// Resource to buy
        #[arg(long)]
        output: ResourceAddress,
    },

    /// List pools registered in a pool index component
    ListPools {
        /// Pool index component address
        index: ComponentAddress,
    },

    /// Show the vault of each pool resource
    Vaults,

    /// Show pool balances
    Balances,

    /// Show the pool's LP token
    LpToken,

    /// Print configuration info
    Info,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn load_config(cli: &Cli) -> Result<TariswapConfig> {
    let mut config = match &cli.config {
        Some(path) => TariswapConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => TariswapConfig::default(),
    };
    if let Some(url) = &cli.wallet_url {
        config.wallet_url = url.clone();
    }
    if let Some(token) = &cli.auth_token {
        config.auth_token = Some(token.clone());
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let config = load_config(&cli)?;

    if let Commands::Info = cli.command {
        print_info(&config);
        return Ok(());
    }

    info!("Using wallet daemon at {}", config.wallet_url);
    let provider = JsonRpcWalletProvider::new(&config.wallet_url, config.auth_token.clone());
    let client = TariswapClient::new(provider, config);

    match cli.command {
        Commands::CreatePool => {
            let created = client.create_pool().await.context("Failed to create pool")?;
            print_json(&created)?;
        }

        Commands::AddLiquidity { amount_a, amount_b } => {
            let outcome = client
                .add_liquidity(Amount::new(amount_a), Amount::new(amount_b))
                .await
                .context("Failed to add liquidity")?;
            print_json(&outcome)?;
        }

        Commands::RemoveLiquidity { amount_lp } => {
            let outcome = client
                .remove_liquidity(Amount::new(amount_lp))
                .await
                .context("Failed to remove liquidity")?;
            print_json(&outcome)?;
        }

        Commands::Swap {
            input,
            amount,
            output,
        } => {
            let outcome = client
                .swap(&input, Amount::new(amount), &output)
                .await
                .context("Swap failed")?;
            print_json(&outcome)?;
        }

        Commands::ListPools { index } => {
            let pools = client.list_pools(&index).await.context("Failed to list pools")?;
            print_json(&pools)?;
        }

        Commands::Vaults => {
            let vaults = client.get_pool_vaults().await.context("Failed to read pool vaults")?;
            print_json(&vaults)?;
        }

        Commands::Balances => {
            let vaults = client.get_pool_vaults().await.context("Failed to read pool vaults")?;
            let balances = client
                .balances_for(&vaults)
                .await
                .context("Failed to read pool balances")?;
            let lp_token = match client.get_pool_lp_token().await {
                Ok(token) => Some(token),
                Err(e) => {
                    warn!("LP token unavailable: {}", e);
                    None
                }
            };
            print_pool_summary(
                &client.config().swap_component,
                &vaults,
                &balances,
                lp_token.as_ref(),
            );
            print_json(&balances)?;
        }

        Commands::LpToken => {
            let token = client.get_pool_lp_token().await.context("Failed to read LP token")?;
            print_json(&token)?;
        }

        Commands::Info => unreachable!("handled before connecting"),
    }

    Ok(())
}

fn print_info(config: &TariswapConfig) {
    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║       Tariswap Client - Info                             ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();
    println!("WALLET:");
    println!("  JSON-RPC:     {}", config.wallet_url);
    println!("  Poll every:   {} ms", config.poll.interval_ms);
    println!();
    println!("POOL:");
    println!("  Template:     {}", config.template_address);
    println!("  Component:    {}", config.swap_component);
    println!("  First token:  {}", config.first_token);
    println!("  Second token: {}", config.second_token);
    println!("  LP token:     {}", config.lp_token);
    println!("  Swap fee:     {}", config.swap_fee);
    println!("  Tx fee:       {}", config.transaction_fee);
    println!();
    if config.swap_component.to_string() != addresses::SWAP_COMPONENT {
        println!("  (custom deployment)");
        println!();
    }
    println!("USAGE:");
    println!("  tariswap balances                        # Pool balances");
    println!("  tariswap add-liquidity 1000 1000         # Deposit both tokens");
    println!("  tariswap swap --input <res> --amount 10 --output <res>");
    println!();
}
