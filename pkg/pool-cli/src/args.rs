use std::path::PathBuf;

use clap::{Parser, Subcommand};
use primitives::Address;

#[derive(Debug, Parser)]
#[command(name = "pool", about = "Run a shielded pool or a rollup batch in memory")]
pub struct Args {
    /// TOML config file, layered over the defaults and under `POOL_*` env vars
    #[arg(long, short, env = "POOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, used when `RUST_LOG` is not set
    #[arg(long, default_value = "info")]
    pub log: String,

    /// Log as JSON lines
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Deposit into the pool, withdraw part of it, then replay the withdrawal
    Simulate(SimulateArgs),

    /// Fund rollup accounts, transfer between them, and compose the batch
    Rollup(RollupArgs),

    /// Print the effective pool configuration
    Config,
}

#[derive(Debug, clap::Args)]
pub struct SimulateArgs {
    /// Amount to deposit, in base units
    #[arg(long, default_value_t = 80_000_000)]
    pub deposit: u64,

    /// Amount to withdraw, in base units
    #[arg(long, default_value_t = 50_000_000)]
    pub withdrawal: u64,

    /// Fee paid by the withdrawal
    #[arg(long, default_value_t = 0)]
    pub fee: u64,

    /// Receiver of the withdrawal
    #[arg(long, default_value = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef")]
    pub recipient: Address,
}

#[derive(Debug, clap::Args)]
pub struct RollupArgs {
    /// Number of accounts created from deposits
    #[arg(long, default_value_t = 4)]
    pub accounts: usize,

    /// Initial balance of each account
    #[arg(long, default_value_t = 1_000)]
    pub balance: u64,

    /// Number of transfers, each between a pair of accounts
    #[arg(long, default_value_t = 16)]
    pub transfers: usize,
}
