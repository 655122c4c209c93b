mod args;
mod batch;
mod simulate;

use args::{Args, Command};
use clap::Parser;
use eyre::Result;
use shielded_pool::PoolConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));

    let fmt = match args.json {
        true => tracing_subscriber::fmt::layer().json().boxed(),
        false => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry().with(filter).with(fmt).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(&args);

    let config = PoolConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Simulate(simulate) => simulate::run(config, simulate).await,
        Command::Rollup(rollup) => batch::run(&rollup),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}
