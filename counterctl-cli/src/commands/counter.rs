//! One-shot counter commands: get, increment, reset, wipe

use anyhow::{bail, Context, Result};
use clap::Parser;

use counterctl_core::{Counter, CounterConfig, CounterRepo, CounterStore};

/// Output options shared by get / increment / reset
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Print the full counter record as JSON instead of the bare value
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct WipeArgs {
    /// Confirm dropping the counter table
    #[arg(long)]
    pub yes: bool,
}

/// Which operation to run
#[derive(Debug, Clone, Copy)]
pub enum CounterOp {
    Get,
    Increment,
    Reset,
}

async fn open_store(config: &CounterConfig) -> Result<CounterStore> {
    let store = CounterStore::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    store
        .create_schema()
        .await
        .context("Failed to create counter schema")?;
    Ok(store)
}

pub async fn run_counter(op: CounterOp, args: ShowArgs, config: &CounterConfig) -> Result<()> {
    let store = open_store(config).await?;
    let repo = CounterRepo::new(&store);

    let counter = match op {
        CounterOp::Get => repo.get().await,
        CounterOp::Increment => repo.increment().await,
        CounterOp::Reset => repo.reset().await,
    }
    .with_context(|| format!("Counter {:?} failed", op))?;

    store.close().await;
    println!("{}", render(&counter, args.json)?);
    Ok(())
}

pub async fn run_wipe(args: WipeArgs, config: &CounterConfig) -> Result<()> {
    if !args.yes {
        bail!(
            "Refusing to wipe {} without --yes (this deletes the counter)",
            config.database_url
        );
    }

    let store = open_store(config).await?;
    store
        .reset_schema()
        .await
        .context("Failed to reset counter schema")?;
    store.close().await;

    println!("Counter store wiped");
    Ok(())
}

fn render(counter: &Counter, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(counter).context("Failed to serialize counter")
    } else {
        Ok(counter.value.to_string())
    }
}
