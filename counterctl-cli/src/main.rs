//! counterctl CLI - a single persisted counter
//!
//! Entry point for the `counterctl` binary:
//! - `serve` runs the HTTP server (counter pages + JSON API)
//! - `get` / `increment` / `reset` operate on the counter directly
//! - `wipe` drops and recreates the counter table

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use counterctl_core::CounterConfig;

mod commands;
mod tracing_setup;

use commands::counter::{ShowArgs, WipeArgs};
use commands::serve::ServeArgs;
use commands::CounterOp;

#[derive(Parser, Debug)]
#[command(
    name = "counterctl",
    author,
    version,
    about = "A single persisted counter, served over HTTP or operated from the shell"
)]
struct Cli {
    /// Database URL (overrides config and environment)
    #[arg(long, global = true, env = "COUNTERCTL_DATABASE_URL")]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run HTTP server (counter pages and JSON API)
    Serve(ServeArgs),
    /// Print the counter, creating it at 0 if missing
    Get(ShowArgs),
    /// Add one to the counter and print it
    Increment(ShowArgs),
    /// Set the counter to 0 and print it
    Reset(ShowArgs),
    /// Drop and recreate the counter table
    Wipe(WipeArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = CounterConfig::load().context(format!(
        "Failed to load config from {}",
        CounterConfig::config_path().display()
    ))?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        log_level: config.log_level.clone(),
    })
    .ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &config).await?,
        Commands::Get(args) => commands::run_counter(CounterOp::Get, args, &config).await?,
        Commands::Increment(args) => {
            commands::run_counter(CounterOp::Increment, args, &config).await?
        }
        Commands::Reset(args) => commands::run_counter(CounterOp::Reset, args, &config).await?,
        Commands::Wipe(args) => commands::run_wipe(args, &config).await?,
        Commands::Completions(args) => run_completions(args.shell)?,
    }

    Ok(())
}

fn run_completions(shell: Shell) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
