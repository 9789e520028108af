use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;

use island_hook::cli;
use island_hook::config::ChannelPaths;
use island_hook::decision::Decision;

#[derive(Parser)]
#[command(
    name = "island-hook",
    version,
    about = "Report assistant session events to the island authority"
)]
struct Cli {
    /// Use this channel directory instead of the per-user default.
    #[arg(long, global = true, value_name = "DIR")]
    base_dir: Option<PathBuf>,

    /// Log diagnostics to stderr (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read one hook notification from stdin and forward it (default).
    Hook,
    /// Show the channel location and whether it passes verification.
    Status,
    /// Run a development authority that answers every permission request the same way.
    Listen {
        #[arg(long, default_value = "ask")]
        decision: Decision,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let command = args.command.unwrap_or(Commands::Hook);

    init_logging(args.verbose, matches!(command, Commands::Listen { .. }));

    let paths = args
        .base_dir
        .map(ChannelPaths::from_base_dir)
        .or_else(ChannelPaths::resolve);

    match command {
        Commands::Hook => cli::hook::run_hook(paths.as_ref()).await?,
        Commands::Status => cli::status::run_status(paths.as_ref()),
        Commands::Listen { decision, reason } => {
            let paths = paths.context("cannot determine the channel directory")?;
            cli::listen::run_listen(paths, decision, reason)
                .await
                .context("authority stopped with an error")?;
        }
    }
    Ok(())
}

/// The reporter stays silent unless asked; stderr is visible to the tool.
fn init_logging(verbose: u8, serving: bool) {
    let level = match verbose {
        0 if serving => Level::INFO,
        0 => return,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}
