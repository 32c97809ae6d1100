//! Tracegraph CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tracegraph")]
#[command(about = "Incremental address-transaction graph engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Engine configuration file (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge expansion paths into a graph document
    Expand {
        /// Graph document (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Expansion request (JSON)
        #[arg(short, long)]
        paths: PathBuf,

        /// Treat the paths as incoming flow
        #[arg(short, long)]
        incoming: bool,

        /// Output document (defaults to overwriting --graph)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Re-layout a graph document with the layered engine
    Layout {
        #[arg(short, long)]
        graph: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the visual scale of a volume against a graph's edges
    Scale {
        #[arg(short, long)]
        graph: PathBuf,

        #[arg(long)]
        volume: f64,
    },
    /// Apply a JSON command script to a graph document
    Replay {
        #[arg(short, long)]
        graph: PathBuf,

        #[arg(short, long)]
        script: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("tracegraph={}", log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Expand {
            graph,
            paths,
            incoming,
            out,
        } => commands::expand(&graph, &paths, incoming, out.as_deref(), config),
        Commands::Layout { graph, out } => commands::layout(&graph, out.as_deref(), config),
        Commands::Scale { graph, volume } => commands::scale(&graph, volume, &config),
        Commands::Replay { graph, script, out } => {
            commands::replay(&graph, &script, out.as_deref(), config)
        }
        Commands::Version => {
            println!("Tracegraph v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
