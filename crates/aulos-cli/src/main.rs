//! Aulos CLI - Render the breath instrument offline.

mod commands;
mod error;
mod patch;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aulos")]
#[command(author, version, about = "Aulos breath instrument CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch or a held note to a WAV file
    Render(commands::render::RenderArgs),

    /// Print a patch file with every parameter at its default
    Patch(commands::patch::PatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `aulos patch` output can be redirected
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Patch(args) => commands::patch::run(args),
    }
}
