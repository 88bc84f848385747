//! Print the default patch.

use clap::Args;
use std::path::PathBuf;

use crate::error::CliError;
use crate::patch::Patch;

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// Include a short example phrase
    #[arg(long)]
    example: bool,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: PatchArgs) -> anyhow::Result<()> {
    let patch = if args.example {
        Patch::example()
    } else {
        Patch::default()
    };
    let text = patch.to_toml()?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, text).map_err(|e| CliError::write_file(&path, e))?;
            tracing::info!(path = %path.display(), "patch written");
        }
        None => print!("{text}"),
    }
    Ok(())
}
