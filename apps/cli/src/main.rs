//! rtfweave CLI: fragment-to-RTF document compiler.
//!
//! Converts LaTeX/Markdown fragments into RTF, splices them into an
//! official institutional template, and round-trips edits made in the
//! merged RTF back into per-fragment markup.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
