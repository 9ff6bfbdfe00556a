//! todo - local to-do list manager CLI
//!
//! Create, edit, complete, delete, and filter tasks stored as JSON in a
//! local data directory.

use clap::Parser;
use todo::cli::Cli;
use todo::output::{emit_error, infer_command_name_from_args};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let command = infer_command_name_from_args();
    let cli = Cli::parse();

    // Tracing is opt-in via RUST_LOG or --verbose.
    // Ignore invalid/huge filters rather than failing startup.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| {
            if cli.verbose {
                EnvFilter::new("todo=debug")
            } else {
                EnvFilter::new("off")
            }
        });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(err) = cli.run() {
        let _ = emit_error(&command, &err, json);
        std::process::exit(err.exit_code());
    }
}
