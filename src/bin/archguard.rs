// src/bin/archguard.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use archguard_core::cli::{dispatch, Cli};

fn main() {
    init_tracing();

    let cli = Cli::parse();
    match dispatch(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            process::exit(2);
        }
    }
}

// Diagnostics go to stderr; hook handlers own stdout for their JSON reply.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
