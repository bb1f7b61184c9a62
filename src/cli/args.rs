use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "archguard", version, about = "Architecture enforcement core")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// Plugin installation root holding templates and presets
    #[arg(long, global = true, value_name = "DIR")]
    pub plugin_root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the dependency graph and report layer violations
    Analyze,
    /// Analysis plus consistency rules; non-zero exit on errors
    Check,
    /// Render managed files to disk
    Sync {
        /// Report drift without writing
        #[arg(long)]
        check: bool,
    },
    /// Managed-file drift and project size
    Status,
    /// Run an event handler (JSON on stdin, JSON reply on stdout)
    Hook {
        #[arg(value_name = "EVENT")]
        event: String,
    },
    /// Classify project size and recommend a layer stack
    Size,
}
