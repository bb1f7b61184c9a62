use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use crate::cli::args::{Cli, Commands};
use crate::config::ArchConfig;
use crate::consistency::ConsistencyChecker;
use crate::graph::DependencyAnalyzer;
use crate::hooks::handlers;
use crate::layers::LayerTable;
use crate::report::console;
use crate::sizing;
use crate::sync::{SyncEngine, SyncStatus};

/// Routes a parsed command line to the library. Returns the process
/// exit code.
///
/// # Errors
/// Returns an error for unrecoverable configuration problems; per-file
/// analysis errors are reported, not raised.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
    let plugin_root = cli.plugin_root.clone().unwrap_or_else(|| root.clone());

    // Hook handlers load config themselves and must stay fail-open.
    if let Commands::Hook { event } = &cli.command {
        return Ok(handlers::run(event, &root, &plugin_root));
    }

    let config = ArchConfig::load(&root)?;

    match cli.command {
        Commands::Analyze => {
            let table = LayerTable::load(&config)?;
            let report = DependencyAnalyzer::new(&config, &table).analyze(&root);
            console::print_report(&report);
            Ok(0)
        }
        Commands::Check => {
            let table = LayerTable::load(&config)?;
            let report = DependencyAnalyzer::new(&config, &table).analyze(&root);
            let consistency = ConsistencyChecker::new(&root, &config).check_all();
            console::print_report(&report);
            console::print_consistency(&consistency);

            let failed = report.stats.direct_count > 0 || !consistency.ok();
            Ok(i32::from(failed))
        }
        Commands::Sync { check } => {
            let engine = SyncEngine::new(&config, &root, &plugin_root);
            let results = if check {
                engine.status_all()
            } else {
                engine.sync_all()
            };
            console::print_sync(&results);

            let failed = results
                .iter()
                .any(|r| matches!(r.status, SyncStatus::Error(_)));
            Ok(i32::from(failed))
        }
        Commands::Status => {
            let engine = SyncEngine::new(&config, &root, &plugin_root);
            console::print_sync(&engine.status_all());
            console::print_size(&sizing::measure(&root, &config));
            Ok(0)
        }
        Commands::Size => {
            let report = sizing::measure(&root, &config);
            console::print_size(&report);
            println!("{}", "RECOMMENDED LAYERS".bold());
            for (name, tier) in sizing::recommended_layers(report.size) {
                println!("  {tier}: {}", name.cyan());
            }
            Ok(0)
        }
        Commands::Hook { .. } => unreachable!("handled above"),
    }
}
