// src/report/console.rs
use colored::Colorize;

use crate::consistency::ConsistencyReport;
use crate::graph::DependencyReport;
use crate::sizing::SizeReport;
use crate::sync::{SyncResult, SyncStatus};
use crate::types::{Severity, Violation};

/// Prints a full analysis report to stdout.
pub fn print_report(report: &DependencyReport) {
    print_layer_counts(report);
    print_violations(&report.direct_violations, "DIRECT VIOLATIONS");
    print_violations(&report.transitive_violations, "TRANSITIVE VIOLATIONS");
    print_chains(report);
    print_analysis_summary(report);
}

fn print_layer_counts(report: &DependencyReport) {
    println!("{}", "LAYERS".bold());
    for (layer, count) in &report.stats.per_layer {
        let deps = report
            .layer_deps
            .get(layer)
            .map(|set| set.iter().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        let arrow = if deps.is_empty() {
            String::new()
        } else {
            format!(" {} {deps}", "->".blue())
        };
        println!("  {} ({count} files){arrow}", layer.cyan());
    }
    println!();
}

fn print_violations(violations: &[Violation], heading: &str) {
    if violations.is_empty() {
        return;
    }
    println!("{}", heading.bold());
    for v in violations {
        let label = match v.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow(),
        };
        println!("{label}: {}", v.message.bold());
        println!("  {} {}", "-->".blue(), v.source);
        println!();
    }
}

fn print_chains(report: &DependencyReport) {
    if report.chains.is_empty() {
        return;
    }
    println!("{}", "DEPENDENCY CHAINS".bold());
    for chain in &report.chains {
        println!(
            "  {} {} {} {} {}",
            chain.from.cyan(),
            "->".blue(),
            chain.via.cyan(),
            "->".blue(),
            chain.to.cyan()
        );
    }
    println!();
}

fn print_analysis_summary(report: &DependencyReport) {
    let stats = &report.stats;
    let verdict = if stats.direct_count == 0 {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };
    println!(
        "{verdict}: {} files, {} direct, {} transitive, {} unreadable",
        stats.files_scanned, stats.direct_count, stats.transitive_count, stats.files_errored
    );
}

/// Prints the consistency section.
pub fn print_consistency(report: &ConsistencyReport) {
    println!("{}", "CONSISTENCY".bold());
    if report.violations.is_empty() {
        println!("  {} all rules clean ({})", "ok".green(), report.rules_run.join(", "));
        println!();
        return;
    }
    for v in report.list() {
        let label = match v.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow(),
        };
        println!("  {label} [{}]: {}", v.kind.label().cyan(), v.message);
    }
    println!();
}

/// Prints the managed-file drift section.
pub fn print_sync(results: &[SyncResult]) {
    println!("{}", "MANAGED FILES".bold());
    for result in results {
        let status = match &result.status {
            SyncStatus::InSync | SyncStatus::Generated => result.status.label().green(),
            SyncStatus::Disabled => result.status.label().dimmed(),
            SyncStatus::Outdated | SyncStatus::Missing => result.status.label().yellow(),
            SyncStatus::Error(_) => result.status.label().red(),
        };
        println!("  {:<40} {status}", result.path);
    }
    println!();
}

/// Prints the sizing line.
pub fn print_size(report: &SizeReport) {
    println!(
        "{}: {} ({} files, {} lines)",
        "PROJECT SIZE".bold(),
        report.size.label().cyan(),
        report.file_count,
        report.line_count
    );
}
