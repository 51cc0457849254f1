//! Final run reporting: human-readable summary or a single JSON document.

use console::style;
use flagsweep::sweep::RunResult;

/// Output format for the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled human-readable summary.
    Table,
    /// One JSON document with updated/failed/skipped arrays.
    Json,
}

/// Render the run result to stdout.
pub fn render(
    result: &RunResult,
    format: OutputFormat,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Table => print_summary(result, dry_run),
    }
    Ok(())
}

fn print_summary(result: &RunResult, dry_run: bool) {
    let verb = if dry_run { "would update" } else { "updated" };

    println!();
    println!(
        "{} {} flags found, {} processed",
        style("Sweep:").bold(),
        result.total_found,
        result.total_processed
    );

    if !result.updated.is_empty() {
        println!(
            "{} {} {}",
            style("✓").green().bold(),
            result.updated.len(),
            verb
        );
        for flag in &result.updated {
            println!(
                "    {} {} {}",
                style(&flag.key).green(),
                style("→").dim(),
                flag.expiry_date
            );
        }
    }

    if !result.failed.is_empty() {
        println!("{} {} failed", style("✗").red().bold(), result.failed.len());
        for flag in &result.failed {
            println!("    {} {}", style(&flag.key).red(), style(&flag.error).dim());
        }
    }

    if !result.skipped.is_empty() {
        println!(
            "{} {} skipped",
            style("·").dim().bold(),
            result.skipped.len()
        );
        for flag in &result.skipped {
            println!("    {} {}", flag.key, style(&flag.reason).dim());
        }
    }

    if result.total_found == 0 {
        println!("  no flags found in the project");
    }
}
