//! The sweep command: enumerate, partition, patch, report.

use std::sync::Arc;
use std::time::Duration;

use flagsweep::sweep::{SweepOptions, run_sweep};

use crate::SweepArgs;
use crate::commands::shared::{build_client, resolve_project};
use crate::config::Config;
use crate::progress::ProgressReporter;
use crate::report;

pub(crate) async fn handle_sweep(
    project: Option<String>,
    args: SweepArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let project = resolve_project(project, config)?;
    let client = build_client(config, args.host.as_deref(), args.rps, args.no_rate_limit)?;
    let options = sweep_options(&args, config);

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();

    let result = run_sweep(&client, &project, &options, Some(&callback)).await?;
    reporter.finish();

    report::render(&result, args.output, options.dry_run)?;

    if !result.is_success() {
        return Err(format!(
            "{} of {} flags failed to update",
            result.failed.len(),
            result.total_processed
        )
        .into());
    }

    Ok(())
}

/// Merge CLI flags over configured defaults.
fn sweep_options(args: &SweepArgs, config: &Config) -> SweepOptions {
    SweepOptions {
        property_name: args
            .property_name
            .clone()
            .unwrap_or_else(|| config.sweep.property_name.clone()),
        days_offset: args.days_offset.unwrap_or(config.sweep.days_offset),
        date_format: args
            .date_format
            .clone()
            .unwrap_or_else(|| config.sweep.date_format.clone()),
        skip_existing: if args.update_existing {
            false
        } else {
            config.sweep.skip_existing
        },
        dry_run: args.dry_run,
        batch_size: args.batch_size.unwrap_or(config.sweep.batch_size),
        batch_delay: Duration::from_millis(
            args.batch_delay_ms.unwrap_or(config.sweep.batch_delay_ms),
        ),
        page_delay: Duration::from_millis(args.page_delay_ms.unwrap_or(config.sweep.page_delay_ms)),
    }
}
