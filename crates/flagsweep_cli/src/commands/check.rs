//! The check command: inspect one flag and report what a sweep would do.

use chrono::DateTime;
use console::style;

use flagsweep::dates::{expiry_date, format_date};
use flagsweep::sweep::partition;

use crate::commands::shared::build_client;
use crate::config::Config;

pub(crate) async fn handle_check(
    project: &str,
    key: &str,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config, None, None, false)?;

    let Some(flag) = client.get_flag(project, key).await? else {
        println!(
            "{} flag {} not found in project {}",
            style("✗").red(),
            style(key).bold(),
            project
        );
        return Ok(());
    };

    let property = &config.sweep.property_name;

    println!("{} {}", style(&flag.key).bold(), flag.name);
    match flag.creation_date.and_then(DateTime::from_timestamp_millis) {
        Some(created) => println!("  created: {}", created.to_rfc3339()),
        None => println!("  created: {}", style("missing or invalid").yellow()),
    }
    match flag.property(property) {
        Some(value) if !value.value.is_empty() => {
            println!("  {property}: {}", value.value.join(", "));
        }
        _ => println!("  {property}: {}", style("absent").dim()),
    }

    let partitioned = partition(vec![flag.clone()], property, config.sweep.skip_existing);
    if let Some(skipped) = partitioned.skipped.first() {
        println!(
            "  verdict: {} ({})",
            style("would skip").yellow(),
            skipped.reason
        );
    } else {
        let expiry = flag
            .creation_date
            .and_then(|ms| expiry_date(ms, config.sweep.days_offset))
            .map(|d| format_date(d, &config.sweep.date_format));
        match expiry {
            Some(date) => println!(
                "  verdict: {} {property} = {date}",
                style("would set").green()
            ),
            None => println!("  verdict: {}", style("cannot compute expiry").red()),
        }
    }

    Ok(())
}
