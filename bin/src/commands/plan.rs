//! Plan command implementation.

use crate::PlanFormat;
use anyhow::{Context, Result};
use gwdata_lib::prelude::*;

/// Print the windows a download over `start..=end` would request.
pub(crate) fn plan(start: &str, end: &str, step_days: u32, format: PlanFormat) -> Result<()> {
    let windows = windows(start, end, step_days)?;

    match format {
        PlanFormat::Text => {
            for (i, window) in windows.iter().enumerate() {
                println!("{:>4}  {}  ({} days)", i + 1, window, window.days());
            }
            println!("{} windows", windows.len());
        }
        PlanFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&windows).context("Failed to serialize windows")?
            );
        }
    }

    Ok(())
}

fn windows(start: &str, end: &str, step_days: u32) -> Result<Vec<DateWindow>> {
    let start = parse_date(start).with_context(|| format!("Invalid start date: {start}"))?;
    let end = parse_date(end).with_context(|| format!("Invalid end date: {end}"))?;
    Ok(partition(start, end, step_days)?)
}
