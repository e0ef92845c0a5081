//! Info command implementation.
//!
//! Displays stats of the persisted series without touching the network.

use anyhow::Result;
use std::path::Path;

use crate::display::format_timestamp;

/// Show stats of the persisted series.
pub(crate) fn show_info(output: &Path) -> Result<()> {
    let series = pricetape_store::load(output);

    if series.is_empty() {
        println!("No data in '{}'", output.display());
        return Ok(());
    }

    // Constructors guarantee both ends exist on a non-empty series.
    let first = series.first().expect("non-empty series");
    let last = series.last().expect("non-empty series");
    let span_days = (last.timestamp - first.timestamp) / 86_400;

    println!("Series:  {}", output.display());
    println!("Points:  {}", series.len());
    println!("First:   {} ({})", format_timestamp(first.timestamp), first.price);
    println!("Last:    {} ({})", format_timestamp(last.timestamp), last.price);
    println!("Span:    {span_days} days");

    Ok(())
}
