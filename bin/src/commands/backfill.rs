//! Backfill command implementation.
//!
//! Forces a full backward pagination regardless of prior state, then merges
//! into whatever already exists. Existing entries keep their values; the
//! backfill only fills the gaps around them.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pricetape_fetch::flatten_batches;

use crate::FetchArgs;

/// Rebuild full history from the source.
pub(crate) async fn backfill(args: &FetchArgs, yes: bool, quiet: bool) -> Result<()> {
    let source = args
        .source
        .build(&args.asset, &args.vs_currency, args.base_url.as_deref())?;
    let config = args.client_config();
    let client = config.build().context("Failed to build HTTP client")?;

    // A full backfill is many rate-limited requests; confirm before starting.
    if !yes && !quiet {
        let prompt = format!(
            "Backfill full {} history from {}? This paginates under a rate limit and may take a while.",
            args.asset,
            source.name()
        );
        let confirmed = inquire::Confirm::new(&prompt).with_default(true).prompt()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template"),
        );
        pb.set_message(format!("Backfilling from {}", source.name()));
        pb
    };

    let mut pages = 0u32;
    let mut fetched = 0usize;
    let batches = pricetape_fetch::backfill(source.as_ref(), &client, &config, |batch| {
        pages += 1;
        fetched += batch.len();
        spinner.set_message(format!("page {pages}: {fetched} points so far"));
        spinner.tick();
    })
    .await?;
    spinner.finish_with_message(format!("Fetched {fetched} points across {pages} pages"));

    let existing = pricetape_store::load(&args.output);
    let merged = existing.merge(flatten_batches(batches));
    let added = merged.len() - existing.len();

    pricetape_store::save(&args.output, &merged)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;

    if !quiet {
        println!(
            "Added {added} new points ({} total) to '{}'",
            merged.len(),
            args.output.display()
        );
    }

    Ok(())
}
