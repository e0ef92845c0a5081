//! Update command implementation.
//!
//! Loads the persisted series, tops it up with observations newer than its
//! last entry (or runs a full backfill when there is no prior data), merges,
//! and saves. Persistence happens exactly once, after a successful merge, so
//! a failed fetch leaves the previous file untouched.

use anyhow::{Context, Result};
use pricetape_fetch::{backfill, flatten_batches, top_up};

use crate::FetchArgs;
use crate::display::format_timestamp;

/// Bring the persisted series up to date.
pub(crate) async fn update(args: &FetchArgs, quiet: bool) -> Result<()> {
    let source = args
        .source
        .build(&args.asset, &args.vs_currency, args.base_url.as_deref())?;
    let config = args.client_config();
    let client = config.build().context("Failed to build HTTP client")?;

    let existing = pricetape_store::load(&args.output);

    let batches = match existing.last_timestamp() {
        Some(since) => {
            if !quiet {
                println!(
                    "Updating '{}' from {} (last point: {})",
                    args.output.display(),
                    source.name(),
                    format_timestamp(since)
                );
            }
            top_up(source.as_ref(), &client, since).await?
        }
        None => {
            if !quiet {
                println!(
                    "No prior data in '{}'; backfilling full history from {}",
                    args.output.display(),
                    source.name()
                );
            }
            backfill(source.as_ref(), &client, &config, |_| {}).await?
        }
    };

    let merged = existing.merge(flatten_batches(batches));
    let added = merged.len() - existing.len();

    pricetape_store::save(&args.output, &merged)
        .with_context(|| format!("Failed to write '{}'", args.output.display()))?;

    if !quiet {
        println!("Added {added} new points ({} total)", merged.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::SourceArg;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(server_uri: &str, output: &Path) -> FetchArgs {
        FetchArgs {
            source: SourceArg::Binance,
            asset: "TAOUSDT".to_string(),
            vs_currency: "usd".to_string(),
            output: output.to_path_buf(),
            timeout: 5,
            pause: 0,
            max_pages: 10,
            base_url: Some(server_uri.to_string()),
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_file_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("price_data.json");
        fs::write(&path, "[[100,1.0],[200,2.0]]").unwrap();

        let result = update(&args(&server.uri(), &path), true).await;
        assert!(result.is_err());

        // Byte-for-byte unchanged.
        assert_eq!(fs::read_to_string(&path).unwrap(), "[[100,1.0],[200,2.0]]");
    }

    #[tokio::test]
    async fn test_fresh_run_contains_only_source_observations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                [200_000_i64, "1.0", "1.0", "1.0", "2.5", "0",
                 286_399_999_i64, "0", 1, "0", "0", "0"],
                [100_000_i64, "1.0", "1.0", "1.0", "1.5", "0",
                 186_399_999_i64, "0", 1, "0", "0", "0"]
            ])))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("price_data.json");

        update(&args(&server.uri(), &path), true).await.unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[[100,1.5],[200,2.5]]"
        );
    }

    #[tokio::test]
    async fn test_incremental_keeps_existing_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                [200_000_i64, "1.0", "1.0", "1.0", "9.9", "0",
                 286_399_999_i64, "0", 1, "0", "0", "0"],
                [300_000_i64, "1.0", "1.0", "1.0", "3.0", "0",
                 386_399_999_i64, "0", 1, "0", "0", "0"]
            ])))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("price_data.json");
        fs::write(&path, "[[100,1.0],[200,2.0]]").unwrap();

        update(&args(&server.uri(), &path), true).await.unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[[100,1.0],[200,2.0],[300,3.0]]"
        );
    }
}
