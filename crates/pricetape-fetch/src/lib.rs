//! Upstream price sources and fetch drivers for pricetape.
//!
//! This crate provides the fetch side of the pipeline:
//!
//! - [`ClientConfig`] - HTTP client and pagination configuration
//! - [`PriceSource`] - One implementation per upstream market-data API
//! - [`normalize`] - Timestamp and price normalization to epoch seconds
//! - [`top_up`] / [`backfill`] - The incremental and full-history drivers

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricetape/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
pub mod normalize;
mod source;
pub mod sources;
mod sync;

pub use client::ClientConfig;
pub use error::FetchError;
pub use source::{DAY_SECS, PriceSource};
pub use sync::{backfill, flatten_batches, top_up};
