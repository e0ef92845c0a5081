//! Core types for the pricetape price history tool.
//!
//! This crate provides the fundamental data structures used throughout
//! pricetape:
//!
//! - [`PricePoint`] - A single `(timestamp, price)` observation
//! - [`Series`] - The sorted, deduplicated series persisted between runs
//! - [`Cursor`] - A position in an upstream source's pagination space
//! - [`FetchBatch`] - Observations returned by one fetch step

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/pricetape/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cursor;
mod point;
mod series;

pub use cursor::{Cursor, FetchBatch};
pub use point::PricePoint;
pub use series::Series;
