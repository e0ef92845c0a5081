//! CLI command implementations.

pub(crate) mod backfill;
pub(crate) mod info;
pub(crate) mod update;
