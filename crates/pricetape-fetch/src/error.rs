//! Fetch failure taxonomy.

use thiserror::Error;

/// Errors that can occur during a fetch step.
///
/// The fetch layer never retries internally; any failure aborts the current
/// step and propagates to the caller, which discards the run without
/// touching persisted state.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream returned a non-success status.
    #[error("HTTP status {status} from upstream: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// An excerpt of the response body, for diagnostics.
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Truncates a response body to a diagnosable excerpt.
pub(crate) fn body_excerpt(body: &str) -> String {
    const MAX: usize = 256;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}
