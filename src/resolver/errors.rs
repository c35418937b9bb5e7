//! Resolution error types and diagnostics.

use thiserror::Error;

use crate::sources::RemoteError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error that aborts a single resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A listing endpoint answered non-2xx or could not be reached.
    #[error(transparent)]
    RemoteUnavailable(#[from] RemoteError),
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::RemoteUnavailable(err) => {
                let mut diag = Diagnostic::error(err.to_string())
                    .with_context(format!("request: {}", err.url()));

                match err.status() {
                    Some(401) | Some(403) | Some(429) => {
                        diag = diag.with_suggestion(suggestions::RATE_LIMITED);
                    }
                    Some(404) => {
                        diag = diag.with_suggestion(suggestions::CHECK_UPSTREAM);
                    }
                    _ => {
                        diag = diag.with_suggestion(suggestions::FETCH_FAILED);
                    }
                }

                diag
            }
        }
    }
}

/// A single file that could not be used as a candidate.
///
/// Always recovered locally by skipping the candidate.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("file unavailable: {0}")]
    Missing(#[from] RemoteError),

    #[error("invalid JSON at {url}: {message}")]
    Malformed { url: String, message: String },
}
