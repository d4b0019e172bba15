//! The `gh` CLI boundary: subprocess execution, response parsing, and
//! client-side rate limiting.

pub mod executor;
pub mod limiter;
pub mod parser;

pub use executor::GhExecutor;
pub use parser::GhParser;

/// Errors from the remote boundary. `AuthExpired` gets special handling in
/// the main loop (session reset and sign-in hint); everything else surfaces
/// as a toast.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("GitHub session is invalid or expired. Run `gh auth login`.")]
    AuthExpired,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("gh CLI not found. Install it from https://cli.github.com/")]
    GhMissing,
    #[error("failed to run gh: {0}")]
    Spawn(String),
    #[error("{0}")]
    Gh(String),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}
