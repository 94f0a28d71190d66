//! Error types for GitHub App authentication operations

/// Errors from credential handling and authenticated API calls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("JWT signing failed: {0}")]
    Signing(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("GitHub API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
