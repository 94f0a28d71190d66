//! Error types for pool selection

/// Errors from a selection call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed top-level request shape, detected before any other check.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The pool carried no entries at all.
    #[error("pool is empty: no app credentials supplied")]
    EmptyPool,

    /// One or more entries were missing an app id or private key. The whole
    /// request is rejected rather than proceeding with a reduced pool.
    #[error("{0} app config(s) missing appId or privateKey")]
    IncompleteConfig(usize),

    /// Every entry's remaining quota was zero at probe time.
    #[error("pool exhausted: all apps have zero remaining rate limit")]
    PoolExhausted,

    /// Client construction or a quota probe failed; propagated unrecovered.
    #[error(transparent)]
    Auth(#[from] github_app_auth::Error),
}

/// Result alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;
