//! Pool selection for GitHub App credentials
//!
//! Spreads traffic over several GitHub App credential sets by handing the
//! caller the one with the most remaining rate limit. One call validates the
//! pool, builds an authenticated client per entry, probes every client's
//! quota concurrently, and returns the client with the most headroom - or
//! fails clearly when the request is malformed, the pool is empty, or every
//! entry is exhausted.
//!
//! Selection is stateless and fail-fast: nothing persists between calls,
//! losing clients are dropped, the winner's ownership moves to the caller,
//! and a single malformed entry or failed probe rejects the whole call.

pub mod debug;
pub mod error;
pub mod quota;
pub mod request;
pub mod selector;

pub use error::{Error, Result};
pub use quota::QuotaSnapshot;
pub use request::PoolRequest;
pub use selector::{QuotaProbe, select_best, select_best_with};
