//! Quota snapshots and the selection reduction
//!
//! Snapshots are created fresh on every selection call, tagged with their
//! entry's position in the request, and discarded once the decision is made.

use github_app_auth::RateLimit;

/// One probe result, tagged with its entry's index in the original request.
#[derive(Debug, Clone, Copy)]
pub struct QuotaSnapshot {
    pub index: usize,
    pub limit: u64,
    pub used: u64,
    pub remaining: u64,
    /// Unix timestamp (seconds) at which the window resets.
    pub reset: u64,
}

impl QuotaSnapshot {
    pub fn from_rate(index: usize, rate: RateLimit) -> Self {
        Self {
            index,
            limit: rate.limit,
            used: rate.used,
            remaining: rate.remaining,
            reset: rate.reset,
        }
    }
}

/// Pick the snapshot with the most remaining quota.
///
/// Scans in index order and only replaces the current best on a strictly
/// greater remaining count, so ties resolve to the earliest entry and the
/// result is stable across runs with identical quota values, whatever order
/// the probes happened to complete in.
pub fn best_snapshot(snapshots: &[QuotaSnapshot]) -> Option<&QuotaSnapshot> {
    snapshots
        .iter()
        .reduce(|best, snapshot| {
            if snapshot.remaining > best.remaining {
                snapshot
            } else {
                best
            }
        })
}
