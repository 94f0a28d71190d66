//! Pool selection
//!
//! A single straight-line pipeline per call: validate the request, build one
//! client per entry, probe every quota concurrently, reduce to the entry with
//! the most remaining, and hand that client back. No retries and no partial
//! pools: a single malformed entry, failed construction, or failed probe
//! fails the whole call.

use std::future::Future;
use std::pin::Pin;

use futures::future::join_all;
use github_app_auth::{AppClient, AppCredentials, RateLimit};

use crate::error::{Error, Result};
use crate::pool_debug;
use crate::quota::{QuotaSnapshot, best_snapshot};
use crate::request::PoolRequest;

/// A client that can report its current rate limit.
///
/// `Pin<Box<dyn Future>>` keeps the trait dyn-compatible; the boxing cost is
/// nothing next to the network round trip behind it.
pub trait QuotaProbe {
    fn rate_limit(
        &self,
    ) -> Pin<Box<dyn Future<Output = github_app_auth::Result<RateLimit>> + Send + '_>>;
}

impl QuotaProbe for AppClient {
    fn rate_limit(
        &self,
    ) -> Pin<Box<dyn Future<Output = github_app_auth::Result<RateLimit>> + Send + '_>> {
        Box::pin(AppClient::rate_limit(self))
    }
}

/// Select the pool entry with the most remaining rate limit.
///
/// Builds one [`AppClient`] per entry over a fresh HTTP connection pool;
/// nothing is shared with other calls even when the same credentials repeat.
/// The winning client's ownership transfers to the caller; the losers are
/// dropped.
pub async fn select_best(request: PoolRequest) -> Result<AppClient> {
    let http = reqwest::Client::new();
    select_best_with(request, |credentials, base_url| {
        AppClient::new(http.clone(), credentials, base_url).map_err(Error::from)
    })
    .await
}

/// The selection pipeline over an injected client factory.
///
/// Validation runs before the factory is called, so an invalid request never
/// constructs a client or spends a probe. All probes are launched together
/// and the call suspends until every one has finished - the only suspension
/// point - then the reduction runs over snapshots in entry order, independent
/// of completion order.
pub async fn select_best_with<C, F>(request: PoolRequest, factory: F) -> Result<C>
where
    C: QuotaProbe,
    F: Fn(AppCredentials, &str) -> Result<C>,
{
    request.validate()?;
    let PoolRequest { apps, base_url } = request;

    pool_debug!("probing {} app(s) against {base_url}", apps.len());

    let mut clients = apps
        .into_iter()
        .map(|credentials| factory(credentials, &base_url))
        .collect::<Result<Vec<C>>>()?;

    let probes = clients.iter().enumerate().map(|(index, client)| async move {
        client
            .rate_limit()
            .await
            .map(|rate| QuotaSnapshot::from_rate(index, rate))
    });

    // join_all waits for every probe and yields results in entry order.
    let snapshots = join_all(probes)
        .await
        .into_iter()
        .collect::<github_app_auth::Result<Vec<QuotaSnapshot>>>()?;

    if crate::debug::enabled() {
        let summary = snapshots
            .iter()
            .map(|s| format!("#{}={}/{}", s.index, s.remaining, s.limit))
            .collect::<Vec<_>>()
            .join(", ");
        pool_debug!("quotas: {summary}");
    }

    let best = best_snapshot(&snapshots).ok_or(Error::EmptyPool)?;
    if best.remaining == 0 {
        return Err(Error::PoolExhausted);
    }

    pool_debug!("selected app #{} with {} remaining", best.index, best.remaining);

    let index = best.index;
    Ok(clients.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use github_app_auth::Secret;

    #[derive(Debug)]
    struct FakeClient {
        app_id: String,
        remaining: u64,
        delay_ms: u64,
        fail: bool,
        probes: Arc<AtomicUsize>,
    }

    impl QuotaProbe for FakeClient {
        fn rate_limit(
            &self,
        ) -> Pin<Box<dyn Future<Output = github_app_auth::Result<RateLimit>> + Send + '_>>
        {
            Box::pin(async move {
                if self.delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
                }
                self.probes.fetch_add(1, Ordering::SeqCst);
                if self.fail {
                    return Err(github_app_auth::Error::Http("probe failed".into()));
                }
                Ok(RateLimit {
                    limit: 5000,
                    used: 5000u64.saturating_sub(self.remaining),
                    remaining: self.remaining,
                    reset: 1_691_591_363,
                })
            })
        }
    }

    fn app(id: &str) -> AppCredentials {
        AppCredentials {
            app_id: id.into(),
            private_key: Secret::new("pk".into()),
            ..Default::default()
        }
    }

    fn request(entries: usize) -> PoolRequest {
        PoolRequest {
            apps: (0..entries).map(|i| app(&format!("app-{i}"))).collect(),
            base_url: "https://api.github.com".into(),
        }
    }

    /// Factory handing out fakes in entry order, one `(remaining, delay_ms)`
    /// pair per entry, all sharing a probe counter.
    fn fake_factory(
        quotas: Vec<(u64, u64)>,
        probes: Arc<AtomicUsize>,
    ) -> impl Fn(AppCredentials, &str) -> Result<FakeClient> {
        let next = AtomicUsize::new(0);
        move |credentials, _base_url| {
            let (remaining, delay_ms) = quotas[next.fetch_add(1, Ordering::SeqCst)];
            Ok(FakeClient {
                app_id: credentials.app_id,
                remaining,
                delay_ms,
                fail: false,
                probes: probes.clone(),
            })
        }
    }

    async fn select(quotas: &[u64]) -> (Result<FakeClient>, usize) {
        let probes = Arc::new(AtomicUsize::new(0));
        let factory = fake_factory(quotas.iter().map(|&r| (r, 0)).collect(), probes.clone());
        let result = select_best_with(request(quotas.len()), factory).await;
        let count = probes.load(Ordering::SeqCst);
        (result, count)
    }

    #[tokio::test]
    async fn highest_remaining_wins() {
        let (result, probes) = select(&[1000, 4000]).await;
        assert_eq!(result.unwrap().app_id, "app-1");
        assert_eq!(probes, 2, "every entry must be probed exactly once");
    }

    #[tokio::test]
    async fn ties_resolve_to_earliest_entry() {
        let (result, _) = select(&[3000, 3000, 100]).await;
        assert_eq!(result.unwrap().app_id, "app-0");
    }

    #[tokio::test]
    async fn all_exhausted_fails() {
        let (result, probes) = select(&[0, 0]).await;
        assert!(matches!(result, Err(Error::PoolExhausted)));
        assert_eq!(probes, 2);
    }

    #[tokio::test]
    async fn single_exhausted_entry_fails() {
        let (result, _) = select(&[0]).await;
        assert!(matches!(result, Err(Error::PoolExhausted)));
    }

    #[tokio::test]
    async fn empty_pool_fails_without_probing() {
        let (result, probes) = select(&[]).await;
        assert!(matches!(result, Err(Error::EmptyPool)));
        assert_eq!(probes, 0);
    }

    #[tokio::test]
    async fn incomplete_entries_reject_whole_pool_before_probing() {
        let probes = Arc::new(AtomicUsize::new(0));
        let factory = fake_factory(vec![(1, 0), (1, 0), (1, 0)], probes.clone());

        let mut request = request(3);
        request.apps[0].app_id = String::new();
        request.apps[2].private_key = Secret::new(String::new());

        let result = select_best_with(request, factory).await;
        match result {
            Err(Error::IncompleteConfig(count)) => assert_eq!(count, 2),
            other => panic!("expected IncompleteConfig, got {other:?}"),
        }
        assert_eq!(probes.load(Ordering::SeqCst), 0, "no probe may be issued");
    }

    #[tokio::test]
    async fn probe_failure_fails_the_whole_selection() {
        let probes = Arc::new(AtomicUsize::new(0));
        let next = AtomicUsize::new(0);
        let factory = move |credentials: AppCredentials, _: &str| {
            let index = next.fetch_add(1, Ordering::SeqCst);
            Ok(FakeClient {
                app_id: credentials.app_id,
                remaining: 4000,
                delay_ms: 0,
                fail: index == 1,
                probes: probes.clone(),
            })
        };

        let result = select_best_with(request(3), factory).await;
        assert!(matches!(result, Err(Error::Auth(_))), "got: {result:?}");
    }

    #[tokio::test]
    async fn construction_failure_propagates() {
        let factory = |_: AppCredentials, _: &str| -> Result<FakeClient> {
            Err(Error::Auth(github_app_auth::Error::InvalidKey(
                "not base64".into(),
            )))
        };
        let result = select_best_with(request(2), factory).await;
        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn selection_ignores_probe_completion_order() {
        // Entry 0 holds the larger quota but answers last.
        let probes = Arc::new(AtomicUsize::new(0));
        let factory = fake_factory(vec![(4000, 40), (100, 0)], probes.clone());
        let result = select_best_with(request(2), factory).await.unwrap();
        assert_eq!(result.app_id, "app-0");

        // Tie where the later entry answers first still keeps index 0.
        let factory = fake_factory(vec![(3000, 40), (3000, 0)], probes.clone());
        let result = select_best_with(request(2), factory).await.unwrap();
        assert_eq!(result.app_id, "app-0");
    }

    #[tokio::test]
    async fn factory_receives_the_request_endpoint() {
        let probes = Arc::new(AtomicUsize::new(0));
        let factory = move |credentials: AppCredentials, base_url: &str| {
            assert_eq!(base_url, "https://ghe.example.com/api/v3");
            Ok(FakeClient {
                app_id: credentials.app_id,
                remaining: 1,
                delay_ms: 0,
                fail: false,
                probes: probes.clone(),
            })
        };
        let request = PoolRequest {
            apps: vec![app("app-0")],
            base_url: "https://ghe.example.com/api/v3".into(),
        };
        select_best_with(request, factory).await.unwrap();
    }
}
