use std::time::Duration;

use esg_ingest::{
    Backoff, EsgError, InMemoryStore, RetryConfig, UpdateCoordinator, UpdateStatus, UpdateStore,
    WebhookNotification,
};
use serde_json::json;

use crate::common::{ScriptedFetcher, StalledFetcher};

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff: Backoff::Fixed(Duration::from_millis(1)),
        ..RetryConfig::default()
    }
}

fn unavailable() -> EsgError {
    EsgError::Status {
        status: 503,
        url: "mock://sheet".into(),
    }
}

#[tokio::test]
async fn retryable_status_is_retried_until_success() {
    let fetcher = ScriptedFetcher::new(vec![unavailable(), unavailable()], json!({ "water": 3 }));
    let coordinator = UpdateCoordinator::builder(fetcher, InMemoryStore::new())
        .retry_policy(fast_retry(3))
        .build();

    let done = coordinator
        .process(WebhookNotification::new("upload", "row.added", "x"))
        .await
        .unwrap();

    assert_eq!(
        done.assessment.normalized.environmental.water_usage,
        Some(3.0)
    );
}

#[tokio::test]
async fn retries_stop_at_the_configured_limit() {
    let fetcher = ScriptedFetcher::new(
        vec![unavailable(), unavailable(), unavailable()],
        json!({}),
    );
    let store = InMemoryStore::new();
    let coordinator = UpdateCoordinator::builder(fetcher, store.clone())
        .retry_policy(fast_retry(1))
        .build();

    let err = coordinator
        .process(WebhookNotification::new("upload", "row.added", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, EsgError::Status { status: 503, .. }));
    let updates = store.list_updates().await.unwrap();
    assert_eq!(updates[0].status, UpdateStatus::Failed);
}

#[tokio::test]
async fn non_retryable_errors_fail_immediately() {
    let fetcher = ScriptedFetcher::new(
        vec![EsgError::Status {
            status: 401,
            url: "mock://x".into(),
        }],
        json!({}),
    );
    let coordinator = UpdateCoordinator::builder(fetcher, InMemoryStore::new())
        .retry_policy(fast_retry(5))
        .build();

    let err = coordinator
        .process(WebhookNotification::new("upload", "row.added", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EsgError::Status { status: 401, .. }));
}

#[tokio::test]
async fn stalled_fetches_time_out() {
    let coordinator = UpdateCoordinator::builder(StalledFetcher, InMemoryStore::new())
        .retry_policy(RetryConfig::disabled())
        .fetch_timeout(Duration::from_millis(20))
        .build();

    let err = coordinator
        .process(WebhookNotification::new("spreadsheet", "sheet.updated", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EsgError::Timeout(_)));
}

#[test]
fn exponential_backoff_is_capped() {
    let backoff = Backoff::Exponential {
        base: Duration::from_millis(250),
        factor: 2.0,
        max: Duration::from_secs(3),
        jitter: false,
    };
    assert_eq!(backoff.delay(0), Duration::from_millis(250));
    assert_eq!(backoff.delay(2), Duration::from_secs(1));
    assert_eq!(backoff.delay(10), Duration::from_secs(3));
}

#[test]
fn default_policy_retries_transient_failures_only() {
    let cfg = RetryConfig::default();
    assert!(cfg.enabled);
    assert_eq!(cfg.max_retries, 4);
    assert_eq!(cfg.retry_on_status, esg_ingest::core::TRANSIENT_STATUSES);

    assert!(unavailable().is_retryable(&cfg));
    assert!(EsgError::Timeout(Duration::from_secs(1)).is_retryable(&cfg));
    assert!(
        !EsgError::Status {
            status: 404,
            url: "mock://x".into()
        }
        .is_retryable(&cfg)
    );
    assert!(!EsgError::Data("bad body".into()).is_retryable(&cfg));

    let off = RetryConfig::disabled();
    assert!(!off.enabled);
}

#[test]
fn jittered_delays_stay_within_the_cap() {
    let backoff = RetryConfig::default().backoff;
    for attempt in 0..8 {
        assert!(backoff.delay(attempt) <= Duration::from_secs(3));
    }
}
