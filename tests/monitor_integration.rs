//! Integration tests for the health monitor's public API.
//!
//! Covers the call wrapper, concurrent recording and the outage poller.

use futures::future::join_all;
use healthwatch::monitor::{
    Dependency, EventKind, HealthMonitor, MonitorConfig, OutagePoller, ServiceError, ServiceStatus,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_wrapper_returns_value_on_success() {
    let monitor = HealthMonitor::default();

    let value: Result<u32, ServiceError> = monitor
        .monitored(Dependency::Lambda, None, || async { Ok(42) })
        .await;

    assert_eq!(value.unwrap(), 42);
    // Success alone never creates an entry
    assert!(monitor.status(Dependency::Lambda).is_none());
    assert!(monitor.events(None).is_empty());
}

#[tokio::test]
async fn test_wrapper_passes_error_through_annotated() {
    let monitor = HealthMonitor::default();

    let result: Result<(), ServiceError> = monitor
        .monitored(Dependency::DynamoDb, Some("eu-west-1"), || async {
            Err(ServiceError::new("Rate exceeded").with_code("ThrottlingException"))
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Rate exceeded");
    assert_eq!(err.code.as_deref(), Some("ThrottlingException"));
    let health = err.health().unwrap();
    assert_eq!(health.service, Dependency::DynamoDb);
    assert_eq!(health.service_status, ServiceStatus::Degraded);

    let entry = monitor.status(Dependency::DynamoDb).unwrap();
    assert_eq!(entry.status, ServiceStatus::Degraded);
    assert_eq!(entry.region.as_deref(), Some("eu-west-1"));
}

#[tokio::test]
async fn test_wrapper_recovery_after_failure() {
    let monitor = HealthMonitor::default();

    let _: Result<(), ServiceError> = monitor
        .monitored(Dependency::S3, None, || async {
            Err(ServiceError::new("Service Unavailable"))
        })
        .await;
    assert!(monitor.has_active_outage());

    let _: Result<(), ServiceError> = monitor
        .monitored(Dependency::S3, None, || async { Ok(()) })
        .await;

    assert!(!monitor.has_active_outage());
    let events = monitor.events(None);
    assert_eq!(events[0].event, EventKind::ServiceRecovered);
    assert_eq!(events[0].message, "Service is now operational");
    assert_eq!(
        monitor.status(Dependency::S3).unwrap().message,
        "Service recovered"
    );
}

#[tokio::test]
async fn test_wrapper_with_io_error() {
    let monitor = HealthMonitor::default();

    let result: Result<(), io::Error> = monitor
        .monitored(Dependency::ApiGateway, None, || async {
            Err(io::Error::new(io::ErrorKind::TimedOut, "upstream timed out"))
        })
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::TimedOut);

    let entry = monitor.status(Dependency::ApiGateway).unwrap();
    assert_eq!(entry.status, ServiceStatus::Degraded);
    assert_eq!(entry.error_code.as_deref(), Some("Timeout"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_on_different_dependencies() {
    let monitor = Arc::new(HealthMonitor::default());

    let calls = Dependency::ALL.into_iter().map(|dependency| {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move {
            let _: Result<(), ServiceError> = monitor
                .monitored(dependency, None, || async {
                    Err(ServiceError::new("internal failure"))
                })
                .await;
        })
    });
    for handle in join_all(calls).await {
        handle.unwrap();
    }

    assert_eq!(monitor.all_statuses().len(), Dependency::ALL.len());
    assert_eq!(monitor.dependencies_with_issues().len(), Dependency::ALL.len());
    // One outage and one error per dependency
    assert_eq!(monitor.events(None).len(), Dependency::ALL.len() * 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_calls_on_same_dependency_keep_event_pairs() {
    let monitor = Arc::new(HealthMonitor::default());

    let calls = (0..20).map(|i| {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move {
            let code = if i % 2 == 0 {
                "ServiceUnavailable"
            } else {
                "ThrottlingException"
            };
            let _: Result<(), ServiceError> = monitor
                .monitored(Dependency::Bedrock, None, || async move {
                    Err(ServiceError::new("failure").with_code(code))
                })
                .await;
        })
    });
    for handle in join_all(calls).await {
        handle.unwrap();
    }

    let events = monitor.events(None);
    let errors = events
        .iter()
        .filter(|e| e.event == EventKind::ErrorLogged)
        .count();
    assert_eq!(errors, 20);

    // Every transition is immediately followed (newest-first: preceded) by
    // the error event of the same recording.
    for (index, event) in events.iter().enumerate() {
        if event.event == EventKind::OutageDetected {
            let error = &events[index - 1];
            assert_eq!(error.event, EventKind::ErrorLogged);
            assert_eq!(error.sequence, event.sequence);
        }
    }

    // The stored entry is the one with the highest sequence
    let entry = monitor.status(Dependency::Bedrock).unwrap();
    let newest = events.iter().map(|e| e.sequence).max().unwrap();
    assert_eq!(entry.sequence, newest);
}

#[tokio::test]
async fn test_poller_publishes_outage_changes() {
    let monitor = Arc::new(HealthMonitor::new(MonitorConfig::default()));
    let cancel_token = CancellationToken::new();

    let (handle, mut rx) = OutagePoller::new(Arc::clone(&monitor))
        .with_interval(Duration::from_millis(10))
        .start(cancel_token.clone());

    assert!(!rx.borrow().has_active_outage);

    monitor.record_error(
        Dependency::Cognito,
        &ServiceError::new("InternalFailure").with_code("InternalFailure"),
        None,
    );

    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("poller did not publish in time")
        .unwrap();

    {
        let snapshot = rx.borrow_and_update();
        assert!(snapshot.has_active_outage);
        assert_eq!(snapshot.dependencies, vec![Dependency::Cognito]);
    }

    cancel_token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_poller_stops_on_cancel() {
    let monitor = Arc::new(HealthMonitor::default());
    let cancel_token = CancellationToken::new();

    let (handle, _rx) = OutagePoller::new(monitor).start(cancel_token.clone());
    cancel_token.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller did not stop")
        .unwrap();
}
