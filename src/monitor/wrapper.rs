//! Call wrapper that records the outcome of dependency calls.

use super::error::{HealthAnnotation, ObservedError};
use super::state::Dependency;
use super::HealthMonitor;
use std::future::Future;

impl HealthMonitor {
    /// Run `operation` against `dependency` and record its outcome.
    ///
    /// On success the value is returned untouched after
    /// [`record_success`](Self::record_success). On failure the error is
    /// recorded, annotated with the dependency and the classified status, and
    /// returned as the same value. Errors are never swallowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use healthwatch::monitor::{Dependency, HealthMonitor, ServiceError, ServiceStatus};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let monitor = HealthMonitor::default();
    ///
    /// let result: Result<(), ServiceError> = monitor
    ///     .monitored(Dependency::S3, Some("us-east-1"), || async {
    ///         Err(ServiceError::new("Service Unavailable"))
    ///     })
    ///     .await;
    ///
    /// let err = result.unwrap_err();
    /// assert_eq!(err.health().unwrap().service_status, ServiceStatus::Down);
    /// # });
    /// ```
    pub async fn monitored<T, E, F, Fut>(
        &self,
        dependency: Dependency,
        region: Option<&str>,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ObservedError,
    {
        match operation().await {
            Ok(value) => {
                self.record_success(dependency, region);
                Ok(value)
            }
            Err(mut error) => {
                let status = self.record_error(dependency, &error, region);
                error.annotate(HealthAnnotation {
                    service: dependency,
                    service_status: status,
                });
                Err(error)
            }
        }
    }
}
