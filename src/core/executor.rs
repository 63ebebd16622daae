use crate::core::params::QueryParams;
use crate::core::retry::RetryPolicy;
use crate::domain::model::QueryCounter;
use crate::domain::ports::{Diagnostics, HttpSession};
use std::sync::Arc;

type RetryPredicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// Runs a query through the session, retrying failed attempts according to
/// the [`RetryPolicy`].
///
/// Every attempt is recorded on the caller's [`QueryCounter`], successful or
/// not. When the last permitted attempt fails, its error is returned as-is.
pub struct QueryExecutor<S: HttpSession> {
    session: S,
    policy: RetryPolicy,
    retry_if: RetryPredicate<S::Error>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<S: HttpSession> QueryExecutor<S> {
    pub fn new(session: S, policy: RetryPolicy, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            session,
            policy,
            retry_if: Box::new(|_| true),
            diagnostics,
        }
    }

    /// Only errors for which `predicate` returns true are retried. By default
    /// every failure is.
    pub fn with_retry_predicate(
        mut self,
        predicate: impl Fn(&S::Error) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_if = Box::new(predicate);
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn execute(
        &self,
        url: &str,
        params: &QueryParams,
        counter: &QueryCounter,
    ) -> Result<serde_json::Value, S::Error> {
        let mut attempt = 1;

        loop {
            tracing::debug!("Querying {} (attempt {})", url, attempt);
            let outcome = self.session.get_json(url, params).await;
            counter.record_attempt();

            let error = match outcome {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };

            if attempt >= self.policy.max_attempts() || !(self.retry_if)(&error) {
                self.diagnostics.gave_up(url, attempt, &error);
                return Err(error);
            }

            let delay = self.policy.delay_for_attempt(attempt);
            self.diagnostics.retrying(url, attempt, delay, &error);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
