use crate::domain::model::QueryParams;
use async_trait::async_trait;
use std::time::Duration;

/// A pre-authenticated HTTP client able to issue a GET and decode JSON.
///
/// Implementations must fail on non-2xx statuses and on bodies that are not
/// JSON. Whatever `Error` they produce is what callers eventually see.
#[async_trait]
pub trait HttpSession: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn get_json(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, Self::Error>;
}

/// Receives the events worth reporting while querying fares.
pub trait Diagnostics: Send + Sync {
    /// An attempt failed and another one follows after `delay`.
    fn retrying(
        &self,
        url: &str,
        attempt: u32,
        delay: Duration,
        error: &(dyn std::error::Error + 'static),
    );

    /// The last permitted attempt failed.
    fn gave_up(&self, url: &str, attempts: u32, error: &(dyn std::error::Error + 'static));

    /// Upstream priced a flight in a different currency than requested.
    fn currency_mismatch(&self, expected: &str, returned: &str, flight_number: &str);
}
