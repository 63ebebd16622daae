use crate::adapters::http::ReqwestSession;
use crate::config::{FareConfig, DEFAULT_AVAILABILITY_BASE_URL, DEFAULT_SERVICES_BASE_URL};
use crate::core::executor::QueryExecutor;
use crate::core::normalizer::ResponseNormalizer;
use crate::core::params::{self, AvailabilityOptions, DateArg, FareFilters, QueryParams};
use crate::core::retry::RetryPolicy;
use crate::domain::model::{AvailableFlight, FareLeg, QueryCounter, RoundTrip};
use crate::domain::ports::{Diagnostics, HttpSession};
use crate::utils::error::{ConfigError, FareError, NormalizeError};
use crate::utils::logger::TracingDiagnostics;
use crate::utils::validation::Validate;
use std::sync::Arc;

/// Fare search client.
///
/// Owns the session, the currency preference and the running count of HTTP
/// attempts. Errors from the session or from normalization are returned to
/// the caller; nothing is swallowed into an empty result.
pub struct FareClient<S: HttpSession> {
    currency: Option<String>,
    services_base_url: String,
    availability_base_url: String,
    executor: QueryExecutor<S>,
    counter: QueryCounter,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<S: HttpSession> FareClient<S> {
    /// A client with the default retry policy and `tracing` diagnostics.
    pub fn new(session: S, currency: impl Into<String>) -> Self {
        Self::builder(session).currency(currency).build()
    }

    pub fn builder(session: S) -> FareClientBuilder<S> {
        FareClientBuilder::new(session)
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// Physical HTTP attempts made so far, retries included.
    pub fn num_queries(&self) -> u64 {
        self.counter.get()
    }

    pub fn session(&self) -> &S {
        self.executor.session()
    }

    /// Cheapest one-way fares from `airport` departing between the two dates.
    pub async fn get_cheapest_flights(
        &self,
        airport: &str,
        date_from: impl Into<DateArg>,
        date_to: impl Into<DateArg>,
        filters: &FareFilters,
    ) -> Result<Vec<FareLeg>, FareError<S::Error>> {
        let url = join_url(&self.services_base_url, "oneWayFares");
        let params = params::one_way_params(
            airport,
            &date_from.into(),
            &date_to.into(),
            self.currency(),
            filters,
        );

        let body = self.query(&url, &params).await?;
        let legs = self
            .normalizer()
            .one_way(body)
            .map_err(|source| malformed(&url, source))?;

        tracing::debug!("Found {} one-way fares from {}", legs.len(), airport);
        Ok(legs)
    }

    /// Cheapest round trips from `airport`, outbound between `date_from` and
    /// `date_to`, returning between `return_date_from` and `return_date_to`.
    pub async fn get_cheapest_return_flights(
        &self,
        airport: &str,
        date_from: impl Into<DateArg>,
        date_to: impl Into<DateArg>,
        return_date_from: impl Into<DateArg>,
        return_date_to: impl Into<DateArg>,
        filters: &FareFilters,
    ) -> Result<Vec<RoundTrip>, FareError<S::Error>> {
        let url = join_url(&self.services_base_url, "roundTripFares");
        let params = params::round_trip_params(
            airport,
            &date_from.into(),
            &date_to.into(),
            &return_date_from.into(),
            &return_date_to.into(),
            self.currency(),
            filters,
        );

        let body = self.query(&url, &params).await?;
        let trips = self
            .normalizer()
            .round_trip(body)
            .map_err(|source| malformed(&url, source))?;

        tracing::debug!("Found {} round trips from {}", trips.len(), airport);
        Ok(trips)
    }

    /// Every flight between two airports on one day, including sold-out ones.
    pub async fn get_all_flights(
        &self,
        origin: &str,
        destination: &str,
        date: impl Into<DateArg>,
        options: &AvailabilityOptions,
    ) -> Result<Vec<AvailableFlight>, FareError<S::Error>> {
        let path = format!("{}/availability", options.locale);
        let url = join_url(&self.availability_base_url, &path);
        let params = params::availability_params(origin, destination, &date.into(), options);

        let body = self.query(&url, &params).await?;
        let flights = self
            .normalizer()
            .availability(body)
            .map_err(|source| malformed(&url, source))?;

        tracing::debug!(
            "Found {} flights from {} to {}",
            flights.len(),
            origin,
            destination
        );
        Ok(flights)
    }

    async fn query(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, FareError<S::Error>> {
        self.executor
            .execute(url, params, &self.counter)
            .await
            .map_err(FareError::Transport)
    }

    fn normalizer(&self) -> ResponseNormalizer<'_> {
        ResponseNormalizer::new(self.currency(), self.diagnostics.as_ref())
    }
}

impl FareClient<ReqwestSession> {
    /// Builds a `reqwest`-backed client from a validated configuration.
    pub fn from_config(config: &FareConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = ReqwestSession::from_settings(&config.client)?;

        Ok(Self::builder(session)
            .currency(config.client.currency.clone())
            .services_base_url(config.client.services_base_url.clone())
            .availability_base_url(config.client.availability_base_url.clone())
            .retry_policy(RetryPolicy::from_settings(&config.retry))
            .build())
    }
}

pub struct FareClientBuilder<S: HttpSession> {
    session: S,
    currency: Option<String>,
    services_base_url: String,
    availability_base_url: String,
    policy: RetryPolicy,
    diagnostics: Arc<dyn Diagnostics>,
    retry_if: Option<Box<dyn Fn(&S::Error) -> bool + Send + Sync>>,
}

impl<S: HttpSession> FareClientBuilder<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            currency: None,
            services_base_url: DEFAULT_SERVICES_BASE_URL.to_string(),
            availability_base_url: DEFAULT_AVAILABILITY_BASE_URL.to_string(),
            policy: RetryPolicy::default(),
            diagnostics: Arc::new(TracingDiagnostics),
            retry_if: None,
        }
    }

    /// Currency to request fares in. An empty string leaves it to upstream.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        self.currency = (!currency.is_empty()).then_some(currency);
        self
    }

    pub fn services_base_url(mut self, url: impl Into<String>) -> Self {
        self.services_base_url = url.into();
        self
    }

    pub fn availability_base_url(mut self, url: impl Into<String>) -> Self {
        self.availability_base_url = url.into();
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn retry_if(
        mut self,
        predicate: impl Fn(&S::Error) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.retry_if = Some(Box::new(predicate));
        self
    }

    pub fn diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn build(self) -> FareClient<S> {
        let mut executor =
            QueryExecutor::new(self.session, self.policy, self.diagnostics.clone());
        if let Some(predicate) = self.retry_if {
            executor = executor.with_retry_predicate(predicate);
        }

        FareClient {
            currency: self.currency,
            services_base_url: self.services_base_url,
            availability_base_url: self.availability_base_url,
            executor,
            counter: QueryCounter::new(),
            diagnostics: self.diagnostics,
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn malformed<E: std::error::Error + 'static>(url: &str, source: NormalizeError) -> FareError<E> {
    FareError::MalformedResponse {
        endpoint: url.to_string(),
        source,
    }
}
