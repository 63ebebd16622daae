pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::ReqwestSession;
pub use config::FareConfig;
pub use crate::core::{
    client::{FareClient, FareClientBuilder},
    params::{AvailabilityOptions, DateArg, FareFilters, QueryParams, TimeArg, TimeWindow},
    retry::{BackoffStrategy, ConstantBackoff, ExponentialBackoff, RetryPolicy},
};
pub use domain::model::{AvailableFlight, Endpoint, FareLeg, QueryCounter, RoundTrip};
pub use domain::ports::{Diagnostics, HttpSession};
pub use utils::error::{ConfigError, FareError, InvalidFare, NormalizeError};
pub use utils::logger::{init_from_settings, TracingDiagnostics};
