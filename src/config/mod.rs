pub mod toml_config;

pub use toml_config::{ClientSettings, FareConfig, LoggingSettings, RetrySettings};

pub const DEFAULT_SERVICES_BASE_URL: &str = "https://services-api.ryanair.com/farfnd/v4/";
pub const DEFAULT_AVAILABILITY_BASE_URL: &str = "https://www.ryanair.com/api/booking/v4/";
