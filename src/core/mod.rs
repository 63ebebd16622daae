pub mod client;
pub mod executor;
pub mod normalizer;
pub mod params;
pub mod retry;

pub use crate::domain::model::{AvailableFlight, Endpoint, FareLeg, QueryCounter, RoundTrip};
pub use crate::domain::ports::{Diagnostics, HttpSession};
pub use crate::utils::error::FareError;
