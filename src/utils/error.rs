use thiserror::Error;

/// Error returned by the fare queries.
///
/// `E` is the error type of the [`HttpSession`](crate::domain::ports::HttpSession)
/// the client was built with. Transport failures are handed back exactly as
/// the session produced them, so a `reqwest`-backed client can still tell a
/// refused connection (`is_connect()`) from a bad status (`is_status()`).
#[derive(Error, Debug)]
pub enum FareError<E: std::error::Error + 'static = reqwest::Error> {
    #[error("Fare query failed")]
    Transport(#[source] E),

    #[error("Malformed response from {endpoint}: {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: NormalizeError,
    },
}

impl<E: std::error::Error + 'static> FareError<E> {
    /// The transport error, if the query never got a usable response.
    pub fn transport(&self) -> Option<&E> {
        match self {
            FareError::Transport(error) => Some(error),
            FareError::MalformedResponse { .. } => None,
        }
    }

    pub fn is_malformed_response(&self) -> bool {
        matches!(self, FareError::MalformedResponse { .. })
    }
}

/// A response body that decoded as JSON but does not have the expected shape.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("missing field: {field}")]
    MissingField { field: String },

    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    #[error("invalid price: {value}")]
    InvalidPrice { value: String },

    #[error(transparent)]
    InvalidFare(#[from] InvalidFare),
}

/// A fare value that breaks one of the record invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidFare {
    #[error("negative price {price} on flight {flight_number}")]
    NegativePrice { flight_number: String, price: String },

    #[error("origin and destination are both {iata_code} on flight {flight_number}")]
    SameOriginAndDestination {
        flight_number: String,
        iata_code: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parsing error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("HTTP client setup failed: {0}")]
    HttpClientError(#[from] reqwest::Error),
}
