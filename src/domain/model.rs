use crate::utils::error::InvalidFare;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Flat query-string parameters, sent in key order.
pub type QueryParams = BTreeMap<String, String>;

/// One end of a flight: the airport code plus its "City, Country" label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub iata_code: String,
    pub display_name: String,
}

impl Endpoint {
    pub fn new(iata_code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            iata_code: iata_code.into(),
            display_name: display_name.into(),
        }
    }
}

/// A single priced flight segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FareLeg {
    departure_time: NaiveDateTime,
    flight_number: String,
    price: Decimal,
    currency: String,
    origin: Endpoint,
    destination: Endpoint,
}

impl FareLeg {
    /// Builds a leg, rejecting negative prices and legs that go nowhere.
    pub fn new(
        departure_time: NaiveDateTime,
        flight_number: impl Into<String>,
        price: Decimal,
        currency: impl Into<String>,
        origin: Endpoint,
        destination: Endpoint,
    ) -> Result<Self, InvalidFare> {
        let flight_number = flight_number.into();

        if price < Decimal::ZERO {
            return Err(InvalidFare::NegativePrice {
                flight_number,
                price: price.to_string(),
            });
        }
        if origin.iata_code == destination.iata_code {
            return Err(InvalidFare::SameOriginAndDestination {
                flight_number,
                iata_code: origin.iata_code,
            });
        }

        Ok(Self {
            departure_time,
            flight_number,
            price,
            currency: currency.into(),
            origin,
            destination,
        })
    }

    pub fn departure_time(&self) -> NaiveDateTime {
        self.departure_time
    }

    pub fn flight_number(&self) -> &str {
        &self.flight_number
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn origin(&self) -> &str {
        &self.origin.iata_code
    }

    pub fn origin_full(&self) -> &str {
        &self.origin.display_name
    }

    pub fn destination(&self) -> &str {
        &self.destination.iata_code
    }

    pub fn destination_full(&self) -> &str {
        &self.destination.display_name
    }
}

/// An outbound/inbound pair with the summed price.
///
/// Legs are assumed to share a currency; the total is a plain sum and no
/// conversion is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundTrip {
    total_price: Decimal,
    outbound: FareLeg,
    inbound: FareLeg,
}

impl RoundTrip {
    pub fn new(outbound: FareLeg, inbound: FareLeg) -> Self {
        Self {
            total_price: outbound.price + inbound.price,
            outbound,
            inbound,
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn outbound(&self) -> &FareLeg {
        &self.outbound
    }

    pub fn inbound(&self) -> &FareLeg {
        &self.inbound
    }

    pub fn into_legs(self) -> (FareLeg, FareLeg) {
        (self.outbound, self.inbound)
    }
}

/// A flight from the day-availability listing. `price` is `None` when the
/// flight is sold out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableFlight {
    pub departure_time: NaiveDateTime,
    pub flight_number: String,
    pub price: Option<Decimal>,
    /// Absent when upstream does not state the body currency.
    pub currency: Option<String>,
    pub fares_left: i64,
    pub origin: Endpoint,
    pub destination: Endpoint,
}

impl AvailableFlight {
    pub fn is_sold_out(&self) -> bool {
        self.price.is_none()
    }
}

/// Running count of physical HTTP attempts, retries included.
#[derive(Debug, Default)]
pub struct QueryCounter {
    attempts: AtomicU64,
}

impl QueryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}
