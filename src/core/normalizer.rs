//! Turns upstream JSON bodies into fare records.
//!
//! Shape problems surface as [`NormalizeError`]; they are never retried
//! since a second request would return the same structure. A currency other
//! than the one requested is only reported through [`Diagnostics`].

use crate::domain::model::{AvailableFlight, Endpoint, FareLeg, RoundTrip};
use crate::domain::ports::Diagnostics;
use crate::utils::error::NormalizeError;
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct FaresBody<T> {
    fares: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct OneWayFare {
    outbound: WireLeg,
}

#[derive(Debug, Deserialize)]
struct RoundTripFare {
    outbound: WireLeg,
    inbound: WireLeg,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLeg {
    departure_airport: WireAirport,
    arrival_airport: WireAirport,
    departure_date: String,
    price: WirePrice,
    flight_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAirport {
    iata_code: String,
    name: String,
    country_name: String,
}

impl WireAirport {
    fn into_endpoint(self) -> Endpoint {
        let display_name = format!("{}, {}", self.name, self.country_name);
        Endpoint::new(self.iata_code, display_name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePrice {
    value: Value,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
struct AvailabilityBody {
    #[serde(default)]
    currency: Option<String>,
    trips: Vec<WireTrip>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTrip {
    origin_name: String,
    destination_name: String,
    dates: Vec<WireTripDate>,
}

#[derive(Debug, Deserialize)]
struct WireTripDate {
    #[serde(default)]
    flights: Option<Vec<WireFlight>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireFlight {
    fares_left: i64,
    flight_number: String,
    time: Vec<String>,
    segments: Vec<WireSegment>,
    #[serde(default)]
    regular_fare: Option<WireRegularFare>,
}

#[derive(Debug, Deserialize)]
struct WireSegment {
    origin: String,
    destination: String,
}

#[derive(Debug, Deserialize)]
struct WireRegularFare {
    #[serde(default)]
    fares: Vec<WireFareAmount>,
}

#[derive(Debug, Deserialize)]
struct WireFareAmount {
    amount: Value,
}

pub struct ResponseNormalizer<'a> {
    expected_currency: Option<&'a str>,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ResponseNormalizer<'a> {
    /// An empty `expected_currency` disables the mismatch check.
    pub fn new(expected_currency: Option<&'a str>, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            expected_currency: expected_currency.filter(|c| !c.is_empty()),
            diagnostics,
        }
    }

    pub fn one_way(&self, body: Value) -> Result<Vec<FareLeg>, NormalizeError> {
        let body: FaresBody<OneWayFare> = serde_json::from_value(body)?;

        body.fares
            .unwrap_or_default()
            .into_iter()
            .map(|fare| self.leg(fare.outbound))
            .collect()
    }

    pub fn round_trip(&self, body: Value) -> Result<Vec<RoundTrip>, NormalizeError> {
        let body: FaresBody<RoundTripFare> = serde_json::from_value(body)?;

        body.fares
            .unwrap_or_default()
            .into_iter()
            .map(|fare| {
                let outbound = self.leg(fare.outbound)?;
                let inbound = self.leg(fare.inbound)?;
                Ok(RoundTrip::new(outbound, inbound))
            })
            .collect()
    }

    /// Normalizes the first trip and first date of an availability body.
    pub fn availability(&self, body: Value) -> Result<Vec<AvailableFlight>, NormalizeError> {
        let body: AvailabilityBody = serde_json::from_value(body)?;
        let currency = body.currency;

        let trip = body
            .trips
            .into_iter()
            .next()
            .ok_or_else(|| missing("trips[0]"))?;
        let origin_name = trip.origin_name;
        let destination_name = trip.destination_name;
        let day = trip
            .dates
            .into_iter()
            .next()
            .ok_or_else(|| missing("trips[0].dates[0]"))?;

        day.flights
            .unwrap_or_default()
            .into_iter()
            .map(|flight| {
                let departure = flight.time.first().ok_or_else(|| missing("time[0]"))?;
                let departure_time = parse_timestamp(departure)?;
                let segment = flight.segments.first().ok_or_else(|| missing("segments[0]"))?;
                let flight_number = normalize_flight_number(&flight.flight_number);

                let price = match flight.regular_fare.as_ref().and_then(|f| f.fares.first()) {
                    Some(fare) if flight.fares_left != 0 => Some(parse_price(&fare.amount)?),
                    _ => None,
                };

                if let Some(returned) = &currency {
                    self.check_currency(returned, &flight_number);
                }

                Ok(AvailableFlight {
                    departure_time,
                    flight_number,
                    price,
                    currency: currency.clone(),
                    fares_left: flight.fares_left,
                    origin: Endpoint::new(segment.origin.clone(), origin_name.clone()),
                    destination: Endpoint::new(
                        segment.destination.clone(),
                        destination_name.clone(),
                    ),
                })
            })
            .collect()
    }

    fn leg(&self, wire: WireLeg) -> Result<FareLeg, NormalizeError> {
        let departure_time = parse_timestamp(&wire.departure_date)?;
        let price = parse_price(&wire.price.value)?;
        let flight_number = normalize_flight_number(&wire.flight_number);

        let leg = FareLeg::new(
            departure_time,
            flight_number,
            price,
            wire.price.currency_code,
            wire.departure_airport.into_endpoint(),
            wire.arrival_airport.into_endpoint(),
        )?;

        self.check_currency(leg.currency(), leg.flight_number());
        Ok(leg)
    }

    fn check_currency(&self, returned: &str, flight_number: &str) {
        if let Some(expected) = self.expected_currency {
            if expected != returned {
                self.diagnostics
                    .currency_mismatch(expected, returned, flight_number);
            }
        }
    }
}

/// Splits a raw code such as `FR504` into carrier and number: `FR 504`.
/// Codes that already carry whitespace come out the same way.
pub fn normalize_flight_number(raw: &str) -> String {
    let compact: String = raw.split_whitespace().collect();
    let mut chars = compact.chars();
    let carrier: String = chars.by_ref().take(2).collect();
    let number: String = chars.collect();

    if number.is_empty() {
        carrier
    } else {
        format!("{} {}", carrier, number)
    }
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, NormalizeError> {
    raw.parse::<NaiveDateTime>()
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_local()))
        .map_err(|_| NormalizeError::InvalidTimestamp {
            value: raw.to_string(),
        })
}

fn parse_price(raw: &Value) -> Result<Decimal, NormalizeError> {
    let text = match raw {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        other => {
            return Err(NormalizeError::InvalidPrice {
                value: other.to_string(),
            })
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| NormalizeError::InvalidPrice { value: text })
}

fn missing(field: &str) -> NormalizeError {
    NormalizeError::MissingField {
        field: field.to_string(),
    }
}
