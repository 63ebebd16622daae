#![allow(dead_code)]

use async_trait::async_trait;
use farefind::{Diagnostics, HttpSession, QueryParams};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub fn airport(code: &str, name: &str, country: &str) -> Value {
    json!({
        "countryName": country,
        "iataCode": code,
        "name": name,
        "seoName": name.to_lowercase(),
        "city": {"name": name, "code": name.to_uppercase(), "countryCode": "ie"}
    })
}

pub fn leg(
    from: Value,
    to: Value,
    departure: &str,
    price: f64,
    currency: &str,
    flight_number: &str,
) -> Value {
    json!({
        "departureAirport": from,
        "arrivalAirport": to,
        "departureDate": departure,
        "arrivalDate": departure,
        "price": {
            "value": price,
            "valueMainUnit": price.trunc().to_string(),
            "currencyCode": currency,
            "currencySymbol": "€"
        },
        "flightNumber": flight_number,
        "previousPrice": null,
        "priceUpdated": 1692686097000u64
    })
}

pub fn one_way_response(currency: &str) -> Value {
    let dub = airport("DUB", "Dublin", "Ireland");
    json!({
        "arrivalAirportCategories": null,
        "fares": [
            {
                "outbound": leg(dub.clone(), airport("BRS", "Bristol", "United Kingdom"),
                    "2023-08-23T08:20:00", 17.68, currency, "FR504"),
                "summary": {"price": {"value": 17.68, "currencyCode": currency}, "newRoute": false}
            },
            {
                "outbound": leg(dub, airport("EDI", "Edinburgh", "United Kingdom"),
                    "2023-08-23T06:30:00", 17.68, currency, "FR812"),
                "summary": {"price": {"value": 17.68, "currencyCode": currency}, "newRoute": false}
            }
        ],
        "nextPage": null,
        "size": 2
    })
}

pub fn return_response() -> Value {
    let dub = airport("DUB", "Dublin", "Ireland");
    let lba = airport("LBA", "Leeds Bradford", "United Kingdom");
    let lpl = airport("LPL", "Liverpool", "United Kingdom");
    json!({
        "arrivalAirportCategories": null,
        "fares": [
            {
                "outbound": leg(dub.clone(), lba.clone(), "2023-08-23T06:25:00", 17.59, "EUR", "FR152"),
                "inbound": leg(lba, dub.clone(), "2023-08-24T20:20:00", 18.76, "EUR", "FR456"),
                "summary": {"price": {"value": 36.35, "currencyCode": "EUR"}, "tripDurationDays": 1}
            },
            {
                "outbound": leg(dub.clone(), lpl.clone(), "2023-08-23T15:20:00", 20.6, "EUR", "FR448"),
                "inbound": leg(lpl, dub, "2023-08-24T21:20:00", 18.51, "EUR", "FR447"),
                "summary": {"price": {"value": 39.11, "currencyCode": "EUR"}, "tripDurationDays": 1}
            }
        ],
        "nextPage": null,
        "size": 2
    })
}

pub fn availability_response() -> Value {
    json!({
        "termsOfUse": "https://www.ryanair.com/ie/en/corporate/terms-of-use",
        "currency": "EUR",
        "currPrecision": 2,
        "trips": [{
            "origin": "DUB",
            "originName": "Dublin",
            "destination": "STN",
            "destinationName": "London Stansted",
            "dates": [{
                "dateOut": "2023-09-01T00:00:00.000",
                "flights": [
                    {
                        "faresLeft": 3,
                        "flightNumber": "FR 202",
                        "time": ["2023-09-01T06:00:00.000", "2023-09-01T07:20:00.000"],
                        "segments": [{"origin": "DUB", "destination": "STN", "flightNumber": "FR 202"}],
                        "regularFare": {"fareKey": "X", "fares": [{"type": "ADT", "amount": 25.99, "count": 1}]}
                    },
                    {
                        "faresLeft": 0,
                        "flightNumber": "FR 206",
                        "time": ["2023-09-01T09:15:00.000", "2023-09-01T10:35:00.000"],
                        "segments": [{"origin": "DUB", "destination": "STN", "flightNumber": "FR 206"}],
                        "regularFare": {"fareKey": "Y", "fares": [{"type": "ADT", "amount": 54.99, "count": 1}]}
                    }
                ]
            }]
        }]
    })
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum FakeError {
    #[error("connection reset on call {0}")]
    ConnectionReset(usize),
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Replays canned replies in order and records every request it receives.
pub struct ScriptedSession {
    replies: Mutex<VecDeque<Result<Value, FakeError>>>,
    requests: Mutex<Vec<(String, QueryParams)>>,
}

impl ScriptedSession {
    pub fn new(replies: Vec<Result<Value, FakeError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// `failures` connection resets followed by `body`.
    pub fn failing_then(failures: usize, body: Value) -> Self {
        let mut replies: Vec<Result<Value, FakeError>> = (1..=failures)
            .map(|call| Err(FakeError::ConnectionReset(call)))
            .collect();
        replies.push(Ok(body));
        Self::new(replies)
    }

    pub fn requests(&self) -> Vec<(String, QueryParams)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSession for ScriptedSession {
    type Error = FakeError;

    async fn get_json(&self, url: &str, params: &QueryParams) -> Result<Value, FakeError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push((url.to_string(), params.clone()));
            requests.len()
        };
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FakeError::ConnectionReset(call)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Retrying { attempt: u32, delay: Duration },
    GaveUp { attempts: u32, error: String },
    CurrencyMismatch { expected: String, returned: String, flight_number: String },
}

#[derive(Default)]
pub struct RecordingDiagnostics {
    events: Mutex<Vec<Event>>,
}

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn mismatches(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, Event::CurrencyMismatch { .. }))
            .collect()
    }

    pub fn retries(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Retrying { .. }))
            .count()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn retrying(
        &self,
        _url: &str,
        attempt: u32,
        delay: Duration,
        _error: &(dyn std::error::Error + 'static),
    ) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Retrying { attempt, delay });
    }

    fn gave_up(&self, _url: &str, attempts: u32, error: &(dyn std::error::Error + 'static)) {
        self.events.lock().unwrap().push(Event::GaveUp {
            attempts,
            error: error.to_string(),
        });
    }

    fn currency_mismatch(&self, expected: &str, returned: &str, flight_number: &str) {
        self.events.lock().unwrap().push(Event::CurrencyMismatch {
            expected: expected.to_string(),
            returned: returned.to_string(),
            flight_number: flight_number.to_string(),
        });
    }
}
