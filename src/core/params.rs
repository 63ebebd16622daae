//! Query-parameter construction for the fare and availability endpoints.
//!
//! Builders here are pure: they turn caller input into a flat
//! [`QueryParams`] map and never touch the network.

pub use crate::domain::model::QueryParams;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// A date argument in any of the accepted forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateArg {
    /// Already formatted; sent verbatim.
    Formatted(String),
    Date(NaiveDate),
    /// Only the date component is used.
    DateTime(NaiveDateTime),
}

impl DateArg {
    pub fn to_api_string(&self) -> String {
        match self {
            DateArg::Formatted(value) => value.clone(),
            DateArg::Date(date) => date.format("%Y-%m-%d").to_string(),
            DateArg::DateTime(date_time) => date_time.date().format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for DateArg {
    fn from(value: &str) -> Self {
        DateArg::Formatted(value.to_string())
    }
}

impl From<String> for DateArg {
    fn from(value: String) -> Self {
        DateArg::Formatted(value)
    }
}

impl From<NaiveDate> for DateArg {
    fn from(value: NaiveDate) -> Self {
        DateArg::Date(value)
    }
}

impl From<NaiveDateTime> for DateArg {
    fn from(value: NaiveDateTime) -> Self {
        DateArg::DateTime(value)
    }
}

/// A time-of-day argument, either pre-formatted `HH:MM` or a time value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeArg {
    Formatted(String),
    Time(NaiveTime),
}

impl TimeArg {
    pub fn to_api_string(&self) -> String {
        match self {
            TimeArg::Formatted(value) => value.clone(),
            TimeArg::Time(time) => time.format("%H:%M").to_string(),
        }
    }
}

impl From<&str> for TimeArg {
    fn from(value: &str) -> Self {
        TimeArg::Formatted(value.to_string())
    }
}

impl From<String> for TimeArg {
    fn from(value: String) -> Self {
        TimeArg::Formatted(value)
    }
}

impl From<NaiveTime> for TimeArg {
    fn from(value: NaiveTime) -> Self {
        TimeArg::Time(value)
    }
}

/// Departure-time window for one leg. Defaults to the whole day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: TimeArg,
    pub to: TimeArg,
}

impl TimeWindow {
    pub fn new(from: impl Into<TimeArg>, to: impl Into<TimeArg>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::new("00:00", "23:59")
    }
}

/// Optional narrowing for the cheapest-fare searches.
///
/// `inbound_times` only applies to round-trip searches. Entries in
/// `custom_params` are merged last and replace any computed parameter with
/// the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FareFilters {
    pub destination_country: Option<String>,
    pub destination_airport: Option<String>,
    pub max_price: Option<Decimal>,
    pub outbound_times: TimeWindow,
    pub inbound_times: TimeWindow,
    pub custom_params: QueryParams,
}

impl FareFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination_country(mut self, country_code: impl Into<String>) -> Self {
        self.destination_country = Some(country_code.into());
        self
    }

    pub fn destination_airport(mut self, iata_code: impl Into<String>) -> Self {
        self.destination_airport = Some(iata_code.into());
        self
    }

    pub fn max_price(mut self, price: Decimal) -> Self {
        self.max_price = Some(price);
        self
    }

    pub fn outbound_times(mut self, from: impl Into<TimeArg>, to: impl Into<TimeArg>) -> Self {
        self.outbound_times = TimeWindow::new(from, to);
        self
    }

    pub fn inbound_times(mut self, from: impl Into<TimeArg>, to: impl Into<TimeArg>) -> Self {
        self.inbound_times = TimeWindow::new(from, to);
        self
    }

    pub fn custom_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_params.insert(key.into(), value.into());
        self
    }
}

/// Options for the day-availability listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityOptions {
    pub locale: String,
    pub origin_is_mac: bool,
    pub destination_is_mac: bool,
    pub custom_params: QueryParams,
}

impl Default for AvailabilityOptions {
    fn default() -> Self {
        Self {
            locale: "en-ie".to_string(),
            origin_is_mac: false,
            destination_is_mac: false,
            custom_params: QueryParams::new(),
        }
    }
}

impl AvailabilityOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn origin_is_mac(mut self, is_mac: bool) -> Self {
        self.origin_is_mac = is_mac;
        self
    }

    pub fn destination_is_mac(mut self, is_mac: bool) -> Self {
        self.destination_is_mac = is_mac;
        self
    }

    pub fn custom_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_params.insert(key.into(), value.into());
        self
    }
}

pub fn one_way_params(
    airport: &str,
    date_from: &DateArg,
    date_to: &DateArg,
    currency: Option<&str>,
    filters: &FareFilters,
) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("departureAirportIataCode".to_string(), airport.to_string());
    params.insert(
        "outboundDepartureDateFrom".to_string(),
        date_from.to_api_string(),
    );
    params.insert("outboundDepartureDateTo".to_string(), date_to.to_api_string());
    params.insert(
        "outboundDepartureTimeFrom".to_string(),
        filters.outbound_times.from.to_api_string(),
    );
    params.insert(
        "outboundDepartureTimeTo".to_string(),
        filters.outbound_times.to.to_api_string(),
    );

    insert_shared_filters(&mut params, currency, filters);
    merge_custom(params, &filters.custom_params)
}

#[allow(clippy::too_many_arguments)]
pub fn round_trip_params(
    airport: &str,
    date_from: &DateArg,
    date_to: &DateArg,
    return_date_from: &DateArg,
    return_date_to: &DateArg,
    currency: Option<&str>,
    filters: &FareFilters,
) -> QueryParams {
    // Start from the one-way set without its custom entries, so the merge
    // below runs after every computed key is in place.
    let outbound_only = FareFilters {
        custom_params: QueryParams::new(),
        ..filters.clone()
    };
    let mut params = one_way_params(airport, date_from, date_to, currency, &outbound_only);

    params.insert(
        "inboundDepartureDateFrom".to_string(),
        return_date_from.to_api_string(),
    );
    params.insert(
        "inboundDepartureDateTo".to_string(),
        return_date_to.to_api_string(),
    );
    params.insert(
        "inboundDepartureTimeFrom".to_string(),
        filters.inbound_times.from.to_api_string(),
    );
    params.insert(
        "inboundDepartureTimeTo".to_string(),
        filters.inbound_times.to.to_api_string(),
    );

    merge_custom(params, &filters.custom_params)
}

pub fn availability_params(
    origin: &str,
    destination: &str,
    date: &DateArg,
    options: &AvailabilityOptions,
) -> QueryParams {
    let mut params = QueryParams::new();
    // One adult only.
    params.insert("ADT".to_string(), "1".to_string());
    params.insert("TEEN".to_string(), "0".to_string());
    params.insert("CHD".to_string(), "0".to_string());
    params.insert("INF".to_string(), "0".to_string());

    params.insert("DateOut".to_string(), date.to_api_string());
    params.insert("DateIn".to_string(), String::new());

    params.insert("Origin".to_string(), origin.to_string());
    params.insert("Destination".to_string(), destination.to_string());
    params.insert("OriginIsMac".to_string(), options.origin_is_mac.to_string());
    params.insert(
        "DestinationIsMac".to_string(),
        options.destination_is_mac.to_string(),
    );

    params.insert("IncludeConnectingFlights".to_string(), "false".to_string());
    params.insert("ToUs".to_string(), "AGREED".to_string());

    merge_custom(params, &options.custom_params)
}

fn insert_shared_filters(params: &mut QueryParams, currency: Option<&str>, filters: &FareFilters) {
    if let Some(currency) = currency.filter(|c| !c.is_empty()) {
        params.insert("currency".to_string(), currency.to_string());
    }
    if let Some(country) = &filters.destination_country {
        params.insert("arrivalCountryCode".to_string(), country.clone());
    }
    if let Some(max_price) = filters.max_price {
        params.insert("priceValueTo".to_string(), max_price.to_string());
    }
    if let Some(airport) = &filters.destination_airport {
        params.insert("arrivalAirportIataCode".to_string(), airport.clone());
    }
}

fn merge_custom(mut params: QueryParams, custom: &QueryParams) -> QueryParams {
    for (key, value) in custom {
        params.insert(key.clone(), value.clone());
    }
    params
}
