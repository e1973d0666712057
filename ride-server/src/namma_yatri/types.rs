//! Namma Yatri API request and response bodies.
//!
//! Requests are built from domain types. Responses are forwarded to callers
//! verbatim as JSON, so only the few fields the client acts on are typed
//! here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BookingStatus, Location};

/// Body of `POST /v2/auth/get-token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenRequest<'a> {
    pub mobile_number: &'a str,
    pub mobile_country_code: &'a str,
}

/// Body of `POST /v2/auth/verify-token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenRequest<'a> {
    pub otp: &'a str,
    pub device_token: &'a str,
    pub whatsapp_notification_enroll: &'static str,
}

/// Body of `POST /v2/maps/autoComplete`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest<'a> {
    pub input: &'a str,
    /// `"<lat>,<lon>"` to bias results around.
    pub location: String,
    /// Meters.
    pub radius: u32,
    pub language: &'static str,
}

/// Body of `POST /v2/rideSearch`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideSearchRequest<'a> {
    pub start_location: SearchLocation<'a>,
    pub end_location: SearchLocation<'a>,
}

#[derive(Debug, Serialize)]
pub struct SearchLocation<'a> {
    pub gps: Gps,
    pub address: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Gps {
    pub lat: f64,
    pub lon: f64,
}

impl<'a> From<&'a Location> for SearchLocation<'a> {
    fn from(loc: &'a Location) -> Self {
        Self {
            gps: Gps {
                lat: loc.lat,
                lon: loc.lon,
            },
            address: &loc.address,
        }
    }
}

/// Body of `POST /v2/estimate/{id}/select2`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectEstimateRequest {
    pub customer_extra_fee: f64,
    pub auto_assign_enabled: bool,
}

/// Body of `POST /v2/booking/{id}/cancel`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest<'a> {
    pub reason_code: &'static str,
    pub additional_info: &'a str,
}

/// Fields read from a ride search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAccepted {
    pub search_id: String,
}

/// Fields read from a search results response.
///
/// Estimates are kept raw so one unreadable entry can be skipped without
/// losing the rest.
#[derive(Debug, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub estimates: Option<Vec<Value>>,
}

/// Fields read from an estimate selection response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionAccepted {
    pub booking_id: String,
}

/// Fields read from a booking status response.
#[derive(Debug, Deserialize)]
pub struct StatusSnapshot {
    /// Missing or null when the aggregator reports status some other way.
    #[serde(default)]
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ride_search_body_shape() {
        let pickup = Location::new(13.1986, 77.7066, "Kempegowda International Airport");
        let drop = Location::new(12.9716, 77.5946, "MG Road");
        let body = RideSearchRequest {
            start_location: (&pickup).into(),
            end_location: (&drop).into(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["startLocation"]["gps"]["lat"], 13.1986);
        assert_eq!(value["endLocation"]["address"], "MG Road");
    }

    #[test]
    fn search_results_default_to_empty() {
        let results: SearchResults = serde_json::from_str("{}").unwrap();
        assert!(results.estimates.is_none());
        let results: SearchResults = serde_json::from_str(r#"{"estimates": null}"#).unwrap();
        assert!(results.estimates.is_none());
    }

    #[test]
    fn status_may_be_absent() {
        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"bookingStatus": "TRIP_ASSIGNED"}"#).unwrap();
        assert!(snapshot.status.is_none());

        let snapshot: StatusSnapshot = serde_json::from_str(r#"{"status": "INPROGRESS"}"#).unwrap();
        assert_eq!(snapshot.status, Some(BookingStatus::InProgress));
    }

    #[test]
    fn cancel_body_shape() {
        let body = CancelRequest {
            reason_code: "CUSTOMER_CANCELLED",
            additional_info: "Changed plans",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["reasonCode"], "CUSTOMER_CANCELLED");
        assert_eq!(value["additionalInfo"], "Changed plans");
    }
}
