//! Data transfer objects for web requests and responses.
//!
//! Request fields are all optional so that a missing field produces our own
//! `"... are required"` message instead of a deserialization error. Optional
//! numbers are read leniently: a numeric string is accepted, and anything
//! unreadable falls back to the default.

use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::Location;

/// Request to dispatch an OTP.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub mobile_number: Option<String>,
    pub country_code: Option<String>,
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<String>,
}

/// Request to verify an OTP.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub otp: Option<String>,
    pub device_token: Option<String>,
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<String>,
}

/// Request for place suggestions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteRequest {
    pub search_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lon: Option<f64>,
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<String>,
}

/// Request to search for rides, or to search and book in one go.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub pickup: Option<Location>,
    pub dropoff: Option<Location>,
    /// Milliseconds to wait for estimates (book-complete only)
    #[serde(default, deserialize_with = "lenient_number")]
    pub wait_time: Option<u64>,
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<String>,
}

/// Request to book an estimate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub estimate_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub extra_fee: Option<f64>,
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<String>,
}

/// Request to cancel a booking.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub booking_id: Option<String>,
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<String>,
}

/// Query string carrying only the user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

/// Query string for status polling.
///
/// Numbers are kept as text and read leniently: anything that doesn't start
/// with a positive integer means "use the default".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollQuery {
    pub user_id: Option<String>,
    pub max_attempts: Option<String>,
    pub interval: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Service banner served at `/`.
#[derive(Debug, Serialize)]
pub struct Banner {
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub rides: &'static [&'static str],
}

/// The value of a text field, treating an empty string as missing.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Leading decimal digits of `raw` as a positive number.
///
/// `"10"` and `"10ms"` both give 10; `""`, `"abc"` and `"0"` give `None`.
pub fn leading_positive(raw: Option<&str>) -> Option<u64> {
    let raw = raw?.trim_start();
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok().filter(|n| *n > 0)
}

/// Accept `userId` as either a string or a number.
fn user_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => Some(s),
        Some(Raw::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

/// A number given either as a JSON number or as numeric text. Anything else
/// reads as absent.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n.to_string().parse().ok(),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}
