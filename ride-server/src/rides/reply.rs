//! Successful operation results and the response envelope.
//!
//! Each operation has its own reply type carrying the convenience fields
//! callers rely on (`searchId`, `estimates`, `status`, ...) next to the raw
//! aggregator payload in `data`. [`Envelope`] wraps a `Result` into the
//! `{success, error?, ...}` shape the frontend expects.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{BookingId, BookingStatus, Estimate, SearchId, SessionToken};

use super::error::RideError;

fn is_false(b: &bool) -> bool {
    !*b
}

/// An OTP was dispatched (or simulated).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSent {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    /// `{authId, attempts, ...}`
    pub data: Value,
}

/// An OTP was accepted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerified {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<SessionToken>,
    pub data: Value,
}

/// Place suggestions.
#[derive(Debug, Clone, Serialize)]
pub struct Places {
    pub data: Value,
}

/// A ride search was started.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStarted {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    pub search_id: SearchId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Estimates collected for a search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateList {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    pub estimates: Vec<Estimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// An estimate was accepted and a booking created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPlaced {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    pub booking_id: BookingId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A booking's current status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingState {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    pub status: BookingStatus,
    pub data: Value,
}

/// A booking was cancelled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
    #[serde(skip_serializing_if = "is_false")]
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Uniform `{success, error?, ...reply}` response body.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub reply: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl<T> Envelope<T> {
    pub fn ok(reply: T) -> Self {
        Self {
            success: true,
            reply: Some(reply),
            error: None,
        }
    }

    pub fn failed(error: &RideError) -> Self {
        Self {
            success: false,
            reply: None,
            error: Some(error.payload()),
        }
    }
}

impl<T> From<Result<T, RideError>> for Envelope<T> {
    fn from(result: Result<T, RideError>) -> Self {
        match result {
            Ok(reply) => Self::ok(reply),
            Err(e) => Self::failed(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_flattens_reply() {
        let reply = SearchStarted {
            simulated: true,
            search_id: SearchId::Simulated("sim_search_ab12c".into()),
            data: None,
        };
        let value = serde_json::to_value(Envelope::ok(reply)).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "simulated": true, "searchId": "sim_search_ab12c"})
        );
    }

    #[test]
    fn live_reply_omits_simulated_flag() {
        let reply = Cancellation {
            simulated: false,
            data: Some(json!({"result": "Success"})),
        };
        let value = serde_json::to_value(Envelope::ok(reply)).unwrap();
        assert_eq!(value, json!({"success": true, "data": {"result": "Success"}}));
    }

    #[test]
    fn failure_has_only_error() {
        let env: Envelope<Cancellation> = Err(RideError::BookingNotFound).into();
        let value = serde_json::to_value(env).unwrap();
        assert_eq!(value, json!({"success": false, "error": "Booking not found"}));
    }
}
