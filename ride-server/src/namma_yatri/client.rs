//! Namma Yatri HTTP client.
//!
//! Thin async wrapper over the aggregator's REST endpoints. Every call
//! returns the response body as JSON so callers can forward it verbatim;
//! [`decode`] pulls typed fields out of it where needed.

use std::time::Duration;

use reqwest::RequestBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{BookingId, EstimateId, Location, SearchId, SessionToken};

use super::error::UpstreamError;
use super::types::{
    AutocompleteRequest, CancelRequest, GetTokenRequest, RideSearchRequest, SelectEstimateRequest,
    VerifyTokenRequest,
};

/// Default base URL for the Namma Yatri API.
pub const DEFAULT_BASE_URL: &str = "https://api.nammayatri.in";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Search radius for place autocomplete, in meters.
const AUTOCOMPLETE_RADIUS_M: u32 = 50_000;

/// Header carrying the session credential.
const TOKEN_HEADER: &str = "token";

/// Configuration for the Namma Yatri client.
#[derive(Debug, Clone)]
pub struct NammaYatriConfig {
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NammaYatriConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NammaYatriConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Namma Yatri API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct NammaYatriClient {
    http: reqwest::Client,
    base_url: String,
}

impl NammaYatriClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NammaYatriConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(UpstreamError::Setup)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the aggregator to send an OTP to a mobile number.
    pub async fn get_token(
        &self,
        mobile_number: &str,
        country_code: &str,
    ) -> Result<Value, UpstreamError> {
        let body = GetTokenRequest {
            mobile_number,
            mobile_country_code: country_code,
        };
        self.post("/v2/auth/get-token", &body, None).await
    }

    /// Exchange an OTP for a session token.
    pub async fn verify_token(&self, otp: &str, device_token: &str) -> Result<Value, UpstreamError> {
        let body = VerifyTokenRequest {
            otp,
            device_token,
            whatsapp_notification_enroll: "OPT_IN",
        };
        self.post("/v2/auth/verify-token", &body, None).await
    }

    /// Place-name suggestions near a position.
    pub async fn autocomplete(
        &self,
        search_text: &str,
        lat: f64,
        lon: f64,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let body = AutocompleteRequest {
            input: search_text,
            location: format!("{lat},{lon}"),
            radius: AUTOCOMPLETE_RADIUS_M,
            language: "ENGLISH",
        };
        self.post("/v2/maps/autoComplete", &body, token).await
    }

    /// Start a ride search between two points.
    pub async fn ride_search(
        &self,
        pickup: &Location,
        dropoff: &Location,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let body = RideSearchRequest {
            start_location: pickup.into(),
            end_location: dropoff.into(),
        };
        self.post("/v2/rideSearch", &body, token).await
    }

    /// Fetch the estimates collected for a search.
    pub async fn search_results(
        &self,
        search_id: &SearchId,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let path = format!("/v2/rideSearch/{}/results", search_id.as_str());
        self.get(&path, token).await
    }

    /// Accept an estimate, letting the aggregator assign a driver.
    pub async fn select_estimate(
        &self,
        estimate_id: &EstimateId,
        extra_fee: f64,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let path = format!("/v2/estimate/{}/select2", estimate_id.as_str());
        let body = SelectEstimateRequest {
            customer_extra_fee: extra_fee,
            auto_assign_enabled: true,
        };
        self.post(&path, &body, token).await
    }

    /// Current status of a booking.
    pub async fn fetch_status(
        &self,
        booking_id: &BookingId,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let path = format!("/v2/booking/{}/fetch_status", booking_id.as_str());
        self.get(&path, token).await
    }

    /// Cancel a booking on the rider's behalf.
    pub async fn cancel_booking(
        &self,
        booking_id: &BookingId,
        reason: &str,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let path = format!("/v2/booking/{}/cancel", booking_id.as_str());
        let body = CancelRequest {
            reason_code: "CUSTOMER_CANCELLED",
            additional_info: reason,
        };
        self.post(&path, &body, token).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SessionToken>,
    ) -> Result<Value, UpstreamError> {
        let request = with_token(self.http.post(self.url(path)), token).json(body);
        let response = request.send().await.map_err(UpstreamError::Unreachable)?;
        read_json(response).await
    }

    async fn get(&self, path: &str, token: Option<&SessionToken>) -> Result<Value, UpstreamError> {
        let request = with_token(self.http.get(self.url(path)), token);
        let response = request.send().await.map_err(UpstreamError::Unreachable)?;
        read_json(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn with_token(request: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
    match token {
        Some(token) => request.header(TOKEN_HEADER, token.as_str()),
        None => request,
    }
}

/// Read a response body as JSON, turning error statuses into
/// [`UpstreamError::Api`] with the body preserved.
async fn read_json(response: reqwest::Response) -> Result<Value, UpstreamError> {
    let status = response.status();
    let body = response.text().await.map_err(UpstreamError::Body)?;

    if !status.is_success() {
        // Keep structured error bodies intact; fall back to the raw text,
        // or the status reason when the body is empty
        let body = serde_json::from_str(&body).unwrap_or_else(|_| {
            if body.is_empty() {
                Value::String(status.canonical_reason().unwrap_or_default().to_string())
            } else {
                Value::String(body)
            }
        });
        return Err(UpstreamError::Api {
            status: status.as_u16(),
            body,
        });
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

/// Pull typed fields out of a response body.
pub fn decode<T: DeserializeOwned>(data: &Value) -> Result<T, UpstreamError> {
    T::deserialize(data).map_err(|e| UpstreamError::Json {
        message: e.to_string(),
        body: Some(data.to_string().chars().take(500).collect()),
    })
}
