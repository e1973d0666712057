//! HTTP route handlers.

use std::any::Any;
use std::time::Duration;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::{BookingId, EstimateId, SearchId};
use crate::rides::{
    BookingPlaced, BookingState, Cancellation, DEFAULT_BOOKING_WAIT, DEFAULT_CANCEL_REASON,
    DEFAULT_COUNTRY_CODE, DEFAULT_DEVICE_TOKEN, DEFAULT_MAX_POLL_ATTEMPTS, Envelope, EstimateList,
    OtpSent, OtpVerified, Places, SearchStarted,
};

use super::dto::*;
use super::state::AppState;

/// Position used for autocomplete when the caller gives none (central Bengaluru).
const DEFAULT_LAT: f64 = 12.9716;
const DEFAULT_LON: f64 = 77.5946;

/// Pause between polls when the query string doesn't say.
const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

const RIDE_ENDPOINTS: &[&str] = &[
    "/api/rides/auth/send-otp",
    "/api/rides/auth/verify-otp",
    "/api/rides/location/autocomplete",
    "/api/rides/search",
    "/api/rides/estimates/:searchId",
    "/api/rides/book",
    "/api/rides/status/:bookingId",
    "/api/rides/cancel",
    "/api/rides/book-complete",
    "/api/rides/poll-status/:bookingId",
];

type Reply<T> = Result<Json<Envelope<T>>, AppError>;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let rides = Router::new()
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/location/autocomplete", post(autocomplete))
        .route("/search", post(search))
        .route("/estimates/:search_id", get(estimates))
        .route("/book", post(book))
        .route("/status/:booking_id", get(status))
        .route("/cancel", post(cancel))
        .route("/book-complete", post(book_complete))
        .route("/poll-status/:booking_id", get(poll_status));

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .nest("/api/rides", rides)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn banner() -> Json<Banner> {
    Json(Banner {
        status: "Ride booking proxy running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            rides: RIDE_ENDPOINTS,
        },
    })
}

/// Parse a JSON body. An empty body reads as `{}` so that it fails field
/// validation rather than JSON parsing.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };

    serde_json::from_slice(raw).map_err(|e| {
        debug!(body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

fn required(message: &str) -> AppError {
    AppError::BadRequest {
        message: message.to_string(),
    }
}

/// Dispatch an OTP to the user's phone.
async fn send_otp(State(state): State<AppState>, body: Bytes) -> Reply<OtpSent> {
    let req: SendOtpRequest = parse_body(&body)?;
    let (Some(mobile_number), Some(user_id)) = (present(&req.mobile_number), present(&req.user_id))
    else {
        return Err(required("mobileNumber and userId are required"));
    };
    let country_code = present(&req.country_code).unwrap_or(DEFAULT_COUNTRY_CODE);

    let session = state.sessions.get_or_create(user_id).await;
    let result = session.client.send_otp(mobile_number, country_code).await;

    Ok(Json(result.into()))
}

/// Verify an OTP and remember the resulting credential for the user.
async fn verify_otp(State(state): State<AppState>, body: Bytes) -> Reply<OtpVerified> {
    let req: VerifyOtpRequest = parse_body(&body)?;
    let (Some(otp), Some(user_id)) = (present(&req.otp), present(&req.user_id)) else {
        return Err(required("otp and userId are required"));
    };
    let device_token = present(&req.device_token).unwrap_or(DEFAULT_DEVICE_TOKEN);

    let session = state.sessions.get_or_create(user_id).await;
    let result = session.client.verify_otp(otp, device_token).await;

    if let Ok(OtpVerified {
        token: Some(token), ..
    }) = &result
    {
        state.sessions.store_credential(user_id, token.clone()).await;
    }

    Ok(Json(result.into()))
}

/// Place suggestions for partial text.
async fn autocomplete(State(state): State<AppState>, body: Bytes) -> Reply<Places> {
    let req: AutocompleteRequest = parse_body(&body)?;
    let (Some(search_text), Some(user_id)) = (present(&req.search_text), present(&req.user_id))
    else {
        return Err(required("searchText and userId are required"));
    };
    // Zero means "not given"
    let lat = req.lat.filter(|v| *v != 0.0).unwrap_or(DEFAULT_LAT);
    let lon = req.lon.filter(|v| *v != 0.0).unwrap_or(DEFAULT_LON);

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .autocomplete_location(search_text, lat, lon, token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Start a ride search.
async fn search(State(state): State<AppState>, body: Bytes) -> Reply<SearchStarted> {
    let req: SearchRequest = parse_body(&body)?;
    let (Some(pickup), Some(dropoff), Some(user_id)) =
        (req.pickup.as_ref(), req.dropoff.as_ref(), present(&req.user_id))
    else {
        return Err(required("pickup, dropoff, and userId are required"));
    };

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .search_rides(pickup, dropoff, token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Estimates for a search.
async fn estimates(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Reply<EstimateList> {
    let Some(user_id) = present(&query.user_id) else {
        return Err(required("userId is required"));
    };

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .get_estimates(&SearchId::parse(search_id), token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Book an estimate.
async fn book(State(state): State<AppState>, body: Bytes) -> Reply<BookingPlaced> {
    let req: BookRequest = parse_body(&body)?;
    let (Some(estimate_id), Some(user_id)) = (present(&req.estimate_id), present(&req.user_id))
    else {
        return Err(required("estimateId and userId are required"));
    };
    let extra_fee = req.extra_fee.unwrap_or(0.0);

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .select_estimate(&EstimateId::parse(estimate_id), extra_fee, token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Current status of a booking.
async fn status(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Reply<BookingState> {
    let Some(user_id) = present(&query.user_id) else {
        return Err(required("userId is required"));
    };

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .get_booking_status(&BookingId::parse(booking_id), token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Cancel a booking.
async fn cancel(State(state): State<AppState>, body: Bytes) -> Reply<Cancellation> {
    let req: CancelRequest = parse_body(&body)?;
    let (Some(booking_id), Some(user_id)) = (present(&req.booking_id), present(&req.user_id))
    else {
        return Err(required("bookingId and userId are required"));
    };
    let reason = present(&req.reason).unwrap_or(DEFAULT_CANCEL_REASON);

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .cancel_booking(&BookingId::parse(booking_id), reason, token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Search, wait for estimates, and book the first one.
async fn book_complete(State(state): State<AppState>, body: Bytes) -> Reply<BookingPlaced> {
    let req: SearchRequest = parse_body(&body)?;
    let (Some(pickup), Some(dropoff), Some(user_id)) =
        (req.pickup.as_ref(), req.dropoff.as_ref(), present(&req.user_id))
    else {
        return Err(required("pickup, dropoff, and userId are required"));
    };
    let wait = req
        .wait_time
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_BOOKING_WAIT);

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .book_ride_complete(pickup, dropoff, wait, token.as_ref())
        .await;

    Ok(Json(result.into()))
}

/// Poll a booking until a driver is assigned.
async fn poll_status(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
    Query(query): Query<PollQuery>,
) -> Reply<BookingState> {
    let Some(user_id) = present(&query.user_id) else {
        return Err(required("userId is required"));
    };
    let max_attempts = leading_positive(query.max_attempts.as_deref())
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS);
    let interval = Duration::from_millis(
        leading_positive(query.interval.as_deref()).unwrap_or(DEFAULT_POLL_INTERVAL_MS),
    );

    let session = state.sessions.get_or_create(user_id).await;
    let token = session.credential().await;
    let result = session
        .client
        .poll_booking_status(
            &BookingId::parse(booking_id),
            max_attempts,
            interval,
            token.as_ref(),
        )
        .await;

    Ok(Json(result.into()))
}

/// Turn a handler panic into the usual JSON error body.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };

    AppError::Internal { message }.into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}
