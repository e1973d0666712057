//! Ride booking against Namma Yatri, with a simulated fallback.
//!
//! [`RideClient`] offers the same request/response contract whether the
//! aggregator is reachable or not. When it isn't, an in-memory simulation
//! takes over: searches get two made-up estimates, and bookings get a driver
//! a few seconds after they are placed.

mod client;
mod error;
mod flow;
mod reply;
pub mod simulation;

use std::time::Duration;

pub use client::RideClient;
pub use error::RideError;
pub use reply::{
    BookingPlaced, BookingState, Cancellation, Envelope, EstimateList, OtpSent, OtpVerified,
    Places, SearchStarted,
};

/// Country code used when none is given.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Device token sent with OTP verification when none is given.
pub const DEFAULT_DEVICE_TOKEN: &str = "movzz-device";

/// Reason sent with cancellations when none is given.
pub const DEFAULT_CANCEL_REASON: &str = "Customer cancelled";

/// How long `book_ride_complete` waits for drivers to respond by default.
pub const DEFAULT_BOOKING_WAIT: Duration = Duration::from_millis(3000);

/// Default polling budget for `poll_booking_status`.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 20;

/// Default pause between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);
