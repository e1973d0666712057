//! Namma Yatri API client.
//!
//! HTTP client for the Namma Yatri ride-hailing aggregator.
//!
//! Key characteristics of the API:
//! - Authentication is OTP-based; the verified session token travels in a
//!   `token` header
//! - Ride search is asynchronous: a search returns an id, and estimates are
//!   collected from drivers over the following seconds
//! - Error responses carry a JSON body that we forward to callers untouched

mod client;
mod error;
mod types;

pub use client::{DEFAULT_BASE_URL, NammaYatriClient, NammaYatriConfig, decode};
pub use error::UpstreamError;
pub use types::{SearchAccepted, SearchResults, SelectionAccepted, StatusSnapshot};
