//! Ride booking proxy server.
//!
//! Fronts the Namma Yatri ride-hailing aggregator for a mobile frontend,
//! keeping one ride session per user. When the aggregator can't be reached
//! a session switches to an in-memory simulation so the booking flow still
//! works end to end.

pub mod clock;
pub mod config;
pub mod domain;
pub mod namma_yatri;
pub mod rides;
pub mod session;
pub mod web;
