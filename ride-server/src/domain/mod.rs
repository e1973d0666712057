//! Domain types for ride booking.
//!
//! These are the values that flow between the web layer, the booking client
//! and the aggregator: locations, identifiers, offers, statuses and the
//! session credential.

mod estimate;
mod ids;
mod location;
mod status;
mod token;
mod vehicle;

pub use estimate::{Estimate, FareRange};
pub use ids::{BookingId, EstimateId, SIMULATED_PREFIX, SearchId};
pub use location::{Coordinates, DEMO_MARKER, Location};
pub use status::BookingStatus;
pub use token::SessionToken;
pub use vehicle::VehicleVariant;
