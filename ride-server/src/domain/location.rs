//! Pickup and drop locations.

use serde::{Deserialize, Serialize};

/// Text the demo frontend puts in pickup addresses to force a simulated ride.
pub const DEMO_MARKER: &str = "Demo";

/// A point on the map with a free-text address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub address: String,
}

impl Location {
    pub fn new(lat: f64, lon: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            address: address.into(),
        }
    }

    /// Whether the address carries the demo marker.
    pub fn is_demo(&self) -> bool {
        self.address.contains(DEMO_MARKER)
    }
}

/// A bare GPS position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}
