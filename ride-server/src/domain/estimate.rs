//! Priced ride offers.

use serde::{Deserialize, Serialize};

use super::{EstimateId, VehicleVariant};

/// A priced, timed offer for one vehicle class against a search.
///
/// Fares are plain rupee amounts. The live aggregator omits duration,
/// distance and the fare range for some vehicle classes, and sends
/// fractional values for some of them, so everything but the id is read
/// leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    #[serde(alias = "id")]
    pub estimate_id: EstimateId,

    #[serde(default)]
    pub vehicle_variant: VehicleVariant,

    #[serde(default)]
    pub estimated_fare: f64,

    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<f64>,

    /// Meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_distance: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fare_range: Option<FareRange>,
}

/// Lower and upper bound on the fare the rider may end up paying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareRange {
    #[serde(default)]
    pub min_fare: f64,
    #[serde(default)]
    pub max_fare: f64,
}
