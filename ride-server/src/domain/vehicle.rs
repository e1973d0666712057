//! Vehicle classes offered by the aggregator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vehicle class of an estimate or booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleVariant {
    AutoRickshaw,
    Sedan,
    Suv,
    Hatchback,
    Taxi,
    TaxiPlus,
    Bike,
    #[default]
    #[serde(other)]
    Unknown,
}

impl VehicleVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleVariant::AutoRickshaw => "AUTO_RICKSHAW",
            VehicleVariant::Sedan => "SEDAN",
            VehicleVariant::Suv => "SUV",
            VehicleVariant::Hatchback => "HATCHBACK",
            VehicleVariant::Taxi => "TAXI",
            VehicleVariant::TaxiPlus => "TAXI_PLUS",
            VehicleVariant::Bike => "BIKE",
            VehicleVariant::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for VehicleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
