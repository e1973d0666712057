//! Ride identifiers.
//!
//! Searches, estimates and bookings each get an identifier that records,
//! at the moment it is issued, whether it belongs to the live aggregator or
//! to the simulated backend. The client dispatches on that tag rather than
//! inspecting the string.
//!
//! On the JSON wire an identifier is a plain string. Simulated identifiers
//! always carry [`SIMULATED_PREFIX`], which is how the tag is recovered when
//! an identifier comes back in through the web layer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix carried by every identifier the simulated backend issues.
pub const SIMULATED_PREFIX: &str = "sim_";

macro_rules! ride_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            /// Issued by the live aggregator.
            Live(String),
            /// Issued by the simulated backend.
            Simulated(String),
        }

        impl $name {
            /// Recover the tag of an identifier received over the wire.
            pub fn parse(raw: impl Into<String>) -> Self {
                let raw = raw.into();
                if raw.starts_with(SIMULATED_PREFIX) {
                    Self::Simulated(raw)
                } else {
                    Self::Live(raw)
                }
            }

            /// Returns the identifier as it appears on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    Self::Live(id) | Self::Simulated(id) => id,
                }
            }

            /// Whether the simulated backend owns this identifier.
            pub fn is_simulated(&self) -> bool {
                matches!(self, Self::Simulated(_))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    Self::Live(id) => write!(f, "{}::Live({id})", stringify!($name)),
                    Self::Simulated(id) => write!(f, "{}::Simulated({id})", stringify!($name)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::parse)
            }
        }
    };
}

ride_id! {
    /// Identifies a ride search (a pickup/drop pair submitted for discovery).
    SearchId
}

ride_id! {
    /// Identifies a priced offer returned for a search.
    EstimateId
}

ride_id! {
    /// Identifies an accepted estimate being tracked to completion.
    BookingId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recovers_tag_from_prefix() {
        assert!(SearchId::parse("sim_search_abc12").is_simulated());
        assert!(!SearchId::parse("9f1c2e7a-live").is_simulated());
        assert!(BookingId::parse("sim_book_x").is_simulated());
        assert!(EstimateId::parse("sim_est_auto_sim_search_q").is_simulated());
    }

    #[test]
    fn prefix_must_be_leading() {
        // A live id that merely mentions the marker stays live
        let id = EstimateId::parse("est_sim_123");
        assert_eq!(id, EstimateId::Live("est_sim_123".into()));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BookingId::Simulated("sim_book_k2j9".into());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"sim_book_k2j9\"");

        let back: BookingId = serde_json::from_str("\"sim_book_k2j9\"").unwrap();
        assert_eq!(back, id);

        let live: BookingId = serde_json::from_str("\"a1b2\"").unwrap();
        assert_eq!(live, BookingId::Live("a1b2".into()));
    }

    #[test]
    fn display_and_debug() {
        let id = SearchId::Live("abc".into());
        assert_eq!(id.to_string(), "abc");
        assert_eq!(format!("{id:?}"), "SearchId::Live(abc)");
    }
}
