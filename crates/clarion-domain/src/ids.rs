//! Identifier newtypes for domain entities
//!
//! All ids are UUIDv7-based: chronologically sortable, 128-bit unique, and
//! generated without coordination. Stored as raw `u128` so the storage layer
//! can round-trip them through 16-byte blobs.

use std::fmt;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based id
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an id from a raw u128 value (storage deserialization)
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an id from its canonical UUID string form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s)
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid UUID string: {}", e))
            }

            /// Raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }

            /// Timestamp component of the UUIDv7 (ms since Unix epoch)
            pub fn timestamp(&self) -> u64 {
                // UUIDv7: top 48 bits are the Unix millisecond timestamp
                (self.0 >> 80) as u64
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for one proposition version
    PropositionId
}

uuid_id! {
    /// Unique identifier for an observation
    ObservationId
}

uuid_id! {
    /// Unique identifier for a clarifying question
    QuestionId
}

uuid_id! {
    /// Identifier shared by all versions of one evolving belief
    RevisionGroupId
}
