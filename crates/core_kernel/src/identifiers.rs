//! Identifiers for generated records
//!
//! Each record kind gets its own UUID newtype so claim, employee and employer
//! ids cannot be swapped by accident. Ids display with a short prefix
//! (`CLM-…`) but serialize as the bare UUID, which keeps fixture files
//! readable by tools that only know UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// A fresh v4 id from the OS RNG
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// A v4 id built from caller-supplied bits
            ///
            /// Generators feed this from their seeded RNG so the same seed
            /// always yields the same ids.
            pub fn from_random_bits(bits: u128) -> Self {
                Self(uuid::Builder::from_random_bytes(bits.to_be_bytes()).into_uuid())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", Self::PREFIX, self.0)
            }
        }

        /// Accepts both `CLM-<uuid>` and a bare UUID
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s
                    .strip_prefix(Self::PREFIX)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .unwrap_or(s);
                Uuid::parse_str(bare).map(Self)
            }
        }
    };
}

define_id!(
    /// Id of a generated claim; also names the claim's document directory
    ClaimId,
    "CLM"
);
define_id!(
    /// Id of a generated employee
    EmployeeId,
    "EE"
);
define_id!(
    /// Id of a generated employer
    EmployerId,
    "ER"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_parse() {
        let original = EmployeeId::new();
        let parsed: EmployeeId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_random_bits_are_reproducible() {
        let a = ClaimId::from_random_bits(42);
        assert_eq!(a, ClaimId::from_random_bits(42));
        assert_eq!(a.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_prefix_of_other_kind_is_rejected() {
        let employer = EmployerId::new().to_string();
        assert!(employer.parse::<ClaimId>().is_err());
    }
}
