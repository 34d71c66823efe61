//! Request criticality used for load shedding.
//!
//! # Levels (highest first)
//! - `CRITICAL_PLUS`: failure has serious user-visible impact
//! - `CRITICAL`: default for production traffic
//! - `SHEDDABLE_PLUS`: partial unavailability expected, caller retries later
//! - `SHEDDABLE`: may see frequent partial or full unavailability
//!
//! Anything else on the wire, including the empty string, parses to
//! `Unspecified` and is left for the server to interpret.

use std::fmt;

use serde::{Serialize, Serializer};

/// Load-shedding priority attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Criticality {
    #[default]
    Unspecified,
    Sheddable,
    SheddablePlus,
    Critical,
    CriticalPlus,
}

impl Criticality {
    /// Parse the raw header value. Unknown values map to `Unspecified`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CRITICAL_PLUS" => Criticality::CriticalPlus,
            "CRITICAL" => Criticality::Critical,
            "SHEDDABLE_PLUS" => Criticality::SheddablePlus,
            "SHEDDABLE" => Criticality::Sheddable,
            _ => Criticality::Unspecified,
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Unspecified => "",
            Criticality::Sheddable => "SHEDDABLE",
            Criticality::SheddablePlus => "SHEDDABLE_PLUS",
            Criticality::Critical => "CRITICAL",
            Criticality::CriticalPlus => "CRITICAL_PLUS",
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != Criticality::Unspecified
    }

    /// Returns true if `self` should be served before `other` under load.
    pub fn higher_than(&self, other: Criticality) -> bool {
        *self > other
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Criticality {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_levels() {
        assert_eq!(Criticality::parse("CRITICAL_PLUS"), Criticality::CriticalPlus);
        assert_eq!(Criticality::parse("CRITICAL"), Criticality::Critical);
        assert_eq!(Criticality::parse("SHEDDABLE_PLUS"), Criticality::SheddablePlus);
        assert_eq!(Criticality::parse("SHEDDABLE"), Criticality::Sheddable);
    }

    #[test]
    fn test_parse_unknown_is_unspecified() {
        assert_eq!(Criticality::parse(""), Criticality::Unspecified);
        assert_eq!(Criticality::parse("critical"), Criticality::Unspecified);
        assert_eq!(Criticality::parse("URGENT"), Criticality::Unspecified);
        assert!(!Criticality::parse("URGENT").is_specified());
    }

    #[test]
    fn test_ordering() {
        assert!(Criticality::CriticalPlus.higher_than(Criticality::Critical));
        assert!(Criticality::Critical.higher_than(Criticality::SheddablePlus));
        assert!(Criticality::Sheddable.higher_than(Criticality::Unspecified));
        assert!(!Criticality::Sheddable.higher_than(Criticality::Sheddable));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in [
            Criticality::CriticalPlus,
            Criticality::Critical,
            Criticality::SheddablePlus,
            Criticality::Sheddable,
        ] {
            assert_eq!(Criticality::parse(&level.to_string()), level);
        }
    }
}
