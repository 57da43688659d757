//! Pattern label definitions.
//!
//! Accounts carry a set of pattern labels; rings carry a pattern type.
//! Both are closed sets whose string forms are part of the output contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected pattern label attached to an account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// Member of a directed cycle of length 3.
    #[serde(rename = "cycle_length_3")]
    CycleLength3,

    /// Member of a directed cycle of length 4.
    #[serde(rename = "cycle_length_4")]
    CycleLength4,

    /// Member of a directed cycle of length 5.
    #[serde(rename = "cycle_length_5")]
    CycleLength5,

    /// Member of a fan-in hub pattern (hub or counterparty).
    #[serde(rename = "fan_in")]
    FanIn,

    /// Member of a fan-out hub pattern (hub or counterparty).
    #[serde(rename = "fan_out")]
    FanOut,

    /// Member of a layered shell chain.
    #[serde(rename = "shell_network")]
    ShellNetwork,

    /// Classified as a legitimate business and excluded from detection.
    #[serde(rename = "legitimate_business")]
    LegitimateBusiness,
}

impl Pattern {
    /// All pattern labels.
    pub const ALL: &'static [Pattern] = &[
        Pattern::CycleLength3,
        Pattern::CycleLength4,
        Pattern::CycleLength5,
        Pattern::FanIn,
        Pattern::FanOut,
        Pattern::ShellNetwork,
        Pattern::LegitimateBusiness,
    ];

    /// Returns the label as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Pattern::CycleLength3 => "cycle_length_3",
            Pattern::CycleLength4 => "cycle_length_4",
            Pattern::CycleLength5 => "cycle_length_5",
            Pattern::FanIn => "fan_in",
            Pattern::FanOut => "fan_out",
            Pattern::ShellNetwork => "shell_network",
            Pattern::LegitimateBusiness => "legitimate_business",
        }
    }

    /// Parse a label from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cycle_length_3" => Some(Pattern::CycleLength3),
            "cycle_length_4" => Some(Pattern::CycleLength4),
            "cycle_length_5" => Some(Pattern::CycleLength5),
            "fan_in" => Some(Pattern::FanIn),
            "fan_out" => Some(Pattern::FanOut),
            "shell_network" => Some(Pattern::ShellNetwork),
            "legitimate_business" => Some(Pattern::LegitimateBusiness),
            _ => None,
        }
    }

    /// The cycle label for a cycle of `len` nodes, if in range.
    #[must_use]
    pub const fn cycle_of_length(len: usize) -> Option<Self> {
        match len {
            3 => Some(Pattern::CycleLength3),
            4 => Some(Pattern::CycleLength4),
            5 => Some(Pattern::CycleLength5),
            _ => None,
        }
    }

    /// Returns true for any of the cycle-length labels.
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(
            self,
            Pattern::CycleLength3 | Pattern::CycleLength4 | Pattern::CycleLength5
        )
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pattern type of a detected ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingPatternType {
    /// Circular fund routing.
    #[serde(rename = "cycle")]
    Cycle,

    /// Many senders funding one receiver.
    #[serde(rename = "fan_in")]
    FanIn,

    /// One sender paying many receivers.
    #[serde(rename = "fan_out")]
    FanOut,

    /// Directed chain through low-activity intermediaries.
    #[serde(rename = "shell_network")]
    ShellNetwork,
}

impl RingPatternType {
    /// All ring pattern types, in ring-acceptance order.
    pub const ALL: &'static [RingPatternType] = &[
        RingPatternType::Cycle,
        RingPatternType::FanIn,
        RingPatternType::FanOut,
        RingPatternType::ShellNetwork,
    ];

    /// Returns the type as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RingPatternType::Cycle => "cycle",
            RingPatternType::FanIn => "fan_in",
            RingPatternType::FanOut => "fan_out",
            RingPatternType::ShellNetwork => "shell_network",
        }
    }

    /// Parse a ring pattern type from its wire string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cycle" => Some(RingPatternType::Cycle),
            "fan_in" => Some(RingPatternType::FanIn),
            "fan_out" => Some(RingPatternType::FanOut),
            "shell_network" => Some(RingPatternType::ShellNetwork),
            _ => None,
        }
    }
}

impl fmt::Display for RingPatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_roundtrip() {
        for &pattern in Pattern::ALL {
            assert_eq!(Pattern::parse(pattern.as_str()), Some(pattern));
        }
        assert_eq!(Pattern::parse("unknown"), None);
    }

    #[test]
    fn test_pattern_display() {
        assert_eq!(Pattern::CycleLength3.to_string(), "cycle_length_3");
        assert_eq!(Pattern::LegitimateBusiness.to_string(), "legitimate_business");
    }

    #[test]
    fn test_cycle_of_length() {
        assert_eq!(Pattern::cycle_of_length(3), Some(Pattern::CycleLength3));
        assert_eq!(Pattern::cycle_of_length(5), Some(Pattern::CycleLength5));
        assert_eq!(Pattern::cycle_of_length(2), None);
        assert_eq!(Pattern::cycle_of_length(6), None);
    }

    #[test]
    fn test_is_cycle() {
        assert!(Pattern::CycleLength4.is_cycle());
        assert!(!Pattern::FanIn.is_cycle());
        assert!(!Pattern::LegitimateBusiness.is_cycle());
    }

    #[test]
    fn test_ring_pattern_type_roundtrip() {
        for &pt in RingPatternType::ALL {
            assert_eq!(RingPatternType::parse(pt.as_str()), Some(pt));
        }
        assert_eq!(RingPatternType::parse("cycle_length_3"), None);
    }

    #[test]
    fn test_serde_wire_strings() {
        let json = serde_json::to_string(&Pattern::CycleLength4).unwrap();
        assert_eq!(json, "\"cycle_length_4\"");

        let json = serde_json::to_string(&RingPatternType::ShellNetwork).unwrap();
        assert_eq!(json, "\"shell_network\"");
    }
}
