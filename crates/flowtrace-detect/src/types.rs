//! Detector result types.

use flowtrace_core::pattern::{Pattern, RingPatternType};
use flowtrace_core::types::Transaction;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// Legitimacy Filter Types
// ============================================================================

/// Output of the legitimacy filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegitimacyResult {
    /// Accounts classified as legitimate businesses, in universe order.
    pub legitimate: IndexSet<String>,
    /// The batch with every transaction touching a legitimate account removed.
    pub filtered: Vec<Transaction>,
}

impl LegitimacyResult {
    /// Returns true when filtering removed every transaction.
    #[must_use]
    pub fn removed_all(&self) -> bool {
        self.filtered.is_empty()
    }
}

// ============================================================================
// Cycle Types
// ============================================================================

/// A simple directed cycle in canonical rotation.
///
/// Members are in traversal order with the lexicographically smallest
/// account first. Direction is preserved: `A→B→C→A` and `A→C→B→A` are
/// distinct cycles on different edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Member accounts in canonical traversal order.
    pub members: Vec<String>,
}

impl Cycle {
    /// Cycle length in nodes (= edges).
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true for an empty member list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The account pattern label for this cycle's length.
    ///
    /// Lengths are bounded to 3-5 by construction.
    #[must_use]
    pub fn label(&self) -> Pattern {
        Pattern::cycle_of_length(self.members.len()).unwrap_or(Pattern::CycleLength5)
    }

    /// Canonical dedup key: the joined member sequence.
    #[must_use]
    pub fn key(&self) -> String {
        self.members.join(",")
    }
}

// ============================================================================
// Smurfing Types
// ============================================================================

/// Direction of a smurfing hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubDirection {
    /// Many senders funding one receiver.
    FanIn,
    /// One sender paying many receivers.
    FanOut,
}

impl HubDirection {
    /// The ring pattern type for hubs in this direction.
    #[must_use]
    pub const fn ring_pattern(&self) -> RingPatternType {
        match self {
            HubDirection::FanIn => RingPatternType::FanIn,
            HubDirection::FanOut => RingPatternType::FanOut,
        }
    }

    /// The account pattern label for members of this hub's ring.
    #[must_use]
    pub const fn label(&self) -> Pattern {
        match self {
            HubDirection::FanIn => Pattern::FanIn,
            HubDirection::FanOut => Pattern::FanOut,
        }
    }
}

/// A fan-in or fan-out hub and its counterparties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hub {
    /// Hub account identifier.
    pub account: String,
    /// Hub direction.
    pub direction: HubDirection,
    /// Distinct counterparties, in first-observed transaction order.
    pub counterparties: Vec<String>,
    /// True when one 72-hour window holds the qualifying counterparty count.
    pub temporal: bool,
}

/// Output of smurfing detection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmurfingResult {
    /// Fan-in hubs, in receiver first-encounter order.
    pub fan_in: Vec<Hub>,
    /// Fan-out hubs, in sender first-encounter order.
    pub fan_out: Vec<Hub>,
}

impl SmurfingResult {
    /// Iterate all hubs, fan-in before fan-out.
    pub fn hubs(&self) -> impl Iterator<Item = &Hub> {
        self.fan_in.iter().chain(self.fan_out.iter())
    }

    /// Temporal flag of `account` when it is a hub in either direction.
    ///
    /// Counterparties do not inherit the hub's flag.
    #[must_use]
    pub fn hub_temporal(&self, account: &str) -> bool {
        self.hubs().any(|h| h.account == account && h.temporal)
    }
}

// ============================================================================
// Shell Network Types
// ============================================================================

/// A layered shell chain in path order (source → … → destination).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellChain {
    /// Member accounts in path order.
    pub members: Vec<String>,
}

impl ShellChain {
    /// Chain length in nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true for an empty member list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_label_by_length() {
        let cycle = Cycle {
            members: vec!["A".into(), "B".into(), "C".into()],
        };
        assert_eq!(cycle.label(), Pattern::CycleLength3);
        assert_eq!(cycle.key(), "A,B,C");

        let cycle = Cycle {
            members: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        };
        assert_eq!(cycle.label(), Pattern::CycleLength4);
    }

    #[test]
    fn test_hub_direction_mapping() {
        assert_eq!(HubDirection::FanIn.ring_pattern(), RingPatternType::FanIn);
        assert_eq!(HubDirection::FanOut.label(), Pattern::FanOut);
    }

    #[test]
    fn test_hub_temporal_lookup() {
        let result = SmurfingResult {
            fan_in: vec![Hub {
                account: "HUB".into(),
                direction: HubDirection::FanIn,
                counterparties: vec!["S1".into()],
                temporal: true,
            }],
            fan_out: Vec::new(),
        };

        assert!(result.hub_temporal("HUB"));
        assert!(!result.hub_temporal("S1"));
    }
}
