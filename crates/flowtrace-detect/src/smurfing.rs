//! Smurfing (structuring) hub detection.
//!
//! Identifies fan-in receivers and fan-out senders whose distinct
//! counterparty count reaches the hub threshold, and flags hubs whose
//! qualifying activity clusters inside a single 72-hour window.
//!
//! Runs over the original unfiltered batch: hub qualification counts every
//! distinct counterparty, and ring assembly arbitrates legitimacy when the
//! candidates are accepted.

use crate::types::{Hub, HubDirection, SmurfingResult};
use flowtrace_core::detector::{DetectorMetadata, PipelineStage};
use flowtrace_core::traits::Detector;
use flowtrace_core::types::Transaction;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use tracing::debug;

/// Minimum distinct counterparties for a hub.
const HUB_THRESHOLD: usize = 10;
/// Temporal clustering window: 72 hours in milliseconds.
const WINDOW_MS: i64 = 72 * 60 * 60 * 1000;

/// Fan-in / fan-out hub discovery with temporal clustering.
#[derive(Debug, Clone)]
pub struct SmurfingHubs {
    metadata: DetectorMetadata,
}

impl Default for SmurfingHubs {
    fn default() -> Self {
        Self::new()
    }
}

impl SmurfingHubs {
    /// Create a new smurfing detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/smurfing-hubs", PipelineStage::Smurfing)
                .with_description("Fan-in / fan-out hubs with 72-hour temporal clustering"),
        }
    }

    /// Detect fan-in and fan-out hubs over the unfiltered batch.
    #[must_use]
    pub fn compute(transactions: &[Transaction]) -> SmurfingResult {
        // endpoint -> (counterparty, parsed timestamp) in input order
        let mut by_receiver: IndexMap<&str, Vec<(&str, Option<i64>)>> = IndexMap::new();
        let mut by_sender: IndexMap<&str, Vec<(&str, Option<i64>)>> = IndexMap::new();

        for tx in transactions {
            let ts = tx.timestamp_millis();
            by_receiver
                .entry(tx.receiver_id.as_str())
                .or_default()
                .push((tx.sender_id.as_str(), ts));
            by_sender
                .entry(tx.sender_id.as_str())
                .or_default()
                .push((tx.receiver_id.as_str(), ts));
        }

        let fan_in = Self::hubs(&by_receiver, HubDirection::FanIn);
        let fan_out = Self::hubs(&by_sender, HubDirection::FanOut);

        debug!(
            fan_in = fan_in.len(),
            fan_out = fan_out.len(),
            "smurfing hub discovery complete"
        );

        SmurfingResult { fan_in, fan_out }
    }

    fn hubs(
        grouped: &IndexMap<&str, Vec<(&str, Option<i64>)>>,
        direction: HubDirection,
    ) -> Vec<Hub> {
        let mut hubs = Vec::new();

        for (&account, entries) in grouped {
            let counterparties: IndexSet<&str> = entries.iter().map(|&(c, _)| c).collect();
            if counterparties.len() < HUB_THRESHOLD {
                continue;
            }

            hubs.push(Hub {
                account: account.to_string(),
                direction,
                counterparties: counterparties.iter().map(|c| c.to_string()).collect(),
                temporal: Self::temporal_cluster(entries),
            });
        }

        hubs
    }

    /// True when some 72-hour window starting at an observed timestamp holds
    /// at least the hub threshold of distinct counterparties.
    ///
    /// Entries with unparseable timestamps are excluded from windowing; they
    /// still count toward hub qualification.
    fn temporal_cluster(entries: &[(&str, Option<i64>)]) -> bool {
        let mut timed: Vec<(i64, &str)> = entries
            .iter()
            .filter_map(|&(c, ts)| ts.map(|t| (t, c)))
            .collect();
        timed.sort_by_key(|&(t, _)| t);

        for (i, &(start, _)) in timed.iter().enumerate() {
            let mut distinct: HashSet<&str> = HashSet::new();
            for &(t, counterparty) in &timed[i..] {
                if t > start + WINDOW_MS {
                    break;
                }
                distinct.insert(counterparty);
            }
            if distinct.len() >= HUB_THRESHOLD {
                return true;
            }
        }

        false
    }
}

impl Detector for SmurfingHubs {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, sender: &str, receiver: &str, timestamp: &str) -> Transaction {
        Transaction::new(id, sender, receiver, 50.0, timestamp)
    }

    /// Ten senders paying HUB, one per hour starting at midnight.
    fn fan_in_batch() -> Vec<Transaction> {
        (0..10)
            .map(|i| {
                tx(
                    &format!("T{i}"),
                    &format!("S{i}"),
                    "HUB",
                    &format!("2024-01-01T{i:02}:00:00Z"),
                )
            })
            .collect()
    }

    #[test]
    fn test_fan_in_hub_detected() {
        let result = SmurfingHubs::compute(&fan_in_batch());

        assert_eq!(result.fan_in.len(), 1);
        assert!(result.fan_out.is_empty());

        let hub = &result.fan_in[0];
        assert_eq!(hub.account, "HUB");
        assert_eq!(hub.counterparties.len(), 10);
        assert!(hub.temporal, "ten senders within ten hours cluster");
    }

    #[test]
    fn test_counterparty_order_is_first_observed() {
        let hub = &SmurfingHubs::compute(&fan_in_batch()).fan_in[0];
        let expected: Vec<String> = (0..10).map(|i| format!("S{i}")).collect();
        assert_eq!(hub.counterparties, expected);
    }

    #[test]
    fn test_below_threshold_not_flagged() {
        let txs: Vec<Transaction> = (0..9)
            .map(|i| {
                tx(
                    &format!("T{i}"),
                    &format!("S{i}"),
                    "HUB",
                    "2024-01-01T00:00:00Z",
                )
            })
            .collect();

        let result = SmurfingHubs::compute(&txs);
        assert!(result.fan_in.is_empty());
    }

    #[test]
    fn test_repeat_senders_count_once() {
        // Twelve transactions from only six distinct senders.
        let txs: Vec<Transaction> = (0..12)
            .map(|i| {
                tx(
                    &format!("T{i}"),
                    &format!("S{}", i % 6),
                    "HUB",
                    "2024-01-01T00:00:00Z",
                )
            })
            .collect();

        let result = SmurfingHubs::compute(&txs);
        assert!(result.fan_in.is_empty());
    }

    #[test]
    fn test_spread_out_activity_is_not_temporal() {
        // One sender per week: hub qualifies, clustering does not.
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                tx(
                    &format!("T{i}"),
                    &format!("S{i}"),
                    "HUB",
                    &format!("2024-{:02}-01T00:00:00Z", i + 1),
                )
            })
            .collect();

        let result = SmurfingHubs::compute(&txs);
        assert_eq!(result.fan_in.len(), 1);
        assert!(!result.fan_in[0].temporal);
    }

    #[test]
    fn test_window_boundary_inclusive() {
        // Nine senders at t0 and the tenth exactly 72 hours later.
        let mut txs: Vec<Transaction> = (0..9)
            .map(|i| {
                tx(
                    &format!("T{i}"),
                    &format!("S{i}"),
                    "HUB",
                    "2024-01-01T00:00:00Z",
                )
            })
            .collect();
        txs.push(tx("T9", "S9", "HUB", "2024-01-04T00:00:00Z"));

        let result = SmurfingHubs::compute(&txs);
        assert!(result.fan_in[0].temporal);
    }

    #[test]
    fn test_malformed_timestamps_skip_windowing_only() {
        // All timestamps unparseable: hub still qualifies, never temporal.
        let txs: Vec<Transaction> = (0..10)
            .map(|i| tx(&format!("T{i}"), &format!("S{i}"), "HUB", "garbage"))
            .collect();

        let result = SmurfingHubs::compute(&txs);
        assert_eq!(result.fan_in.len(), 1);
        assert!(!result.fan_in[0].temporal);
    }

    #[test]
    fn test_fan_out_symmetric() {
        let txs: Vec<Transaction> = (0..10)
            .map(|i| {
                tx(
                    &format!("T{i}"),
                    "SPRAYER",
                    &format!("R{i}"),
                    &format!("2024-01-01T{i:02}:00:00Z"),
                )
            })
            .collect();

        let result = SmurfingHubs::compute(&txs);
        assert!(result.fan_in.is_empty());
        assert_eq!(result.fan_out.len(), 1);
        assert_eq!(result.fan_out[0].account, "SPRAYER");
        assert_eq!(result.fan_out[0].direction, HubDirection::FanOut);
    }
}
