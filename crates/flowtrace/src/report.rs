//! Analysis result types.
//!
//! The serialized shape of [`AnalysisResult`] is the crate's output
//! contract: field names, pattern strings, and numeric precision are fixed.
//! Scores carry one decimal; elapsed time carries three.

use flowtrace_core::error::Result;
use flowtrace_core::pattern::{Pattern, RingPatternType};
use flowtrace_core::types::Transaction;
use serde::{Deserialize, Serialize};

/// A ring-bearing account with its composite suspicion score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account identifier.
    pub account_id: String,
    /// Composite suspicion score in [0, 100], one decimal.
    pub suspicion_score: f64,
    /// Detected pattern labels, in first-detection order.
    pub detected_patterns: Vec<Pattern>,
    /// The first ring this account joined.
    pub ring_id: String,
}

/// A detected pattern instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudRing {
    /// Sequential identifier, `RING_NNN` zero-padded to width 3.
    pub ring_id: String,
    /// Member accounts; ordering is pattern-specific (cycle traversal,
    /// hub-then-counterparties, or chain path order).
    pub member_accounts: Vec<String>,
    /// Ring pattern type.
    pub pattern_type: RingPatternType,
    /// Risk score in [0, 100], one decimal.
    pub risk_score: f64,
}

/// Batch-level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Accounts observed in the pre-filter input.
    pub total_accounts_analyzed: usize,
    /// Accounts appearing in at least one ring.
    pub suspicious_accounts_flagged: usize,
    /// Accepted rings.
    pub fraud_rings_detected: usize,
    /// Accounts classified as legitimate businesses.
    pub legitimate_accounts_filtered: usize,
    /// Elapsed wall-clock seconds, three decimals.
    pub processing_time_seconds: f64,
}

/// Per-account node record covering the full pre-filter universe.
///
/// Statistics come from the unfiltered batch, so legitimate and filtered
/// accounts still show their true totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Account identifier.
    pub id: String,
    /// True when the account appears in `suspicious_accounts`.
    pub suspicious: bool,
    /// Rings this account belongs to, in join order.
    pub ring_ids: Vec<String>,
    /// Pattern labels; a legitimate account carries only
    /// `legitimate_business`.
    pub patterns: Vec<Pattern>,
    /// Sum of outgoing amounts (unfiltered).
    pub total_sent: f64,
    /// Sum of incoming amounts (unfiltered).
    pub total_received: f64,
    /// Total transactions touching this account (unfiltered).
    pub transaction_count: usize,
    /// Suspicion score, 0.0 when not suspicious.
    pub suspicion_score: f64,
}

/// Edge record echoing one input transaction unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Sending account.
    pub source: String,
    /// Receiving account.
    pub target: String,
    /// Transfer amount.
    pub amount: f64,
    /// Original timestamp string.
    pub timestamp: String,
    /// Original transaction identifier.
    pub transaction_id: String,
}

impl From<&Transaction> for EdgeRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            source: tx.sender_id.clone(),
            target: tx.receiver_id.clone(),
            amount: tx.amount,
            timestamp: tx.timestamp.clone(),
            transaction_id: tx.transaction_id.clone(),
        }
    }
}

/// Complete analysis output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ring-bearing accounts, sorted by score descending.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Accepted rings in acceptance order.
    pub fraud_rings: Vec<FraudRing>,
    /// Batch counters.
    pub summary: AnalysisSummary,
    /// One record per account in the pre-filter universe.
    pub nodes: Vec<NodeRecord>,
    /// Every input transaction, echoed in input order.
    pub edges: Vec<EdgeRecord>,
}

impl AnalysisResult {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Round to one decimal place (scores).
#[must_use]
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to three decimal places (elapsed seconds).
#[must_use]
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_record_echoes_transaction() {
        let tx = Transaction::new("T1", "A", "B", 99.5, "2024-01-01T00:00:00Z");
        let edge = EdgeRecord::from(&tx);

        assert_eq!(edge.source, "A");
        assert_eq!(edge.target, "B");
        assert_eq!(edge.amount, 99.5);
        assert_eq!(edge.timestamp, "2024-01-01T00:00:00Z");
        assert_eq!(edge.transaction_id, "T1");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round1(84.96), 85.0);
        assert_eq!(round1(35.04), 35.0);
        assert_eq!(round3(0.01749), 0.017);
    }

    #[test]
    fn test_ring_serialization_shape() {
        let ring = FraudRing {
            ring_id: "RING_001".to_string(),
            member_accounts: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            pattern_type: RingPatternType::Cycle,
            risk_score: 85.0,
        };

        let value = serde_json::to_value(&ring).unwrap();
        assert_eq!(value["ring_id"], "RING_001");
        assert_eq!(value["pattern_type"], "cycle");
        assert_eq!(value["risk_score"], 85.0);
    }
}
