//! Transaction and aggregate statistics types.

use chrono::DateTime;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A directed, amount-and-timestamp annotated transfer between accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub transaction_id: String,
    /// Sending account identifier.
    pub sender_id: String,
    /// Receiving account identifier.
    pub receiver_id: String,
    /// Transfer amount (non-negative).
    pub amount: f64,
    /// ISO-8601 timestamp, echoed verbatim in the output edge list.
    pub timestamp: String,
}

impl Transaction {
    /// Create a new transaction.
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        amount: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            amount,
            timestamp: timestamp.into(),
        }
    }

    /// Parse the timestamp to a millisecond epoch.
    ///
    /// Returns `None` for unparseable timestamps. Such transactions are
    /// excluded from temporal windowing only; they still contribute to
    /// adjacency and aggregate statistics.
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<i64> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.timestamp_millis())
    }
}

/// Aggregate per-account statistics.
///
/// Each transaction contributes to both endpoints: once to the sender's
/// outgoing side and once to the receiver's incoming side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountStats {
    /// Sum of outgoing amounts.
    pub total_sent: f64,
    /// Sum of incoming amounts.
    pub total_received: f64,
    /// Number of outgoing transactions.
    pub send_count: usize,
    /// Number of incoming transactions.
    pub receive_count: usize,
    /// Distinct accounts this account received from, in first-observed order.
    pub senders: IndexSet<String>,
    /// Distinct accounts this account sent to, in first-observed order.
    pub receivers: IndexSet<String>,
    /// Outgoing amounts in input order. Feeds the variation signatures.
    pub sent_amounts: Vec<f64>,
    /// Incoming amounts in input order.
    pub received_amounts: Vec<f64>,
}

impl AccountStats {
    /// Number of distinct counterparties that sent to this account.
    #[must_use]
    pub fn unique_senders(&self) -> usize {
        self.senders.len()
    }

    /// Number of distinct counterparties this account sent to.
    #[must_use]
    pub fn unique_receivers(&self) -> usize {
        self.receivers.len()
    }

    /// Total transactions touching this account.
    #[must_use]
    pub fn total_transactions(&self) -> usize {
        self.send_count + self.receive_count
    }

    /// Flow ratio: `min(sent, received) / max(sent, received)`.
    ///
    /// 0 when either side is 0. A value near 1 marks a pass-through account.
    #[must_use]
    pub fn flow_ratio(&self) -> f64 {
        if self.total_sent == 0.0 || self.total_received == 0.0 {
            return 0.0;
        }
        let min = self.total_sent.min(self.total_received);
        let max = self.total_sent.max(self.total_received);
        min / max
    }
}

/// Coefficient of variation of a sequence of amounts: population σ / μ.
///
/// Returns `None` when the sequence is empty or the mean is not positive,
/// in which case any signature depending on it fails.
#[must_use]
pub fn coefficient_of_variation(amounts: &[f64]) -> Option<f64> {
    if amounts.is_empty() {
        return None;
    }
    let n = amounts.len() as f64;
    let mean = amounts.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean)
}

/// Insertion-ordered per-account statistics table.
///
/// Keys appear in first-encounter order (sender before receiver per row);
/// downstream traversal relies on this order to be reproducible. The table
/// built over the unfiltered batch doubles as the account universe.
pub type StatsTable = IndexMap<String, AccountStats>;

/// Build the statistics table in one pass over `transactions`.
#[must_use]
pub fn collect_stats(transactions: &[Transaction]) -> StatsTable {
    let mut table = StatsTable::new();

    for tx in transactions {
        let sender = table.entry(tx.sender_id.clone()).or_default();
        sender.total_sent += tx.amount;
        sender.send_count += 1;
        sender.receivers.insert(tx.receiver_id.clone());
        sender.sent_amounts.push(tx.amount);

        let receiver = table.entry(tx.receiver_id.clone()).or_default();
        receiver.total_received += tx.amount;
        receiver.receive_count += 1;
        receiver.senders.insert(tx.sender_id.clone());
        receiver.received_amounts.push(tx.amount);
    }

    table
}
