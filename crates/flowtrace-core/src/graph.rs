//! Directed transaction graph with insertion-ordered adjacency.

use crate::types::Transaction;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sender-keyed directed adjacency index preserving all parallel edges.
///
/// Iteration order over senders, and over each sender's receivers, is the
/// order in which each key was first encountered in the input sequence.
/// Downstream enumeration depends on this order to be reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionGraph {
    adjacency: IndexMap<String, IndexMap<String, Vec<Transaction>>>,
    num_edges: usize,
}

impl TransactionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the adjacency index from a transaction slice in O(N).
    #[must_use]
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut graph = Self::new();
        for tx in transactions {
            graph.insert(tx.clone());
        }
        graph
    }

    /// Insert a single transaction edge.
    pub fn insert(&mut self, tx: Transaction) {
        self.adjacency
            .entry(tx.sender_id.clone())
            .or_default()
            .entry(tx.receiver_id.clone())
            .or_default()
            .push(tx);
        self.num_edges += 1;
    }

    /// Accounts with at least one outgoing edge, in first-encounter order.
    pub fn senders(&self) -> impl Iterator<Item = &String> {
        self.adjacency.keys()
    }

    /// Distinct receivers of `sender`, in first-encounter order.
    pub fn receivers_of<'a>(&'a self, sender: &str) -> impl Iterator<Item = &'a String> {
        self.adjacency.get(sender).into_iter().flat_map(IndexMap::keys)
    }

    /// All parallel edges from `sender` to `receiver`, in input order.
    #[must_use]
    pub fn edges_between(&self, sender: &str, receiver: &str) -> &[Transaction] {
        self.adjacency
            .get(sender)
            .and_then(|m| m.get(receiver))
            .map_or(&[], Vec::as_slice)
    }

    /// Number of distinct receivers of `account`.
    #[must_use]
    pub fn out_degree(&self, account: &str) -> usize {
        self.adjacency.get(account).map_or(0, IndexMap::len)
    }

    /// Total number of edges (transactions) in the graph.
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    /// Returns true when the graph holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_edges == 0
    }
}
