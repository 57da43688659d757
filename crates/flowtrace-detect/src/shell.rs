//! Layered shell-network detection.
//!
//! Finds directed chains routed through low-activity intermediaries. The
//! start and terminal of a chain are unconstrained endpoints of the
//! pass-through layer; every interior node must have a total transaction
//! count of 2 or 3, and no node on a chain may belong to a cycle.

use crate::types::ShellChain;
use flowtrace_core::detector::{DetectorMetadata, PipelineStage};
use flowtrace_core::graph::TransactionGraph;
use flowtrace_core::traits::Detector;
use flowtrace_core::types::StatsTable;
use std::collections::HashSet;
use tracing::debug;

/// Minimum chain length in nodes.
const MIN_CHAIN_LEN: usize = 3;

/// Shell chain discovery with subset elimination.
#[derive(Debug, Clone)]
pub struct ShellNetworks {
    metadata: DetectorMetadata,
}

impl Default for ShellNetworks {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellNetworks {
    /// Create a new shell-network detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/shell-networks", PipelineStage::Shell)
                .with_description("Directed chains through low-activity intermediaries"),
        }
    }

    /// Enumerate maximal shell chains, longest first.
    ///
    /// `accounts` drives the start-node iteration; `stats` must cover the
    /// same filtered batch as `graph`; `cycle_nodes` holds every account
    /// claimed by cycle detection.
    #[must_use]
    pub fn compute<'a, I>(
        graph: &TransactionGraph,
        stats: &StatsTable,
        cycle_nodes: &HashSet<String>,
        accounts: I,
    ) -> Vec<ShellChain>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut chains: Vec<Vec<String>> = Vec::new();

        for start in accounts {
            if cycle_nodes.contains(start) {
                continue;
            }
            let mut path = vec![start.clone()];
            let mut visited: HashSet<String> = HashSet::new();
            visited.insert(start.clone());
            Self::dfs(graph, stats, cycle_nodes, start, &mut path, &mut visited, &mut chains);
        }

        let kept = Self::eliminate_subsets(chains);
        debug!(count = kept.len(), "shell chain discovery complete");
        kept
    }

    fn dfs(
        graph: &TransactionGraph,
        stats: &StatsTable,
        cycle_nodes: &HashSet<String>,
        current: &str,
        path: &mut Vec<String>,
        visited: &mut HashSet<String>,
        chains: &mut Vec<Vec<String>>,
    ) {
        for neighbor in graph.receivers_of(current) {
            if visited.contains(neighbor.as_str()) || cycle_nodes.contains(neighbor.as_str()) {
                continue;
            }
            if !is_low_degree(stats, neighbor) {
                continue;
            }

            // Extend through the low-activity intermediary.
            visited.insert(neighbor.clone());
            path.push(neighbor.clone());

            // Any non-low-degree onward neighbor terminates a chain here.
            for terminal in graph.receivers_of(neighbor) {
                if visited.contains(terminal.as_str()) || cycle_nodes.contains(terminal.as_str()) {
                    continue;
                }
                if is_low_degree(stats, terminal) {
                    continue;
                }
                if path.len() >= MIN_CHAIN_LEN - 1 {
                    let mut chain = path.clone();
                    chain.push(terminal.clone());
                    chains.push(chain);
                }
            }

            // The path itself is a chain once long enough.
            if path.len() >= MIN_CHAIN_LEN {
                chains.push(path.clone());
            }

            Self::dfs(graph, stats, cycle_nodes, neighbor, path, visited, chains);

            path.pop();
            visited.remove(neighbor.as_str());
        }
    }

    /// Sort by length descending and drop any chain whose member set is a
    /// subset of an already-kept chain.
    fn eliminate_subsets(mut chains: Vec<Vec<String>>) -> Vec<ShellChain> {
        chains.sort_by(|a, b| b.len().cmp(&a.len()));

        let mut kept: Vec<ShellChain> = Vec::new();
        for chain in chains {
            let is_subset = kept
                .iter()
                .any(|k| chain.iter().all(|m| k.members.contains(m)));
            if !is_subset {
                kept.push(ShellChain { members: chain });
            }
        }
        kept
    }
}

impl Detector for ShellNetworks {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

/// Interior nodes must have exactly 2 or 3 total transactions.
fn is_low_degree(stats: &StatsTable, account: &str) -> bool {
    stats
        .get(account)
        .map_or(false, |s| matches!(s.total_transactions(), 2 | 3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtrace_core::types::{collect_stats, Transaction};

    fn tx(id: &str, sender: &str, receiver: &str) -> Transaction {
        Transaction::new(id, sender, receiver, 100.0, "2024-01-01T00:00:00Z")
    }

    /// SRC → M1 → M2 → M3 → DST with busy endpoints.
    fn layered_batch() -> Vec<Transaction> {
        let mut txs = vec![
            tx("T1", "SRC", "M1"),
            tx("T2", "M1", "M2"),
            tx("T3", "M2", "M3"),
            tx("T4", "M3", "DST"),
        ];
        // Extra traffic so SRC and DST fall outside the low-degree band.
        for i in 0..4 {
            txs.push(tx(&format!("S{i}"), "SRC", &format!("OUT{i}")));
            txs.push(tx(&format!("D{i}"), &format!("IN{i}"), "DST"));
        }
        txs
    }

    fn run(txs: &[Transaction], cycle_nodes: &HashSet<String>) -> Vec<ShellChain> {
        let graph = TransactionGraph::from_transactions(txs);
        let stats = collect_stats(txs);
        let accounts: Vec<String> = stats.keys().cloned().collect();
        ShellNetworks::compute(&graph, &stats, cycle_nodes, accounts.iter())
    }

    #[test]
    fn test_layered_chain_detected() {
        let chains = run(&layered_batch(), &HashSet::new());

        assert!(!chains.is_empty());
        let longest = &chains[0];
        assert_eq!(longest.members, vec!["SRC", "M1", "M2", "M3", "DST"]);
    }

    #[test]
    fn test_subset_chains_eliminated() {
        let chains = run(&layered_batch(), &HashSet::new());

        // Every shorter discovery along SRC→…→DST is a member subset of the
        // full chain and must be dropped.
        for pair in chains.windows(2) {
            assert!(pair[0].len() >= pair[1].len(), "descending length order");
        }
        let full: HashSet<&String> = chains[0].members.iter().collect();
        for chain in &chains[1..] {
            assert!(
                !chain.members.iter().all(|m| full.contains(m)),
                "subset chain {:?} survived elimination",
                chain.members
            );
        }
    }

    #[test]
    fn test_cycle_members_excluded() {
        let mut cycle_nodes = HashSet::new();
        cycle_nodes.insert("M2".to_string());

        let chains = run(&layered_batch(), &cycle_nodes);

        for chain in &chains {
            assert!(!chain.members.contains(&"M2".to_string()));
        }
    }

    #[test]
    fn test_busy_intermediary_breaks_chain() {
        let mut txs = layered_batch();
        // Push M2 above the low-degree band.
        for i in 0..3 {
            txs.push(tx(&format!("X{i}"), &format!("NOISE{i}"), "M2"));
        }

        let chains = run(&txs, &HashSet::new());

        for chain in &chains {
            let interior = &chain.members[1..chain.members.len() - 1];
            assert!(
                !interior.contains(&"M2".to_string()),
                "M2 kept as interior of {:?}",
                chain.members
            );
        }
    }

    #[test]
    fn test_minimal_three_node_chain() {
        // SRC → M1 → DST: a single low-degree interior node reaching a busy
        // terminal is the shortest chain that still counts.
        let mut txs = vec![tx("T1", "SRC", "M1"), tx("T2", "M1", "DST")];
        for i in 0..4 {
            txs.push(tx(&format!("S{i}"), "SRC", &format!("OUT{i}")));
            txs.push(tx(&format!("D{i}"), &format!("IN{i}"), "DST"));
        }

        let chains = run(&txs, &HashSet::new());
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].members, vec!["SRC", "M1", "DST"]);
    }
}
