//! Circular fund-routing detection.
//!
//! Enumerates every simple directed cycle of length 3 to 5 in the filtered
//! transaction graph, once per distinct edge sequence. Each cycle is
//! discovered from multiple start nodes; canonical rotation collapses the
//! duplicates while preserving traversal direction.

use crate::types::Cycle;
use flowtrace_core::detector::{DetectorMetadata, PipelineStage};
use flowtrace_core::graph::TransactionGraph;
use flowtrace_core::traits::Detector;
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

/// Minimum cycle length in nodes.
const MIN_CYCLE_LEN: usize = 3;
/// Maximum cycle length in nodes. Depth is 1-based from the start node; a
/// length-5 cycle completes by returning to start from a depth-5 node.
const MAX_CYCLE_LEN: usize = 5;

/// Bounded-depth directed cycle enumeration.
#[derive(Debug, Clone)]
pub struct CycleRouting {
    metadata: DetectorMetadata,
}

impl Default for CycleRouting {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleRouting {
    /// Create a new cycle detector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/cycle-routing", PipelineStage::Cycles)
                .with_description("Simple directed cycles of length 3-5"),
        }
    }

    /// Enumerate canonical cycles in first-discovery order.
    ///
    /// `accounts` drives the outer start-node iteration and must be
    /// insertion-ordered for reproducible output.
    #[must_use]
    pub fn compute<'a, I>(graph: &TransactionGraph, accounts: I) -> Vec<Cycle>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut cycles = Vec::new();

        for start in accounts {
            let mut path = vec![start.clone()];
            let mut visited: HashSet<String> = HashSet::new();
            visited.insert(start.clone());
            Self::dfs(graph, start, &mut path, &mut visited, &mut seen, &mut cycles);
        }

        debug!(count = cycles.len(), "cycle enumeration complete");
        cycles
    }

    /// All accounts appearing in any cycle, in first-membership order.
    #[must_use]
    pub fn member_set(cycles: &[Cycle]) -> IndexSet<String> {
        cycles
            .iter()
            .flat_map(|c| c.members.iter().cloned())
            .collect()
    }

    fn dfs(
        graph: &TransactionGraph,
        start: &str,
        path: &mut Vec<String>,
        visited: &mut HashSet<String>,
        seen: &mut HashSet<String>,
        out: &mut Vec<Cycle>,
    ) {
        let current = path[path.len() - 1].clone();

        for neighbor in graph.receivers_of(&current) {
            if neighbor.as_str() == start {
                if path.len() >= MIN_CYCLE_LEN {
                    let members = canonicalize(path);
                    let cycle = Cycle { members };
                    if seen.insert(cycle.key()) {
                        out.push(cycle);
                    }
                }
            } else if !visited.contains(neighbor.as_str()) && path.len() < MAX_CYCLE_LEN {
                visited.insert(neighbor.clone());
                path.push(neighbor.clone());
                Self::dfs(graph, start, path, visited, seen, out);
                path.pop();
                visited.remove(neighbor.as_str());
            }
        }
    }
}

impl Detector for CycleRouting {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

/// Rotate so the lexicographically smallest member comes first.
///
/// Members of a simple cycle are distinct, so the smallest is unique and
/// the rotation is a total canonicalization. Direction is not reversed.
fn canonicalize(path: &[String]) -> Vec<String> {
    let min_idx = path
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map_or(0, |(i, _)| i);

    path.iter()
        .cycle()
        .skip(min_idx)
        .take(path.len())
        .cloned()
        .collect()
}
