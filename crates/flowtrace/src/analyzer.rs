//! Full pipeline driver: filter, index, detect, assemble, score, project.

use crate::report::{
    round1, round3, AnalysisResult, AnalysisSummary, EdgeRecord, FraudRing, NodeRecord,
    SuspiciousAccount,
};
use flowtrace_core::detector::{DetectorMetadata, PipelineStage};
use flowtrace_core::graph::TransactionGraph;
use flowtrace_core::pattern::{Pattern, RingPatternType};
use flowtrace_core::traits::Detector;
use flowtrace_core::types::{collect_stats, StatsTable, Transaction};
use flowtrace_detect::cycles::CycleRouting;
use flowtrace_detect::filter::LegitimacyFilter;
use flowtrace_detect::shell::ShellNetworks;
use flowtrace_detect::smurfing::SmurfingHubs;
use flowtrace_detect::types::{Cycle, Hub, LegitimacyResult, ShellChain, SmurfingResult};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

/// Analyze a transaction batch with a default-configured analyzer.
#[must_use]
pub fn analyze(transactions: &[Transaction]) -> AnalysisResult {
    FraudGraphAnalyzer::new().analyze(transactions)
}

/// Fraud-graph batch analyzer.
///
/// One invocation owns all state (ring counter, dedup keys); nothing is
/// shared across runs, and a run never observes I/O after the batch is
/// supplied.
#[derive(Debug, Clone)]
pub struct FraudGraphAnalyzer {
    metadata: DetectorMetadata,
}

impl Default for FraudGraphAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FraudGraphAnalyzer {
    /// Create a new analyzer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("analyzer/fraud-graph", PipelineStage::Assembly)
                .with_description("Money-muling pattern analysis over a transaction batch"),
        }
    }

    /// Analyze a transaction batch.
    ///
    /// The caller is responsible for input validation (column presence,
    /// parseable amounts); rows reach this entry point in file order.
    #[must_use]
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisResult {
        let started = Instant::now();

        // Ingestion snapshot: the unfiltered statistics table doubles as the
        // account universe, keyed in first-appearance order.
        let unfiltered_stats = collect_stats(transactions);

        let legitimacy = LegitimacyFilter::compute(transactions, &unfiltered_stats);

        if legitimacy.removed_all() {
            debug!("filter removed every transaction, skipping detection");
            return Self::project(
                transactions,
                &unfiltered_stats,
                &legitimacy,
                RingLedger::default(),
                Vec::new(),
                started,
            );
        }

        let graph = TransactionGraph::from_transactions(&legitimacy.filtered);
        let stats = collect_stats(&legitimacy.filtered);

        let cycles = CycleRouting::compute(&graph, stats.keys());
        let cycle_nodes: HashSet<String> =
            CycleRouting::member_set(&cycles).into_iter().collect();

        // Smurfing runs on the unfiltered batch; ring assembly arbitrates
        // legitimacy when candidates are accepted.
        let smurfing = SmurfingHubs::compute(transactions);

        let shells = ShellNetworks::compute(&graph, &stats, &cycle_nodes, stats.keys());

        let ledger = RingLedger::assemble(&cycles, &smurfing, &shells, &legitimacy.legitimate);
        let suspicious = score_accounts(&ledger, &stats, &smurfing);

        info!(
            accounts = unfiltered_stats.len(),
            rings = ledger.rings.len(),
            suspicious = suspicious.len(),
            "analysis complete"
        );

        Self::project(
            transactions,
            &unfiltered_stats,
            &legitimacy,
            ledger,
            suspicious,
            started,
        )
    }

    fn project(
        transactions: &[Transaction],
        unfiltered_stats: &StatsTable,
        legitimacy: &LegitimacyResult,
        ledger: RingLedger,
        suspicious: Vec<SuspiciousAccount>,
        started: Instant,
    ) -> AnalysisResult {
        let score_of: IndexMap<&str, f64> = suspicious
            .iter()
            .map(|s| (s.account_id.as_str(), s.suspicion_score))
            .collect();

        let mut nodes = Vec::with_capacity(unfiltered_stats.len());
        for (account, stats) in unfiltered_stats {
            let patterns: Vec<Pattern> = if legitimacy.legitimate.contains(account) {
                vec![Pattern::LegitimateBusiness]
            } else {
                ledger
                    .patterns
                    .get(account)
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default()
            };

            let score = score_of.get(account.as_str()).copied();
            nodes.push(NodeRecord {
                id: account.clone(),
                suspicious: score.is_some(),
                ring_ids: ledger.memberships.get(account).cloned().unwrap_or_default(),
                patterns,
                total_sent: stats.total_sent,
                total_received: stats.total_received,
                transaction_count: stats.total_transactions(),
                suspicion_score: score.unwrap_or(0.0),
            });
        }

        let edges: Vec<EdgeRecord> = transactions.iter().map(EdgeRecord::from).collect();

        let summary = AnalysisSummary {
            total_accounts_analyzed: unfiltered_stats.len(),
            suspicious_accounts_flagged: suspicious.len(),
            fraud_rings_detected: ledger.rings.len(),
            legitimate_accounts_filtered: legitimacy.legitimate.len(),
            processing_time_seconds: round3(started.elapsed().as_secs_f64()),
        };

        AnalysisResult {
            suspicious_accounts: suspicious,
            fraud_rings: ledger.rings,
            summary,
            nodes,
            edges,
        }
    }
}

impl Detector for FraudGraphAnalyzer {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}

// ============================================================================
// Ring Assembly
// ============================================================================

/// Accepted rings plus per-account membership bookkeeping.
///
/// Candidates arrive in a fixed order (cycles, fan-in, fan-out, shells);
/// a candidate whose pattern type and member set duplicate an earlier ring
/// is skipped without consuming an identifier.
#[derive(Debug, Default)]
struct RingLedger {
    rings: Vec<FraudRing>,
    /// account -> pattern labels, in first-detection order.
    patterns: IndexMap<String, IndexSet<Pattern>>,
    /// account -> ring identifiers, in join order.
    memberships: IndexMap<String, Vec<String>>,
    /// account -> number of cycle rings containing it.
    cycle_counts: IndexMap<String, usize>,
    seen_keys: HashSet<String>,
}

impl RingLedger {
    fn assemble(
        cycles: &[Cycle],
        smurfing: &SmurfingResult,
        shells: &[ShellChain],
        legitimate: &IndexSet<String>,
    ) -> Self {
        let mut ledger = Self::default();

        for cycle in cycles {
            ledger.accept(
                RingPatternType::Cycle,
                cycle.members.clone(),
                cycle_risk(cycle.len()),
                cycle.label(),
            );
        }
        for hub in &smurfing.fan_in {
            ledger.accept_hub(hub, legitimate);
        }
        for hub in &smurfing.fan_out {
            ledger.accept_hub(hub, legitimate);
        }
        for chain in shells {
            ledger.accept(
                RingPatternType::ShellNetwork,
                chain.members.clone(),
                shell_risk(chain.len()),
                Pattern::ShellNetwork,
            );
        }

        ledger
    }

    /// Accept a hub candidate, enforcing that legitimate accounts never
    /// join a ring: a legitimate hub voids the candidate, and legitimate
    /// counterparties are dropped from membership and the risk count.
    fn accept_hub(&mut self, hub: &Hub, legitimate: &IndexSet<String>) {
        if legitimate.contains(&hub.account) {
            debug!(hub = %hub.account, "legitimate hub candidate dropped");
            return;
        }

        let counterparties: Vec<String> = hub
            .counterparties
            .iter()
            .filter(|c| !legitimate.contains(*c))
            .cloned()
            .collect();
        if counterparties.is_empty() {
            return;
        }

        let mut members = Vec::with_capacity(counterparties.len() + 1);
        members.push(hub.account.clone());
        members.extend(counterparties.iter().cloned());

        self.accept(
            hub.direction.ring_pattern(),
            members,
            fan_risk(hub.temporal, counterparties.len()),
            hub.direction.label(),
        );
    }

    fn accept(
        &mut self,
        pattern_type: RingPatternType,
        members: Vec<String>,
        risk_score: f64,
        label: Pattern,
    ) {
        let mut sorted: Vec<&str> = members.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let key = format!("{}::{}", pattern_type.as_str(), sorted.join(","));
        if !self.seen_keys.insert(key) {
            return;
        }

        let ring_id = format!("RING_{:03}", self.rings.len() + 1);
        for member in &members {
            self.patterns.entry(member.clone()).or_default().insert(label);
            self.memberships
                .entry(member.clone())
                .or_default()
                .push(ring_id.clone());
            if pattern_type == RingPatternType::Cycle {
                *self.cycle_counts.entry(member.clone()).or_insert(0) += 1;
            }
        }

        self.rings.push(FraudRing {
            ring_id,
            member_accounts: members,
            pattern_type,
            risk_score,
        });
    }
}

fn cycle_risk(len: usize) -> f64 {
    round1((70.0 + 5.0 * len as f64).min(100.0))
}

fn fan_risk(temporal: bool, counterparties: usize) -> f64 {
    let temporal_component = if temporal { 25.0 } else { 10.0 };
    round1((60.0 + temporal_component + 0.5 * counterparties as f64).min(100.0))
}

fn shell_risk(len: usize) -> f64 {
    round1((50.0 + 8.0 * len as f64).min(100.0))
}

// ============================================================================
// Suspicion Scoring
// ============================================================================

/// Maximum cycle-multiplicity bonus steps.
const CYCLE_BONUS_CAP: usize = 3;

/// Compute composite scores for every ring-bearing account and sort by
/// score descending. The sort is stable, so ties keep pattern-map order.
fn score_accounts(
    ledger: &RingLedger,
    stats: &StatsTable,
    smurfing: &SmurfingResult,
) -> Vec<SuspiciousAccount> {
    let mut accounts = Vec::with_capacity(ledger.patterns.len());

    for (account, patterns) in &ledger.patterns {
        let mut score = 0.0;

        if patterns.iter().any(Pattern::is_cycle) {
            score += 35.0;
            let cycle_count = ledger.cycle_counts.get(account).copied().unwrap_or(0);
            score += cycle_count.saturating_sub(1).min(CYCLE_BONUS_CAP) as f64 * 10.0;
        }
        if patterns.contains(&Pattern::FanIn) {
            score += 25.0;
        }
        if patterns.contains(&Pattern::FanOut) {
            score += 25.0;
        }
        if patterns.contains(&Pattern::ShellNetwork) {
            score += 20.0;
        }
        if smurfing.hub_temporal(account) {
            score += 15.0;
        }
        if let Some(account_stats) = stats.get(account) {
            let ratio = account_stats.flow_ratio();
            if ratio > 0.7 && ratio < 1.0 {
                score += 10.0;
            }
        }

        let ring_id = ledger
            .memberships
            .get(account)
            .and_then(|m| m.first())
            .cloned()
            .unwrap_or_default();

        accounts.push(SuspiciousAccount {
            account_id: account.clone(),
            suspicion_score: round1(score.min(100.0)),
            detected_patterns: patterns.iter().copied().collect(),
            ring_id,
        });
    }

    accounts.sort_by(|a, b| {
        b.suspicion_score
            .partial_cmp(&a.suspicion_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    accounts
}
