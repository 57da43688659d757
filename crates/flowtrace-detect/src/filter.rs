//! Legitimate-business account filtering.
//!
//! Payroll, rent, vendor, utility, and merchant accounts produce dense
//! fan-in/fan-out traffic that would otherwise flood the detectors with
//! false positives. This stage classifies such accounts by name keyword or
//! behavioral signature and removes every transaction touching one.

use crate::types::LegitimacyResult;
use flowtrace_core::detector::{DetectorMetadata, PipelineStage};
use flowtrace_core::traits::Detector;
use flowtrace_core::types::{coefficient_of_variation, AccountStats, StatsTable, Transaction};
use indexmap::IndexSet;
use tracing::debug;

/// Keyword fragments marking an account name as a legitimate business.
/// Matched against the uppercased account identifier.
const BUSINESS_KEYWORDS: &[&str] = &[
    // corporate suffixes
    "COMPANY", "CORP", "INC", "LLC", "LTD", "ENTERPRISE",
    // payroll
    "PAYROLL", "SALARY", "WAGE", "HR_", "HUMAN_RESOURCE",
    // property
    "RENT", "LANDLORD", "PROPERTY", "REALTY", "HOUSING",
    // supply chain
    "VENDOR", "SUPPLIER", "SUPPLY", "WHOLESALE",
    // retail
    "GROCERY", "STORE", "SHOP", "MARKET", "RETAIL",
    // utilities
    "UTILITY", "ELECTRIC", "WATER", "GAS_CO", "POWER",
    // insurance and banking
    "INSURANCE", "INSURE", "BANK", "CREDIT_UNION", "MORTGAGE",
    // public sector
    "GOVERNMENT", "GOV_", "TAX_", "IRS",
    // education
    "SCHOOL", "UNIVERSITY", "COLLEGE",
    // healthcare
    "HOSPITAL", "CLINIC", "MEDICAL", "HEALTH",
    // communications
    "TELECOM", "PHONE", "MOBILE", "INTERNET",
    // subscriptions
    "SUBSCRIPTION", "NETFLIX", "SPOTIFY",
];

/// Maximum coefficient of variation for uniform-amount signatures.
const UNIFORM_CV: f64 = 0.3;
/// Maximum flow ratio for one-directional signatures.
const ONE_DIRECTIONAL_RATIO: f64 = 0.15;

/// Legitimacy filter stage.
///
/// An account is legitimate when its name contains a business keyword or
/// its aggregate statistics match a payroll, rent-collector, merchant, or
/// pure-payer signature.
#[derive(Debug, Clone)]
pub struct LegitimacyFilter {
    metadata: DetectorMetadata,
}

impl Default for LegitimacyFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl LegitimacyFilter {
    /// Create a new legitimacy filter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectorMetadata::new("detect/legitimacy-filter", PipelineStage::Prefilter)
                .with_description("Legitimate business classification and suppression"),
        }
    }

    /// Classify legitimate accounts and drop every transaction touching one.
    ///
    /// `stats` must be the table computed over the same unfiltered batch;
    /// its key order defines the classification order.
    #[must_use]
    pub fn compute(transactions: &[Transaction], stats: &StatsTable) -> LegitimacyResult {
        let mut legitimate: IndexSet<String> = IndexSet::new();

        for (account, account_stats) in stats {
            if Self::is_legitimate(account, account_stats) {
                legitimate.insert(account.clone());
            }
        }

        let filtered: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| {
                !legitimate.contains(&tx.sender_id) && !legitimate.contains(&tx.receiver_id)
            })
            .cloned()
            .collect();

        debug!(
            legitimate = legitimate.len(),
            remaining = filtered.len(),
            removed = transactions.len() - filtered.len(),
            "legitimacy filter applied"
        );

        LegitimacyResult {
            legitimate,
            filtered,
        }
    }

    /// True when any classification rule matches.
    fn is_legitimate(account: &str, stats: &AccountStats) -> bool {
        Self::matches_keyword(account)
            || Self::payroll_signature(stats)
            || Self::rent_collector_signature(stats)
            || Self::merchant_signature(stats)
            || Self::pure_payer_signature(stats)
    }

    /// Name match against the business keyword list.
    fn matches_keyword(account: &str) -> bool {
        let upper = account.to_uppercase();
        BUSINESS_KEYWORDS.iter().any(|kw| upper.contains(kw))
    }

    /// Flow strongly skewed to one direction.
    ///
    /// Both directions must be present: a ratio of exactly 0 means the
    /// account has never moved money the other way at all, and the
    /// behavioral signatures leave such accounts to the hub detectors.
    fn skewed_flow(stats: &AccountStats) -> bool {
        let ratio = stats.flow_ratio();
        ratio > 0.0 && ratio < ONE_DIRECTIONAL_RATIO
    }

    /// Many distinct receivers, uniform outgoing amounts, skewed flow.
    fn payroll_signature(stats: &AccountStats) -> bool {
        stats.unique_receivers() >= 5
            && stats.send_count >= 5
            && coefficient_of_variation(&stats.sent_amounts).map_or(false, |cv| cv < UNIFORM_CV)
            && Self::skewed_flow(stats)
    }

    /// Many distinct senders, uniform incoming amounts, skewed flow.
    fn rent_collector_signature(stats: &AccountStats) -> bool {
        stats.unique_senders() >= 5
            && stats.receive_count >= 5
            && coefficient_of_variation(&stats.received_amounts).map_or(false, |cv| cv < UNIFORM_CV)
            && Self::skewed_flow(stats)
    }

    /// Many payers, few payees, receipts dominating payments more than 5:1.
    fn merchant_signature(stats: &AccountStats) -> bool {
        stats.unique_senders() >= 8
            && stats.unique_receivers() <= 3
            && stats.total_sent > 0.0
            && stats.total_received > 5.0 * stats.total_sent
    }

    /// Many payees, at most one payer, payments dominating receipts more
    /// than 5:1.
    fn pure_payer_signature(stats: &AccountStats) -> bool {
        stats.unique_receivers() >= 5
            && stats.unique_senders() <= 1
            && stats.total_received > 0.0
            && stats.total_sent > 5.0 * stats.total_received
    }
}

impl Detector for LegitimacyFilter {
    fn metadata(&self) -> &DetectorMetadata {
        &self.metadata
    }
}
