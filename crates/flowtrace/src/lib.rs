//! # Flowtrace
//!
//! Financial-transaction graph analyzer targeting money-muling patterns.
//!
//! Flowtrace ingests a batch of directed, amount-and-timestamp annotated
//! transfers and emits suspicious accounts with composite scores, detected
//! fraud rings, per-account aggregate statistics, and a summary.
//!
//! ## Detected patterns
//!
//! - **Circular fund routing** - simple directed cycles of length 3-5
//! - **Smurfing** - fan-in / fan-out hubs with 72-hour temporal clustering
//! - **Layered shell networks** - directed chains through low-activity
//!   intermediaries
//!
//! ## Pipeline
//!
//! Legitimate business traffic is filtered first; cycle members are claimed
//! before shell chains; rings are deduplicated by member set and pattern
//! type; composite suspicion scores combine pattern membership, cycle
//! multiplicity, temporal flags, and flow balance.
//!
//! ## Quick start
//!
//! ```rust
//! use flowtrace::prelude::*;
//!
//! let transactions = vec![
//!     Transaction::new("T1", "A", "B", 100.0, "2024-01-01T00:00:00Z"),
//!     Transaction::new("T2", "B", "C", 100.0, "2024-01-01T01:00:00Z"),
//!     Transaction::new("T3", "C", "A", 100.0, "2024-01-01T02:00:00Z"),
//! ];
//!
//! let result = flowtrace::analyze(&transactions);
//! assert_eq!(result.fraud_rings.len(), 1);
//! assert_eq!(result.fraud_rings[0].ring_id, "RING_001");
//! ```
//!
//! The analyzer is single-threaded, synchronous, and deterministic: the same
//! batch yields bit-identical output, excluding the elapsed-time field.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export workspace crates
pub use flowtrace_core as core;
pub use flowtrace_detect as detect;

pub mod analyzer;
pub mod report;

pub use analyzer::{analyze, FraudGraphAnalyzer};
pub use report::{
    AnalysisResult, AnalysisSummary, EdgeRecord, FraudRing, NodeRecord, SuspiciousAccount,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analyzer::{analyze, FraudGraphAnalyzer};
    pub use crate::report::{
        AnalysisResult, AnalysisSummary, EdgeRecord, FraudRing, NodeRecord, SuspiciousAccount,
    };
    pub use flowtrace_core::prelude::*;
    pub use flowtrace_detect::prelude::*;
}
