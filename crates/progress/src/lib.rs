//! Progress ledger for flowcoach.
//!
//! Append-only counters and streak bookkeeping for completed steps and
//! workflows. No learning lives here; the ledger is pure aggregation,
//! and every mutating call reports the milestones it newly crossed.

#![warn(missing_docs)]

mod ledger;

pub use ledger::ProgressLedger;
