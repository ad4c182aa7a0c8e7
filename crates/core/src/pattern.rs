//! Learned workflow and context patterns.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::Time;

/// Learned statistics for one workflow type.
///
/// There is exactly one pattern per distinct workflow type; callers go
/// through [`crate::UserProfile::pattern_mut`] rather than constructing
/// duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPattern {
    /// Workflow type key (arbitrary caller-supplied string)
    pub workflow_type: String,

    /// Fraction of completions marked successful, in [0, 1].
    /// Undefined (None) until at least one completion is recorded.
    pub completion_rate: Option<f64>,

    /// Running mean duration in minutes over all completions,
    /// failed ones included
    pub average_minutes: f64,

    /// Phase names where this workflow commonly stalls
    pub common_stuck_points: Vec<String>,

    /// When this workflow was last used
    pub last_used: Time,

    /// Total completions recorded
    pub total_completions: u32,

    /// Completions marked successful
    pub successful_completions: u32,
}

impl WorkflowPattern {
    /// Create a fresh pattern for a workflow type, with no history.
    pub fn new(workflow_type: impl Into<String>) -> Self {
        Self {
            workflow_type: workflow_type.into(),
            completion_rate: None,
            average_minutes: 0.0,
            common_stuck_points: Vec::new(),
            last_used: Utc::now(),
            total_completions: 0,
            successful_completions: 0,
        }
    }

    /// Fold one completion into the running statistics.
    ///
    /// Negative durations are normalized to zero rather than rejected.
    pub fn record_completion(&mut self, minutes: f64, success: bool) {
        let minutes = if minutes.is_finite() && minutes > 0.0 {
            minutes
        } else {
            0.0
        };

        self.total_completions += 1;
        if success {
            self.successful_completions += 1;
        }
        self.completion_rate =
            Some(f64::from(self.successful_completions) / f64::from(self.total_completions));
        self.average_minutes +=
            (minutes - self.average_minutes) / f64::from(self.total_completions);
    }

    /// Note a phase as a common stuck point, keeping the list deduplicated.
    pub fn add_stuck_point(&mut self, phase: &str) {
        if !self.common_stuck_points.iter().any(|p| p == phase) {
            self.common_stuck_points.push(phase.to_string());
        }
    }
}

/// Association between free-text working contexts and a chosen workflow.
///
/// One pattern per distinct chosen workflow; repeated matches aggregate
/// into it instead of fanning out per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextPattern {
    /// The workflow this context historically led to
    pub chosen_workflow: String,

    /// Normalized trigger tokens (lower-case, length > 3). Accumulates
    /// across matches and never shrinks.
    pub trigger_words: BTreeSet<String>,

    /// How many times this pattern has matched
    pub frequency: u32,

    /// Fraction of uses later marked successful, in [0, 1]
    pub success_rate: f64,

    /// When this pattern last matched
    pub last_matched: Time,
}

impl ContextPattern {
    /// Create a fresh pattern for a chosen workflow.
    pub fn new(chosen_workflow: impl Into<String>) -> Self {
        Self {
            chosen_workflow: chosen_workflow.into(),
            trigger_words: BTreeSet::new(),
            frequency: 0,
            success_rate: 0.0,
            last_matched: Utc::now(),
        }
    }

    /// Union new trigger words into the set and count the match.
    pub fn record_match<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.trigger_words.extend(words);
        self.frequency += 1;
        self.last_matched = Utc::now();
    }

    /// The most frequently useful trigger words, capped at `limit`.
    ///
    /// The set carries no per-word counts, so "top" means first in the
    /// stable (sorted) iteration order.
    pub fn top_trigger_words(&self, limit: usize) -> Vec<&str> {
        self.trigger_words
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}
