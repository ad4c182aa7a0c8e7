//! Adaptive hints and the prediction snapshot that drives them.

use serde::{Deserialize, Serialize};

use crate::metrics::BehaviorMetrics;
use crate::session::RecentAction;

/// What kind of coaching a hint carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    /// Point at the next step of the current workflow
    NextStep,
    /// Suggest switching to a different workflow
    WorkflowSuggestion,
    /// Suggest a faster way through the current phase
    Optimization,
    /// Head off a known stuck point
    Prevention,
    /// Pure encouragement
    Encouragement,
}

/// When a hint should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintTiming {
    /// Show right away
    Immediate,
    /// Show after a short delay
    AfterDelay,
    /// Only when the user asks
    OnRequest,
    /// Surface ahead of a predicted need
    Predictive,
}

/// How urgent a hint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintPriority {
    /// Can be ignored freely
    Low,
    /// Worth a look
    Medium,
    /// Should be surfaced prominently
    High,
    /// Interrupt-worthy
    Urgent,
}

/// A single typed, prioritized hint. Output only; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveHint {
    /// What kind of hint this is
    pub kind: HintKind,

    /// Hint text
    pub content: String,

    /// Confidence in this hint, in [0, 1]; never exceeds the
    /// confidence of the context it was derived from
    pub confidence: f64,

    /// When to surface the hint
    pub timing: HintTiming,

    /// How urgent the hint is
    pub priority: HintPriority,

    /// Label of the context that produced the hint
    pub context_label: String,

    /// Human-readable tags naming the evidence that fired. For
    /// transparency and debugging, not for machine consumption.
    pub learning_basis: Vec<String>,
}

/// Snapshot of the current situation, assembled per decision point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictiveContext {
    /// Current workflow type
    pub workflow: String,

    /// Current phase label
    pub phase: String,

    /// Milliseconds spent in the current phase
    pub time_in_phase_ms: u64,

    /// Bounded recent-action history, oldest first
    pub recent_actions: Vec<RecentAction>,

    /// Snapshot of long-term behavior metrics
    pub behavior: BehaviorMetrics,

    /// Free-text session context
    pub session_context: String,

    /// Total elapsed working time this session, in milliseconds
    pub total_elapsed_ms: u64,

    /// Heuristic: is the user stuck in the current phase
    pub is_stuck: bool,

    /// Confidence in predictions for this workflow, in [0, 1]
    pub confidence: f64,
}
