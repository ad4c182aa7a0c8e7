//! flowcoach core data models.
//!
//! This crate defines the data structures shared by the adaptive
//! learning and nudging subsystem: the durable user profile, the
//! ephemeral learning session, and the transient hint/prediction types.

#![warn(missing_docs)]

// Identities
mod id;

// Durable learned state
mod profile;
mod pattern;
mod metrics;

// Ephemeral and transient state
mod session;
mod hint;
mod flow;

// Progress bookkeeping
mod progress;

// Re-exports
pub use id::*;

pub use profile::{Achievement, CelebrationLevel, Preferences, UserProfile};
pub use pattern::{ContextPattern, WorkflowPattern};
pub use metrics::BehaviorMetrics;

pub use session::{LearningSession, RecentAction};
pub use hint::{AdaptiveHint, HintKind, HintPriority, HintTiming, PredictiveContext};
pub use flow::{FlowIntensity, FlowState};

pub use progress::{Milestone, ProgressStats};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Workflow key used when a caller supplies no (or an empty) workflow type.
pub const DEFAULT_WORKFLOW: &str = "general";

/// Normalize a caller-supplied workflow type key.
///
/// Arbitrary strings are accepted as-is; only empty or whitespace-only
/// input is replaced with [`DEFAULT_WORKFLOW`].
pub fn normalize_workflow_type(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_WORKFLOW.to_string()
    } else {
        trimmed.to_string()
    }
}
