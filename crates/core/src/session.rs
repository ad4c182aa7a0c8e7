//! Ephemeral per-process learning session.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::id::SessionId;
use crate::profile::CelebrationLevel;
use crate::Time;

/// One entry in the bounded recent-action history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentAction {
    /// Short action label, e.g. the tool name
    pub label: String,

    /// When the action happened
    pub at: Time,
}

/// Ephemeral record of one process lifetime's activity.
///
/// Folded into [`crate::BehaviorMetrics`] exactly once at session end;
/// an ended session is inert and further folds are no-ops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSession {
    /// Identity of this session
    pub id: SessionId,

    /// When the session started
    pub started_at: Time,

    /// Set once when the session is folded; None while live
    pub ended_at: Option<Time>,

    /// Workflow types touched during the session, in order of first use
    pub workflows_used: Vec<String>,

    /// Free-text contexts supplied during the session
    pub contexts: Vec<String>,

    /// Hints the user accepted
    pub hints_accepted: u32,

    /// Hints the user rejected
    pub hints_rejected: u32,

    /// Celebration verbosity in effect for this session
    pub celebration: CelebrationLevel,

    /// Steps completed this session
    pub steps_completed: u32,

    /// Errors observed this session
    pub error_count: u32,

    /// Minutes spent with flow mode active
    pub flow_minutes: f64,
}

impl LearningSession {
    /// Start a new session.
    pub fn new(celebration: CelebrationLevel) -> Self {
        Self {
            id: SessionId::new(),
            started_at: Utc::now(),
            ended_at: None,
            workflows_used: Vec::new(),
            contexts: Vec::new(),
            hints_accepted: 0,
            hints_rejected: 0,
            celebration,
            steps_completed: 0,
            error_count: 0,
            flow_minutes: 0.0,
        }
    }

    /// Whether the session has already been folded.
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Session duration in minutes, up to now or to the fold point.
    pub fn duration_minutes(&self) -> f64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        end.signed_duration_since(self.started_at)
            .num_milliseconds() as f64
            / 60_000.0
    }

    /// Note a workflow as used, keeping first-use order without duplicates.
    pub fn note_workflow(&mut self, workflow_type: &str) {
        if !self.workflows_used.iter().any(|w| w == workflow_type) {
            self.workflows_used.push(workflow_type.to_string());
        }
    }

    /// Note a free-text context supplied by the user.
    pub fn note_context(&mut self, context: &str) {
        if !context.trim().is_empty() {
            self.contexts.push(context.to_string());
        }
    }
}
