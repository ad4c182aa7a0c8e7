//! Progress counters, streaks, and celebration milestones.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Time;

/// Durable counters kept by the progress ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressStats {
    /// Total steps completed across all workflows
    pub total_steps: u64,

    /// Steps completed per workflow type
    pub steps_by_workflow: HashMap<String, u64>,

    /// Workflows completed
    pub workflows_completed: u64,

    /// Total minutes spent in completed workflows
    pub total_workflow_minutes: f64,

    /// Running mean of steps per completed workflow
    pub average_steps_per_workflow: f64,

    /// Consecutive calendar days with at least one completed step
    pub streak_days: u32,

    /// Calendar day of the most recent completed step
    pub last_step_date: Option<NaiveDate>,

    /// Last time any ledger operation ran
    pub last_activity: Time,
}

impl Default for ProgressStats {
    fn default() -> Self {
        Self {
            total_steps: 0,
            steps_by_workflow: HashMap::new(),
            workflows_completed: 0,
            total_workflow_minutes: 0.0,
            average_steps_per_workflow: 0.0,
            streak_days: 0,
            last_step_date: None,
            last_activity: Utc::now(),
        }
    }
}

/// A celebration threshold newly crossed by a ledger operation.
///
/// Returned from the mutating ledger calls so callers can celebrate
/// without polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Milestone {
    /// The very first completed step
    FirstStep,
    /// A total-steps threshold (10, 50, 100, ...)
    Steps(u64),
    /// The first completed workflow
    FirstWorkflow,
    /// A workflows-completed threshold
    Workflows(u64),
    /// A streak-length threshold in days
    StreakDays(u32),
}

impl Milestone {
    /// Celebration text for this milestone.
    pub fn message(&self) -> String {
        match self {
            Milestone::FirstStep => "First step completed!".to_string(),
            Milestone::Steps(n) => format!("{} steps completed!", n),
            Milestone::FirstWorkflow => "First workflow completed!".to_string(),
            Milestone::Workflows(n) => format!("{} workflows completed!", n),
            Milestone::StreakDays(n) => format!("{}-day streak!", n),
        }
    }
}
