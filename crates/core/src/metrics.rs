//! Long-term behavioral metrics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::profile::CelebrationLevel;

/// Cumulative behavioral metrics for a user.
///
/// All counters grow without bound by design; nothing here is evicted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorMetrics {
    /// Total recorded session time in minutes
    pub total_session_minutes: f64,

    /// Running mean session length in minutes
    pub average_session_minutes: f64,

    /// Number of sessions folded into the averages
    pub sessions_recorded: u32,

    /// Per-tool invocation counts
    pub tool_usage: HashMap<String, u32>,

    /// Celebration verbosity the user has settled on
    pub preferred_celebration: CelebrationLevel,

    /// How often the user switches workflows mid-session
    pub workflow_switch_count: u32,

    /// Exponentially-adapted fraction of hints the user accepts.
    /// Recent interactions move this faster than ancient ones.
    pub hint_acceptance_rate: f64,

    /// Total hint interactions observed (accept or reject)
    pub hint_interactions: u32,

    /// Sessions spent with flow mode active
    pub flow_sessions: u32,
}

impl Default for BehaviorMetrics {
    fn default() -> Self {
        Self {
            total_session_minutes: 0.0,
            average_session_minutes: 0.0,
            sessions_recorded: 0,
            tool_usage: HashMap::new(),
            preferred_celebration: CelebrationLevel::Full,
            workflow_switch_count: 0,
            hint_acceptance_rate: 0.5,
            hint_interactions: 0,
            flow_sessions: 0,
        }
    }
}

impl BehaviorMetrics {
    /// Count one invocation of a tool.
    pub fn record_tool_usage(&mut self, tool: &str) {
        *self.tool_usage.entry(tool.to_string()).or_insert(0) += 1;
    }

    /// Update the hint-acceptance rate with an exponential moving
    /// average so recent behavior dominates.
    pub fn record_hint_outcome(&mut self, accepted: bool, alpha: f64) {
        let outcome = if accepted { 1.0 } else { 0.0 };
        self.hint_acceptance_rate =
            self.hint_acceptance_rate * (1.0 - alpha) + outcome * alpha;
        self.hint_interactions += 1;
    }

    /// Fold a finished session's duration into the cumulative totals.
    pub fn record_session(&mut self, minutes: f64) {
        let minutes = if minutes.is_finite() && minutes > 0.0 {
            minutes
        } else {
            0.0
        };
        self.total_session_minutes += minutes;
        self.sessions_recorded += 1;
        self.average_session_minutes +=
            (minutes - self.average_session_minutes) / f64::from(self.sessions_recorded);
    }
}
