//! Ephemeral session tracking.

use std::collections::VecDeque;

use chrono::Utc;
use flowcoach_core::{
    CelebrationLevel, LearningSession, RecentAction, Time, UserProfile,
};
use tracing::debug;

use crate::tuning::Tuning;

/// Tracks one process lifetime's activity and folds it into the
/// profile's behavior metrics at session end.
///
/// Owns the bounded recent-action buffer and the phase clock used for
/// stuck detection. Not persisted; the session dies with the process.
#[derive(Debug)]
pub struct SessionTracker {
    session: LearningSession,
    recent_actions: VecDeque<RecentAction>,
    recent_action_cap: usize,
    current_workflow: Option<String>,
    current_phase: Option<String>,
    phase_entered_at: Time,
    flow_active_since: Option<Time>,
}

impl SessionTracker {
    /// Start tracking a new session.
    pub fn new(celebration: CelebrationLevel, tuning: &Tuning) -> Self {
        Self {
            session: LearningSession::new(celebration),
            recent_actions: VecDeque::new(),
            recent_action_cap: tuning.recent_action_cap,
            current_workflow: None,
            current_phase: None,
            phase_entered_at: Utc::now(),
            flow_active_since: None,
        }
    }

    /// The live session record.
    pub fn session(&self) -> &LearningSession {
        &self.session
    }

    /// Snapshot of the bounded recent-action history, oldest first.
    pub fn recent_actions(&self) -> Vec<RecentAction> {
        self.recent_actions.iter().cloned().collect()
    }

    /// Workflow currently in progress, if one has been entered.
    pub fn current_workflow(&self) -> Option<&str> {
        self.current_workflow.as_deref()
    }

    /// When the current phase was entered.
    pub fn phase_entered_at(&self) -> Time {
        self.phase_entered_at
    }

    /// Note entry into a workflow phase, resetting the phase clock when
    /// the phase actually changes.
    pub fn enter_phase(&mut self, workflow: &str, phase: &str) {
        let changed = self.current_workflow.as_deref() != Some(workflow)
            || self.current_phase.as_deref() != Some(phase);
        if changed {
            self.current_workflow = Some(workflow.to_string());
            self.current_phase = Some(phase.to_string());
            self.phase_entered_at = Utc::now();
        }
    }

    /// Note a workflow selection and the context that led to it.
    pub fn note_workflow(&mut self, workflow: &str, context: Option<&str>) {
        self.session.note_workflow(workflow);
        if let Some(context) = context {
            self.session.note_context(context);
        }
        self.current_workflow = Some(workflow.to_string());
    }

    /// Free-text contexts supplied so far, joined for overlap matching.
    pub fn combined_context(&self) -> String {
        self.session.contexts.join(" ")
    }

    /// Record one tool invocation.
    ///
    /// The per-tool counter always advances; a payload whose
    /// `"completed_step"` field is truthy additionally counts a
    /// completed step and lands an action marker in the bounded
    /// history (capacity-limited, oldest evicted first).
    pub fn record_tool_usage(
        &mut self,
        profile: &mut UserProfile,
        tool: &str,
        payload: Option<&serde_json::Value>,
    ) {
        profile.behavior.record_tool_usage(tool);
        profile.touch();

        if payload_signals_step(payload) {
            self.session.steps_completed += 1;
            self.push_action(tool);
        }
    }

    /// Record the user accepting or rejecting a hint.
    ///
    /// The profile's acceptance rate moves by exponential adaptation,
    /// so recent interactions outweigh ancient ones.
    pub fn record_hint_interaction(
        &mut self,
        profile: &mut UserProfile,
        accepted: bool,
        tuning: &Tuning,
    ) {
        if accepted {
            self.session.hints_accepted += 1;
        } else {
            self.session.hints_rejected += 1;
        }
        profile
            .behavior
            .record_hint_outcome(accepted, tuning.acceptance_alpha);
        profile.touch();
    }

    /// Count an error observed this session.
    pub fn record_error(&mut self) {
        self.session.error_count += 1;
    }

    /// Note that flow mode turned on or off, accumulating flow minutes.
    pub fn note_flow_active(&mut self, active: bool) {
        let now = Utc::now();
        match (active, self.flow_active_since) {
            (true, None) => self.flow_active_since = Some(now),
            (false, Some(since)) => {
                self.session.flow_minutes +=
                    now.signed_duration_since(since).num_milliseconds() as f64 / 60_000.0;
                self.flow_active_since = None;
            }
            _ => {}
        }
    }

    /// Fold the session into the profile's behavior metrics.
    ///
    /// Exactly-once: a session that has already ended is inert and a
    /// second call changes nothing.
    pub fn end_session(&mut self, profile: &mut UserProfile) {
        if self.session.is_ended() {
            return;
        }
        self.note_flow_active(false);
        self.session.ended_at = Some(Utc::now());

        profile.behavior.record_session(self.session.duration_minutes());
        if self.session.flow_minutes > 0.0 {
            profile.behavior.flow_sessions += 1;
        }
        profile.touch();
        debug!(
            session = %self.session.id,
            steps = self.session.steps_completed,
            "session folded into profile"
        );
    }

    fn push_action(&mut self, label: &str) {
        if self.recent_actions.len() >= self.recent_action_cap {
            self.recent_actions.pop_front();
        }
        self.recent_actions.push_back(RecentAction {
            label: label.to_string(),
            at: Utc::now(),
        });
    }
}

fn payload_signals_step(payload: Option<&serde_json::Value>) -> bool {
    payload
        .and_then(|p| p.get("completed_step"))
        .map(|v| v.as_bool().unwrap_or(false) || v.as_u64().unwrap_or(0) > 0)
        .unwrap_or(false)
}
