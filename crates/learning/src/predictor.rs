//! Predictive context assembly: stuck detection and confidence scoring.

use chrono::Utc;
use flowcoach_core::{
    normalize_workflow_type, PredictiveContext, RecentAction, Time, UserProfile,
    WorkflowPattern,
};

use crate::session::SessionTracker;
use crate::tuning::Tuning;

/// Assemble a prediction snapshot for the current decision point.
///
/// Elapsed phase time comes from the tracker's phase clock; callers
/// that measure time themselves can use [`assemble_context`] directly.
pub fn build_predictive_context(
    profile: &UserProfile,
    tracker: &SessionTracker,
    workflow: &str,
    phase: &str,
    session_context: Option<&str>,
    tuning: &Tuning,
) -> PredictiveContext {
    let now = Utc::now();
    let time_in_phase_ms = now
        .signed_duration_since(tracker.phase_entered_at())
        .num_milliseconds()
        .max(0) as u64;
    let total_elapsed_ms = now
        .signed_duration_since(tracker.session().started_at)
        .num_milliseconds()
        .max(0) as u64;
    let session_context = match session_context {
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => tracker.combined_context(),
    };

    assemble_context(
        profile,
        workflow,
        phase,
        time_in_phase_ms,
        total_elapsed_ms,
        tracker.recent_actions(),
        session_context,
        now,
        tuning,
    )
}

/// Pure context assembly from caller-supplied measurements.
#[allow(clippy::too_many_arguments)]
pub fn assemble_context(
    profile: &UserProfile,
    workflow: &str,
    phase: &str,
    time_in_phase_ms: u64,
    total_elapsed_ms: u64,
    recent_actions: Vec<RecentAction>,
    session_context: String,
    now: Time,
    tuning: &Tuning,
) -> PredictiveContext {
    let workflow = normalize_workflow_type(workflow);
    let is_stuck = stuck(time_in_phase_ms, &recent_actions, now, tuning);
    let confidence = workflow_confidence(profile.pattern(&workflow), tuning);

    PredictiveContext {
        workflow,
        phase: phase.to_string(),
        time_in_phase_ms,
        recent_actions,
        behavior: profile.behavior.clone(),
        session_context,
        total_elapsed_ms,
        is_stuck,
        confidence,
    }
}

/// Stuck heuristic: the phase has outlasted the threshold and no
/// qualifying action landed within that same window.
fn stuck(
    time_in_phase_ms: u64,
    recent_actions: &[RecentAction],
    now: Time,
    tuning: &Tuning,
) -> bool {
    if (time_in_phase_ms as i64) <= tuning.stuck_threshold_ms {
        return false;
    }
    let recent_action = recent_actions.iter().rev().any(|a| {
        now.signed_duration_since(a.at).num_milliseconds() < tuning.stuck_threshold_ms
    });
    !recent_action
}

/// Confidence in predictions for a workflow, clamped to [0, 1].
///
/// A workflow with no completion history sits at the neutral 0.5. With
/// history, a sample weight of n / (n + prior) blends the prior toward
/// the completion rate scaled by a ceiling below 1.0, so confidence
/// grows with both sample size and success but never reaches certainty.
pub fn workflow_confidence(pattern: Option<&WorkflowPattern>, tuning: &Tuning) -> f64 {
    const NEUTRAL: f64 = 0.5;

    let Some(pattern) = pattern else {
        return NEUTRAL;
    };
    let (Some(rate), n) = (pattern.completion_rate, pattern.total_completions) else {
        return NEUTRAL;
    };
    if n == 0 {
        return NEUTRAL;
    }

    let n = f64::from(n);
    let weight = n / (n + tuning.confidence_prior_weight);
    let target = rate.clamp(0.0, 1.0) * tuning.confidence_ceiling;
    (NEUTRAL + (target - NEUTRAL) * weight).clamp(0.0, 1.0)
}
