//! Hint decision engine.
//!
//! One decision per call, in strict priority order: cooldown gate,
//! prevention, workflow suggestion, optimization, nothing. The cooldown
//! is a hard rate limit keyed on the flow intensity; no situation is
//! urgent enough to bypass it.

use chrono::Utc;
use flowcoach_core::{
    AdaptiveHint, FlowState, HintKind, HintPriority, HintTiming, PredictiveContext, Time,
    UserProfile,
};
use tracing::debug;

use crate::learner::tokenize;
use crate::tuning::Tuning;

/// Decides whether the current situation deserves a hint.
#[derive(Debug, Clone, Default)]
pub struct HintEngine {
    tuning: Tuning,
}

impl HintEngine {
    /// Create an engine with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit tuning.
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self { tuning }
    }

    /// Generate at most one hint for the given context.
    ///
    /// On emission the flow state's last-hint time advances, which is
    /// what feeds the cooldown gate on the next call. The returned
    /// hint's confidence never exceeds the context's own confidence.
    pub fn generate_adaptive_hint(
        &self,
        context: &PredictiveContext,
        profile: &UserProfile,
        flow: &mut FlowState,
    ) -> Option<AdaptiveHint> {
        self.generate_at(context, profile, flow, Utc::now())
    }

    fn generate_at(
        &self,
        context: &PredictiveContext,
        profile: &UserProfile,
        flow: &mut FlowState,
        now: Time,
    ) -> Option<AdaptiveHint> {
        if !flow.cooldown_elapsed(now) {
            debug!("hint suppressed by cooldown");
            return None;
        }

        let hint = self
            .prevention_hint(context, profile)
            .or_else(|| self.workflow_suggestion_hint(context, profile))
            .or_else(|| self.optimization_hint(context, profile))?;

        flow.mark_hint_emitted(now);
        Some(hint)
    }

    /// Prevention: the user looks stuck, or the current phase is a
    /// known stuck point for this workflow.
    fn prevention_hint(
        &self,
        context: &PredictiveContext,
        profile: &UserProfile,
    ) -> Option<AdaptiveHint> {
        let known_stuck_point = profile
            .pattern(&context.workflow)
            .map(|p| p.common_stuck_points.iter().any(|s| s == &context.phase))
            .unwrap_or(false);

        if !context.is_stuck && !known_stuck_point {
            return None;
        }

        let mut basis = Vec::new();
        if context.is_stuck {
            basis.push(format!(
                "no qualifying action for {} minutes in this phase",
                context.time_in_phase_ms / 60_000
            ));
        }
        if known_stuck_point {
            basis.push(format!(
                "'{}' is a recorded stuck point for {}",
                context.phase, context.workflow
            ));
        }

        Some(self.hint(
            context,
            HintKind::Prevention,
            format!(
                "The '{}' phase often takes a while. Try breaking the current step \
                 into something smaller, or revisit the phase guidance.",
                context.phase
            ),
            0.8,
            HintTiming::Immediate,
            HintPriority::High,
            basis,
        ))
    }

    /// Workflow suggestion: a learned context pattern overlaps the
    /// session context and points at a different workflow.
    fn workflow_suggestion_hint(
        &self,
        context: &PredictiveContext,
        profile: &UserProfile,
    ) -> Option<AdaptiveHint> {
        let context_words = tokenize(&context.session_context);
        if context_words.is_empty() {
            return None;
        }

        let mut best: Option<(f64, &flowcoach_core::ContextPattern)> = None;
        for pattern in &profile.context_patterns {
            if pattern.chosen_workflow == context.workflow || pattern.trigger_words.is_empty() {
                continue;
            }
            let overlap = jaccard(&context_words, &pattern.trigger_words);
            if overlap >= self.tuning.suggestion_overlap
                && best.map(|(score, _)| overlap > score).unwrap_or(true)
            {
                best = Some((overlap, pattern));
            }
        }
        let (overlap, pattern) = best?;

        Some(self.hint(
            context,
            HintKind::WorkflowSuggestion,
            format!(
                "This looks like work you've handled with the '{}' workflow before; \
                 it might fit better than '{}'.",
                pattern.chosen_workflow, context.workflow
            ),
            0.5 + overlap / 2.0,
            HintTiming::Predictive,
            HintPriority::Medium,
            vec![format!(
                "context overlaps {:.0}% with {} uses of '{}'",
                overlap * 100.0,
                pattern.frequency,
                pattern.chosen_workflow
            )],
        ))
    }

    /// Optimization: an experienced workflow is running meaningfully
    /// over its historical average for this phase.
    fn optimization_hint(
        &self,
        context: &PredictiveContext,
        profile: &UserProfile,
    ) -> Option<AdaptiveHint> {
        let pattern = profile.pattern(&context.workflow)?;
        if pattern.total_completions < self.tuning.optimization_min_completions {
            return None;
        }
        if pattern.average_minutes <= 0.0 {
            return None;
        }

        let phase_minutes = context.time_in_phase_ms as f64 / 60_000.0;
        if phase_minutes <= pattern.average_minutes * self.tuning.optimization_slowdown {
            return None;
        }

        Some(self.hint(
            context,
            HintKind::Optimization,
            format!(
                "You usually finish '{}' in about {:.0} minutes. If this phase is \
                 dragging, consider timeboxing it and moving on.",
                context.workflow, pattern.average_minutes
            ),
            0.6,
            HintTiming::AfterDelay,
            HintPriority::Low,
            vec![format!(
                "{} completions averaging {:.1} minutes",
                pattern.total_completions, pattern.average_minutes
            )],
        ))
    }

    fn hint(
        &self,
        context: &PredictiveContext,
        kind: HintKind,
        content: String,
        confidence: f64,
        timing: HintTiming,
        priority: HintPriority,
        learning_basis: Vec<String>,
    ) -> AdaptiveHint {
        AdaptiveHint {
            kind,
            content,
            // Never more confident than the prediction that fed us.
            confidence: confidence.min(context.confidence).clamp(0.0, 1.0),
            timing,
            priority,
            context_label: format!("{}/{}", context.workflow, context.phase),
            learning_basis,
        }
    }
}

/// Jaccard similarity between two token sets.
fn jaccard(
    a: &std::collections::BTreeSet<String>,
    b: &std::collections::BTreeSet<String>,
) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use flowcoach_core::BehaviorMetrics;

    fn context(workflow: &str, phase: &str) -> PredictiveContext {
        PredictiveContext {
            workflow: workflow.to_string(),
            phase: phase.to_string(),
            time_in_phase_ms: 0,
            recent_actions: Vec::new(),
            behavior: BehaviorMetrics::default(),
            session_context: String::new(),
            total_elapsed_ms: 0,
            is_stuck: false,
            confidence: 0.9,
        }
    }

    fn engine() -> HintEngine {
        HintEngine::new()
    }

    #[test]
    fn test_no_hint_for_calm_context() {
        let profile = UserProfile::new();
        let mut flow = FlowState::default();

        let hint = engine().generate_adaptive_hint(&context("tdd", "red"), &profile, &mut flow);
        assert!(hint.is_none());
        assert!(flow.last_hint_time.is_none());
    }

    #[test]
    fn test_stuck_context_yields_prevention() {
        let profile = UserProfile::new();
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "red");
        ctx.is_stuck = true;
        ctx.time_in_phase_ms = 600_000;

        let hint = engine()
            .generate_adaptive_hint(&ctx, &profile, &mut flow)
            .unwrap();
        assert_eq!(hint.kind, HintKind::Prevention);
        assert_eq!(hint.priority, HintPriority::High);
        assert_eq!(hint.timing, HintTiming::Immediate);
        assert!(!hint.learning_basis.is_empty());
        assert!(flow.last_hint_time.is_some());
    }

    #[test]
    fn test_known_stuck_point_yields_prevention() {
        let mut profile = UserProfile::new();
        profile.pattern_mut("tdd").add_stuck_point("refactor");
        let mut flow = FlowState::default();

        let hint = engine()
            .generate_adaptive_hint(&context("tdd", "refactor"), &profile, &mut flow)
            .unwrap();
        assert_eq!(hint.kind, HintKind::Prevention);
    }

    #[test]
    fn test_cooldown_suppresses_even_when_stuck() {
        let profile = UserProfile::new();
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "red");
        ctx.is_stuck = true;

        let now = Utc::now();
        let first = engine().generate_at(&ctx, &profile, &mut flow, now);
        assert!(first.is_some());

        let second =
            engine().generate_at(&ctx, &profile, &mut flow, now + Duration::seconds(5));
        assert!(second.is_none());

        let third =
            engine().generate_at(&ctx, &profile, &mut flow, now + Duration::seconds(31));
        assert!(third.is_some());
    }

    #[test]
    fn test_workflow_suggestion_from_context_overlap() {
        let mut profile = UserProfile::new();
        profile.context_pattern_mut("bugfix").record_match([
            "crash".to_string(),
            "stacktrace".to_string(),
            "regression".to_string(),
        ]);
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "red");
        ctx.session_context = "chasing a crash regression".to_string();

        let hint = engine()
            .generate_adaptive_hint(&ctx, &profile, &mut flow)
            .unwrap();
        assert_eq!(hint.kind, HintKind::WorkflowSuggestion);
        assert_eq!(hint.timing, HintTiming::Predictive);
        assert!(hint.content.contains("bugfix"));
    }

    #[test]
    fn test_no_suggestion_for_same_workflow() {
        let mut profile = UserProfile::new();
        profile
            .context_pattern_mut("tdd")
            .record_match(["parser".to_string(), "tests".to_string()]);
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "red");
        ctx.session_context = "parser tests".to_string();

        let hint = engine().generate_adaptive_hint(&ctx, &profile, &mut flow);
        assert!(hint.is_none());
    }

    #[test]
    fn test_optimization_for_experienced_slow_phase() {
        let mut profile = UserProfile::new();
        for _ in 0..6 {
            profile.pattern_mut("tdd").record_completion(10.0, true);
        }
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "green");
        // 20 minutes in phase against a 10-minute average.
        ctx.time_in_phase_ms = 20 * 60_000;
        ctx.confidence = 0.9;

        let hint = engine()
            .generate_adaptive_hint(&ctx, &profile, &mut flow)
            .unwrap();
        assert_eq!(hint.kind, HintKind::Optimization);
        assert_eq!(hint.priority, HintPriority::Low);
    }

    #[test]
    fn test_no_optimization_without_experience() {
        let mut profile = UserProfile::new();
        profile.pattern_mut("tdd").record_completion(10.0, true);
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "green");
        ctx.time_in_phase_ms = 60 * 60_000;

        let hint = engine().generate_adaptive_hint(&ctx, &profile, &mut flow);
        assert!(hint.is_none());
    }

    #[test]
    fn test_hint_confidence_capped_by_context() {
        let profile = UserProfile::new();
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "red");
        ctx.is_stuck = true;
        ctx.confidence = 0.4;

        let hint = engine()
            .generate_adaptive_hint(&ctx, &profile, &mut flow)
            .unwrap();
        assert!(hint.confidence <= 0.4);
    }

    #[test]
    fn test_prevention_outranks_suggestion() {
        let mut profile = UserProfile::new();
        profile
            .context_pattern_mut("bugfix")
            .record_match(["crash".to_string()]);
        let mut flow = FlowState::default();
        let mut ctx = context("tdd", "red");
        ctx.is_stuck = true;
        ctx.session_context = "crash".to_string();

        let hint = engine()
            .generate_adaptive_hint(&ctx, &profile, &mut flow)
            .unwrap();
        assert_eq!(hint.kind, HintKind::Prevention);
    }

    #[test]
    fn test_jaccard() {
        let a: std::collections::BTreeSet<String> =
            ["crash", "regression"].iter().map(|s| s.to_string()).collect();
        let b: std::collections::BTreeSet<String> =
            ["crash", "stacktrace", "regression"].iter().map(|s| s.to_string()).collect();
        assert!((jaccard(&a, &b) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(jaccard(&Default::default(), &Default::default()), 0.0);
    }
}
