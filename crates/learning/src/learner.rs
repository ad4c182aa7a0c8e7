//! Incremental pattern learning from workflow usage and completions.

use std::collections::BTreeSet;

use chrono::Utc;
use flowcoach_core::{normalize_workflow_type, UserProfile};
use tracing::debug;

/// Extract normalized trigger words from free text.
///
/// Tokens are lower-cased, split on non-alphanumeric characters, and
/// kept only when longer than 3 characters. The result is a set, so
/// repeated calls with overlapping vocabulary are order-independent.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(str::to_string)
        .collect()
}

/// Updates workflow and context patterns as usage events arrive.
///
/// Stateless itself; all learned state lives on the [`UserProfile`]
/// aggregate, whose locate-or-create methods keep patterns unique by
/// key. Unknown workflow-type strings are accepted as-is: degrading
/// gracefully under noisy input beats rejecting it.
#[derive(Debug, Clone, Default)]
pub struct PatternLearner;

impl PatternLearner {
    /// Create a learner.
    pub fn new() -> Self {
        Self
    }

    /// Record that a workflow was selected, optionally with the
    /// free-text context that led to it.
    pub fn record_workflow_usage(
        &self,
        profile: &mut UserProfile,
        workflow_type: &str,
        context: Option<&str>,
    ) {
        let workflow_type = normalize_workflow_type(workflow_type);
        profile.pattern_mut(&workflow_type).last_used = Utc::now();

        if let Some(context) = context {
            let words = tokenize(context);
            if !words.is_empty() {
                profile.context_pattern_mut(&workflow_type).record_match(words);
                debug!(%workflow_type, "context pattern updated");
            }
        }
        profile.touch();
    }

    /// Record a finished workflow and fold it into the statistics.
    ///
    /// The completion rate becomes successes/total and the duration
    /// mean runs over all completions, failed ones included. Context
    /// patterns that chose this workflow take on the same success
    /// fraction.
    pub fn record_workflow_completion(
        &self,
        profile: &mut UserProfile,
        workflow_type: &str,
        minutes: f64,
        success: bool,
    ) {
        let workflow_type = normalize_workflow_type(workflow_type);
        let pattern = profile.pattern_mut(&workflow_type);
        pattern.record_completion(minutes, success);
        pattern.last_used = Utc::now();
        let success_rate = pattern.completion_rate.unwrap_or(0.0);

        for context in profile
            .context_patterns
            .iter_mut()
            .filter(|c| c.chosen_workflow == workflow_type)
        {
            context.success_rate = success_rate;
        }
        profile.touch();
        debug!(%workflow_type, success, "workflow completion learned");
    }

    /// Record which phase a workflow stalled in.
    pub fn record_stuck_point(
        &self,
        profile: &mut UserProfile,
        workflow_type: &str,
        phase: &str,
    ) {
        let workflow_type = normalize_workflow_type(workflow_type);
        profile.pattern_mut(&workflow_type).add_stuck_point(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_short_words() {
        let words = tokenize("Fix the API bug in the parser module");
        assert!(words.contains("parser"));
        assert!(words.contains("module"));
        assert!(!words.contains("the"));
        assert!(!words.contains("api"));
        assert!(!words.contains("bug"));
    }

    #[test]
    fn test_tokenize_lowercases_and_dedupes() {
        let words = tokenize("Parser PARSER parser, tests; Tests!");
        assert_eq!(words.len(), 2);
        assert!(words.contains("parser"));
        assert!(words.contains("tests"));
    }

    #[test]
    fn test_usage_creates_pattern_lazily() {
        let learner = PatternLearner::new();
        let mut profile = UserProfile::new();

        learner.record_workflow_usage(&mut profile, "tdd", None);
        assert_eq!(profile.workflow_patterns.len(), 1);
        assert!(profile.pattern("tdd").unwrap().completion_rate.is_none());
        assert!(profile.context_patterns.is_empty());
    }

    #[test]
    fn test_usage_with_context_builds_trigger_words() {
        let learner = PatternLearner::new();
        let mut profile = UserProfile::new();

        learner.record_workflow_usage(&mut profile, "tdd", Some("refactor the parser"));
        learner.record_workflow_usage(&mut profile, "tdd", Some("parser test coverage"));

        let pattern = profile.context_pattern("tdd").unwrap();
        assert_eq!(pattern.frequency, 2);
        assert!(pattern.trigger_words.contains("parser"));
        assert!(pattern.trigger_words.contains("refactor"));
        assert!(pattern.trigger_words.contains("coverage"));
    }

    #[test]
    fn test_completion_statistics_order_independent() {
        let learner = PatternLearner::new();
        let mut profile = UserProfile::new();

        for minutes in [25.0, 23.0, 21.0] {
            learner.record_workflow_completion(&mut profile, "tdd", minutes, true);
        }

        let pattern = profile.pattern("tdd").unwrap();
        assert_eq!(pattern.total_completions, 3);
        assert_eq!(pattern.completion_rate, Some(1.0));
        assert!((pattern.average_minutes - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_updates_context_success_rate() {
        let learner = PatternLearner::new();
        let mut profile = UserProfile::new();

        learner.record_workflow_usage(&mut profile, "tdd", Some("parser work"));
        learner.record_workflow_completion(&mut profile, "tdd", 20.0, true);
        learner.record_workflow_completion(&mut profile, "tdd", 20.0, false);

        let context = profile.context_pattern("tdd").unwrap();
        assert!((context.success_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_workflow_type_accepted() {
        let learner = PatternLearner::new();
        let mut profile = UserProfile::new();

        learner.record_workflow_completion(&mut profile, "totally-made-up", 5.0, true);
        assert!(profile.pattern("totally-made-up").is_some());
    }

    #[test]
    fn test_empty_workflow_type_normalized_to_default() {
        let learner = PatternLearner::new();
        let mut profile = UserProfile::new();

        learner.record_workflow_usage(&mut profile, "", None);
        assert!(profile.pattern("general").is_some());
    }
}
