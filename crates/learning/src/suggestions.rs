//! Personalized suggestions: a derived view over the profile.

use flowcoach_core::UserProfile;

use crate::tuning::Tuning;

/// Project the profile into a short list of personalized suggestions.
///
/// Stateless: nothing here mutates the profile, and the output can be
/// recomputed at any time. Candidates are scored and the list is capped
/// rather than dumped exhaustively.
pub fn personalized_suggestions(profile: &UserProfile, tuning: &Tuning) -> Vec<String> {
    let mut candidates: Vec<(f64, String)> = Vec::new();

    for pattern in &profile.workflow_patterns {
        if pattern.total_completions >= tuning.excel_min_completions {
            if let Some(rate) = pattern.completion_rate {
                if rate >= tuning.excel_rate {
                    candidates.push((
                        rate + f64::from(pattern.total_completions) / 100.0,
                        format!(
                            "You excel at the '{}' workflow ({:.0}% completion rate)",
                            pattern.workflow_type,
                            rate * 100.0
                        ),
                    ));
                }
            }
        }
    }

    for pattern in &profile.context_patterns {
        if pattern.frequency >= tuning.context_frequency_bound
            && !pattern.trigger_words.is_empty()
        {
            let words = pattern.top_trigger_words(3).join(", ");
            candidates.push((
                0.5 + f64::from(pattern.frequency) / 100.0,
                format!(
                    "Try the '{}' workflow when working on: {}",
                    pattern.chosen_workflow, words
                ),
            ));
        }
    }

    let behavior = &profile.behavior;
    if behavior.hint_interactions >= tuning.acceptance_min_interactions {
        if behavior.hint_acceptance_rate < tuning.low_acceptance {
            candidates.push((
                0.4,
                "Hints don't seem to land for you; consider switching flow \
                 intensity to 'whisper'"
                    .to_string(),
            ));
        } else if behavior.hint_acceptance_rate >= tuning.high_acceptance {
            candidates.push((
                0.4,
                "You act on most hints; a more active flow mode could help you \
                 move even faster"
                    .to_string(),
            ));
        }
    }

    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    candidates
        .into_iter()
        .take(tuning.max_suggestions)
        .map(|(_, text)| text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_yields_no_suggestions() {
        let profile = UserProfile::new();
        assert!(personalized_suggestions(&profile, &Tuning::default()).is_empty());
    }

    #[test]
    fn test_excel_suggestion_for_strong_workflow() {
        let mut profile = UserProfile::new();
        for _ in 0..5 {
            profile.pattern_mut("tdd").record_completion(20.0, true);
        }

        let suggestions = personalized_suggestions(&profile, &Tuning::default());
        assert!(suggestions.iter().any(|s| s.contains("excel") && s.contains("tdd")));
    }

    #[test]
    fn test_no_excel_suggestion_below_sample_floor() {
        let mut profile = UserProfile::new();
        profile.pattern_mut("tdd").record_completion(20.0, true);

        assert!(personalized_suggestions(&profile, &Tuning::default()).is_empty());
    }

    #[test]
    fn test_context_suggestion_includes_trigger_words() {
        let mut profile = UserProfile::new();
        let pattern = profile.context_pattern_mut("bugfix");
        for _ in 0..5 {
            pattern.record_match(["crash".to_string(), "stacktrace".to_string()]);
        }

        let suggestions = personalized_suggestions(&profile, &Tuning::default());
        assert!(suggestions
            .iter()
            .any(|s| s.contains("bugfix") && s.contains("crash")));
    }

    #[test]
    fn test_low_acceptance_suggests_whisper() {
        let mut profile = UserProfile::new();
        for _ in 0..30 {
            profile.behavior.record_hint_outcome(false, 0.1);
        }

        let suggestions = personalized_suggestions(&profile, &Tuning::default());
        assert!(suggestions.iter().any(|s| s.contains("whisper")));
    }

    #[test]
    fn test_output_capped_at_three() {
        let mut profile = UserProfile::new();
        for workflow in ["tdd", "bugfix", "refactor", "review", "spike"] {
            for _ in 0..5 {
                profile.pattern_mut(workflow).record_completion(20.0, true);
            }
        }

        let suggestions = personalized_suggestions(&profile, &Tuning::default());
        assert_eq!(suggestions.len(), 3);
    }
}
