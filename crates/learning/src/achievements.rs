//! Idempotent achievement evaluation.

use flowcoach_core::{Achievement, ProgressStats, UserProfile};
use tracing::debug;

use crate::tuning::Tuning;

/// Evaluate the fixed achievement table against current state.
///
/// Pure function of the profile and progress counters: no randomness,
/// so re-running against identical state is a no-op. Unlocking goes
/// through the profile's id-checked method, which keeps ids unique and
/// first-unlock timestamps fixed. Returns the achievements newly
/// unlocked by this call.
pub fn evaluate_achievements(
    profile: &mut UserProfile,
    progress: &ProgressStats,
    tuning: &Tuning,
) -> Vec<Achievement> {
    let mut candidates: Vec<(String, String, String)> = Vec::new();

    for pattern in &profile.workflow_patterns {
        if pattern.total_completions >= tuning.mastery_completions {
            candidates.push((
                format!("{}-master", pattern.workflow_type),
                format!("{} Master", title_case(&pattern.workflow_type)),
                format!(
                    "Completed the {} workflow {} times",
                    pattern.workflow_type, tuning.mastery_completions
                ),
            ));
        }
    }

    if profile.behavior.hint_interactions >= tuning.enthusiast_min_interactions
        && profile.behavior.hint_acceptance_rate >= tuning.enthusiast_rate
    {
        candidates.push((
            "learning-enthusiast".to_string(),
            "Learning Enthusiast".to_string(),
            "Consistently acted on coaching hints".to_string(),
        ));
    }

    if progress.streak_days >= tuning.streak_achievement_days {
        candidates.push((
            "week-streak".to_string(),
            "Week Streak".to_string(),
            format!(
                "Completed steps on {} consecutive days",
                tuning.streak_achievement_days
            ),
        ));
    }

    if progress.workflows_completed >= tuning.veteran_workflows {
        candidates.push((
            "workflow-veteran".to_string(),
            "Workflow Veteran".to_string(),
            format!("Completed {} workflows", tuning.veteran_workflows),
        ));
    }

    if profile.behavior.flow_sessions >= tuning.flow_master_sessions {
        candidates.push((
            "flow-master".to_string(),
            "Flow Master".to_string(),
            format!(
                "Worked {} sessions in flow mode",
                tuning.flow_master_sessions
            ),
        ));
    }

    let mut unlocked = Vec::new();
    for (id, title, description) in candidates {
        if profile.unlock_achievement(&id, &title, &description) {
            debug!(%id, "achievement unlocked");
            if let Some(achievement) = profile.achievements.last() {
                unlocked.push(achievement.clone());
            }
        }
    }
    unlocked
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
