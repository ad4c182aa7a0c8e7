//! Durable user profile: the long-term learned state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::flow::FlowIntensity;
use crate::id::ProfileId;
use crate::metrics::BehaviorMetrics;
use crate::pattern::{ContextPattern, WorkflowPattern};
use crate::{Time, DEFAULT_WORKFLOW};

/// How loudly progress is celebrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelebrationLevel {
    /// No celebration messages
    Off,
    /// Short acknowledgements only
    Minimal,
    /// Full celebration messages
    Full,
}

/// User preferences that survive restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Workflow to assume when none is chosen
    pub default_workflow: String,

    /// Celebration verbosity
    pub celebration: CelebrationLevel,

    /// Whether adaptive learning is enabled at all
    pub learning_enabled: bool,

    /// Preferred flow intensity for hint pacing
    pub flow_intensity: FlowIntensity,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_workflow: DEFAULT_WORKFLOW.to_string(),
            celebration: CelebrationLevel::Full,
            learning_enabled: true,
            flow_intensity: FlowIntensity::Gentle,
        }
    }
}

/// A one-time badge unlocked when a usage threshold is crossed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable identifier, unique within a profile
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// What was achieved
    pub description: String,

    /// Fixed at first unlock; never updated afterwards
    pub unlocked_at: Time,
}

/// The durable, versioned record of everything learned about a user.
///
/// All mutation of the nested collections goes through the narrow
/// methods below so the by-key uniqueness invariants hold without
/// caller discipline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity of this profile
    pub id: ProfileId,

    /// When the profile was first created
    pub created_at: Time,

    /// Last time any activity touched the profile
    pub last_active: Time,

    /// One pattern per distinct workflow type
    pub workflow_patterns: Vec<WorkflowPattern>,

    /// One pattern per distinct chosen workflow
    pub context_patterns: Vec<ContextPattern>,

    /// Long-term behavioral metrics
    pub behavior: BehaviorMetrics,

    /// User preferences
    pub preferences: Preferences,

    /// Unlocked achievements, unique by id
    pub achievements: Vec<Achievement>,

    /// Derived suggestion cache; recomputed after learning events,
    /// never treated as a source of truth
    pub personalized_suggestions: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            created_at: now,
            last_active: now,
            workflow_patterns: Vec::new(),
            context_patterns: Vec::new(),
            behavior: BehaviorMetrics::default(),
            preferences: Preferences::default(),
            achievements: Vec::new(),
            personalized_suggestions: Vec::new(),
        }
    }
}

impl UserProfile {
    /// Create a fresh profile with default preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch the last-active timestamp.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// Look up the workflow pattern for a type, if any.
    pub fn pattern(&self, workflow_type: &str) -> Option<&WorkflowPattern> {
        self.workflow_patterns
            .iter()
            .find(|p| p.workflow_type == workflow_type)
    }

    /// Locate or create the workflow pattern for a type.
    ///
    /// This is the only way patterns enter the profile, which keeps the
    /// one-pattern-per-type invariant structural.
    pub fn pattern_mut(&mut self, workflow_type: &str) -> &mut WorkflowPattern {
        let idx = match self
            .workflow_patterns
            .iter()
            .position(|p| p.workflow_type == workflow_type)
        {
            Some(i) => i,
            None => {
                self.workflow_patterns
                    .push(WorkflowPattern::new(workflow_type));
                self.workflow_patterns.len() - 1
            }
        };
        &mut self.workflow_patterns[idx]
    }

    /// Look up the context pattern for a chosen workflow, if any.
    pub fn context_pattern(&self, chosen_workflow: &str) -> Option<&ContextPattern> {
        self.context_patterns
            .iter()
            .find(|p| p.chosen_workflow == chosen_workflow)
    }

    /// Locate or create the context pattern for a chosen workflow.
    pub fn context_pattern_mut(&mut self, chosen_workflow: &str) -> &mut ContextPattern {
        let idx = match self
            .context_patterns
            .iter()
            .position(|p| p.chosen_workflow == chosen_workflow)
        {
            Some(i) => i,
            None => {
                self.context_patterns
                    .push(ContextPattern::new(chosen_workflow));
                self.context_patterns.len() - 1
            }
        };
        &mut self.context_patterns[idx]
    }

    /// Whether an achievement id has already been unlocked.
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    /// Unlock an achievement exactly once.
    ///
    /// Returns true if the achievement was newly unlocked; an id already
    /// present is left untouched (first-unlock timestamp included).
    pub fn unlock_achievement(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
    ) -> bool {
        if self.has_achievement(id) {
            return false;
        }
        self.achievements.push(Achievement {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            unlocked_at: Utc::now(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_mut_locate_or_create() {
        let mut profile = UserProfile::new();
        profile.pattern_mut("tdd").total_completions = 3;
        profile.pattern_mut("tdd").last_used = Utc::now();
        profile.pattern_mut("bugfix");

        assert_eq!(profile.workflow_patterns.len(), 2);
        assert_eq!(profile.pattern("tdd").unwrap().total_completions, 3);
    }

    #[test]
    fn test_context_pattern_aggregates_per_workflow() {
        let mut profile = UserProfile::new();
        profile
            .context_pattern_mut("tdd")
            .record_match(["parser".to_string()]);
        profile
            .context_pattern_mut("tdd")
            .record_match(["tests".to_string()]);

        assert_eq!(profile.context_patterns.len(), 1);
        assert_eq!(profile.context_patterns[0].frequency, 2);
    }

    #[test]
    fn test_achievement_unlock_idempotent() {
        let mut profile = UserProfile::new();
        assert!(profile.unlock_achievement("tdd-master", "Tdd Master", "10 completions"));
        let first_unlock = profile.achievements[0].unlocked_at;

        assert!(!profile.unlock_achievement("tdd-master", "Tdd Master", "10 completions"));
        assert_eq!(profile.achievements.len(), 1);
        assert_eq!(profile.achievements[0].unlocked_at, first_unlock);
    }

    #[test]
    fn test_profile_json_round_trip_keeps_timestamps_typed() {
        let mut profile = UserProfile::new();
        profile.pattern_mut("tdd").record_completion(25.0, true);
        profile.unlock_achievement("first-steps", "First Steps", "Completed a step");

        let json = serde_json::to_string(&profile).unwrap();
        let loaded: UserProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.id, profile.id);
        assert_eq!(loaded.created_at, profile.created_at);
        assert_eq!(
            loaded.workflow_patterns[0].last_used,
            profile.workflow_patterns[0].last_used
        );
        assert_eq!(
            loaded.achievements[0].unlocked_at,
            profile.achievements[0].unlocked_at
        );
        let rate = loaded.workflow_patterns[0].completion_rate.unwrap();
        assert!((rate - 1.0).abs() < 1e-9);
    }
}
