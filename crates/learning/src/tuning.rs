//! Product-tuning constants.

/// Named tuning constants for the learning subsystem.
///
/// These are product knobs, not load-bearing algorithmic choices;
/// tests pin the defaults so changes here are deliberate.
#[derive(Debug, Clone)]
pub struct Tuning {
    /// Phase time before a user can be considered stuck, in milliseconds
    pub stuck_threshold_ms: i64,

    /// EMA weight for new hint interactions; higher means recent
    /// behavior dominates faster
    pub acceptance_alpha: f64,

    /// Jaccard overlap between context tokens and trigger words needed
    /// before a workflow suggestion fires
    pub suggestion_overlap: f64,

    /// Completions needed before optimization hints are considered
    pub optimization_min_completions: u32,

    /// Phase time must exceed the historical average by this factor
    /// before an optimization hint fires
    pub optimization_slowdown: f64,

    /// Pseudo-count blending confidence toward the neutral prior:
    /// sample weight is n / (n + this)
    pub confidence_prior_weight: f64,

    /// Upper bound confidence approaches but never reaches
    pub confidence_ceiling: f64,

    /// Cap on the recent-action history buffer
    pub recent_action_cap: usize,

    /// Per-type completions that unlock the mastery achievement
    pub mastery_completions: u32,

    /// Acceptance rate and interaction floor for the learning
    /// enthusiast achievement
    pub enthusiast_rate: f64,
    /// Minimum interactions before the enthusiast rate counts as sustained
    pub enthusiast_min_interactions: u32,

    /// Streak length in days that unlocks the streak achievement
    pub streak_achievement_days: u32,

    /// Completed workflows that unlock the veteran achievement
    pub veteran_workflows: u64,

    /// Flow sessions that unlock the flow mastery achievement
    pub flow_master_sessions: u32,

    /// Completion rate treated as "excels at" in suggestions
    pub excel_rate: f64,
    /// Minimum completions before a completion rate is trusted
    pub excel_min_completions: u32,

    /// Context-pattern frequency before it is suggested
    pub context_frequency_bound: u32,

    /// Acceptance rate below which whisper mode is suggested
    pub low_acceptance: f64,
    /// Acceptance rate above which active mode is suggested
    pub high_acceptance: f64,
    /// Minimum interactions before acceptance-based suggestions fire
    pub acceptance_min_interactions: u32,

    /// Maximum personalized suggestions returned
    pub max_suggestions: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            stuck_threshold_ms: 5 * 60 * 1000,
            acceptance_alpha: 0.1,
            suggestion_overlap: 0.3,
            optimization_min_completions: 5,
            optimization_slowdown: 1.5,
            confidence_prior_weight: 3.0,
            confidence_ceiling: 0.95,
            recent_action_cap: 50,
            mastery_completions: 10,
            enthusiast_rate: 0.8,
            enthusiast_min_interactions: 20,
            streak_achievement_days: 7,
            veteran_workflows: 50,
            flow_master_sessions: 10,
            excel_rate: 0.8,
            excel_min_completions: 3,
            context_frequency_bound: 5,
            low_acceptance: 0.3,
            high_acceptance: 0.7,
            acceptance_min_interactions: 10,
            max_suggestions: 3,
        }
    }
}
