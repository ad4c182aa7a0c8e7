//! The adaptive coach facade.
//!
//! One owner object per process wiring together the profile, progress
//! ledger, session tracker, pattern learner, and hint engine behind the
//! inbound call surface the protocol layer consumes. All in-memory
//! mutation is single-threaded by contract; the store is the only
//! fallible, potentially slow collaborator.

#![warn(missing_docs)]

use flowcoach_core::{
    Achievement, AdaptiveHint, FlowIntensity, FlowState, HintKind, LearningSession,
    Milestone, PredictiveContext, ProgressStats, UserProfile,
};
use flowcoach_learning::{
    build_predictive_context, evaluate_achievements, personalized_suggestions, HintEngine,
    PatternLearner, SessionTracker, Tuning,
};
use flowcoach_progress::ProgressLedger;
use flowcoach_storage::{ProfileStore, Result};
use tracing::info;

/// What a learning event newly earned: milestones to celebrate and
/// achievements unlocked by the event.
#[derive(Debug, Clone, Default)]
pub struct LearningOutcome {
    /// Progress milestones newly crossed
    pub milestones: Vec<Milestone>,

    /// Achievements newly unlocked
    pub achievements: Vec<Achievement>,
}

impl LearningOutcome {
    /// Whether the event earned anything worth celebrating.
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty() && self.achievements.is_empty()
    }
}

/// Single sequential owner of all adaptive-learning state.
pub struct AdaptiveCoach<S: ProfileStore> {
    store: S,
    profile: UserProfile,
    ledger: ProgressLedger,
    tracker: SessionTracker,
    learner: PatternLearner,
    hints: HintEngine,
    flow: FlowState,
    tuning: Tuning,
}

impl<S: ProfileStore> AdaptiveCoach<S> {
    /// Open a coach over the given store, loading the durable state.
    ///
    /// Missing or corrupt documents fall back to defaults; opening
    /// never fails because of bad stored data.
    pub async fn open(store: S) -> Self {
        Self::open_with_tuning(store, Tuning::default()).await
    }

    /// Open with explicit tuning constants.
    pub async fn open_with_tuning(store: S, tuning: Tuning) -> Self {
        let profile = store.load_profile_or_default().await;
        let ledger = ProgressLedger::from_stats(store.load_progress_or_default().await);
        let tracker = SessionTracker::new(profile.preferences.celebration, &tuning);
        let flow = FlowState {
            intensity: profile.preferences.flow_intensity,
            ..FlowState::default()
        };
        info!(profile = %profile.id, "adaptive coach opened");

        Self {
            store,
            profile,
            ledger,
            tracker,
            learner: PatternLearner::new(),
            hints: HintEngine::with_tuning(tuning.clone()),
            flow,
            tuning,
        }
    }

    /// Record one tool invocation.
    ///
    /// A payload with a truthy `"completed_step"` field also advances
    /// the progress ledger for the current workflow; the returned
    /// outcome carries any milestones that crossing earned.
    pub fn record_tool_usage(
        &mut self,
        tool: &str,
        payload: Option<&serde_json::Value>,
    ) -> LearningOutcome {
        let steps_before = self.tracker.session().steps_completed;
        self.tracker
            .record_tool_usage(&mut self.profile, tool, payload);

        let mut outcome = LearningOutcome::default();
        if self.tracker.session().steps_completed > steps_before {
            let workflow = self
                .tracker
                .current_workflow()
                .unwrap_or(&self.profile.preferences.default_workflow)
                .to_string();
            outcome.milestones = self.ledger.record_step_completion(&workflow, tool);
        }
        outcome
    }

    /// Record a workflow selection, with the free-text context that led
    /// to it. A change of workflow mid-session counts as a switch.
    pub fn record_workflow_usage(&mut self, workflow_type: &str, context: Option<&str>) {
        if let Some(current) = self.tracker.current_workflow() {
            if current != workflow_type {
                self.profile.behavior.workflow_switch_count += 1;
            }
        }
        self.learner
            .record_workflow_usage(&mut self.profile, workflow_type, context);
        self.tracker.note_workflow(workflow_type, context);
    }

    /// Record a finished workflow: learning, ledger, achievements, and
    /// the derived suggestion cache all update.
    pub fn record_workflow_completion(
        &mut self,
        workflow_type: &str,
        step_count: u32,
        minutes: f64,
        success: bool,
    ) -> LearningOutcome {
        self.learner
            .record_workflow_completion(&mut self.profile, workflow_type, minutes, success);
        let milestones =
            self.ledger
                .record_workflow_completion(workflow_type, step_count, minutes);
        let achievements =
            evaluate_achievements(&mut self.profile, self.ledger.stats(), &self.tuning);
        self.refresh_suggestions();

        LearningOutcome {
            milestones,
            achievements,
        }
    }

    /// Record the user accepting or rejecting a hint.
    pub fn record_hint_interaction(&mut self, accepted: bool) -> LearningOutcome {
        self.tracker
            .record_hint_interaction(&mut self.profile, accepted, &self.tuning);
        let achievements =
            evaluate_achievements(&mut self.profile, self.ledger.stats(), &self.tuning);
        self.refresh_suggestions();

        LearningOutcome {
            milestones: Vec::new(),
            achievements,
        }
    }

    /// Count an error observed this session.
    pub fn record_error(&mut self) {
        self.tracker.record_error();
    }

    /// Touch the activity timestamp without recording progress.
    pub fn record_progress_check(&mut self) {
        self.ledger.record_progress_check();
        self.profile.touch();
    }

    /// Note entry into a workflow phase; resets the stuck-detection clock.
    pub fn enter_phase(&mut self, workflow: &str, phase: &str) {
        self.tracker.enter_phase(workflow, phase);
    }

    /// Turn flow mode on or off and set its intensity.
    ///
    /// The intensity is remembered as a preference and drives the hint
    /// cooldown from the next decision point on.
    pub fn update_flow_state(&mut self, active: bool, intensity: FlowIntensity) {
        self.flow.active = active;
        self.flow.intensity = intensity;
        self.profile.preferences.flow_intensity = intensity;
        self.tracker.note_flow_active(active);
    }

    /// Assemble a prediction snapshot for the current decision point.
    pub fn generate_predictive_context(
        &self,
        workflow: &str,
        phase: &str,
        context: Option<&str>,
    ) -> PredictiveContext {
        build_predictive_context(
            &self.profile,
            &self.tracker,
            workflow,
            phase,
            context,
            &self.tuning,
        )
    }

    /// Decide whether the given context deserves a hint.
    ///
    /// Hint generation respects the learning-enabled preference and the
    /// flow-intensity cooldown; at most one hint per call.
    pub fn generate_adaptive_hint(&mut self, context: &PredictiveContext) -> Option<AdaptiveHint> {
        if !self.profile.preferences.learning_enabled {
            return None;
        }
        let hint = self
            .hints
            .generate_adaptive_hint(context, &self.profile, &mut self.flow)?;

        // A stuck phase that actually triggered prevention is worth
        // remembering as a stuck point for this workflow.
        if hint.kind == HintKind::Prevention && context.is_stuck {
            self.learner
                .record_stuck_point(&mut self.profile, &context.workflow, &context.phase);
        }
        Some(hint)
    }

    /// Current personalized suggestions (derived view, capped).
    pub fn personalized_suggestions(&self) -> Vec<String> {
        personalized_suggestions(&self.profile, &self.tuning)
    }

    /// The user profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The live session record.
    pub fn session(&self) -> &LearningSession {
        self.tracker.session()
    }

    /// Current progress counters.
    pub fn progress(&self) -> &ProgressStats {
        self.ledger.stats()
    }

    /// Current flow state.
    pub fn flow_state(&self) -> &FlowState {
        &self.flow
    }

    /// Persist the profile and progress counters.
    pub async fn save(&mut self) -> Result<()> {
        self.store.save_profile(&self.profile).await?;
        self.store.save_progress(self.ledger.stats()).await?;
        Ok(())
    }

    /// Fold the session into the profile and persist everything.
    ///
    /// Safe to call more than once; the session folds exactly once.
    pub async fn end_session(&mut self) -> Result<()> {
        self.tracker.end_session(&mut self.profile);
        self.save().await
    }

    fn refresh_suggestions(&mut self) {
        self.profile.personalized_suggestions =
            personalized_suggestions(&self.profile, &self.tuning);
    }
}
