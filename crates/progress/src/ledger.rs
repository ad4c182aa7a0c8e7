//! Step/workflow counters, day-granularity streaks, milestone detection.

use chrono::{NaiveDate, Utc};
use flowcoach_core::{normalize_workflow_type, Milestone, ProgressStats};
use tracing::debug;

const STEP_MILESTONES: &[u64] = &[10, 50, 100, 500];
const WORKFLOW_MILESTONES: &[u64] = &[5, 25, 100];
const STREAK_MILESTONES: &[u32] = &[3, 7, 14, 30];

/// Append-only progress bookkeeping.
///
/// Owns the durable [`ProgressStats`] counters; callers persist the
/// stats through the store between processes.
#[derive(Debug, Clone, Default)]
pub struct ProgressLedger {
    stats: ProgressStats,
}

impl ProgressLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a ledger from previously persisted counters.
    pub fn from_stats(stats: ProgressStats) -> Self {
        Self { stats }
    }

    /// Current counters.
    pub fn stats(&self) -> &ProgressStats {
        &self.stats
    }

    /// Record one completed step.
    ///
    /// Bumps the total and per-workflow counters and advances the
    /// calendar-day streak, which moves at most once per day no matter
    /// how many steps land on that day. Returns milestones newly crossed.
    pub fn record_step_completion(
        &mut self,
        workflow_type: &str,
        description: &str,
    ) -> Vec<Milestone> {
        self.record_step_on(workflow_type, description, Utc::now().date_naive())
    }

    fn record_step_on(
        &mut self,
        workflow_type: &str,
        description: &str,
        today: NaiveDate,
    ) -> Vec<Milestone> {
        let workflow_type = normalize_workflow_type(workflow_type);
        let mut milestones = Vec::new();

        self.stats.total_steps += 1;
        *self
            .stats
            .steps_by_workflow
            .entry(workflow_type.clone())
            .or_insert(0) += 1;
        debug!(%workflow_type, description, total = self.stats.total_steps, "step completed");

        if self.stats.total_steps == 1 {
            milestones.push(Milestone::FirstStep);
        } else if STEP_MILESTONES.contains(&self.stats.total_steps) {
            milestones.push(Milestone::Steps(self.stats.total_steps));
        }

        let streak_before = self.stats.streak_days;
        match self.stats.last_step_date {
            Some(last) if last == today => {
                // Same day: streak already counted.
            }
            Some(last) if today.signed_duration_since(last).num_days() == 1 => {
                self.stats.streak_days += 1;
            }
            _ => {
                self.stats.streak_days = 1;
            }
        }
        self.stats.last_step_date = Some(today);

        if self.stats.streak_days != streak_before
            && STREAK_MILESTONES.contains(&self.stats.streak_days)
        {
            milestones.push(Milestone::StreakDays(self.stats.streak_days));
        }

        self.stats.last_activity = Utc::now();
        milestones
    }

    /// Record one completed workflow.
    ///
    /// Returns milestones newly crossed.
    pub fn record_workflow_completion(
        &mut self,
        workflow_type: &str,
        step_count: u32,
        duration_minutes: f64,
    ) -> Vec<Milestone> {
        let workflow_type = normalize_workflow_type(workflow_type);
        let minutes = if duration_minutes.is_finite() && duration_minutes > 0.0 {
            duration_minutes
        } else {
            0.0
        };

        self.stats.workflows_completed += 1;
        self.stats.total_workflow_minutes += minutes;
        self.stats.average_steps_per_workflow += (f64::from(step_count)
            - self.stats.average_steps_per_workflow)
            / self.stats.workflows_completed as f64;
        self.stats.last_activity = Utc::now();
        debug!(
            %workflow_type,
            completed = self.stats.workflows_completed,
            "workflow completed"
        );

        let mut milestones = Vec::new();
        if self.stats.workflows_completed == 1 {
            milestones.push(Milestone::FirstWorkflow);
        } else if WORKFLOW_MILESTONES.contains(&self.stats.workflows_completed) {
            milestones.push(Milestone::Workflows(self.stats.workflows_completed));
        }
        milestones
    }

    /// Record a progress check: touches the activity timestamp only.
    pub fn record_progress_check(&mut self) -> Vec<Milestone> {
        self.stats.last_activity = Utc::now();
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_step_milestone() {
        let mut ledger = ProgressLedger::new();
        let milestones = ledger.record_step_completion("tdd", "wrote failing test");
        assert_eq!(milestones, vec![Milestone::FirstStep]);
        assert_eq!(ledger.stats().total_steps, 1);
        assert_eq!(ledger.stats().steps_by_workflow["tdd"], 1);
    }

    #[test]
    fn test_step_milestones_fire_exactly_once() {
        let mut ledger = ProgressLedger::new();
        let mut crossed = Vec::new();
        for i in 0..60 {
            crossed.extend(ledger.record_step_completion("tdd", &format!("step {}", i)));
        }
        assert_eq!(
            crossed
                .iter()
                .filter(|m| matches!(m, Milestone::Steps(10)))
                .count(),
            1
        );
        assert_eq!(
            crossed
                .iter()
                .filter(|m| matches!(m, Milestone::Steps(50)))
                .count(),
            1
        );
    }

    #[test]
    fn test_streak_advances_once_per_day() {
        let mut ledger = ProgressLedger::new();
        let monday = day(2026, 8, 24);

        ledger.record_step_on("tdd", "a", monday);
        ledger.record_step_on("tdd", "b", monday);
        ledger.record_step_on("tdd", "c", monday);
        assert_eq!(ledger.stats().streak_days, 1);

        ledger.record_step_on("tdd", "d", day(2026, 8, 25));
        assert_eq!(ledger.stats().streak_days, 2);
    }

    #[test]
    fn test_streak_resets_after_gap() {
        let mut ledger = ProgressLedger::new();
        ledger.record_step_on("tdd", "a", day(2026, 8, 24));
        ledger.record_step_on("tdd", "b", day(2026, 8, 25));
        assert_eq!(ledger.stats().streak_days, 2);

        ledger.record_step_on("tdd", "c", day(2026, 8, 28));
        assert_eq!(ledger.stats().streak_days, 1);
    }

    #[test]
    fn test_streak_milestone_on_third_day() {
        let mut ledger = ProgressLedger::new();
        ledger.record_step_on("tdd", "a", day(2026, 8, 24));
        ledger.record_step_on("tdd", "b", day(2026, 8, 25));
        let milestones = ledger.record_step_on("tdd", "c", day(2026, 8, 26));
        assert!(milestones.contains(&Milestone::StreakDays(3)));
    }

    #[test]
    fn test_workflow_completion_running_mean() {
        let mut ledger = ProgressLedger::new();
        let first = ledger.record_workflow_completion("tdd", 4, 25.0);
        assert_eq!(first, vec![Milestone::FirstWorkflow]);

        ledger.record_workflow_completion("tdd", 8, 35.0);
        let stats = ledger.stats();
        assert_eq!(stats.workflows_completed, 2);
        assert!((stats.average_steps_per_workflow - 6.0).abs() < 1e-9);
        assert!((stats.total_workflow_minutes - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_duration_normalized() {
        let mut ledger = ProgressLedger::new();
        ledger.record_workflow_completion("tdd", 4, -30.0);
        assert_eq!(ledger.stats().total_workflow_minutes, 0.0);
    }

    #[test]
    fn test_progress_check_touches_activity_only() {
        let mut ledger = ProgressLedger::new();
        let before = ledger.stats().clone();
        let milestones = ledger.record_progress_check();

        assert!(milestones.is_empty());
        assert_eq!(ledger.stats().total_steps, before.total_steps);
        assert_eq!(ledger.stats().streak_days, before.streak_days);
        assert!(ledger.stats().last_activity >= before.last_activity);
    }

    #[test]
    fn test_empty_workflow_type_normalized() {
        let mut ledger = ProgressLedger::new();
        ledger.record_step_completion("", "step");
        assert_eq!(ledger.stats().steps_by_workflow["general"], 1);
    }
}
