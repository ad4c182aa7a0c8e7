//! Flow-mode state and hint pacing.

use serde::{Deserialize, Serialize};

use crate::Time;

/// How aggressively hints are surfaced.
///
/// Each intensity maps monotonically to a cooldown between hints; the
/// mapping lives here so call sites never branch on intensity directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowIntensity {
    /// Rare, quiet nudges
    Whisper,
    /// Occasional hints
    Gentle,
    /// Frequent hints
    Active,
}

impl FlowIntensity {
    /// Minimum gap between two emitted hints, in milliseconds.
    pub fn hint_cooldown_ms(self) -> i64 {
        match self {
            FlowIntensity::Whisper => 120_000,
            FlowIntensity::Gentle => 30_000,
            FlowIntensity::Active => 15_000,
        }
    }
}

/// Process-wide flow state; one active instance per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowState {
    /// Whether flow mode is on
    pub active: bool,

    /// Current intensity
    pub intensity: FlowIntensity,

    /// Whether ambient awareness messages are enabled
    pub ambient_awareness: bool,

    /// Whether progress tracking messages are enabled
    pub progress_tracking: bool,

    /// Whether predictive hints are enabled
    pub predictive_hints: bool,

    /// When the last hint was emitted; feeds the cooldown gate
    pub last_hint_time: Option<Time>,

    /// What this session is focused on
    pub session_focus: String,

    /// Interruptions observed this session
    pub interruption_count: u32,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            active: false,
            intensity: FlowIntensity::Gentle,
            ambient_awareness: true,
            progress_tracking: true,
            predictive_hints: true,
            last_hint_time: None,
            session_focus: String::new(),
            interruption_count: 0,
        }
    }
}

impl FlowState {
    /// Whether the cooldown since the last hint has elapsed at `now`.
    pub fn cooldown_elapsed(&self, now: Time) -> bool {
        match self.last_hint_time {
            None => true,
            Some(last) => {
                now.signed_duration_since(last).num_milliseconds()
                    >= self.intensity.hint_cooldown_ms()
            }
        }
    }

    /// Record that a hint was just emitted.
    pub fn mark_hint_emitted(&mut self, now: Time) {
        self.last_hint_time = Some(now);
    }
}
