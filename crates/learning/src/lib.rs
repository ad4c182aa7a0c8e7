//! Adaptive learning and nudging for flowcoach.
//!
//! Consumes discrete usage events (tool invocations, workflow
//! selections, completions, hint interactions), aggregates them into
//! per-workflow and per-context statistics, and decides at each
//! decision point whether one typed, prioritized hint should surface.
//! Learning here is online aggregation of running rates and token
//! co-occurrence, not model training.

#![warn(missing_docs)]

mod tuning;

mod learner;
mod session;
mod predictor;
mod hints;
mod achievements;
mod suggestions;

pub use tuning::Tuning;

pub use learner::{tokenize, PatternLearner};
pub use session::SessionTracker;
pub use predictor::build_predictive_context;
pub use hints::HintEngine;
pub use achievements::evaluate_achievements;
pub use suggestions::personalized_suggestions;
