//! Store trait abstraction.

use async_trait::async_trait;
use flowcoach_core::{ProgressStats, UserProfile};
use tracing::warn;

/// Error type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Store abstraction for the durable learning state.
///
/// One profile and one set of progress counters per installation. The
/// `*_or_default` loaders implement the recovery policy: a missing or
/// unreadable document is substituted with a default value and logged,
/// never surfaced to the caller as an error.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Save the user profile (create or update).
    async fn save_profile(&mut self, profile: &UserProfile) -> Result<()>;

    /// Load the user profile, if one has been saved.
    async fn load_profile(&self) -> Result<Option<UserProfile>>;

    /// Save the progress counters.
    async fn save_progress(&mut self, stats: &ProgressStats) -> Result<()>;

    /// Load the progress counters, if any have been saved.
    async fn load_progress(&self) -> Result<Option<ProgressStats>>;

    /// Load the profile, falling back to a fresh default on any failure.
    async fn load_profile_or_default(&self) -> UserProfile {
        match self.load_profile().await {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::new(),
            Err(e) => {
                warn!("falling back to default profile: {}", e);
                UserProfile::new()
            }
        }
    }

    /// Load the progress counters, falling back to zeroes on any failure.
    async fn load_progress_or_default(&self) -> ProgressStats {
        match self.load_progress().await {
            Ok(Some(stats)) => stats,
            Ok(None) => ProgressStats::default(),
            Err(e) => {
                warn!("falling back to default progress stats: {}", e);
                ProgressStats::default()
            }
        }
    }
}
