//! JSON file store implementation.
//!
//! Stores the profile and progress counters as JSON documents under a
//! caller-supplied root directory. Writes are atomic from the caller's
//! perspective: content lands in a temporary file which is then renamed
//! over the real document, so a crash mid-write never leaves a
//! half-written file for the next load. Timestamps round-trip as
//! ISO-8601 strings via chrono's serde support, uniformly for every
//! nested field.

use std::path::{Path, PathBuf};

use flowcoach_core::{ProgressStats, UserProfile};
use tokio::fs;

use super::{ProfileStore, Result};

const PROFILE_FILE: &str = "profile.json";
const PROGRESS_FILE: &str = "progress.json";

/// File-based JSON store backend.
pub struct JsonProfileStore {
    root: PathBuf,
}

impl JsonProfileStore {
    /// Create a store rooted at the given directory, creating it if needed.
    ///
    /// The store does not discover its own location; the root is always
    /// caller-supplied.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn profile_path(&self) -> PathBuf {
        self.root.join(PROFILE_FILE)
    }

    fn progress_path(&self) -> PathBuf {
        self.root.join(PROGRESS_FILE)
    }
}

#[async_trait::async_trait]
impl ProfileStore for JsonProfileStore {
    async fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        write_json_atomic(&self.profile_path(), profile).await
    }

    async fn load_profile(&self) -> Result<Option<UserProfile>> {
        read_json(&self.profile_path()).await
    }

    async fn save_progress(&mut self, stats: &ProgressStats) -> Result<()> {
        write_json_atomic(&self.progress_path(), stats).await
    }

    async fn load_progress(&self) -> Result<Option<ProgressStats>> {
        read_json(&self.progress_path()).await
    }
}

/// Write a document to `path` via a sibling temp file and a rename.
async fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowcoach_core::CelebrationLevel;

    #[tokio::test]
    async fn test_profile_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonProfileStore::new(dir.path()).await.unwrap();

        let mut profile = UserProfile::new();
        profile.pattern_mut("tdd").record_completion(25.0, true);
        profile.pattern_mut("tdd").record_completion(23.0, true);
        profile
            .context_pattern_mut("tdd")
            .record_match(["parser".to_string(), "tests".to_string()]);
        profile.preferences.celebration = CelebrationLevel::Minimal;
        profile.unlock_achievement("first-steps", "First Steps", "Completed a step");

        store.save_profile(&profile).await.unwrap();

        // A fresh store instance models a process restart.
        let store = JsonProfileStore::new(dir.path()).await.unwrap();
        let loaded = store.load_profile().await.unwrap().unwrap();

        assert_eq!(loaded.id, profile.id);
        assert_eq!(loaded.workflow_patterns.len(), 1);
        assert_eq!(loaded.context_patterns.len(), 1);
        assert_eq!(loaded.preferences.celebration, CelebrationLevel::Minimal);

        let pattern = loaded.pattern("tdd").unwrap();
        assert_eq!(pattern.total_completions, 2);
        assert!((pattern.completion_rate.unwrap() - 1.0).abs() < 1e-9);
        assert!((pattern.average_minutes - 24.0).abs() < 1e-9);

        // Nested timestamps come back as date values, not strings.
        assert_eq!(pattern.last_used, profile.pattern("tdd").unwrap().last_used);
        assert_eq!(
            loaded.achievements[0].unlocked_at,
            profile.achievements[0].unlocked_at
        );
    }

    #[tokio::test]
    async fn test_missing_profile_loads_as_none_and_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonProfileStore::new(dir.path()).await.unwrap();

        assert!(store.load_profile().await.unwrap().is_none());

        let profile = store.load_profile_or_default().await;
        assert!(profile.workflow_patterns.is_empty());
        assert!(profile.achievements.is_empty());
        assert!(!profile.id.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_profile_falls_back_to_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonProfileStore::new(dir.path()).await.unwrap();

        tokio::fs::write(dir.path().join(PROFILE_FILE), b"{not json")
            .await
            .unwrap();

        assert!(store.load_profile().await.is_err());

        let profile = store.load_profile_or_default().await;
        assert!(profile.workflow_patterns.is_empty());
    }

    #[tokio::test]
    async fn test_atomic_save_leaves_no_temp_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonProfileStore::new(dir.path()).await.unwrap();

        store.save_profile(&UserProfile::new()).await.unwrap();
        store
            .save_progress(&ProgressStats::default())
            .await
            .unwrap();

        let mut names = Vec::new();
        let mut rd = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = rd.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        assert_eq!(names, vec![PROFILE_FILE, PROGRESS_FILE]);
    }

    #[tokio::test]
    async fn test_progress_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = JsonProfileStore::new(dir.path()).await.unwrap();

        let mut stats = ProgressStats::default();
        stats.total_steps = 42;
        stats.streak_days = 3;
        stats.last_step_date = Some(chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap());
        store.save_progress(&stats).await.unwrap();

        let loaded = store.load_progress().await.unwrap().unwrap();
        assert_eq!(loaded.total_steps, 42);
        assert_eq!(loaded.streak_days, 3);
        assert_eq!(loaded.last_step_date, stats.last_step_date);
    }
}
