use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::prompts::{now_ms, PromptStore};
use crate::models::{Backup, BackupReason};

pub(crate) const BACKUPS_KEY: &str = "backups";

/// Ring size: oldest snapshots beyond this are dropped.
const MAX_BACKUPS: usize = 3;

/// Minimum spacing between snapshots.
const BACKUP_INTERVAL_MS: i64 = 3_600_000;

impl PromptStore {
    /// Take a snapshot of the current prompt list.
    ///
    /// Skipped (returning `false`) when the library is empty or when the
    /// newest snapshot is younger than an hour. Newest snapshot sits first;
    /// the ring is capped at three.
    pub fn create_backup(&self, reason: BackupReason) -> Result<bool> {
        self.create_backup_at(reason, now_ms())
    }

    fn create_backup_at(&self, reason: BackupReason, now: i64) -> Result<bool> {
        let prompts = self.load_prompts()?;
        if prompts.is_empty() {
            return Ok(false);
        }

        let mut backups = self.load_backups()?;
        if let Some(newest) = backups.first() {
            if now - newest.timestamp < BACKUP_INTERVAL_MS {
                return Ok(false);
            }
        }

        let suffix = Uuid::new_v4().simple().to_string();
        let backup = Backup {
            id: format!("backup_{}_{}", now, &suffix[..9]),
            timestamp: now,
            date: Utc::now().to_rfc3339(),
            reason,
            prompt_count: prompts.len(),
            prompts,
        };

        backups.insert(0, backup);
        backups.truncate(MAX_BACKUPS);
        self.write_backups(&backups)
            .map(|()| true)
    }

    pub fn list_backups(&self) -> Result<Vec<Backup>> {
        self.load_backups()
    }

    /// Replace the prompt list with a snapshot's contents. A pre-restore
    /// snapshot of the current state is taken first (subject to the usual
    /// rate limit). Returns `false` for an unknown backup id.
    pub fn restore_backup(&self, backup_id: &str) -> Result<bool> {
        self.create_backup(BackupReason::PreRestore)?;

        let backups = self.load_backups()?;
        let Some(backup) = backups.iter().find(|b| b.id == backup_id) else {
            return Ok(false);
        };

        self.write_prompts(&backup.prompts)?;
        Ok(true)
    }

    fn load_backups(&self) -> Result<Vec<Backup>> {
        let Some(Value::Array(items)) = self.kv.get(BACKUPS_KEY)? else {
            return Ok(Vec::new());
        };

        let mut backups = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<Backup>(item) {
                Ok(backup) => backups.push(backup),
                Err(e) => tracing::warn!("Dropping unreadable backup record: {}", e),
            }
        }
        Ok(backups)
    }

    fn write_backups(&self, backups: &[Backup]) -> Result<()> {
        self.kv.set(BACKUPS_KEY, &serde_json::to_value(backups)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::kv::KvStore;
    use crate::store::prompts::PromptInput;

    fn seeded_store() -> PromptStore {
        let store = PromptStore::new(KvStore::open_in_memory().unwrap());
        store
            .save_prompt(PromptInput {
                label: "seed".into(),
                template: "body".into(),
                ..PromptInput::default()
            })
            .unwrap();
        store
    }

    #[test]
    fn test_backup_skipped_for_empty_library() {
        let store = PromptStore::new(KvStore::open_in_memory().unwrap());
        assert!(!store.create_backup(BackupReason::Manual).unwrap());
        assert!(store.list_backups().unwrap().is_empty());
    }

    #[test]
    fn test_backup_rate_limited_to_one_per_hour() {
        let store = seeded_store();
        assert!(store.create_backup_at(BackupReason::Startup, 1_000_000).unwrap());
        // Within the hour: skipped.
        assert!(!store
            .create_backup_at(BackupReason::Manual, 1_000_000 + BACKUP_INTERVAL_MS - 1)
            .unwrap());
        // An hour later: taken.
        assert!(store
            .create_backup_at(BackupReason::Manual, 1_000_000 + BACKUP_INTERVAL_MS)
            .unwrap());
        assert_eq!(store.list_backups().unwrap().len(), 2);
    }

    #[test]
    fn test_ring_caps_at_three_newest_first() {
        let store = seeded_store();
        for i in 0..5i64 {
            assert!(store
                .create_backup_at(BackupReason::Manual, (i + 1) * BACKUP_INTERVAL_MS)
                .unwrap());
        }

        let backups = store.list_backups().unwrap();
        assert_eq!(backups.len(), 3);
        assert_eq!(backups[0].timestamp, 5 * BACKUP_INTERVAL_MS);
        assert_eq!(backups[2].timestamp, 3 * BACKUP_INTERVAL_MS);
    }

    #[test]
    fn test_restore_replaces_prompts() {
        let store = seeded_store();
        assert!(store.create_backup_at(BackupReason::Manual, 1).unwrap());
        let backup_id = store.list_backups().unwrap()[0].id.clone();

        // Mutate the library after the snapshot.
        store
            .save_prompt(PromptInput {
                label: "later".into(),
                template: "body".into(),
                ..PromptInput::default()
            })
            .unwrap();
        assert_eq!(store.list_prompts().unwrap().len(), 2);

        assert!(store.restore_backup(&backup_id).unwrap());
        let prompts = store.list_prompts().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].label, "seed");
    }

    #[test]
    fn test_restore_unknown_id() {
        let store = seeded_store();
        assert!(!store.restore_backup("backup_0_missing").unwrap());
    }

    #[test]
    fn test_backup_snapshot_metadata() {
        let store = seeded_store();
        assert!(store.create_backup_at(BackupReason::Startup, 42).unwrap());
        let backup = &store.list_backups().unwrap()[0];
        assert!(backup.id.starts_with("backup_42_"));
        assert_eq!(backup.reason, BackupReason::Startup);
        assert_eq!(backup.prompt_count, 1);
    }
}
