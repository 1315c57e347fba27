use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crawldash_core::{Task, TaskStatus};
use dash_logging::{dash_error, dash_info, dash_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const STATE_FILENAME: &str = "crawldash_tasks.ron";

/// Cache record shape: `{task_id, domains, max_depth, status, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedTask {
    task_id: String,
    domains: Vec<String>,
    max_depth: u8,
    status: String,
    timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedTasks {
    tasks: Vec<PersistedTask>,
}

/// Durable store adapter: one RON file holding the whole task collection.
///
/// `load` fails soft in every direction (missing file, unreadable file,
/// parse failure, mis-shaped records) so a corrupted cache can never make
/// the dashboard unusable. Writes replace the whole file atomically.
pub struct TaskStoreAdapter {
    dir: PathBuf,
}

impl TaskStoreAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(STATE_FILENAME)
    }

    pub fn load(&self) -> Vec<Task> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Vec::new();
            }
            Err(err) => {
                dash_warn!("Failed to read task cache from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        let persisted: PersistedTasks = match ron::from_str(&content) {
            Ok(persisted) => persisted,
            Err(err) => {
                dash_warn!("Failed to parse task cache from {:?}: {}", path, err);
                return Vec::new();
            }
        };

        let mut tasks: Vec<Task> = Vec::with_capacity(persisted.tasks.len());
        for record in persisted.tasks {
            // Garbage records are filtered, never fatal.
            if record.task_id.is_empty() || record.domains.is_empty() {
                dash_warn!("Dropping mis-shaped cached task record {:?}", record.task_id);
                continue;
            }
            if tasks.iter().any(|task| task.task_id == record.task_id) {
                dash_warn!("Dropping duplicate cached task id {:?}", record.task_id);
                continue;
            }
            tasks.push(Task {
                task_id: record.task_id,
                domains: record.domains,
                max_depth: record.max_depth,
                status: TaskStatus::from_wire(&record.status),
                created_at: record.timestamp,
            });
        }

        dash_info!("Loaded {} cached tasks from {:?}", tasks.len(), path);
        tasks
    }

    pub fn save(&self, tasks: &[Task]) {
        let persisted = PersistedTasks {
            tasks: tasks
                .iter()
                .map(|task| PersistedTask {
                    task_id: task.task_id.clone(),
                    domains: task.domains.clone(),
                    max_depth: task.max_depth,
                    status: task.status.as_str().to_string(),
                    timestamp: task.created_at.clone(),
                })
                .collect(),
        };

        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&persisted, pretty) {
            Ok(text) => text,
            Err(err) => {
                dash_error!("Failed to serialize task cache: {}", err);
                return;
            }
        };

        if let Err(err) = self.write_atomic(&content) {
            dash_error!("Failed to write task cache to {:?}: {}", self.path(), err);
        }
    }

    pub fn clear(&self) {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => dash_info!("Cleared task cache at {:?}", path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => dash_warn!("Failed to clear task cache at {:?}: {}", path, err),
        }
    }

    /// Write the cache through a temp file and rename so a crash mid-write
    /// leaves either the old file or the new one, never a torn blob.
    fn write_atomic(&self, content: &str) -> io::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        let target = self.path();
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|err| err.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(id: &str, status: TaskStatus) -> Task {
        Task {
            task_id: id.to_string(),
            domains: vec!["example.com".to_string(), "other.org".to_string()],
            max_depth: 3,
            status,
            created_at: "2026-08-30T10:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStoreAdapter::new(dir.path().to_path_buf());

        let tasks = vec![
            sample_task("t-newer", TaskStatus::Started),
            sample_task("t-older", TaskStatus::Success),
        ];
        store.save(&tasks);

        let loaded = store.load();
        assert_eq!(loaded, tasks);
    }

    #[test]
    fn load_of_missing_file_yields_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStoreAdapter::new(dir.path().to_path_buf());
        assert!(store.load().is_empty());
    }

    #[test]
    fn load_of_corrupt_file_yields_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STATE_FILENAME), "not ron at all {{{{").unwrap();

        let store = TaskStoreAdapter::new(dir.path().to_path_buf());
        assert!(store.load().is_empty());
    }

    #[test]
    fn mis_shaped_records_are_filtered_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let content = r#"(tasks: [
            (task_id: "good", domains: ["example.com"], max_depth: 2, status: "PENDING", timestamp: "2026-08-30T10:00:00+00:00"),
            (task_id: "", domains: ["example.com"], max_depth: 2, status: "PENDING", timestamp: ""),
            (task_id: "no-domains", domains: [], max_depth: 2, status: "PENDING", timestamp: ""),
            (task_id: "good", domains: ["dup.example.com"], max_depth: 1, status: "STARTED", timestamp: ""),
        ])"#;
        fs::write(dir.path().join(STATE_FILENAME), content).unwrap();

        let store = TaskStoreAdapter::new(dir.path().to_path_buf());
        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].task_id, "good");
        assert_eq!(loaded[0].status, TaskStatus::Pending);
    }

    #[test]
    fn unrecognized_cached_status_becomes_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let content = r#"(tasks: [
            (task_id: "t1", domains: ["example.com"], max_depth: 2, status: "SOMETHING_NEW", timestamp: ""),
        ])"#;
        fs::write(dir.path().join(STATE_FILENAME), content).unwrap();

        let store = TaskStoreAdapter::new(dir.path().to_path_buf());
        let loaded = store.load();
        assert_eq!(loaded[0].status, TaskStatus::Unknown);
    }

    #[test]
    fn clear_removes_the_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStoreAdapter::new(dir.path().to_path_buf());

        store.save(&[sample_task("t1", TaskStatus::Pending)]);
        assert!(dir.path().join(STATE_FILENAME).exists());

        store.clear();
        assert!(!dir.path().join(STATE_FILENAME).exists());
        assert!(store.load().is_empty());

        // Clearing twice is harmless.
        store.clear();
    }
}
