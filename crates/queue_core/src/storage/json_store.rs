use crate::error::AppError;
use crate::model::TaskList;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const STORE_FILE_NAME: &str = ".tasks.json";
pub const STORE_ENV_VAR: &str = "TODO_STORE_PATH";

/// Resolves the state file: env override, then the configured path, then
/// `~/.tasks.json`.
pub fn store_path(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    let home = dirs::home_dir().ok_or_else(|| AppError::invalid_data("HOME is not set"))?;
    Ok(home.join(STORE_FILE_NAME))
}

/// Reads the whole collection. A missing file yields an empty collection.
pub fn load_state(path: &Path) -> Result<TaskList, AppError> {
    if !path.exists() {
        return Ok(TaskList::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut state: TaskList = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    let mut seen = HashSet::with_capacity(state.tasks.len());
    for task in &mut state.tasks {
        if !seen.insert(task.id) {
            return Err(AppError::invalid_data(format!(
                "duplicate task id {} in {}",
                task.id,
                path.display()
            )));
        }
        // Older writers stored year 1 instead of omitting an unset completion.
        if task.completed_at.is_some_and(|at| at.year() <= 1) {
            task.completed_at = None;
        }
    }

    let floor = state.tasks.iter().map(|task| task.id + 1).max().unwrap_or(1);
    if state.next_id < floor {
        warn!(
            next_id = state.next_id,
            repaired = floor,
            "next_id behind existing task ids"
        );
        state.next_id = floor;
    }

    debug!(path = %path.display(), tasks = state.tasks.len(), "loaded task state");
    Ok(state)
}

/// Writes the whole collection, replacing whatever was there.
pub fn save_state(path: &Path, state: &TaskList) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(state)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    debug!(path = %path.display(), tasks = state.tasks.len(), "saved task state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_state, save_state};
    use crate::model::{Task, TaskList, TaskStatus};
    use std::fs;
    use time::macros::datetime;

    fn sample_task() -> Task {
        Task {
            id: 1,
            description: "demo".to_string(),
            requester: Some("sam".to_string()),
            created_at: datetime!(2025-12-20 08:30:15.25 +02:00),
            completed_at: None,
            estimated_duration: 30,
            priority: 2,
            status: TaskStatus::Pending,
            position: 1,
        }
    }

    #[test]
    fn missing_file_loads_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_state(&dir.path().join("tasks.json")).unwrap();

        assert!(loaded.tasks.is_empty());
        assert_eq!(loaded.next_id, 1);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");
        let mut done = sample_task();
        done.id = 2;
        done.status = TaskStatus::Completed;
        done.completed_at = Some(datetime!(2025-12-21 10:00 UTC));
        let state = TaskList {
            tasks: vec![sample_task(), done],
            next_id: 5,
        };

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();

        assert_eq!(loaded, state);
    }

    #[test]
    fn omits_completed_at_until_completion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let state = TaskList {
            tasks: vec![sample_task()],
            next_id: 2,
        };

        save_state(&path, &state).unwrap();
        let stored: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert!(stored["tasks"][0].get("completed_at").is_none());
        assert_eq!(stored["tasks"][0]["status"], "pending");
        assert_eq!(stored["next_id"], 2);
    }

    #[test]
    fn accepts_legacy_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        let content = serde_json::json!({
            "tasks": [
                {
                    "id": 3,
                    "description": "write report",
                    "requester": "",
                    "created_at": "2024-03-01T09:15:00.123456789+01:00",
                    "completed_at": "0001-01-01T00:00:00Z",
                    "estimated_duration": 45,
                    "priority": 1,
                    "status": "in_progress",
                    "position": 0
                }
            ],
            "next_id": 4
        });
        fs::write(&path, serde_json::to_string_pretty(&content).unwrap()).unwrap();

        let loaded = load_state(&path).unwrap();

        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.tasks[0].completed_at, None);
        assert_eq!(loaded.tasks[0].requester(), None);
        assert_eq!(loaded.tasks[0].status, TaskStatus::InProgress);
        assert_eq!(loaded.next_id, 4);
    }

    #[test]
    fn repairs_next_id_behind_existing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut task = sample_task();
        task.id = 9;
        save_state(
            &path,
            &TaskList {
                tasks: vec![task],
                next_id: 3,
            },
        )
        .unwrap();

        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded.next_id, 10);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        save_state(
            &path,
            &TaskList {
                tasks: vec![sample_task(), sample_task()],
                next_id: 2,
            },
        )
        .unwrap();

        let err = load_state(&path).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_state(&path).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_unknown_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let content = "{\n  \"tasks\": [\n    {\n      \"id\": 1,\n      \"description\": \"demo\",\n      \"created_at\": \"2025-12-20T00:00:00Z\",\n      \"estimated_duration\": 30,\n      \"priority\": 3,\n      \"status\": \"blocked\"\n    }\n  ],\n  \"next_id\": 2\n}";
        fs::write(&path, content).unwrap();

        let err = load_state(&path).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        save_state(&path, &TaskList::default()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
