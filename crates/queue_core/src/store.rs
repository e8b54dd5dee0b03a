use crate::error::AppError;
use crate::model::TaskList;
use crate::queue::update_queue_positions;
use crate::storage::json_store;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Applies `op` to the collection and refreshes queue positions.
///
/// No I/O happens here. On error the collection is dropped, so callers that
/// need the old state keep their own copy.
pub fn run_transaction<T, F>(mut list: TaskList, op: F) -> Result<(TaskList, T), AppError>
where
    F: FnOnce(&mut TaskList) -> Result<T, AppError>,
{
    let output = op(&mut list)?;
    update_queue_positions(&mut list.tasks);
    Ok((list, output))
}

/// The task collection of one invocation together with the file it lives in.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    list: TaskList,
}

impl TaskStore {
    /// Loads the collection, creating and persisting an empty one when the
    /// file does not exist yet.
    ///
    /// Queue positions are recomputed in memory, so read-only commands never
    /// report stale stored positions. The file is left as is.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let exists = path.exists();
        let mut store = Self {
            list: json_store::load_state(&path)?,
            path,
        };
        update_queue_positions(&mut store.list.tasks);

        if !exists {
            debug!(path = %store.path.display(), "initializing empty task store");
            store.save()?;
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// Refreshes queue positions and writes the full collection.
    pub fn save(&mut self) -> Result<(), AppError> {
        update_queue_positions(&mut self.list.tasks);
        json_store::save_state(&self.path, &self.list)
    }

    /// Runs one mutation as a load-mutate-save unit. Nothing is written and the
    /// in-memory collection is untouched when `op` fails.
    pub fn transact<T, F>(&mut self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut TaskList) -> Result<T, AppError>,
    {
        let (list, output) = run_transaction(self.list.clone(), op)?;
        json_store::save_state(&self.path, &list)?;
        self.list = list;
        debug!(
            path = %self.path.display(),
            next_id = self.list.next_id,
            "committed transaction"
        );
        Ok(output)
    }
}
