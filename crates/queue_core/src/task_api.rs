use crate::config::AddDefaults;
use crate::error::AppError;
use crate::model::{Task, TaskList, TaskStatus};
use crate::queue::{estimated_wait_time, queued_tasks};
use crate::store::TaskStore;
use std::ops::RangeInclusive;
use time::OffsetDateTime;
use tracing::debug;

pub const DEFAULT_PRIORITY: u8 = 3;
pub const DEFAULT_DURATION: u32 = 30;
pub const PRIORITY_RANGE: RangeInclusive<u8> = 1..=5;

/// Raw input for `add`. Priority and duration stay unparsed so that bad
/// values can fall back to the defaults instead of failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddRequest<'a> {
    pub description: &'a str,
    pub requester: Option<&'a str>,
    pub priority: Option<&'a str>,
    pub duration: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedTask {
    pub task: Task,
    pub position: u32,
    pub wait_minutes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(TaskStatus),
    /// A label that names no status. Matches no task.
    Unknown,
}

impl StatusFilter {
    /// Interprets a `--status` value. Unrecognized labels filter everything
    /// out rather than failing.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim() {
            "" | "all" => Self::All,
            "pending" => Self::Only(TaskStatus::Pending),
            "in_progress" => Self::Only(TaskStatus::InProgress),
            "completed" => Self::Only(TaskStatus::Completed),
            _ => Self::Unknown,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status == status,
            Self::Unknown => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub task: Task,
    pub wait_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueSummary {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub total_estimated_minutes: u64,
    /// Pending tasks by ascending position.
    pub queue: Vec<QueueEntry>,
}

pub fn parse_task_id(raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AppError::invalid_input(format!("invalid task id: {raw}")))
}

/// Duration for `estimate`, which unlike `add` rejects bad values.
pub fn parse_estimate(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|minutes| *minutes > 0)
        .ok_or_else(|| AppError::invalid_input(format!("invalid duration: {raw}")))
}

pub fn priority_or_default(raw: Option<&str>, fallback: u8) -> u8 {
    raw.and_then(|value| value.trim().parse::<u8>().ok())
        .filter(|priority| PRIORITY_RANGE.contains(priority))
        .unwrap_or(fallback)
}

pub fn duration_or_default(raw: Option<&str>, fallback: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(fallback)
}

/// Appends a new pending task and returns its id.
pub fn insert_task(
    list: &mut TaskList,
    request: AddRequest<'_>,
    defaults: AddDefaults,
    now: OffsetDateTime,
) -> Result<u64, AppError> {
    let description = request.description.trim();
    if description.is_empty() {
        return Err(AppError::invalid_input("description is required"));
    }

    let requester = request
        .requester
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let id = list.allocate_id();
    list.tasks.push(Task {
        id,
        description: description.to_string(),
        requester,
        created_at: now,
        completed_at: None,
        estimated_duration: duration_or_default(request.duration, defaults.duration),
        priority: priority_or_default(request.priority, defaults.priority),
        status: TaskStatus::Pending,
        position: 0,
    });

    Ok(id)
}

fn task_mut(list: &mut TaskList, id: u64) -> Result<&mut Task, AppError> {
    list.find_mut(id)
        .ok_or_else(|| AppError::not_found(format!("task #{id} not found")))
}

pub fn mark_completed(list: &mut TaskList, id: u64, now: OffsetDateTime) -> Result<Task, AppError> {
    let task = task_mut(list, id)?;
    task.status = TaskStatus::Completed;
    task.completed_at = Some(now);
    Ok(task.clone())
}

pub fn mark_started(list: &mut TaskList, id: u64) -> Result<Task, AppError> {
    let task = task_mut(list, id)?;
    task.status = TaskStatus::InProgress;
    Ok(task.clone())
}

pub fn set_estimate(list: &mut TaskList, id: u64, minutes: u32) -> Result<Task, AppError> {
    if minutes == 0 {
        return Err(AppError::invalid_input("invalid duration: 0"));
    }
    let task = task_mut(list, id)?;
    task.estimated_duration = minutes;
    Ok(task.clone())
}

pub fn take_task(list: &mut TaskList, id: u64) -> Result<Task, AppError> {
    let index = list
        .tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| AppError::not_found(format!("task #{id} not found")))?;
    Ok(list.tasks.remove(index))
}

pub fn add_task(
    store: &mut TaskStore,
    request: AddRequest<'_>,
    defaults: AddDefaults,
) -> Result<AddedTask, AppError> {
    let now = OffsetDateTime::now_utc();
    let id = store.transact(|list| insert_task(list, request, defaults, now))?;

    let list = store.list();
    let task = list
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::invalid_data(format!("task #{id} missing after add")))?;
    let wait_minutes = estimated_wait_time(&list.tasks, task.position);
    debug!(id, position = task.position, wait_minutes, "added task");

    Ok(AddedTask {
        position: task.position,
        task,
        wait_minutes,
    })
}

pub fn complete_task(store: &mut TaskStore, id: u64) -> Result<Task, AppError> {
    let now = OffsetDateTime::now_utc();
    store.transact(|list| mark_completed(list, id, now))
}

pub fn start_task(store: &mut TaskStore, id: u64) -> Result<Task, AppError> {
    store.transact(|list| mark_started(list, id))
}

pub fn estimate_task(store: &mut TaskStore, id: u64, minutes: u32) -> Result<Task, AppError> {
    store.transact(|list| set_estimate(list, id, minutes))
}

pub fn remove_task(store: &mut TaskStore, id: u64) -> Result<Task, AppError> {
    store.transact(|list| take_task(list, id))
}

/// Tasks matching `filter`, in collection order.
pub fn list_tasks(list: &TaskList, filter: StatusFilter) -> Vec<Task> {
    list.tasks
        .iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}

pub fn queue_summary(list: &TaskList) -> QueueSummary {
    let mut summary = QueueSummary::default();
    for task in &list.tasks {
        match task.status {
            TaskStatus::Pending => {
                summary.pending += 1;
                summary.total_estimated_minutes += u64::from(task.estimated_duration);
            }
            TaskStatus::InProgress => summary.in_progress += 1,
            TaskStatus::Completed => summary.completed += 1,
        }
    }

    summary.queue = queued_tasks(&list.tasks)
        .into_iter()
        .map(|task| QueueEntry {
            wait_minutes: estimated_wait_time(&list.tasks, task.position),
            task: task.clone(),
        })
        .collect();

    summary
}
