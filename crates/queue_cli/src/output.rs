use queue_core::duration::format_duration;
use queue_core::error::AppError;
use queue_core::model::Task;
use queue_core::task_api::{AddedTask, QueueSummary};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::UtcOffset;
use time::macros::format_description;

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Queue Pos")]
    position: String,
    #[tabled(rename = "Priority")]
    priority: u8,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Est. Duration")]
    duration: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Completed")]
    completed_at: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Position")]
    position: u32,
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Priority")]
    priority: u8,
    #[tabled(rename = "Est. Duration")]
    duration: String,
    #[tabled(rename = "Wait Time")]
    wait: String,
    #[tabled(rename = "Requester")]
    requester: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn completed_label(task: &Task) -> Result<String, AppError> {
    match task.completed_at {
        Some(at) => at
            .to_offset(UtcOffset::UTC)
            .format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
            .map_err(|err| AppError::invalid_data(err.to_string())),
        None => Ok("-".to_string()),
    }
}

fn render_table<R: Tabled>(rows: Vec<R>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    table.to_string()
}

pub fn print_added(added: &AddedTask) {
    println!("Added task #{}: {}", added.task.id, added.task.description);
    println!("Queue position: {}", added.position);
    println!(
        "Estimated wait time: {}",
        format_duration(added.wait_minutes)
    );
}

pub fn print_added_json(added: &AddedTask) -> Result<(), AppError> {
    let mut payload =
        serde_json::to_value(&added.task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    payload["wait_minutes"] = serde_json::json!(added.wait_minutes);
    println!("{payload}");
    Ok(())
}

pub fn print_task_json(task: &Task) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{payload}");
    Ok(())
}

pub fn print_tasks_plain(tasks: &[Task]) -> Result<(), AppError> {
    let mut rows = Vec::with_capacity(tasks.len());
    for task in tasks {
        rows.push(ListRow {
            id: task.id,
            position: if task.is_pending() {
                task.position.to_string()
            } else {
                "-".to_string()
            },
            priority: task.priority,
            status: task.status.label(),
            duration: format_duration(u64::from(task.estimated_duration)),
            requester: task.requester().unwrap_or("-").to_string(),
            completed_at: completed_label(task)?,
            description: task.description.clone(),
        });
    }

    println!("{}", render_table(rows));
    Ok(())
}

/// Positions of non-pending tasks are stale, so they are emitted as null.
pub fn print_tasks_json(tasks: &[Task]) -> Result<(), AppError> {
    let mut payload = Vec::with_capacity(tasks.len());
    for task in tasks {
        let mut value =
            serde_json::to_value(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
        if !task.is_pending() {
            value["position"] = serde_json::Value::Null;
        }
        payload.push(value);
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

pub fn print_queue_plain(summary: &QueueSummary) {
    println!("Queue Status Summary:");
    println!("- Pending tasks: {}", summary.pending);
    println!("- In progress tasks: {}", summary.in_progress);
    println!("- Completed tasks: {}", summary.completed);
    println!(
        "- Total estimated wait time: {}",
        format_duration(summary.total_estimated_minutes)
    );

    if summary.queue.is_empty() {
        println!("\nThe queue is empty.");
        return;
    }

    let rows: Vec<QueueRow> = summary
        .queue
        .iter()
        .map(|entry| QueueRow {
            position: entry.task.position,
            id: entry.task.id,
            priority: entry.task.priority,
            duration: format_duration(u64::from(entry.task.estimated_duration)),
            wait: format_duration(entry.wait_minutes),
            requester: entry.task.requester().unwrap_or("-").to_string(),
            description: entry.task.description.clone(),
        })
        .collect();

    println!("\nCurrent Queue:");
    println!("{}", render_table(rows));
}

pub fn print_queue_json(summary: &QueueSummary) {
    let queue: Vec<serde_json::Value> = summary
        .queue
        .iter()
        .map(|entry| {
            serde_json::json!({
                "position": entry.task.position,
                "id": entry.task.id,
                "priority": entry.task.priority,
                "estimated_duration": entry.task.estimated_duration,
                "wait_minutes": entry.wait_minutes,
                "requester": entry.task.requester(),
                "description": entry.task.description,
            })
        })
        .collect();

    let payload = serde_json::json!({
        "pending": summary.pending,
        "in_progress": summary.in_progress,
        "completed": summary.completed,
        "total_estimated_minutes": summary.total_estimated_minutes,
        "queue": queue,
    });
    println!("{payload}");
}
