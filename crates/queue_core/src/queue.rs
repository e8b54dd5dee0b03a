use crate::model::Task;

/// Ranks pending tasks by priority, then by creation time, and writes the
/// 1-based rank into `position`. Positions of other tasks are left untouched.
pub fn update_queue_positions(tasks: &mut [Task]) {
    let mut pending: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.is_pending())
        .map(|(index, _)| index)
        .collect();

    pending.sort_by(|&left, &right| {
        let (left, right) = (&tasks[left], &tasks[right]);
        left.priority
            .cmp(&right.priority)
            .then_with(|| left.created_at.cmp(&right.created_at))
    });

    for (rank, index) in pending.into_iter().enumerate() {
        tasks[index].position = rank as u32 + 1;
    }
}

/// Sum of estimated minutes for pending tasks queued ahead of `position`.
/// Positions must be fresh.
pub fn estimated_wait_time(tasks: &[Task], position: u32) -> u64 {
    tasks
        .iter()
        .filter(|task| task.is_pending() && task.position < position)
        .map(|task| u64::from(task.estimated_duration))
        .sum()
}

/// Pending tasks in queue order.
pub fn queued_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut queued: Vec<&Task> = tasks.iter().filter(|task| task.is_pending()).collect();
    queued.sort_by_key(|task| task.position);
    queued
}
