mod task;

pub use task::{Task, TaskList, TaskStatus};
