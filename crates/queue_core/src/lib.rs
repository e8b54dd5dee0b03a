pub mod config;
pub mod duration;
pub mod error;
pub mod model;
pub mod queue;
pub mod storage;
pub mod store;
pub mod task_api;
