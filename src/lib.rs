// tasktrack - Personal task tracking over a single JSON file

pub mod error;
pub mod model;
pub mod store;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use model::{Snapshot, Status, Task};
pub use store::{Loaded, TaskStore, parse_task_id};
