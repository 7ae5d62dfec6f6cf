pub mod model;
pub mod store;

pub use model::{CreateTaskParams, Task, TaskPayload, TaskRow, UpdateTaskParams, MAX_TASK_NAME_LEN};
pub use store::TaskStore;
