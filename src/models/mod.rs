pub mod task;
pub mod user;

pub use task::{
    NewTask, Task, TaskFilter, TaskInput, TaskPriority, TaskQuery, TaskSort, TaskStats,
    TaskStatus, TaskUpdate,
};
pub use user::{normalize_email, NewUser, User, UserCredentials, UserSummary};
