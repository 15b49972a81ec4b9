pub mod category;
pub mod comment;
pub mod task;
pub mod user;

pub use category::Category;
pub use comment::{Comment, CommentInput, CommentPage};
pub use task::{Task, TaskInput, TaskPage, TaskPatch, TaskPriority, TaskQuery, TaskStatus};
pub use user::{Credentials, User};
