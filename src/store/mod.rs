use std::sync::Arc;

use chrono::Utc;
use tracing::error;

use crate::backend::BackendApi;
use crate::error::ApiError;
use crate::models::{
    Category, Comment, CommentInput, CommentPage, Task, TaskInput, TaskPage, TaskPatch, TaskQuery,
    TaskStatus,
};

/// In-memory task state kept in sync with the backend.
///
/// Every mutating operation applies its local change before the request is
/// awaited and undoes it when the request fails, so the caller always sees
/// the optimistic state while the call is in flight and a consistent one
/// after it resolves. One instance owns all state; there is no cross-request
/// coordination, so racing operations resolve last-writer-wins.
pub struct TaskStore {
    backend: Arc<dyn BackendApi>,
    tasks: Vec<Task>,
    total: u64,
    categories: Vec<Category>,
    comments: Vec<Comment>,
}

impl TaskStore {
    pub fn new(backend: Arc<dyn BackendApi>) -> Self {
        Self {
            backend,
            tasks: Vec::new(),
            total: 0,
            categories: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Replaces the local task sequence with the server's; local state is
    /// untouched when the fetch fails.
    pub async fn fetch_tasks(&mut self, query: &TaskQuery) -> Result<TaskPage, ApiError> {
        match self.backend.fetch_tasks(query).await {
            Ok(page) => {
                self.tasks = page.tasks.clone();
                self.total = page.total;
                Ok(page)
            }
            Err(err) => {
                error!("Failed to fetch tasks: {}", err);
                Err(err)
            }
        }
    }

    /// Replaces the whole local sequence with the single fetched task.
    pub async fn fetch_task(&mut self, id: i64) -> Result<Task, ApiError> {
        match self.backend.fetch_task(id).await {
            Ok(task) => {
                self.tasks = vec![task.clone()];
                self.total = 1;
                Ok(task)
            }
            Err(err) => {
                error!("Failed to fetch task {}: {}", id, err);
                Err(err)
            }
        }
    }

    /// Appends a provisional task under a temporary id, then swaps in the
    /// server's task on success or drops the provisional entry on failure.
    pub async fn add_task(&mut self, input: TaskInput) -> Result<Task, ApiError> {
        let temp_id = Utc::now().timestamp_millis();
        self.tasks.push(Task {
            id: temp_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            due_date: input.due_date.clone(),
            created_at: Utc::now().to_rfc3339(),
            category_id: input.category_id,
        });

        match self.backend.create_task(&input).await {
            Ok(created) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == temp_id) {
                    *slot = created.clone();
                }
                Ok(created)
            }
            Err(err) => {
                error!("Failed to add task: {}", err);
                self.tasks.retain(|t| t.id != temp_id);
                Err(err)
            }
        }
    }

    /// Applies the patch locally, keeps the optimistic state when the server
    /// accepts, restores the pre-update snapshot when it does not.
    pub async fn update_task(&mut self, id: i64, patch: TaskPatch) -> Result<(), ApiError> {
        let snapshot = self.tasks.clone();

        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            apply_patch(task, &patch);
        }

        match self.backend.update_task(id, &patch).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("Failed to update task {}: {}", id, err);
                self.tasks = snapshot;
                Err(err)
            }
        }
    }

    /// Removes the task immediately; a failed delete puts it back.
    pub async fn delete_task(&mut self, id: i64) -> Result<(), ApiError> {
        let snapshot = self.tasks.clone();
        self.tasks.retain(|t| t.id != id);

        match self.backend.delete_task(id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("Failed to delete task {}: {}", id, err);
                self.tasks = snapshot;
                Err(err)
            }
        }
    }

    /// Status-only update for column moves. A failed move parks the task
    /// back in the pending column rather than its previous one.
    pub async fn move_task(&mut self, id: i64, new_status: TaskStatus) -> Result<(), ApiError> {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.status = new_status;
        }

        match self.backend.update_task(id, &TaskPatch::status(new_status)).await {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("Failed to update task status: {}", err);
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.status = TaskStatus::Pending;
                }
                Err(err)
            }
        }
    }

    pub async fn fetch_categories(&mut self) -> Result<Vec<Category>, ApiError> {
        match self.backend.fetch_categories().await {
            Ok(categories) => {
                self.categories = categories.clone();
                Ok(categories)
            }
            Err(err) => {
                error!("Failed to fetch categories: {}", err);
                Err(err)
            }
        }
    }

    /// Same temporary-id pattern as `add_task`, on the comment sequence.
    pub async fn add_comment(&mut self, input: CommentInput) -> Result<Comment, ApiError> {
        let temp_id = Utc::now().timestamp_millis();
        self.comments.push(Comment {
            id: temp_id,
            content: input.content.clone(),
            created_at: Utc::now().to_rfc3339(),
            task_id: input.task_id,
        });

        match self.backend.create_comment(&input).await {
            Ok(created) => {
                if let Some(slot) = self.comments.iter_mut().find(|c| c.id == temp_id) {
                    *slot = created.clone();
                }
                Ok(created)
            }
            Err(err) => {
                error!("Failed to add comment: {}", err);
                self.comments.retain(|c| c.id != temp_id);
                Err(err)
            }
        }
    }

    pub async fn fetch_comments(&mut self, task_id: i64) -> Result<CommentPage, ApiError> {
        match self.backend.fetch_comments(task_id).await {
            Ok(page) => {
                self.comments = page.comments.clone();
                Ok(page)
            }
            Err(err) => {
                error!("Failed to fetch comments for task {}: {}", task_id, err);
                Err(err)
            }
        }
    }
}

fn apply_patch(task: &mut Task, patch: &TaskPatch) {
    if let Some(title) = &patch.title {
        task.title = title.clone();
    }
    if let Some(description) = &patch.description {
        task.description = Some(description.clone());
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(due_date) = &patch.due_date {
        task.due_date = Some(due_date.clone());
    }
    if let Some(category_id) = patch.category_id {
        task.category_id = Some(category_id);
    }
}
