//! Column grouping and the local filters the list view applies on top of
//! whatever the store currently holds.

use chrono::NaiveDate;

use crate::models::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Keep only tasks due on or before this date. Tasks without a due date
    /// are dropped when this filter is set.
    pub due_on_or_before: Option<NaiveDate>,
}

impl BoardFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(cutoff) = self.due_on_or_before {
            let due = task
                .due_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            match due {
                Some(due) if due <= cutoff => {}
                _ => return false,
            }
        }
        true
    }
}

#[derive(Debug)]
pub struct BoardColumn<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

/// One column per status, in board order, filtered.
pub fn columns<'a>(tasks: &'a [Task], filter: &BoardFilter) -> Vec<BoardColumn<'a>> {
    TaskStatus::ALL
        .iter()
        .map(|&status| BoardColumn {
            status,
            tasks: tasks
                .iter()
                .filter(|t| t.status == status && filter.matches(t))
                .collect(),
        })
        .collect()
}

/// Completed count over total, for the progress header.
pub fn completion(tasks: &[Task]) -> (usize, usize) {
    let done = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();
    (done, tasks.len())
}
