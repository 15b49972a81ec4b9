use chrono::NaiveDate;

use crate::error::ApiError;
use crate::models::TaskInput;

/// Form-level validation, run before anything is dispatched to the store.
pub fn validate_task_input(input: &TaskInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }
    if let Some(due_date) = &input.due_date {
        NaiveDate::parse_from_str(due_date, "%Y-%m-%d").map_err(|_| {
            ApiError::Validation(format!("Invalid due date: {}", due_date))
        })?;
    }
    Ok(())
}
