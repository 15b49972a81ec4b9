pub mod dto;

use std::env;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    Category, Comment, CommentInput, CommentPage, Credentials, Task, TaskInput, TaskPage,
    TaskPatch, TaskQuery, User,
};

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    pub fn new_from_env() -> Result<Self, ApiError> {
        let base_url = env::var("TASKBOARD_API_URL")
            .map_err(|_| ApiError::Validation("TASKBOARD_API_URL is not set".to_string()))?;
        Ok(Self::new(base_url))
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// One method per remote operation. The store holds this behind a trait
/// object so tests can substitute a scripted implementation.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<TaskPage, ApiError>;
    async fn fetch_task(&self, id: i64) -> Result<Task, ApiError>;
    async fn create_task(&self, input: &TaskInput) -> Result<Task, ApiError>;
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError>;
    async fn delete_task(&self, id: i64) -> Result<(), ApiError>;
    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn create_comment(&self, input: &CommentInput) -> Result<Comment, ApiError>;
    async fn fetch_comments(&self, task_id: i64) -> Result<CommentPage, ApiError>;
    async fn signup(&self, credentials: &Credentials) -> Result<(), ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn current_user(&self) -> Result<User, ApiError>;
}

pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    pub fn new(config: BackendConfig) -> Result<Self, ApiError> {
        // The session rides on an access_token cookie set by the login
        // endpoint, so the client keeps a cookie store.
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

/// Normalize a non-2xx reply: a JSON body yields its message field, anything
/// else yields the canonical status text, with a shared last-resort fallback.
async fn failure(response: Response) -> ApiError {
    let status = response.status();
    let message = if is_json(&response) {
        response
            .json::<dto::ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty())
    } else {
        status.canonical_reason().map(str::to_string)
    }
    .unwrap_or_else(|| "Unknown API error".to_string());
    ApiError::Backend {
        status: status.as_u16(),
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(failure(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Transport(format!("Failed to parse response: {}", e)))
}

async fn read_unit(response: Response) -> Result<(), ApiError> {
    if !response.status().is_success() {
        return Err(failure(response).await);
    }
    Ok(())
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<TaskPage, ApiError> {
        let response = self
            .client
            .get(self.url("/tasks"))
            .query(query)
            .send()
            .await?;
        read_json(response).await
    }

    async fn fetch_task(&self, id: i64) -> Result<Task, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        read_json(response).await
    }

    async fn create_task(&self, input: &TaskInput) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(input)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/tasks/{}", id)))
            .json(patch)
            .send()
            .await?;
        read_unit(response).await
    }

    async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        read_unit(response).await
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self.client.get(self.url("/categories")).send().await?;
        read_json(response).await
    }

    async fn create_comment(&self, input: &CommentInput) -> Result<Comment, ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/comments/{}", input.task_id)))
            .json(input)
            .send()
            .await?;
        read_json(response).await
    }

    async fn fetch_comments(&self, task_id: i64) -> Result<CommentPage, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/comments/{}", task_id)))
            .send()
            .await?;
        read_json(response).await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/users/signup"))
            .json(credentials)
            .send()
            .await?;
        read_unit(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        read_unit(response).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self.client.post(self.url("/auth/logout")).send().await?;
        read_unit(response).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        let response = self.client.get(self.url("/auth/me")).send().await?;
        read_json(response).await
    }
}

/// Offline stand-in: reads return empty, writes echo their input.
pub struct NoopBackend;

#[async_trait]
impl BackendApi for NoopBackend {
    async fn fetch_tasks(&self, _query: &TaskQuery) -> Result<TaskPage, ApiError> {
        Ok(TaskPage {
            tasks: Vec::new(),
            total: 0,
        })
    }

    async fn fetch_task(&self, id: i64) -> Result<Task, ApiError> {
        Err(ApiError::Backend {
            status: 404,
            message: format!("Task {} not found", id),
        })
    }

    async fn create_task(&self, input: &TaskInput) -> Result<Task, ApiError> {
        Ok(Task {
            id: 0,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            due_date: input.due_date.clone(),
            created_at: Utc::now().to_rfc3339(),
            category_id: input.category_id,
        })
    }

    async fn update_task(&self, _id: i64, _patch: &TaskPatch) -> Result<(), ApiError> {
        Ok(())
    }

    async fn delete_task(&self, _id: i64) -> Result<(), ApiError> {
        Ok(())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_comment(&self, input: &CommentInput) -> Result<Comment, ApiError> {
        Ok(Comment {
            id: 0,
            content: input.content.clone(),
            created_at: Utc::now().to_rfc3339(),
            task_id: input.task_id,
        })
    }

    async fn fetch_comments(&self, _task_id: i64) -> Result<CommentPage, ApiError> {
        Ok(CommentPage {
            comments: Vec::new(),
            total: 0,
        })
    }

    async fn signup(&self, _credentials: &Credentials) -> Result<(), ApiError> {
        Ok(())
    }

    async fn login(&self, _credentials: &Credentials) -> Result<(), ApiError> {
        Ok(())
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        Err(ApiError::Backend {
            status: 401,
            message: "Unauthorized".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_strips_trailing_slash() {
        let config = BackendConfig::new("http://localhost:3000/");
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn task_query_serializes_only_set_fields() {
        let query = TaskQuery {
            status: Some(crate::models::TaskStatus::InProgress),
            priority: None,
            category_id: None,
        };
        let encoded = serde_json::to_value(&query).unwrap();
        assert_eq!(encoded, serde_json::json!({ "status": "in_progress" }));
    }
}
