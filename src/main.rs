use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskboard::backend::{BackendApi, BackendConfig, HttpBackend};
use taskboard::board::{self, BoardFilter};
use taskboard::models::{Credentials, TaskQuery};
use taskboard::store::TaskStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "taskboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BackendConfig::new_from_env()?;
    info!("Using backend at {}", config.base_url);

    let backend = Arc::new(HttpBackend::new(config)?);

    if let (Ok(email), Ok(password)) = (
        std::env::var("TASKBOARD_EMAIL"),
        std::env::var("TASKBOARD_PASSWORD"),
    ) {
        backend.login(&Credentials { email, password }).await?;
        let user = backend.current_user().await?;
        info!("Logged in as {}", user.email);
    }

    let mut store = TaskStore::new(backend);
    store.fetch_categories().await?;
    store.fetch_tasks(&TaskQuery::default()).await?;

    let (done, total) = board::completion(store.tasks());
    println!("{}/{} tasks completed", done, total);

    for column in board::columns(store.tasks(), &BoardFilter::default()) {
        println!("\n== {} ==", column.status.label());
        for task in column.tasks {
            let due = task.due_date.as_deref().unwrap_or("no due date");
            println!("  [{}] {} ({:?}, due {})", task.id, task.title, task.priority, due);
        }
    }

    Ok(())
}
