use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;
    let pool = DatabaseManager::connect(database).await?;
    DatabaseManager::migrate(&pool).await?;

    let target = database
        .url
        .as_deref()
        .map(DatabaseManager::redacted_url)
        .transpose()?;

    output_success(
        output_format,
        "Database schema applied",
        Some(json!({ "database": target })),
    )
}
