// ABOUTME: Append-only project event log (status changes, generation progress)
// ABOUTME: insert_event is executor-generic so storages can log inside transactions

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use formiq_core::{ProjectEvent, ProjectEventType};
use formiq_storage::StorageError;

/// Append one event. Takes any executor so callers can log within their own
/// transaction.
pub async fn insert_event<'e, E>(
    executor: E,
    project_id: &str,
    event_type: ProjectEventType,
    payload: Option<serde_json::Value>,
) -> Result<(), StorageError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let event_id = format!("evt-{}", nanoid::nanoid!());
    let payload_json = payload.map(|p| p.to_string());

    sqlx::query(
        "INSERT INTO project_events (id, project_id, event_type, payload, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&event_id)
    .bind(project_id)
    .bind(event_type)
    .bind(payload_json)
    .bind(Utc::now())
    .execute(executor)
    .await
    .map_err(StorageError::Sqlx)?;

    Ok(())
}

pub struct EventStorage {
    pool: SqlitePool,
}

impl EventStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record_event(
        &self,
        project_id: &str,
        event_type: ProjectEventType,
        payload: Option<serde_json::Value>,
    ) -> Result<(), StorageError> {
        debug!("Recording {:?} event for project: {}", event_type, project_id);
        insert_event(&self.pool, project_id, event_type, payload).await
    }

    /// All events for a project, oldest first.
    pub async fn list_events(&self, project_id: &str) -> Result<Vec<ProjectEvent>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM project_events WHERE project_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                let payload: Option<String> = row.try_get("payload").map_err(StorageError::Sqlx)?;
                Ok(ProjectEvent {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    project_id: row.try_get("project_id").map_err(StorageError::Sqlx)?,
                    event_type: row.try_get("event_type").map_err(StorageError::Sqlx)?,
                    payload: payload.and_then(|p| serde_json::from_str(&p).ok()),
                    created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }
}
