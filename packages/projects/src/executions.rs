// ABOUTME: Prompt execution audit storage: one row per generation call
// ABOUTME: Input and output payloads are stored as JSON text, append-only

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use formiq_core::PromptExecution;
use formiq_storage::StorageError;

use crate::types::RecordPromptExecutionInput;

pub struct ExecutionStorage {
    pool: SqlitePool,
}

impl ExecutionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one prompt execution record.
    pub async fn record_prompt_execution(
        &self,
        input: RecordPromptExecutionInput,
    ) -> Result<PromptExecution, StorageError> {
        let execution_id = format!("exec-{}", nanoid::nanoid!());
        let now = Utc::now();

        debug!(
            "Recording {:?} prompt execution for project: {}",
            input.stage, input.project_id
        );

        let input_json = input.input.to_string();
        let output_json = input.output.as_ref().map(|o| o.to_string());

        sqlx::query(
            "INSERT INTO prompt_executions (
                id, project_id, milestone_id, task_id, stage, status,
                input, output, model, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&execution_id)
        .bind(&input.project_id)
        .bind(&input.milestone_id)
        .bind(&input.task_id)
        .bind(input.stage)
        .bind(input.status)
        .bind(input_json)
        .bind(output_json)
        .bind(&input.model)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(PromptExecution {
            id: execution_id,
            project_id: input.project_id,
            milestone_id: input.milestone_id,
            task_id: input.task_id,
            stage: input.stage,
            status: input.status,
            input: input.input,
            output: input.output,
            model: input.model,
            created_at: now,
        })
    }

    /// Executions for a project, oldest first.
    pub async fn list_prompt_executions(
        &self,
        project_id: &str,
    ) -> Result<Vec<PromptExecution>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM prompt_executions WHERE project_id = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                let input_json: String = row.try_get("input").map_err(StorageError::Sqlx)?;
                let output_json: Option<String> =
                    row.try_get("output").map_err(StorageError::Sqlx)?;
                Ok(PromptExecution {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    project_id: row.try_get("project_id").map_err(StorageError::Sqlx)?,
                    milestone_id: row.try_get("milestone_id").map_err(StorageError::Sqlx)?,
                    task_id: row.try_get("task_id").map_err(StorageError::Sqlx)?,
                    stage: row.try_get("stage").map_err(StorageError::Sqlx)?,
                    status: row.try_get("status").map_err(StorageError::Sqlx)?,
                    input: serde_json::from_str(&input_json)
                        .unwrap_or(serde_json::Value::Null),
                    output: output_json.and_then(|o| serde_json::from_str(&o).ok()),
                    model: row.try_get("model").map_err(StorageError::Sqlx)?,
                    created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }
}
