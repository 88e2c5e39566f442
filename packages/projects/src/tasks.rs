// ABOUTME: Task storage: batch creation of one milestone's generated schedule
// ABOUTME: Tasks are create-once per milestone, mirroring the milestone guard

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

use formiq_core::{ProjectEventType, Task, TaskStatus};
use formiq_storage::StorageError;

use crate::events::insert_event;
use crate::types::CreateMilestoneTasksInput;

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist one milestone's task schedule in a single transaction.
    ///
    /// All tasks start `locked`. A milestone that already has tasks fails
    /// with `TasksExist` and keeps its stored schedule.
    pub async fn create_milestone_tasks(
        &self,
        input: CreateMilestoneTasksInput,
    ) -> Result<Vec<Task>, StorageError> {
        info!(
            "Storing {} tasks for milestone: {}",
            input.tasks.len(),
            input.milestone_id
        );

        let owned: Option<String> = sqlx::query_scalar(
            "SELECT m.id FROM milestones m
             JOIN projects p ON p.id = m.project_id
             WHERE m.id = ? AND m.project_id = ? AND p.user_id = ?",
        )
        .bind(&input.milestone_id)
        .bind(&input.project_id)
        .bind(&input.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        if owned.is_none() {
            return Err(StorageError::MilestoneNotFound(input.milestone_id.clone()));
        }

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE milestone_id = ?")
            .bind(&input.milestone_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if existing > 0 {
            return Err(StorageError::TasksExist(input.milestone_id.clone()));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        for task in &input.tasks {
            let task_id = format!("task-{}", nanoid::nanoid!());
            sqlx::query(
                "INSERT INTO tasks (id, milestone_id, title, description, position, status, generated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&task_id)
            .bind(&input.milestone_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.position)
            .bind(TaskStatus::Locked)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        insert_event(
            &mut *tx,
            &input.project_id,
            ProjectEventType::TaskGenerated,
            Some(serde_json::json!({
                "milestoneId": input.milestone_id,
                "count": input.tasks.len(),
            })),
        )
        .await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.list_tasks(&input.milestone_id).await
    }

    /// A milestone's tasks ordered by position.
    pub async fn list_tasks(&self, milestone_id: &str) -> Result<Vec<Task>, StorageError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE milestone_id = ? ORDER BY position ASC")
            .bind(milestone_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(Task {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    milestone_id: row.try_get("milestone_id").map_err(StorageError::Sqlx)?,
                    title: row.try_get("title").map_err(StorageError::Sqlx)?,
                    description: row.try_get("description").map_err(StorageError::Sqlx)?,
                    position: row.try_get("position").map_err(StorageError::Sqlx)?,
                    status: row.try_get("status").map_err(StorageError::Sqlx)?,
                    generated_at: row.try_get("generated_at").map_err(StorageError::Sqlx)?,
                    completed_at: row.try_get("completed_at").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }
}
