// ABOUTME: Milestone storage: batch creation of a project's generated outline
// ABOUTME: Milestones are create-once; a second batch for a project is rejected

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

use formiq_core::{Milestone, MilestoneStatus, ProjectEventType};
use formiq_storage::StorageError;

use crate::events::insert_event;
use crate::types::CreateProjectMilestonesInput;

pub struct MilestoneStorage {
    pool: SqlitePool,
}

impl MilestoneStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a project's full milestone outline in one transaction.
    ///
    /// The first milestone starts `unlocked`, the rest `locked`. A project
    /// that already has milestones fails with `MilestonesExist` and keeps its
    /// stored outline.
    pub async fn create_project_milestones(
        &self,
        input: CreateProjectMilestonesInput,
    ) -> Result<Vec<Milestone>, StorageError> {
        info!(
            "Storing {} milestones for project: {}",
            input.milestones.len(),
            input.project_id
        );

        let owned: Option<String> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = ? AND user_id = ?")
                .bind(&input.project_id)
                .bind(&input.user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;
        if owned.is_none() {
            return Err(StorageError::ProjectNotFound(input.project_id.clone()));
        }

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM milestones WHERE project_id = ?")
                .bind(&input.project_id)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;
        if existing > 0 {
            return Err(StorageError::MilestonesExist(input.project_id.clone()));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        let mut ids = Vec::with_capacity(input.milestones.len());

        for milestone in &input.milestones {
            let milestone_id = format!("ms-{}", nanoid::nanoid!());
            let status = if milestone.position == 0 {
                MilestoneStatus::Unlocked
            } else {
                MilestoneStatus::Locked
            };
            sqlx::query(
                "INSERT INTO milestones (id, project_id, title, summary, position, status, generated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&milestone_id)
            .bind(&input.project_id)
            .bind(&milestone.title)
            .bind(&milestone.summary)
            .bind(milestone.position)
            .bind(status)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
            ids.push(milestone_id);
        }

        insert_event(
            &mut *tx,
            &input.project_id,
            ProjectEventType::MilestoneGenerated,
            Some(serde_json::json!({ "count": input.milestones.len() })),
        )
        .await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.list_milestones(&input.project_id).await
    }

    /// A project's milestones ordered by position.
    pub async fn list_milestones(&self, project_id: &str) -> Result<Vec<Milestone>, StorageError> {
        let rows =
            sqlx::query("SELECT * FROM milestones WHERE project_id = ? ORDER BY position ASC")
                .bind(project_id)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(Milestone {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    project_id: row.try_get("project_id").map_err(StorageError::Sqlx)?,
                    title: row.try_get("title").map_err(StorageError::Sqlx)?,
                    summary: row.try_get("summary").map_err(StorageError::Sqlx)?,
                    position: row.try_get("position").map_err(StorageError::Sqlx)?,
                    status: row.try_get("status").map_err(StorageError::Sqlx)?,
                    generated_at: row.try_get("generated_at").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }
}
