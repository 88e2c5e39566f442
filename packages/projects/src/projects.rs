// ABOUTME: Project storage: creation with intake responses, ownership-checked reads
// ABOUTME: Status transitions are stored here but driven by the roadmap workflow

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use formiq_core::{
    Milestone, MilestoneWithTasks, Project, ProjectDetails, ProjectEventType, ProjectQuestion,
    ProjectStatus, ProjectSummary, QuestionAnswer, QuestionResponse, Task,
};
use formiq_storage::StorageError;

use crate::events::insert_event;
use crate::forms::FormStorage;
use crate::types::CreateProjectInput;

pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a project in `draft` and record its intake responses.
    ///
    /// Every submitted question id must exist on a stored intake form; the
    /// project row and all answers are written in one transaction.
    pub async fn create_project(&self, input: CreateProjectInput) -> Result<Project, StorageError> {
        let project_id = format!("proj-{}", nanoid::nanoid!());
        let now = Utc::now();

        debug!(
            "Creating project '{}' for user: {}",
            input.title, input.user_id
        );

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO projects (
                id, user_id, title, commitment, familiarity, work_style,
                status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project_id)
        .bind(&input.user_id)
        .bind(input.title.trim())
        .bind(input.commitment)
        .bind(input.familiarity)
        .bind(input.work_style)
        .bind(ProjectStatus::Draft)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        for response in &input.responses {
            let known: Option<String> = sqlx::query_scalar(
                "SELECT i.id FROM form_items i
                 JOIN forms f ON f.id = i.form_id
                 WHERE i.id = ? AND f.kind = 'project_intake'",
            )
            .bind(&response.question_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            if known.is_none() {
                return Err(StorageError::UnknownQuestion(response.question_id.clone()));
            }

            let values = serde_json::to_string(&response.values)?;
            sqlx::query(
                "INSERT INTO question_answers (project_id, question_id, values_json, answered_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(&project_id)
            .bind(&response.question_id)
            .bind(values)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_project(&project_id, &input.user_id).await
    }

    /// Fetch a project with its intake responses; a wrong owner is NotFound.
    pub async fn get_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Project, StorageError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::ProjectNotFound(project_id.to_string()))?;

        let responses = self.load_responses(project_id).await?;

        Ok(Project {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            title: row.try_get("title").map_err(StorageError::Sqlx)?,
            commitment: row.try_get("commitment").map_err(StorageError::Sqlx)?,
            familiarity: row.try_get("familiarity").map_err(StorageError::Sqlx)?,
            work_style: row.try_get("work_style").map_err(StorageError::Sqlx)?,
            status: row.try_get("status").map_err(StorageError::Sqlx)?,
            generated_at: row.try_get("generated_at").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
            responses,
        })
    }

    /// Project summaries for a user, newest first.
    pub async fn get_projects_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<ProjectSummary>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, title, status FROM projects
             WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(ProjectSummary {
                    id: row.try_get("id").map_err(StorageError::Sqlx)?,
                    title: row.try_get("title").map_err(StorageError::Sqlx)?,
                    status: row.try_get("status").map_err(StorageError::Sqlx)?,
                })
            })
            .collect()
    }

    /// The full project view: milestones with tasks, focus form, audit trail.
    pub async fn get_project_details(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<ProjectDetails, StorageError> {
        debug!("Fetching project details: {}", project_id);

        let project = self.get_project(project_id, user_id).await?;

        let milestone_rows = sqlx::query(
            "SELECT * FROM milestones WHERE project_id = ? ORDER BY position ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut milestones = Vec::with_capacity(milestone_rows.len());
        for row in &milestone_rows {
            let milestone = Milestone {
                id: row.try_get("id").map_err(StorageError::Sqlx)?,
                project_id: row.try_get("project_id").map_err(StorageError::Sqlx)?,
                title: row.try_get("title").map_err(StorageError::Sqlx)?,
                summary: row.try_get("summary").map_err(StorageError::Sqlx)?,
                position: row.try_get("position").map_err(StorageError::Sqlx)?,
                status: row.try_get("status").map_err(StorageError::Sqlx)?,
                generated_at: row.try_get("generated_at").map_err(StorageError::Sqlx)?,
            };

            let task_rows = sqlx::query(
                "SELECT * FROM tasks WHERE milestone_id = ? ORDER BY position ASC",
            )
            .bind(&milestone.id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

            let tasks = task_rows
                .iter()
                .map(|t| {
                    Ok(Task {
                        id: t.try_get("id").map_err(StorageError::Sqlx)?,
                        milestone_id: t.try_get("milestone_id").map_err(StorageError::Sqlx)?,
                        title: t.try_get("title").map_err(StorageError::Sqlx)?,
                        description: t.try_get("description").map_err(StorageError::Sqlx)?,
                        position: t.try_get("position").map_err(StorageError::Sqlx)?,
                        status: t.try_get("status").map_err(StorageError::Sqlx)?,
                        generated_at: t.try_get("generated_at").map_err(StorageError::Sqlx)?,
                        completed_at: t.try_get("completed_at").map_err(StorageError::Sqlx)?,
                    })
                })
                .collect::<Result<Vec<_>, StorageError>>()?;

            milestones.push(MilestoneWithTasks { milestone, tasks });
        }

        let form_storage = FormStorage::new(self.pool.clone());
        let focus_form = form_storage
            .get_project_focus_form(project_id, user_id)
            .await?;

        let executions = crate::executions::ExecutionStorage::new(self.pool.clone())
            .list_prompt_executions(project_id)
            .await?;
        let events = crate::events::EventStorage::new(self.pool.clone())
            .list_events(project_id)
            .await?;

        Ok(ProjectDetails {
            project,
            milestones,
            focus_form,
            prompt_executions: executions,
            events,
        })
    }

    /// Store a new status and append the matching `status_change` event.
    ///
    /// `generated_at` is stamped when the project enters `ready`.
    pub async fn set_project_status(
        &self,
        project_id: &str,
        user_id: &str,
        status: ProjectStatus,
    ) -> Result<(), StorageError> {
        debug!("Setting project {} status to {:?}", project_id, status);

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = if status == ProjectStatus::Ready {
            sqlx::query(
                "UPDATE projects SET status = ?, generated_at = ?, updated_at = ?
                 WHERE id = ? AND user_id = ?",
            )
            .bind(status)
            .bind(now)
            .bind(now)
            .bind(project_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?
        } else {
            sqlx::query(
                "UPDATE projects SET status = ?, updated_at = ?
                 WHERE id = ? AND user_id = ?",
            )
            .bind(status)
            .bind(now)
            .bind(project_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?
        };

        if result.rows_affected() == 0 {
            return Err(StorageError::ProjectNotFound(project_id.to_string()));
        }

        insert_event(
            &mut *tx,
            project_id,
            ProjectEventType::StatusChange,
            Some(serde_json::json!({ "status": status })),
        )
        .await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;
        Ok(())
    }

    async fn load_responses(&self, project_id: &str) -> Result<Vec<QuestionResponse>, StorageError> {
        let rows = sqlx::query(
            "SELECT qa.question_id, qa.values_json, qa.answered_at,
                    i.question, i.question_type, i.options
             FROM question_answers qa
             JOIN form_items i ON i.id = qa.question_id
             WHERE qa.project_id = ?
             ORDER BY i.position ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                let values_json: String = row.try_get("values_json").map_err(StorageError::Sqlx)?;
                let options_json: String = row.try_get("options").map_err(StorageError::Sqlx)?;
                Ok(QuestionResponse {
                    question: ProjectQuestion {
                        id: row.try_get("question_id").map_err(StorageError::Sqlx)?,
                        prompt: row.try_get("question").map_err(StorageError::Sqlx)?,
                        question_type: row.try_get("question_type").map_err(StorageError::Sqlx)?,
                        options: serde_json::from_str(&options_json).unwrap_or_default(),
                    },
                    answer: QuestionAnswer {
                        question_id: row.try_get("question_id").map_err(StorageError::Sqlx)?,
                        values: serde_json::from_str(&values_json).unwrap_or_default(),
                        answered_at: row.try_get("answered_at").map_err(StorageError::Sqlx)?,
                    },
                })
            })
            .collect()
    }
}
