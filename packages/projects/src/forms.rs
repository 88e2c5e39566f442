// ABOUTME: Stored form storage: named intake forms and per-project focus forms
// ABOUTME: Focus answers are submitted atomically; foreign item ids abort the batch

use chrono::Utc;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use formiq_core::{FocusForm, FocusItem, FormKind, ProjectEventType};
use formiq_storage::StorageError;

use crate::events::insert_event;
use crate::types::{CreateFocusFormInput, FocusResponseInput, ReplaceFocusFormItemsInput};

pub struct FormStorage {
    pool: SqlitePool,
}

impl FormStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a project's focus form with its generated questions.
    ///
    /// A project carries at most one focus form; a second create fails with
    /// `FocusFormExists` and leaves the stored one untouched.
    pub async fn create_focus_form(
        &self,
        input: CreateFocusFormInput,
    ) -> Result<FocusForm, StorageError> {
        info!(
            "Creating focus form '{}' for project: {}",
            input.name, input.project_id
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

        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM forms WHERE project_id = ? AND kind = ?",
        )
        .bind(&input.project_id)
        .bind(input.kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        if existing.is_some() {
            return Err(StorageError::FocusFormExists(input.project_id.clone()));
        }

        let form_id = format!("form-{}", nanoid::nanoid!());
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("INSERT INTO forms (id, name, project_id, kind) VALUES (?, ?, ?, ?)")
            .bind(&form_id)
            .bind(&input.name)
            .bind(&input.project_id)
            .bind(input.kind)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        Self::insert_items(&mut tx, &form_id, &input.items).await?;

        insert_event(
            &mut *tx,
            &input.project_id,
            ProjectEventType::FocusFormCreated,
            Some(serde_json::json!({
                "formId": form_id,
                "questionCount": input.items.len(),
            })),
        )
        .await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.load_form(&form_id).await
    }

    /// Fetch a stored form by its unique name, items ordered by position.
    pub async fn get_form_by_name(&self, name: &str) -> Result<FocusForm, StorageError> {
        let form_id: Option<String> = sqlx::query_scalar("SELECT id FROM forms WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match form_id {
            Some(id) => self.load_form(&id).await,
            None => Err(StorageError::FormNotFound(name.to_string())),
        }
    }

    /// A project's focus form, or None when it has none yet.
    ///
    /// A project owned by someone else also reads as None.
    pub async fn get_project_focus_form(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<FocusForm>, StorageError> {
        let form_id: Option<String> = sqlx::query_scalar(
            "SELECT f.id FROM forms f
             JOIN projects p ON p.id = f.project_id
             WHERE f.project_id = ? AND f.kind = 'focus_questions' AND p.user_id = ?",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match form_id {
            Some(id) => Ok(Some(self.load_form(&id).await?)),
            None => Ok(None),
        }
    }

    /// Replace every item on a form, clearing any recorded answers.
    pub async fn replace_focus_form_items(
        &self,
        input: ReplaceFocusFormItemsInput,
    ) -> Result<FocusForm, StorageError> {
        debug!("Replacing items on form: {}", input.form_id);

        let owned: Option<String> = sqlx::query_scalar(
            "SELECT f.id FROM forms f
             JOIN projects p ON p.id = f.project_id
             WHERE f.id = ? AND p.user_id = ?",
        )
        .bind(&input.form_id)
        .bind(&input.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        if owned.is_none() {
            return Err(StorageError::FormNotFound(input.form_id.clone()));
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("DELETE FROM form_items WHERE form_id = ?")
            .bind(&input.form_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        Self::insert_items(&mut tx, &input.form_id, &input.items).await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.load_form(&input.form_id).await
    }

    /// Record a batch of focus answers for a project's focus form.
    ///
    /// All answers land in one transaction; an id that does not belong to the
    /// project's form fails the whole batch with `ForeignFocusItem`. Multiple
    /// values are stored joined by ", ".
    pub async fn submit_focus_responses(
        &self,
        project_id: &str,
        user_id: &str,
        responses: &[FocusResponseInput],
    ) -> Result<FocusForm, StorageError> {
        let form = self
            .get_project_focus_form(project_id, user_id)
            .await?
            .ok_or_else(|| StorageError::FormNotFound(project_id.to_string()))?;

        debug!(
            "Submitting {} focus responses for project: {}",
            responses.len(),
            project_id
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        for response in responses {
            let answer = response.values.join(", ");
            let result = sqlx::query(
                "UPDATE form_items SET answer = ?, answered_at = ?
                 WHERE id = ? AND form_id = ?",
            )
            .bind(answer)
            .bind(now)
            .bind(&response.focus_item_id)
            .bind(&form.id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

            if result.rows_affected() == 0 {
                return Err(StorageError::ForeignFocusItem {
                    item_id: response.focus_item_id.clone(),
                    project_id: project_id.to_string(),
                });
            }
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.load_form(&form.id).await
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Sqlite>,
        form_id: &str,
        items: &[crate::types::CreateFocusItemInput],
    ) -> Result<(), StorageError> {
        for item in items {
            let item_id = format!("item-{}", nanoid::nanoid!());
            let options = serde_json::to_string(&item.options)?;
            sqlx::query(
                "INSERT INTO form_items (id, form_id, question, question_type, options, position)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&item_id)
            .bind(form_id)
            .bind(&item.question)
            .bind(item.question_type)
            .bind(options)
            .bind(item.position)
            .execute(&mut **tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }
        Ok(())
    }

    async fn load_form(&self, form_id: &str) -> Result<FocusForm, StorageError> {
        let row = sqlx::query("SELECT id, name, project_id, kind FROM forms WHERE id = ?")
            .bind(form_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::FormNotFound(form_id.to_string()))?;

        let kind: FormKind = row.try_get("kind").map_err(StorageError::Sqlx)?;

        let item_rows =
            sqlx::query("SELECT * FROM form_items WHERE form_id = ? ORDER BY position ASC")
                .bind(form_id)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        let items = item_rows
            .iter()
            .map(|item| {
                let options_json: String = item.try_get("options").map_err(StorageError::Sqlx)?;
                Ok(FocusItem {
                    id: item.try_get("id").map_err(StorageError::Sqlx)?,
                    question: item.try_get("question").map_err(StorageError::Sqlx)?,
                    question_type: item.try_get("question_type").map_err(StorageError::Sqlx)?,
                    options: serde_json::from_str(&options_json).unwrap_or_default(),
                    position: item.try_get("position").map_err(StorageError::Sqlx)?,
                    answer: item.try_get("answer").map_err(StorageError::Sqlx)?,
                    answered_at: item.try_get("answered_at").map_err(StorageError::Sqlx)?,
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(FocusForm {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            name: row.try_get("name").map_err(StorageError::Sqlx)?,
            project_id: row.try_get("project_id").map_err(StorageError::Sqlx)?,
            kind,
            items,
        })
    }
}
