// ABOUTME: Shared storage error type for all FormIQ database operations
// ABOUTME: Typed variants replace substring matching on error messages

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("Project {0} already has a focus form")]
    FocusFormExists(String),

    #[error("Project {0} already has milestones")]
    MilestonesExist(String),

    #[error("Milestone {0} already has tasks")]
    TasksExist(String),

    #[error("Unknown intake question: {0}")]
    UnknownQuestion(String),

    #[error("Focus item {item_id} does not belong to project {project_id}")]
    ForeignFocusItem {
        item_id: String,
        project_id: String,
    },
}

impl StorageError {
    /// True for the ownership/lookup misses that the HTTP layer maps to 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ProjectNotFound(_)
                | StorageError::FormNotFound(_)
                | StorageError::MilestoneNotFound(_)
        )
    }

    /// True for the create-once guards that the HTTP layer maps to 409.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::FocusFormExists(_)
                | StorageError::MilestonesExist(_)
                | StorageError::TasksExist(_)
        )
    }
}
