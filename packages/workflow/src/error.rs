// ABOUTME: Workflow error type covering activity failures and runtime guards

use thiserror::Error;

use formiq_ai::AiServiceError;
use formiq_storage::StorageError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Activity '{0}' timed out")]
    ActivityTimeout(String),

    #[error("Generation failed: {0}")]
    Ai(#[from] AiServiceError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("A roadmap workflow is already running for project {0}")]
    AlreadyRunning(String),
}
