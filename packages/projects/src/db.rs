// ABOUTME: Shared database state handed to API handlers and workflow activities
// ABOUTME: Owns one pool and an Arc per storage struct

use std::sync::Arc;

use sqlx::SqlitePool;

use formiq_storage::StorageError;

use crate::events::EventStorage;
use crate::executions::ExecutionStorage;
use crate::forms::FormStorage;
use crate::milestones::MilestoneStorage;
use crate::projects::ProjectStorage;
use crate::tasks::TaskStorage;

#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub projects: Arc<ProjectStorage>,
    pub forms: Arc<FormStorage>,
    pub milestones: Arc<MilestoneStorage>,
    pub tasks: Arc<TaskStorage>,
    pub executions: Arc<ExecutionStorage>,
    pub events: Arc<EventStorage>,
}

impl DbState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            projects: Arc::new(ProjectStorage::new(pool.clone())),
            forms: Arc::new(FormStorage::new(pool.clone())),
            milestones: Arc::new(MilestoneStorage::new(pool.clone())),
            tasks: Arc::new(TaskStorage::new(pool.clone())),
            executions: Arc::new(ExecutionStorage::new(pool.clone())),
            events: Arc::new(EventStorage::new(pool.clone())),
            pool,
        }
    }

    /// Connect, migrate, and seed, then wrap the pool in shared state.
    pub async fn init(database_url: &str) -> Result<Self, StorageError> {
        let pool = formiq_storage::connect(database_url).await?;
        formiq_storage::seed(&pool).await?;
        Ok(Self::new(pool))
    }
}
