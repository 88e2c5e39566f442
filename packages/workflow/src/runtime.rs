// ABOUTME: In-process stand-in for the durable-execution engine
// ABOUTME: One named execution per project; no retry policy beyond the repair call

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::WorkflowError;
use crate::workflow::{GenerateProjectRoadmapInput, RoadmapWorkflow};

#[derive(Debug)]
pub struct WorkflowExecution {
    pub workflow_id: String,
    pub handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct WorkflowRuntime {
    workflow: Arc<RoadmapWorkflow>,
    running: Arc<Mutex<HashSet<String>>>,
}

impl WorkflowRuntime {
    pub fn new(workflow: RoadmapWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
            running: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Spawn the roadmap workflow for a project.
    ///
    /// Execution names follow `generate-project-roadmap-{project_id}`; a
    /// second start while one is in flight is rejected. A failed run logs the
    /// error and returns the project to `draft`.
    pub fn start_roadmap_workflow(
        &self,
        input: GenerateProjectRoadmapInput,
    ) -> Result<WorkflowExecution, WorkflowError> {
        let workflow_id = format!("generate-project-roadmap-{}", input.project_id);

        {
            let mut running = self.running.lock().expect("workflow registry poisoned");
            if !running.insert(input.project_id.clone()) {
                return Err(WorkflowError::AlreadyRunning(input.project_id));
            }
        }

        info!("Starting workflow: {}", workflow_id);

        let workflow = Arc::clone(&self.workflow);
        let running = Arc::clone(&self.running);

        let handle = tokio::spawn(async move {
            if let Err(workflow_error) = workflow.generate_project_roadmap(&input).await {
                error!(
                    "Workflow failed for project {}: {}",
                    input.project_id, workflow_error
                );
                if let Err(revert_error) = workflow.mark_draft(&input).await {
                    error!(
                        "Failed to return project {} to draft: {}",
                        input.project_id, revert_error
                    );
                }
            }

            running
                .lock()
                .expect("workflow registry poisoned")
                .remove(&input.project_id);
        });

        Ok(WorkflowExecution {
            workflow_id,
            handle,
        })
    }

    pub fn is_running(&self, project_id: &str) -> bool {
        self.running
            .lock()
            .expect("workflow registry poisoned")
            .contains(project_id)
    }
}
