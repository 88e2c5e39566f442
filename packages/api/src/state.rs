// ABOUTME: Shared application state: database, workflow runtime, generation seam

use std::sync::Arc;

use formiq_projects::DbState;
use formiq_workflow::{
    GenerateActivities, LiveDatabaseActivities, LiveGenerateActivities, RoadmapWorkflow,
    WorkflowRuntime,
};

#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub runtime: WorkflowRuntime,
    pub generate: Arc<dyn GenerateActivities>,
}

impl AppState {
    pub fn new(db: DbState, generate: Arc<dyn GenerateActivities>) -> Self {
        let workflow = RoadmapWorkflow::new(
            Arc::clone(&generate),
            Arc::new(LiveDatabaseActivities::new(db.clone())),
        );
        Self {
            db,
            runtime: WorkflowRuntime::new(workflow),
            generate,
        }
    }

    /// Production wiring: the live OpenAI-backed activities.
    pub fn with_ai_service(db: DbState, service: formiq_ai::AiService) -> Self {
        let model = service.model().to_string();
        let generate: Arc<dyn GenerateActivities> = Arc::new(LiveGenerateActivities::new(service));
        let workflow = RoadmapWorkflow::new(
            Arc::clone(&generate),
            Arc::new(LiveDatabaseActivities::new(db.clone())),
        )
        .with_model(model);
        Self {
            db,
            runtime: WorkflowRuntime::new(workflow),
            generate,
        }
    }
}
