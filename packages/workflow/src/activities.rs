// ABOUTME: Activity traits for the roadmap workflow and their live implementations
// ABOUTME: The traits are the seam where a durable-execution engine would plug in

use std::time::Duration;

use async_trait::async_trait;

use formiq_ai::{
    AiService, FocusQuestionsOutput, MilestoneTaskContext, MilestoneTasksOutput, ProjectContext,
    ProjectOutlineOutput,
};
use formiq_core::{
    FocusForm, IntakeAnswers, Milestone, ProjectDetails, ProjectStatus, PromptExecution, Task,
};
use formiq_projects::types::{
    CreateFocusFormInput, CreateMilestoneTasksInput, CreateProjectMilestonesInput,
    RecordPromptExecutionInput, ReplaceFocusFormItemsInput,
};
use formiq_projects::DbState;

use crate::error::WorkflowError;

// Per-queue start-to-close limits. Generation calls go out to the model
// provider; database calls stay on the local pool.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);
pub const DATABASE_TIMEOUT: Duration = Duration::from_secs(10);

/// Model-provider activities.
#[async_trait]
pub trait GenerateActivities: Send + Sync {
    async fn generate_focus_questions(
        &self,
        answers: &IntakeAnswers,
    ) -> Result<FocusQuestionsOutput, WorkflowError>;

    async fn generate_project_outline(
        &self,
        context: &ProjectContext,
    ) -> Result<ProjectOutlineOutput, WorkflowError>;

    async fn generate_tasks_for_milestone(
        &self,
        context: &MilestoneTaskContext,
    ) -> Result<MilestoneTasksOutput, WorkflowError>;
}

/// Persistence activities.
#[async_trait]
pub trait DatabaseActivities: Send + Sync {
    async fn get_project_details(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<ProjectDetails, WorkflowError>;

    async fn get_project_focus_form(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<FocusForm>, WorkflowError>;

    async fn create_focus_form(
        &self,
        input: CreateFocusFormInput,
    ) -> Result<FocusForm, WorkflowError>;

    async fn replace_focus_form_items(
        &self,
        input: ReplaceFocusFormItemsInput,
    ) -> Result<FocusForm, WorkflowError>;

    async fn create_project_milestones(
        &self,
        input: CreateProjectMilestonesInput,
    ) -> Result<Vec<Milestone>, WorkflowError>;

    async fn create_milestone_tasks(
        &self,
        input: CreateMilestoneTasksInput,
    ) -> Result<Vec<Task>, WorkflowError>;

    async fn set_project_status(
        &self,
        project_id: &str,
        user_id: &str,
        status: ProjectStatus,
    ) -> Result<(), WorkflowError>;

    async fn record_prompt_execution(
        &self,
        input: RecordPromptExecutionInput,
    ) -> Result<PromptExecution, WorkflowError>;
}

pub struct LiveGenerateActivities {
    service: AiService,
}

impl LiveGenerateActivities {
    pub fn new(service: AiService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl GenerateActivities for LiveGenerateActivities {
    async fn generate_focus_questions(
        &self,
        answers: &IntakeAnswers,
    ) -> Result<FocusQuestionsOutput, WorkflowError> {
        Ok(self.service.generate_focus_questions(answers).await?)
    }

    async fn generate_project_outline(
        &self,
        context: &ProjectContext,
    ) -> Result<ProjectOutlineOutput, WorkflowError> {
        Ok(self.service.generate_project_outline(context).await?)
    }

    async fn generate_tasks_for_milestone(
        &self,
        context: &MilestoneTaskContext,
    ) -> Result<MilestoneTasksOutput, WorkflowError> {
        Ok(self.service.generate_tasks_for_milestone(context).await?)
    }
}

pub struct LiveDatabaseActivities {
    db: DbState,
}

impl LiveDatabaseActivities {
    pub fn new(db: DbState) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DatabaseActivities for LiveDatabaseActivities {
    async fn get_project_details(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<ProjectDetails, WorkflowError> {
        Ok(self.db.projects.get_project_details(project_id, user_id).await?)
    }

    async fn get_project_focus_form(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<FocusForm>, WorkflowError> {
        Ok(self.db.forms.get_project_focus_form(project_id, user_id).await?)
    }

    async fn create_focus_form(
        &self,
        input: CreateFocusFormInput,
    ) -> Result<FocusForm, WorkflowError> {
        Ok(self.db.forms.create_focus_form(input).await?)
    }

    async fn replace_focus_form_items(
        &self,
        input: ReplaceFocusFormItemsInput,
    ) -> Result<FocusForm, WorkflowError> {
        Ok(self.db.forms.replace_focus_form_items(input).await?)
    }

    async fn create_project_milestones(
        &self,
        input: CreateProjectMilestonesInput,
    ) -> Result<Vec<Milestone>, WorkflowError> {
        Ok(self.db.milestones.create_project_milestones(input).await?)
    }

    async fn create_milestone_tasks(
        &self,
        input: CreateMilestoneTasksInput,
    ) -> Result<Vec<Task>, WorkflowError> {
        Ok(self.db.tasks.create_milestone_tasks(input).await?)
    }

    async fn set_project_status(
        &self,
        project_id: &str,
        user_id: &str,
        status: ProjectStatus,
    ) -> Result<(), WorkflowError> {
        Ok(self
            .db
            .projects
            .set_project_status(project_id, user_id, status)
            .await?)
    }

    async fn record_prompt_execution(
        &self,
        input: RecordPromptExecutionInput,
    ) -> Result<PromptExecution, WorkflowError> {
        Ok(self.db.executions.record_prompt_execution(input).await?)
    }
}
