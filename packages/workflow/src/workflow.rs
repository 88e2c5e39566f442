// ABOUTME: The roadmap workflow body: focus form, outline, then per-milestone tasks
// ABOUTME: Milestone task generation is strictly sequential, never fanned out

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use formiq_ai::{MilestoneContext, MilestoneTaskContext, ProjectContext};
use formiq_core::{
    FocusForm, IntakeAnswers, ProjectStatus, PromptExecutionStage, PromptExecutionStatus,
};
use formiq_projects::types::{
    CreateFocusFormInput, CreateFocusItemInput, CreateMilestoneInput, CreateMilestoneTasksInput,
    CreateProjectMilestonesInput, CreateTaskInput, RecordPromptExecutionInput,
};

use crate::activities::{DatabaseActivities, GenerateActivities, DATABASE_TIMEOUT, GENERATE_TIMEOUT};
use crate::error::WorkflowError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProjectRoadmapInput {
    pub project_id: String,
    pub user_id: String,
}

async fn with_timeout<T, F>(limit: Duration, name: &str, fut: F) -> Result<T, WorkflowError>
where
    F: Future<Output = Result<T, WorkflowError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| WorkflowError::ActivityTimeout(name.to_string()))?
}

pub struct RoadmapWorkflow {
    generate: Arc<dyn GenerateActivities>,
    database: Arc<dyn DatabaseActivities>,
    model: Option<String>,
}

impl RoadmapWorkflow {
    pub fn new(generate: Arc<dyn GenerateActivities>, database: Arc<dyn DatabaseActivities>) -> Self {
        Self {
            generate,
            database,
            model: None,
        }
    }

    /// Model name recorded on prompt executions.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Generate the full roadmap for a project whose focus responses are in.
    ///
    /// Milestones are persisted before any task generation starts, and each
    /// milestone's schedule is generated only after the previous one is stored.
    pub async fn generate_project_roadmap(
        &self,
        input: &GenerateProjectRoadmapInput,
    ) -> Result<(), WorkflowError> {
        let details = with_timeout(
            DATABASE_TIMEOUT,
            "get_project_details",
            self.database
                .get_project_details(&input.project_id, &input.user_id),
        )
        .await?;
        let project = details.project;

        // The intake path usually creates the focus form before the workflow
        // starts; generate one only when it is missing.
        let focus_form = match details.focus_form {
            Some(form) => form,
            None => self.create_focus_form(input, &project).await?,
        };

        with_timeout(
            DATABASE_TIMEOUT,
            "set_project_status",
            self.database.set_project_status(
                &input.project_id,
                &input.user_id,
                ProjectStatus::Generating,
            ),
        )
        .await?;

        let context = ProjectContext::from_project(&project, &focus_form.items);
        let context_json = serde_json::to_value(&context).unwrap_or_default();

        let outline = with_timeout(
            GENERATE_TIMEOUT,
            "generate_project_outline",
            self.generate.generate_project_outline(&context),
        )
        .await;
        self.record_execution(
            &input.project_id,
            None,
            PromptExecutionStage::MilestoneOutline,
            context_json.clone(),
            outline
                .as_ref()
                .map(|o| serde_json::to_value(o).unwrap_or_default())
                .map_err(|e| e.to_string()),
        )
        .await?;
        let outline = outline?;

        let milestones = with_timeout(
            DATABASE_TIMEOUT,
            "create_project_milestones",
            self.database
                .create_project_milestones(CreateProjectMilestonesInput {
                    user_id: input.user_id.clone(),
                    project_id: input.project_id.clone(),
                    milestones: outline
                        .milestones
                        .iter()
                        .enumerate()
                        .map(|(position, milestone)| CreateMilestoneInput {
                            title: milestone.title.clone(),
                            summary: milestone.description.clone(),
                            position: position as i64,
                        })
                        .collect(),
                }),
        )
        .await?;

        info!(
            "Stored {} milestones for project {}, generating task schedules",
            milestones.len(),
            input.project_id
        );

        for milestone in &milestones {
            let task_context =
                MilestoneTaskContext::new(context.clone(), MilestoneContext::from(milestone));

            let schedule = with_timeout(
                GENERATE_TIMEOUT,
                "generate_tasks_for_milestone",
                self.generate.generate_tasks_for_milestone(&task_context),
            )
            .await;
            self.record_execution(
                &input.project_id,
                Some(milestone.id.clone()),
                PromptExecutionStage::TaskGeneration,
                serde_json::to_value(&task_context).unwrap_or_default(),
                schedule
                    .as_ref()
                    .map(|s| serde_json::to_value(s).unwrap_or_default())
                    .map_err(|e| e.to_string()),
            )
            .await?;
            let schedule = schedule?;

            with_timeout(
                DATABASE_TIMEOUT,
                "create_milestone_tasks",
                self.database.create_milestone_tasks(CreateMilestoneTasksInput {
                    user_id: input.user_id.clone(),
                    project_id: input.project_id.clone(),
                    milestone_id: milestone.id.clone(),
                    // task positions are 1-based; milestones stay 0-based
                    tasks: schedule
                        .tasks
                        .iter()
                        .enumerate()
                        .map(|(index, task)| CreateTaskInput {
                            title: task.title.clone(),
                            description: format!("{}\n\n{}", task.objective, task.body),
                            position: index as i64 + 1,
                        })
                        .collect(),
                }),
            )
            .await?;
        }

        with_timeout(
            DATABASE_TIMEOUT,
            "set_project_status",
            self.database
                .set_project_status(&input.project_id, &input.user_id, ProjectStatus::Ready),
        )
        .await?;

        info!("Roadmap complete for project {}", input.project_id);
        Ok(())
    }

    /// Revert a failed run so the user can retry from the intake flow.
    pub async fn mark_draft(&self, input: &GenerateProjectRoadmapInput) -> Result<(), WorkflowError> {
        with_timeout(
            DATABASE_TIMEOUT,
            "set_project_status",
            self.database
                .set_project_status(&input.project_id, &input.user_id, ProjectStatus::Draft),
        )
        .await
    }

    async fn create_focus_form(
        &self,
        input: &GenerateProjectRoadmapInput,
        project: &formiq_core::Project,
    ) -> Result<FocusForm, WorkflowError> {
        let answers = IntakeAnswers {
            goal: project.title.clone(),
            commitment: project.commitment,
            familiarity: project.familiarity,
            work_style: project.work_style,
        };

        let output = with_timeout(
            GENERATE_TIMEOUT,
            "generate_focus_questions",
            self.generate.generate_focus_questions(&answers),
        )
        .await;
        self.record_execution(
            &input.project_id,
            None,
            PromptExecutionStage::FocusQuestions,
            serde_json::to_value(&answers).unwrap_or_default(),
            output
                .as_ref()
                .map(|o| serde_json::to_value(o).unwrap_or_default())
                .map_err(|e| e.to_string()),
        )
        .await?;
        let output = output?;

        with_timeout(
            DATABASE_TIMEOUT,
            "create_focus_form",
            self.database.create_focus_form(CreateFocusFormInput {
                name: format!("focus-{}", input.project_id),
                project_id: input.project_id.clone(),
                user_id: input.user_id.clone(),
                kind: formiq_core::FormKind::FocusQuestions,
                items: output
                    .questions
                    .iter()
                    .map(|question| CreateFocusItemInput {
                        question: question.prompt.clone(),
                        question_type: question.question_type,
                        options: question.options.clone(),
                        position: question.position,
                    })
                    .collect(),
            }),
        )
        .await
    }

    async fn record_execution(
        &self,
        project_id: &str,
        milestone_id: Option<String>,
        stage: PromptExecutionStage,
        input: serde_json::Value,
        output: Result<serde_json::Value, String>,
    ) -> Result<(), WorkflowError> {
        let (status, output) = match output {
            Ok(value) => (PromptExecutionStatus::Success, Some(value)),
            Err(message) => (
                PromptExecutionStatus::Failed,
                Some(json!({ "error": message })),
            ),
        };

        with_timeout(
            DATABASE_TIMEOUT,
            "record_prompt_execution",
            self.database
                .record_prompt_execution(RecordPromptExecutionInput {
                    project_id: project_id.to_string(),
                    milestone_id,
                    task_id: None,
                    stage,
                    status,
                    input,
                    output,
                    model: self.model.clone(),
                }),
        )
        .await?;
        Ok(())
    }
}
