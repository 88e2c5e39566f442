// ABOUTME: Roadmap generation workflow: activity traits, body, in-process runtime

pub mod activities;
pub mod error;
pub mod runtime;
pub mod workflow;

pub use activities::{
    DatabaseActivities, GenerateActivities, LiveDatabaseActivities, LiveGenerateActivities,
    DATABASE_TIMEOUT, GENERATE_TIMEOUT,
};
pub use error::WorkflowError;
pub use runtime::{WorkflowExecution, WorkflowRuntime};
pub use workflow::{GenerateProjectRoadmapInput, RoadmapWorkflow};

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use formiq_ai::{
        FocusQuestionsOutput, MilestoneOutline, MilestoneTaskContext, MilestoneTasksOutput,
        ProjectContext, ProjectOutlineOutput, TaskOutline,
    };
    use formiq_core::{
        FocusForm, FocusItem, FormKind, IntakeAnswers, Milestone, MilestoneStatus, Project,
        ProjectCommitment, ProjectDetails, ProjectFamiliarity, ProjectStatus, ProjectWorkStyle,
        PromptExecution, PromptExecutionStatus, QuestionType, Task, TaskStatus,
    };
    use formiq_projects::types::{
        CreateFocusFormInput, CreateMilestoneTasksInput, CreateProjectMilestonesInput,
        RecordPromptExecutionInput, ReplaceFocusFormItemsInput,
    };

    use super::*;

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeGenerate {
        calls: CallLog,
        fail_outline: bool,
        outline_delay: Duration,
    }

    #[async_trait]
    impl GenerateActivities for FakeGenerate {
        async fn generate_focus_questions(
            &self,
            _answers: &IntakeAnswers,
        ) -> Result<FocusQuestionsOutput, WorkflowError> {
            self.calls.lock().unwrap().push("generate_focus_questions".to_string());
            Ok(FocusQuestionsOutput { questions: vec![] })
        }

        async fn generate_project_outline(
            &self,
            _context: &ProjectContext,
        ) -> Result<ProjectOutlineOutput, WorkflowError> {
            self.calls.lock().unwrap().push("generate_outline".to_string());
            tokio::time::sleep(self.outline_delay).await;
            if self.fail_outline {
                return Err(WorkflowError::Ai(formiq_ai::AiServiceError::InvalidOutput(
                    "milestones must not be empty".to_string(),
                )));
            }
            Ok(ProjectOutlineOutput {
                milestones: vec![
                    MilestoneOutline {
                        title: "Write the songs".to_string(),
                        description: "Draft three tracks.".to_string(),
                    },
                    MilestoneOutline {
                        title: "Record".to_string(),
                        description: "Track everything.".to_string(),
                    },
                ],
            })
        }

        async fn generate_tasks_for_milestone(
            &self,
            context: &MilestoneTaskContext,
        ) -> Result<MilestoneTasksOutput, WorkflowError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("generate_tasks:{}", context.milestone.title));
            Ok(MilestoneTasksOutput {
                tasks: vec![TaskOutline {
                    day: 1,
                    title: format!("Start {}", context.milestone.title),
                    objective: "Get moving".to_string(),
                    body: "Do the first step.".to_string(),
                    estimated_minutes: 30,
                }],
            })
        }
    }

    #[derive(Default)]
    struct FakeDbInner {
        statuses: Vec<ProjectStatus>,
        milestones: Vec<Milestone>,
        tasks: Vec<Task>,
        executions: Vec<RecordPromptExecutionInput>,
    }

    struct FakeDatabase {
        calls: CallLog,
        inner: Mutex<FakeDbInner>,
    }

    fn sample_project() -> Project {
        Project {
            id: "proj-1".to_string(),
            user_id: "test-user-id".to_string(),
            title: "EP launch".to_string(),
            commitment: ProjectCommitment::Moderate,
            familiarity: ProjectFamiliarity::SomeExperience,
            work_style: ProjectWorkStyle::FlexibleOrVaries,
            status: ProjectStatus::Draft,
            generated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            responses: vec![],
        }
    }

    fn answered_focus_form() -> FocusForm {
        FocusForm {
            id: "form-1".to_string(),
            name: "focus-proj-1".to_string(),
            project_id: Some("proj-1".to_string()),
            kind: FormKind::FocusQuestions,
            items: vec![FocusItem {
                id: "item-1".to_string(),
                question: "What genre?".to_string(),
                question_type: QuestionType::FreeText,
                options: vec![],
                position: 0,
                answer: Some("Indie folk".to_string()),
                answered_at: Some(Utc::now()),
            }],
        }
    }

    #[async_trait]
    impl DatabaseActivities for FakeDatabase {
        async fn get_project_details(
            &self,
            _project_id: &str,
            _user_id: &str,
        ) -> Result<ProjectDetails, WorkflowError> {
            Ok(ProjectDetails {
                project: sample_project(),
                milestones: vec![],
                focus_form: Some(answered_focus_form()),
                prompt_executions: vec![],
                events: vec![],
            })
        }

        async fn get_project_focus_form(
            &self,
            _project_id: &str,
            _user_id: &str,
        ) -> Result<Option<FocusForm>, WorkflowError> {
            Ok(Some(answered_focus_form()))
        }

        async fn create_focus_form(
            &self,
            _input: CreateFocusFormInput,
        ) -> Result<FocusForm, WorkflowError> {
            Ok(answered_focus_form())
        }

        async fn replace_focus_form_items(
            &self,
            _input: ReplaceFocusFormItemsInput,
        ) -> Result<FocusForm, WorkflowError> {
            Ok(answered_focus_form())
        }

        async fn create_project_milestones(
            &self,
            input: CreateProjectMilestonesInput,
        ) -> Result<Vec<Milestone>, WorkflowError> {
            self.calls.lock().unwrap().push("create_milestones".to_string());
            let milestones: Vec<Milestone> = input
                .milestones
                .iter()
                .map(|m| Milestone {
                    id: format!("ms-{}", m.position),
                    project_id: input.project_id.clone(),
                    title: m.title.clone(),
                    summary: m.summary.clone(),
                    position: m.position,
                    status: MilestoneStatus::Locked,
                    generated_at: Utc::now(),
                })
                .collect();
            self.inner.lock().unwrap().milestones = milestones.clone();
            Ok(milestones)
        }

        async fn create_milestone_tasks(
            &self,
            input: CreateMilestoneTasksInput,
        ) -> Result<Vec<Task>, WorkflowError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create_tasks:{}", input.milestone_id));
            let tasks: Vec<Task> = input
                .tasks
                .iter()
                .map(|t| Task {
                    id: format!("task-{}-{}", input.milestone_id, t.position),
                    milestone_id: input.milestone_id.clone(),
                    title: t.title.clone(),
                    description: t.description.clone(),
                    position: t.position,
                    status: TaskStatus::Locked,
                    generated_at: Utc::now(),
                    completed_at: None,
                })
                .collect();
            self.inner.lock().unwrap().tasks.extend(tasks.clone());
            Ok(tasks)
        }

        async fn set_project_status(
            &self,
            _project_id: &str,
            _user_id: &str,
            status: ProjectStatus,
        ) -> Result<(), WorkflowError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("set_status:{status:?}"));
            self.inner.lock().unwrap().statuses.push(status);
            Ok(())
        }

        async fn record_prompt_execution(
            &self,
            input: RecordPromptExecutionInput,
        ) -> Result<PromptExecution, WorkflowError> {
            let execution = PromptExecution {
                id: format!("exec-{}", self.inner.lock().unwrap().executions.len()),
                project_id: input.project_id.clone(),
                milestone_id: input.milestone_id.clone(),
                task_id: None,
                stage: input.stage,
                status: input.status,
                input: input.input.clone(),
                output: input.output.clone(),
                model: input.model.clone(),
                created_at: Utc::now(),
            };
            self.inner.lock().unwrap().executions.push(input);
            Ok(execution)
        }
    }

    fn build_workflow(fail_outline: bool, outline_delay: Duration) -> (RoadmapWorkflow, CallLog, Arc<FakeDatabase>) {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let generate = Arc::new(FakeGenerate {
            calls: Arc::clone(&calls),
            fail_outline,
            outline_delay,
        });
        let database = Arc::new(FakeDatabase {
            calls: Arc::clone(&calls),
            inner: Mutex::new(FakeDbInner::default()),
        });
        let workflow = RoadmapWorkflow::new(generate, Arc::clone(&database) as Arc<dyn DatabaseActivities>);
        (workflow, calls, database)
    }

    fn roadmap_input() -> GenerateProjectRoadmapInput {
        GenerateProjectRoadmapInput {
            project_id: "proj-1".to_string(),
            user_id: "test-user-id".to_string(),
        }
    }

    #[tokio::test]
    async fn happy_path_ends_ready_with_sequential_task_generation() {
        let (workflow, calls, database) = build_workflow(false, Duration::ZERO);

        workflow.generate_project_roadmap(&roadmap_input()).await.unwrap();

        let inner = database.inner.lock().unwrap();
        assert_eq!(
            inner.statuses,
            vec![ProjectStatus::Generating, ProjectStatus::Ready]
        );
        assert_eq!(inner.milestones.len(), 2);
        assert_eq!(inner.tasks.len(), 2);
        // objective and body are concatenated with a blank line
        assert_eq!(inner.tasks[0].description, "Get moving\n\nDo the first step.");
        // day-style numbering: the first task of a schedule is position 1
        assert_eq!(inner.tasks[0].position, 1);

        let calls = calls.lock().unwrap();
        let position = |name: &str| calls.iter().position(|c| c == name).unwrap();
        // all milestones are stored before any task generation starts
        assert!(position("create_milestones") < position("generate_tasks:Write the songs"));
        // each milestone's tasks are stored before the next generation begins
        assert!(position("create_tasks:ms-0") < position("generate_tasks:Record"));
        assert!(position("generate_tasks:Record") < position("create_tasks:ms-1"));
    }

    #[tokio::test]
    async fn happy_path_records_an_execution_per_generation_call() {
        let (workflow, _calls, database) = build_workflow(false, Duration::ZERO);

        workflow.generate_project_roadmap(&roadmap_input()).await.unwrap();

        let inner = database.inner.lock().unwrap();
        // one outline call + one per milestone
        assert_eq!(inner.executions.len(), 3);
        assert!(inner
            .executions
            .iter()
            .all(|e| e.status == PromptExecutionStatus::Success));
        assert_eq!(inner.executions[1].milestone_id.as_deref(), Some("ms-0"));
    }

    #[tokio::test]
    async fn failed_generation_returns_project_to_draft() {
        let (workflow, _calls, database) = build_workflow(true, Duration::ZERO);
        let runtime = WorkflowRuntime::new(workflow);

        let execution = runtime.start_roadmap_workflow(roadmap_input()).unwrap();
        assert_eq!(execution.workflow_id, "generate-project-roadmap-proj-1");
        execution.handle.await.unwrap();

        let inner = database.inner.lock().unwrap();
        assert_eq!(
            inner.statuses,
            vec![ProjectStatus::Generating, ProjectStatus::Draft]
        );
        // the failed call is still audited
        assert_eq!(inner.executions.len(), 1);
        assert_eq!(inner.executions[0].status, PromptExecutionStatus::Failed);
    }

    #[tokio::test]
    async fn duplicate_starts_are_rejected_while_running() {
        let (workflow, _calls, _database) = build_workflow(false, Duration::from_millis(200));
        let runtime = WorkflowRuntime::new(workflow);

        let execution = runtime.start_roadmap_workflow(roadmap_input()).unwrap();
        assert!(runtime.is_running("proj-1"));

        let err = runtime.start_roadmap_workflow(roadmap_input()).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyRunning(_)));

        execution.handle.await.unwrap();
        assert!(!runtime.is_running("proj-1"));
    }
}
