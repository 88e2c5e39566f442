// ABOUTME: Domain storage for FormIQ: projects, forms, milestones, tasks, audit
// ABOUTME: Every read and write is scoped to the owning user

pub mod db;
pub mod events;
pub mod executions;
pub mod forms;
pub mod milestones;
pub mod projects;
pub mod tasks;
pub mod types;

pub use db::DbState;
pub use events::EventStorage;
pub use executions::ExecutionStorage;
pub use forms::FormStorage;
pub use milestones::MilestoneStorage;
pub use projects::ProjectStorage;
pub use tasks::TaskStorage;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlx::sqlite::SqlitePoolOptions;

    use formiq_core::{
        FormKind, MilestoneStatus, Project, ProjectCommitment, ProjectEventType,
        ProjectFamiliarity, ProjectStatus, ProjectWorkStyle, QuestionType, TEST_USER_ID,
    };
    use formiq_storage::StorageError;

    use super::db::DbState;
    use super::types::{
        CreateFocusFormInput, CreateFocusItemInput, CreateMilestoneInput, CreateMilestoneTasksInput,
        CreateProjectInput, CreateProjectMilestonesInput, CreateTaskInput, FocusResponseInput,
        QuestionResponseInput, ReplaceFocusFormItemsInput,
    };

    // A pooled :memory: database is per-connection, so tests pin one connection.
    async fn test_state() -> DbState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        formiq_storage::run_migrations(&pool).await.unwrap();
        formiq_storage::seed(&pool).await.unwrap();
        DbState::new(pool)
    }

    fn project_input(title: &str) -> CreateProjectInput {
        CreateProjectInput {
            user_id: TEST_USER_ID.to_string(),
            title: title.to_string(),
            commitment: ProjectCommitment::Moderate,
            familiarity: ProjectFamiliarity::SomeExperience,
            work_style: ProjectWorkStyle::FlexibleOrVaries,
            responses: vec![
                QuestionResponseInput {
                    question_id: "goal_statement".to_string(),
                    values: vec!["Release a three-track EP".to_string()],
                },
                QuestionResponseInput {
                    question_id: "available_resources".to_string(),
                    values: vec!["Dedicated time".to_string(), "Budget".to_string()],
                },
            ],
        }
    }

    async fn create_project(db: &DbState, title: &str) -> Project {
        db.projects.create_project(project_input(title)).await.unwrap()
    }

    fn focus_form_input(project_id: &str) -> CreateFocusFormInput {
        CreateFocusFormInput {
            name: format!("focus-{project_id}"),
            project_id: project_id.to_string(),
            user_id: TEST_USER_ID.to_string(),
            kind: FormKind::FocusQuestions,
            items: vec![
                CreateFocusItemInput {
                    question: "What genre is the EP?".to_string(),
                    question_type: QuestionType::FreeText,
                    options: vec![],
                    position: 0,
                },
                CreateFocusItemInput {
                    question: "Where will you record?".to_string(),
                    question_type: QuestionType::SingleSelect,
                    options: vec!["Home studio".to_string(), "Rented studio".to_string()],
                    position: 1,
                },
            ],
        }
    }

    #[tokio::test]
    async fn create_project_stores_responses_in_question_order() {
        let db = test_state().await;

        let project = create_project(&db, "EP launch").await;

        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.responses.len(), 2);
        // goal_statement has position 0, available_resources position 4
        assert_eq!(project.responses[0].question.id, "goal_statement");
        assert_eq!(
            project.responses[1].answer.values,
            vec!["Dedicated time", "Budget"]
        );
    }

    #[tokio::test]
    async fn create_project_rejects_unknown_question() {
        let db = test_state().await;

        let mut input = project_input("EP launch");
        input.responses.push(QuestionResponseInput {
            question_id: "made_up_question".to_string(),
            values: vec!["yes".to_string()],
        });

        let err = db.projects.create_project(input).await.unwrap_err();
        assert!(matches!(err, StorageError::UnknownQuestion(ref q) if q == "made_up_question"));

        // The aborted transaction must not leave a project behind.
        let projects = db
            .projects
            .get_projects_by_user_id(TEST_USER_ID)
            .await
            .unwrap();
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn get_project_is_ownership_scoped() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;

        let err = db
            .projects
            .get_project(&project.id, "someone-else")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn project_list_is_newest_first() {
        let db = test_state().await;
        create_project(&db, "First").await;
        // created_at has second resolution in SQLite text; force distinct stamps
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        create_project(&db, "Second").await;

        let projects = db
            .projects
            .get_projects_by_user_id(TEST_USER_ID)
            .await
            .unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].title, "Second");
    }

    #[tokio::test]
    async fn focus_form_is_create_once() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;

        let form = db
            .forms
            .create_focus_form(focus_form_input(&project.id))
            .await
            .unwrap();
        assert_eq!(form.items.len(), 2);
        assert_eq!(
            form.items[1].options,
            vec!["Home studio", "Rented studio"]
        );

        let mut second = focus_form_input(&project.id);
        second.name = "another-name".to_string();
        let err = db.forms.create_focus_form(second).await.unwrap_err();
        assert!(matches!(err, StorageError::FocusFormExists(_)));
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn focus_form_reads_as_none_for_wrong_owner() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;
        db.forms
            .create_focus_form(focus_form_input(&project.id))
            .await
            .unwrap();

        let form = db
            .forms
            .get_project_focus_form(&project.id, "someone-else")
            .await
            .unwrap();
        assert!(form.is_none());
    }

    #[tokio::test]
    async fn submit_focus_responses_is_atomic() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;
        let form = db
            .forms
            .create_focus_form(focus_form_input(&project.id))
            .await
            .unwrap();

        let err = db
            .forms
            .submit_focus_responses(
                &project.id,
                TEST_USER_ID,
                &[
                    FocusResponseInput {
                        focus_item_id: form.items[0].id.clone(),
                        values: vec!["Indie folk".to_string()],
                    },
                    FocusResponseInput {
                        focus_item_id: "item-not-on-this-form".to_string(),
                        values: vec!["n/a".to_string()],
                    },
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ForeignFocusItem { .. }));

        // The valid answer in the failed batch must not have been stored.
        let reloaded = db
            .forms
            .get_project_focus_form(&project.id, TEST_USER_ID)
            .await
            .unwrap()
            .unwrap();
        assert!(reloaded.items.iter().all(|i| i.answer.is_none()));
    }

    #[tokio::test]
    async fn submit_focus_responses_joins_multiple_values() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;
        let form = db
            .forms
            .create_focus_form(focus_form_input(&project.id))
            .await
            .unwrap();

        let updated = db
            .forms
            .submit_focus_responses(
                &project.id,
                TEST_USER_ID,
                &[FocusResponseInput {
                    focus_item_id: form.items[0].id.clone(),
                    values: vec!["Indie folk".to_string(), "Lo-fi".to_string()],
                }],
            )
            .await
            .unwrap();

        assert_eq!(
            updated.items[0].answer.as_deref(),
            Some("Indie folk, Lo-fi")
        );
        assert!(updated.items[0].answered_at.is_some());
        assert!(updated.items[1].answer.is_none());
    }

    #[tokio::test]
    async fn replace_focus_form_items_swaps_questions_and_clears_answers() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;
        let form = db
            .forms
            .create_focus_form(focus_form_input(&project.id))
            .await
            .unwrap();
        db.forms
            .submit_focus_responses(
                &project.id,
                TEST_USER_ID,
                &[FocusResponseInput {
                    focus_item_id: form.items[0].id.clone(),
                    values: vec!["Indie folk".to_string()],
                }],
            )
            .await
            .unwrap();

        let replaced = db
            .forms
            .replace_focus_form_items(ReplaceFocusFormItemsInput {
                form_id: form.id.clone(),
                user_id: TEST_USER_ID.to_string(),
                items: vec![CreateFocusItemInput {
                    question: "Who is the EP for?".to_string(),
                    question_type: QuestionType::FreeText,
                    options: vec![],
                    position: 0,
                }],
            })
            .await
            .unwrap();

        assert_eq!(replaced.items.len(), 1);
        assert_eq!(replaced.items[0].question, "Who is the EP for?");
        // the recorded answer went with the old item
        assert!(replaced.items[0].answer.is_none());

        let err = db
            .forms
            .replace_focus_form_items(ReplaceFocusFormItemsInput {
                form_id: form.id,
                user_id: "someone-else".to_string(),
                items: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::FormNotFound(_)));
    }

    #[tokio::test]
    async fn milestones_are_create_once_per_project() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;

        let input = CreateProjectMilestonesInput {
            user_id: TEST_USER_ID.to_string(),
            project_id: project.id.clone(),
            milestones: vec![
                CreateMilestoneInput {
                    title: "Write the songs".to_string(),
                    summary: "Draft and finalize three tracks".to_string(),
                    position: 0,
                },
                CreateMilestoneInput {
                    title: "Record".to_string(),
                    summary: "Track all instruments and vocals".to_string(),
                    position: 1,
                },
            ],
        };

        let milestones = db
            .milestones
            .create_project_milestones(input.clone())
            .await
            .unwrap();
        assert_eq!(milestones.len(), 2);
        assert_eq!(milestones[0].title, "Write the songs");
        // the roadmap opens with its first milestone ready to work on
        assert_eq!(milestones[0].status, MilestoneStatus::Unlocked);
        assert_eq!(milestones[1].status, MilestoneStatus::Locked);

        let err = db
            .milestones
            .create_project_milestones(input)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::MilestonesExist(_)));
    }

    #[tokio::test]
    async fn tasks_are_create_once_per_milestone() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;

        let milestones = db
            .milestones
            .create_project_milestones(CreateProjectMilestonesInput {
                user_id: TEST_USER_ID.to_string(),
                project_id: project.id.clone(),
                milestones: vec![CreateMilestoneInput {
                    title: "Write the songs".to_string(),
                    summary: "Draft and finalize three tracks".to_string(),
                    position: 0,
                }],
            })
            .await
            .unwrap();

        let input = CreateMilestoneTasksInput {
            user_id: TEST_USER_ID.to_string(),
            project_id: project.id.clone(),
            milestone_id: milestones[0].id.clone(),
            tasks: vec![CreateTaskInput {
                title: "Sketch chord progressions".to_string(),
                description: "Pick a key and tempo.\n\nTry three progressions.".to_string(),
                position: 0,
            }],
        };

        let tasks = db.tasks.create_milestone_tasks(input.clone()).await.unwrap();
        assert_eq!(tasks.len(), 1);

        let err = db.tasks.create_milestone_tasks(input).await.unwrap_err();
        assert!(matches!(err, StorageError::TasksExist(_)));
    }

    #[tokio::test]
    async fn status_change_stamps_generated_at_and_logs_event() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;
        assert!(project.generated_at.is_none());

        db.projects
            .set_project_status(&project.id, TEST_USER_ID, ProjectStatus::Generating)
            .await
            .unwrap();
        db.projects
            .set_project_status(&project.id, TEST_USER_ID, ProjectStatus::Ready)
            .await
            .unwrap();

        let reloaded = db
            .projects
            .get_project(&project.id, TEST_USER_ID)
            .await
            .unwrap();
        assert_eq!(reloaded.status, ProjectStatus::Ready);
        assert!(reloaded.generated_at.is_some());

        let events = db.events.list_events(&project.id).await.unwrap();
        let statuses: Vec<_> = events
            .iter()
            .filter(|e| e.event_type == ProjectEventType::StatusChange)
            .collect();
        assert_eq!(statuses.len(), 2);
        assert_eq!(
            statuses[1].payload.as_ref().unwrap()["status"],
            "ready"
        );
    }

    #[tokio::test]
    async fn project_details_collects_the_full_view() {
        let db = test_state().await;
        let project = create_project(&db, "EP launch").await;
        db.forms
            .create_focus_form(focus_form_input(&project.id))
            .await
            .unwrap();
        let milestones = db
            .milestones
            .create_project_milestones(CreateProjectMilestonesInput {
                user_id: TEST_USER_ID.to_string(),
                project_id: project.id.clone(),
                milestones: vec![CreateMilestoneInput {
                    title: "Write the songs".to_string(),
                    summary: "Draft and finalize three tracks".to_string(),
                    position: 0,
                }],
            })
            .await
            .unwrap();
        db.tasks
            .create_milestone_tasks(CreateMilestoneTasksInput {
                user_id: TEST_USER_ID.to_string(),
                project_id: project.id.clone(),
                milestone_id: milestones[0].id.clone(),
                tasks: vec![CreateTaskInput {
                    title: "Sketch chord progressions".to_string(),
                    description: "Pick a key and tempo.".to_string(),
                    position: 0,
                }],
            })
            .await
            .unwrap();

        let details = db
            .projects
            .get_project_details(&project.id, TEST_USER_ID)
            .await
            .unwrap();

        assert_eq!(details.milestones.len(), 1);
        assert_eq!(details.milestones[0].tasks.len(), 1);
        assert!(details.focus_form.is_some());
        assert_eq!(details.events.len(), 3); // focus form + milestones + tasks
    }
}
