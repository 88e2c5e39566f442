// ABOUTME: HTTP handlers for project creation, listing, and the start flow
// ABOUTME: Requests act as the seeded test user until real auth lands

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use formiq_core::{
    ProjectCommitment, ProjectFamiliarity, ProjectWorkStyle, IntakeAnswers, TEST_USER_ID,
};
use formiq_projects::types::{
    CreateFocusFormInput, CreateFocusItemInput, CreateProjectInput, QuestionResponseInput,
    RecordPromptExecutionInput,
};

use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// List project summaries for the current user.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let projects = state.db.projects.get_projects_by_user_id(TEST_USER_ID).await?;
    Ok(Json(ApiResponse::success(projects)))
}

/// Full project details: roadmap, focus form, audit trail.
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let details = state
        .db
        .projects
        .get_project_details(&project_id, TEST_USER_ID)
        .await?;
    Ok(Json(ApiResponse::success(details)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub responses: Vec<QuestionResponseInput>,
    pub commitment: Option<ProjectCommitment>,
    pub familiarity: Option<ProjectFamiliarity>,
    pub work_style: Option<ProjectWorkStyle>,
}

/// Create a draft project from an extended intake submission.
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }

    info!("Creating project: {}", title);

    let project = state
        .db
        .projects
        .create_project(CreateProjectInput {
            user_id: TEST_USER_ID.to_string(),
            title: title.to_string(),
            commitment: request.commitment.unwrap_or(ProjectCommitment::Moderate),
            familiarity: request.familiarity.unwrap_or(ProjectFamiliarity::SomeExperience),
            work_style: request.work_style.unwrap_or(ProjectWorkStyle::FlexibleOrVaries),
            responses: request.responses,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(project))))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartProjectRequest {
    pub goal: String,
    pub commitment: String,
    pub familiarity: String,
    pub work_style: String,
}

/// The quick-start flow: fixed intake answers in, focus questions out.
///
/// Validates the enum fields (the error names the offending field), creates
/// the project, generates focus questions, and persists them as the project's
/// focus form.
pub async fn start_project(
    State(state): State<AppState>,
    Json(request): Json<StartProjectRequest>,
) -> ApiResult<impl IntoResponse> {
    let goal = request.goal.trim().to_string();
    if goal.is_empty() {
        return Err(ApiError::Validation("goal must not be empty".to_string()));
    }

    let commitment: ProjectCommitment = request
        .commitment
        .parse()
        .map_err(|e: formiq_core::InvalidEnumValue| ApiError::Validation(e.to_string()))?;
    let familiarity: ProjectFamiliarity = request
        .familiarity
        .parse()
        .map_err(|e: formiq_core::InvalidEnumValue| ApiError::Validation(e.to_string()))?;
    let work_style: ProjectWorkStyle = request
        .work_style
        .parse()
        .map_err(|e: formiq_core::InvalidEnumValue| ApiError::Validation(e.to_string()))?;

    info!("Starting project for goal: {}", goal);

    let project = state
        .db
        .projects
        .create_project(CreateProjectInput {
            user_id: TEST_USER_ID.to_string(),
            title: goal.clone(),
            commitment,
            familiarity,
            work_style,
            responses: vec![],
        })
        .await?;

    let answers = IntakeAnswers {
        goal: goal.clone(),
        commitment,
        familiarity,
        work_style,
    };
    let output = state.generate.generate_focus_questions(&answers).await?;

    state
        .db
        .executions
        .record_prompt_execution(RecordPromptExecutionInput {
            project_id: project.id.clone(),
            milestone_id: None,
            task_id: None,
            stage: formiq_core::PromptExecutionStage::FocusQuestions,
            status: formiq_core::PromptExecutionStatus::Success,
            input: serde_json::to_value(&answers).unwrap_or_default(),
            output: serde_json::to_value(&output).ok(),
            model: None,
        })
        .await?;

    let form = state
        .db
        .forms
        .create_focus_form(CreateFocusFormInput {
            name: format!("focus-{}", project.id),
            project_id: project.id.clone(),
            user_id: TEST_USER_ID.to_string(),
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
        })
        .await?;

    Ok(Json(ApiResponse::success(json!({
        "projectId": project.id,
        "goal": goal,
        "focusQuestions": form.items,
        "status": "ok",
    }))))
}
