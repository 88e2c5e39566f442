// ABOUTME: HTTP handlers for intake and focus forms
// ABOUTME: Submitting the last focus answer is what starts the roadmap workflow

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use formiq_core::{intake::project_intake_form, FormKind, TEST_USER_ID};
use formiq_projects::types::FocusResponseInput;
use formiq_storage::StorageError;
use formiq_workflow::{GenerateProjectRoadmapInput, WorkflowError};

use crate::response::{ApiError, ApiResponse, ApiResult};
use crate::state::AppState;

/// The fixed intake question set, served without touching the database.
pub async fn intake_questions() -> impl IntoResponse {
    Json(ApiResponse::success(project_intake_form()))
}

/// A named intake form stored in the database.
pub async fn get_intake_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let form = state.db.forms.get_form_by_name(&name).await?;
    if form.kind != FormKind::ProjectIntake {
        return Err(StorageError::FormNotFound(name).into());
    }
    Ok(Json(ApiResponse::success(form)))
}

/// A named focus-questions form.
pub async fn get_focus_questions_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let form = state.db.forms.get_form_by_name(&name).await?;
    if form.kind != FormKind::FocusQuestions {
        return Err(StorageError::FormNotFound(name).into());
    }
    Ok(Json(ApiResponse::success(form)))
}

/// The focus form attached to a project.
pub async fn get_project_focus_form(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let form = state
        .db
        .forms
        .get_project_focus_form(&project_id, TEST_USER_ID)
        .await?
        .ok_or(StorageError::FormNotFound(project_id))?;
    Ok(Json(ApiResponse::success(form)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFocusResponsesRequest {
    pub responses: Vec<FocusResponseInput>,
}

/// Record focus answers; once every item is answered, start the roadmap
/// workflow. A run already in flight reads as `generating` rather than a
/// conflict.
pub async fn submit_focus_responses(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<SubmitFocusResponsesRequest>,
) -> ApiResult<impl IntoResponse> {
    let form = state
        .db
        .forms
        .submit_focus_responses(&project_id, TEST_USER_ID, &request.responses)
        .await?;

    let all_answered = form.items.iter().all(|item| item.answer.is_some());
    if !all_answered {
        return Ok(Json(ApiResponse::success(json!({
            "status": "ok",
            "form": form,
        }))));
    }

    info!("All focus items answered, starting roadmap for {}", project_id);

    match state.runtime.start_roadmap_workflow(GenerateProjectRoadmapInput {
        project_id: project_id.clone(),
        user_id: TEST_USER_ID.to_string(),
    }) {
        Ok(_) | Err(WorkflowError::AlreadyRunning(_)) => {}
        Err(e) => return Err(ApiError::Workflow(e)),
    }

    Ok(Json(ApiResponse::success(json!({
        "status": "generating",
        "form": form,
    }))))
}
