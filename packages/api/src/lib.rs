// ABOUTME: HTTP API layer for FormIQ providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

pub mod forms_handlers;
pub mod projects_handlers;
pub mod response;
pub mod state;

pub use response::{ApiError, ApiResponse, ApiResult};
pub use state::AppState;

async fn health() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(json!({ "status": "ok" })))
}

/// The full application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/project-intake/questions",
            get(forms_handlers::intake_questions),
        )
        .route("/intake-forms/{name}", get(forms_handlers::get_intake_form))
        .route(
            "/focus-questions/{name}",
            get(forms_handlers::get_focus_questions_form),
        )
        .route(
            "/projects",
            get(projects_handlers::list_projects).post(projects_handlers::create_project),
        )
        .route("/projects/start", post(projects_handlers::start_project))
        .route("/projects/{project_id}", get(projects_handlers::get_project))
        .route(
            "/projects/{project_id}/focus-form",
            get(forms_handlers::get_project_focus_form),
        )
        .route(
            "/projects/{project_id}/focus-responses",
            put(forms_handlers::submit_focus_responses),
        )
        .with_state(state)
}
