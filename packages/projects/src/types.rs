// ABOUTME: Input structures for the FormIQ storage layer
// ABOUTME: Mirrors the shapes accepted by the HTTP API and workflow activities

use serde::{Deserialize, Serialize};

use formiq_core::{
    FormKind, ProjectCommitment, ProjectFamiliarity, ProjectWorkStyle, PromptExecutionStage,
    PromptExecutionStatus, QuestionType,
};

/// One intake response submitted at project creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponseInput {
    pub question_id: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub user_id: String,
    pub title: String,
    pub commitment: ProjectCommitment,
    pub familiarity: ProjectFamiliarity,
    pub work_style: ProjectWorkStyle,
    pub responses: Vec<QuestionResponseInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFocusItemInput {
    pub question: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFocusFormInput {
    pub name: String,
    pub project_id: String,
    pub user_id: String,
    pub kind: FormKind,
    pub items: Vec<CreateFocusItemInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceFocusFormItemsInput {
    pub form_id: String,
    pub user_id: String,
    pub items: Vec<CreateFocusItemInput>,
}

/// One focus answer; multiple values are folded into a single stored answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusResponseInput {
    pub focus_item_id: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneInput {
    pub title: String,
    pub summary: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectMilestonesInput {
    pub user_id: String,
    pub project_id: String,
    pub milestones: Vec<CreateMilestoneInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    pub description: String,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneTasksInput {
    pub user_id: String,
    pub project_id: String,
    pub milestone_id: String,
    pub tasks: Vec<CreateTaskInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPromptExecutionInput {
    pub project_id: String,
    pub milestone_id: Option<String>,
    pub task_id: Option<String>,
    pub stage: PromptExecutionStage,
    pub status: PromptExecutionStatus,
    pub input: serde_json::Value,
    pub output: Option<serde_json::Value>,
    pub model: Option<String>,
}
