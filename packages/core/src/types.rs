// ABOUTME: Domain enums and DTO structures shared across FormIQ packages
// ABOUTME: Wire format is camelCase JSON; database format is snake_case TEXT

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    FreeText,
    SingleSelect,
    MultiSelect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectCommitment {
    Light,
    Moderate,
    Heavy,
    Dedicated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectFamiliarity {
    CompletelyNew,
    SomeExperience,
    ExperiencedRefining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectWorkStyle {
    ShortDailySessions,
    FocusedSessionsPerWeek,
    FlexibleOrVaries,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Generating,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Locked,
    Unlocked,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Locked,
    Unlocked,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    ProjectIntake,
    FocusQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PromptExecutionStage {
    FocusQuestions,
    MilestoneOutline,
    TaskGeneration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PromptExecutionStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectEventType {
    StatusChange,
    FocusFormCreated,
    MilestoneGenerated,
    TaskGenerated,
    TaskCompleted,
}

/// Parse error for the intake enums; the message names the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEnumValue {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for InvalidEnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is invalid: {:?}", self.field, self.value)
    }
}

impl std::error::Error for InvalidEnumValue {}

impl FromStr for ProjectCommitment {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "heavy" => Ok(Self::Heavy),
            "dedicated" => Ok(Self::Dedicated),
            other => Err(InvalidEnumValue {
                field: "commitment",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for ProjectFamiliarity {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completely_new" => Ok(Self::CompletelyNew),
            "some_experience" => Ok(Self::SomeExperience),
            "experienced_refining" => Ok(Self::ExperiencedRefining),
            other => Err(InvalidEnumValue {
                field: "familiarity",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for ProjectWorkStyle {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short_daily_sessions" => Ok(Self::ShortDailySessions),
            "focused_sessions_per_week" => Ok(Self::FocusedSessionsPerWeek),
            "flexible_or_varies" => Ok(Self::FlexibleOrVaries),
            other => Err(InvalidEnumValue {
                field: "workStyle",
                value: other.to_string(),
            }),
        }
    }
}

impl ProjectCommitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Heavy => "heavy",
            Self::Dedicated => "dedicated",
        }
    }
}

impl ProjectFamiliarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompletelyNew => "completely_new",
            Self::SomeExperience => "some_experience",
            Self::ExperiencedRefining => "experienced_refining",
        }
    }
}

impl ProjectWorkStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShortDailySessions => "short_daily_sessions",
            Self::FocusedSessionsPerWeek => "focused_sessions_per_week",
            Self::FlexibleOrVaries => "flexible_or_varies",
        }
    }
}

// ==================== Form definitions ====================

/// One selectable option on a fixed form question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOption {
    pub value: String,
    pub label: String,
}

/// A question on the fixed intake form (not database backed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormQuestion {
    pub id: String,
    pub prompt: String,
    pub question_type: QuestionType,
    pub options: Vec<FormOption>,
    pub position: i64,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormDefinition {
    pub questions: Vec<FormQuestion>,
}

// ==================== Persisted entities ====================

/// A stored form row without its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRecord {
    pub id: String,
    pub name: String,
    pub project_id: Option<String>,
    pub kind: FormKind,
}

/// An item on a stored form; `answer`/`answered_at` are used by focus items.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusItem {
    pub id: String,
    pub question: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub position: i64,
    pub answer: Option<String>,
    pub answered_at: Option<DateTime<Utc>>,
}

/// A stored form with its items, ordered by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusForm {
    pub id: String,
    pub name: String,
    pub project_id: Option<String>,
    pub kind: FormKind,
    pub items: Vec<FocusItem>,
}

/// An intake question as attached to a project response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuestion {
    pub id: String,
    pub prompt: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswer {
    pub question_id: String,
    pub values: Vec<String>,
    pub answered_at: DateTime<Utc>,
}

/// One answered intake question on a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: ProjectQuestion,
    pub answer: QuestionAnswer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub commitment: ProjectCommitment,
    pub familiarity: ProjectFamiliarity,
    pub work_style: ProjectWorkStyle,
    pub status: ProjectStatus,
    pub generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responses: Vec<QuestionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub summary: String,
    pub position: i64,
    pub status: MilestoneStatus,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub milestone_id: String,
    pub title: String,
    pub description: String,
    pub position: i64,
    pub status: TaskStatus,
    pub generated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptExecution {
    pub id: String,
    pub project_id: String,
    pub milestone_id: Option<String>,
    pub task_id: Option<String>,
    pub stage: PromptExecutionStage,
    pub status: PromptExecutionStatus,
    pub input: serde_json::Value,
    pub output: Option<serde_json::Value>,
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEvent {
    pub id: String,
    pub project_id: String,
    pub event_type: ProjectEventType,
    pub payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneWithTasks {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub tasks: Vec<Task>,
}

/// The full project view: entity, intake responses, focus form, roadmap, and
/// audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    pub project: Project,
    pub milestones: Vec<MilestoneWithTasks>,
    pub focus_form: Option<FocusForm>,
    pub prompt_executions: Vec<PromptExecution>,
    pub events: Vec<ProjectEvent>,
}

/// The four answers collected by the fixed intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeAnswers {
    pub goal: String,
    pub commitment: ProjectCommitment,
    pub familiarity: ProjectFamiliarity,
    pub work_style: ProjectWorkStyle,
}
