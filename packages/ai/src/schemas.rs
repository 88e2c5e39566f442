// ABOUTME: Output payload types for each generation stage and their JSON schemas
// ABOUTME: validate() enforces the invariants strict decoding cannot express

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use formiq_core::QuestionType;

/// Output invariants checked after decoding; the message feeds the repair
/// prompt verbatim.
pub trait ValidatedOutput: for<'de> Deserialize<'de> {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusQuestionOutput {
    pub id: String,
    pub prompt: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub position: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusQuestionsOutput {
    pub questions: Vec<FocusQuestionOutput>,
}

impl ValidatedOutput for FocusQuestionsOutput {
    fn validate(&self) -> Result<(), String> {
        if self.questions.is_empty() {
            return Err("questions must not be empty".to_string());
        }
        for (index, question) in self.questions.iter().enumerate() {
            if question.id.trim().is_empty() || question.prompt.trim().is_empty() {
                return Err(format!("questions[{index}]: id and prompt must be non-empty"));
            }
            if question.position != index as i64 {
                return Err(format!(
                    "questions[{index}].position: expected {index}, got {}",
                    question.position
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneOutline {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOutlineOutput {
    pub milestones: Vec<MilestoneOutline>,
}

impl ValidatedOutput for ProjectOutlineOutput {
    fn validate(&self) -> Result<(), String> {
        if self.milestones.is_empty() {
            return Err("milestones must not be empty".to_string());
        }
        for (index, milestone) in self.milestones.iter().enumerate() {
            if milestone.title.trim().is_empty() || milestone.description.trim().is_empty() {
                return Err(format!(
                    "milestones[{index}]: title and description must be non-empty"
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutline {
    pub day: i64,
    pub title: String,
    pub objective: String,
    pub body: String,
    pub estimated_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MilestoneTasksOutput {
    pub tasks: Vec<TaskOutline>,
}

impl ValidatedOutput for MilestoneTasksOutput {
    fn validate(&self) -> Result<(), String> {
        if self.tasks.is_empty() {
            return Err("tasks must not be empty".to_string());
        }
        for (index, task) in self.tasks.iter().enumerate() {
            if task.day < 1 {
                return Err(format!("tasks[{index}].day: must be >= 1, got {}", task.day));
            }
            if task.estimated_minutes < 1 {
                return Err(format!(
                    "tasks[{index}].estimatedMinutes: must be >= 1, got {}",
                    task.estimated_minutes
                ));
            }
            if task.title.trim().is_empty()
                || task.objective.trim().is_empty()
                || task.body.trim().is_empty()
            {
                return Err(format!(
                    "tasks[{index}]: title, objective, and body must be non-empty"
                ));
            }
        }
        Ok(())
    }
}

pub fn focus_questions_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["questions"],
        "properties": {
            "questions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["id", "prompt", "questionType", "options", "position"],
                    "properties": {
                        "id": { "type": "string", "minLength": 1 },
                        "prompt": { "type": "string", "minLength": 1 },
                        "questionType": {
                            "type": "string",
                            "enum": ["free_text", "single_select", "multi_select"]
                        },
                        "options": { "type": "array", "items": { "type": "string" } },
                        "position": { "type": "integer", "minimum": 0 }
                    }
                }
            }
        }
    })
}

pub fn project_outline_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["milestones"],
        "properties": {
            "milestones": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["title", "description"],
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "description": { "type": "string", "minLength": 1 }
                    }
                }
            }
        }
    })
}

pub fn milestone_tasks_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["tasks"],
        "properties": {
            "tasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["day", "title", "objective", "body", "estimatedMinutes"],
                    "properties": {
                        "day": { "type": "integer", "minimum": 1 },
                        "title": { "type": "string", "minLength": 1 },
                        "objective": { "type": "string", "minLength": 1 },
                        "body": { "type": "string", "minLength": 1 },
                        "estimatedMinutes": { "type": "number", "minimum": 1 }
                    }
                }
            }
        }
    })
}

pub fn project_context_schema() -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["project"],
        "properties": {
            "project": {
                "type": "object",
                "additionalProperties": false,
                "required": ["title", "commitment", "familiarity", "workStyle", "focusItems"],
                "properties": {
                    "title": { "type": "string", "minLength": 1 },
                    "commitment": { "type": "string" },
                    "familiarity": { "type": "string" },
                    "workStyle": { "type": "string" },
                    "focusItems": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "additionalProperties": false,
                            "required": ["question", "answers"],
                            "properties": {
                                "question": { "type": "string", "minLength": 1 },
                                "answers": { "type": "array", "items": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        }
    })
}
