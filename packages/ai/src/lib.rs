// ABOUTME: OpenAI-backed generation for FormIQ roadmaps
// ABOUTME: Prompts, schema-constrained decoding, validation, one repair retry

pub mod contexts;
pub mod prompts;
pub mod schemas;
pub mod service;

pub use contexts::{
    FocusItemContext, MilestoneContext, MilestoneTaskContext, ProjectContext, ProjectContextBody,
};
pub use schemas::{
    FocusQuestionOutput, FocusQuestionsOutput, MilestoneOutline, MilestoneTasksOutput,
    ProjectOutlineOutput, TaskOutline, ValidatedOutput,
};
pub use service::{AiService, AiServiceError, AiServiceResult};
