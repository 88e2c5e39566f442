// ABOUTME: Shared domain types for FormIQ projects, forms, milestones, and tasks
// ABOUTME: Foundation package with no I/O, depended on by every other package

pub mod intake;
pub mod types;

pub use intake::{
    project_intake_form, INTAKE_QUESTION_ID_COMMITMENT, INTAKE_QUESTION_ID_FAMILIARITY,
    INTAKE_QUESTION_ID_GOAL, INTAKE_QUESTION_ID_WORK_STYLE, TEST_USER_ID,
};
pub use types::*;
