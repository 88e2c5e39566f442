// ABOUTME: The fixed project intake form definition and its question IDs
// ABOUTME: Served verbatim by GET /project-intake/questions

use crate::types::{FormDefinition, FormOption, FormQuestion, QuestionType};

/// Placeholder identity until real auth lands; every request acts as this user.
pub const TEST_USER_ID: &str = "test-user-id";

pub const INTAKE_QUESTION_ID_GOAL: &str = "goal";
pub const INTAKE_QUESTION_ID_COMMITMENT: &str = "time_commitment";
pub const INTAKE_QUESTION_ID_FAMILIARITY: &str = "familiarity";
pub const INTAKE_QUESTION_ID_WORK_STYLE: &str = "work_style";

fn option(value: &str, label: &str) -> FormOption {
    FormOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}

/// The fixed initial question set: goal, commitment, familiarity, work style.
pub fn project_intake_form() -> FormDefinition {
    FormDefinition {
        questions: vec![
            FormQuestion {
                id: INTAKE_QUESTION_ID_GOAL.to_string(),
                prompt: "What do you want to accomplish?".to_string(),
                question_type: QuestionType::FreeText,
                options: vec![],
                position: 1,
                required: true,
            },
            FormQuestion {
                id: INTAKE_QUESTION_ID_COMMITMENT.to_string(),
                prompt: "How much time can you realistically commit per week?".to_string(),
                question_type: QuestionType::SingleSelect,
                options: vec![
                    option("light", "Light"),
                    option("moderate", "Moderate"),
                    option("heavy", "Heavy"),
                    option("dedicated", "Dedicated"),
                ],
                position: 2,
                required: true,
            },
            FormQuestion {
                id: INTAKE_QUESTION_ID_FAMILIARITY.to_string(),
                prompt: "How familiar are you with this area?".to_string(),
                question_type: QuestionType::SingleSelect,
                options: vec![
                    option("completely_new", "Completely new"),
                    option("some_experience", "Some experience"),
                    option("experienced_refining", "Experienced / refining"),
                ],
                position: 3,
                required: true,
            },
            FormQuestion {
                id: INTAKE_QUESTION_ID_WORK_STYLE.to_string(),
                prompt: "How do you prefer to work?".to_string(),
                question_type: QuestionType::SingleSelect,
                options: vec![
                    option("short_daily_sessions", "Short daily sessions"),
                    option(
                        "focused_sessions_per_week",
                        "A few focused sessions per week",
                    ),
                    option("flexible_or_varies", "Flexible / varies"),
                ],
                position: 4,
                required: true,
            },
        ],
    }
}
