// ABOUTME: Development seed data: the test user and the named intake form
// ABOUTME: Safe to run repeatedly; intake questions are replaced on re-seed

use sqlx::SqlitePool;
use tracing::info;

use formiq_core::{QuestionType, TEST_USER_ID};

use crate::error::StorageError;

pub const INTAKE_FORM_NAME: &str = "goal_intake_v1";

struct IntakeQuestionSeed {
    id: &'static str,
    prompt: &'static str,
    options: &'static [&'static str],
    question_type: QuestionType,
    position: i64,
}

const INTAKE_QUESTIONS: &[IntakeQuestionSeed] = &[
    IntakeQuestionSeed {
        id: "goal_statement",
        prompt: "What is the primary goal you want to achieve in the next 4-6 weeks?",
        options: &[],
        question_type: QuestionType::FreeText,
        position: 0,
    },
    IntakeQuestionSeed {
        id: "success_criteria",
        prompt: "What outcomes or milestones would make you consider this a success?",
        options: &[],
        question_type: QuestionType::FreeText,
        position: 1,
    },
    IntakeQuestionSeed {
        id: "timeline",
        prompt: "When do you need an initial roadmap or deliverables?",
        options: &["This week", "Within 2 weeks", "Within a month", "Flexible"],
        question_type: QuestionType::SingleSelect,
        position: 2,
    },
    IntakeQuestionSeed {
        id: "goal_domain",
        prompt: "Which area best describes your goal?",
        options: &[
            "Product/Startup",
            "Engineering",
            "Design/UX",
            "Marketing/Growth",
            "Operations",
        ],
        question_type: QuestionType::SingleSelect,
        position: 3,
    },
    IntakeQuestionSeed {
        id: "available_resources",
        prompt: "Which resources can you leverage?",
        options: &[
            "Dedicated time",
            "Budget",
            "Team members",
            "Tools/Software",
            "Subject matter expert",
        ],
        question_type: QuestionType::MultiSelect,
        position: 4,
    },
    IntakeQuestionSeed {
        id: "risks_and_blockers",
        prompt: "What risks or blockers do you anticipate?",
        options: &[
            "Unclear requirements",
            "Stakeholder alignment",
            "Technical debt",
            "Data/Access gaps",
            "Tight timeline",
        ],
        question_type: QuestionType::MultiSelect,
        position: 5,
    },
    IntakeQuestionSeed {
        id: "update_preference",
        prompt: "How frequently do you want progress updates?",
        options: &[
            "Daily summary",
            "Twice weekly",
            "Weekly",
            "Milestone-based",
        ],
        question_type: QuestionType::SingleSelect,
        position: 6,
    },
];

/// Seed the test user and the `goal_intake_v1` intake form.
pub async fn seed(pool: &SqlitePool) -> Result<(), StorageError> {
    info!("Seeding test user: {}", TEST_USER_ID);

    sqlx::query(
        "INSERT INTO users (id, email, password) VALUES (?, ?, ?)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(TEST_USER_ID)
    .bind("test-user@example.com")
    .bind("password")
    .execute(pool)
    .await
    .map_err(StorageError::Sqlx)?;

    info!("Seeding intake form: {}", INTAKE_FORM_NAME);

    let mut tx = pool.begin().await.map_err(StorageError::Sqlx)?;

    let form_id = format!("form-{}", nanoid::nanoid!());
    sqlx::query(
        "INSERT INTO forms (id, name, project_id, kind)
         VALUES (?, ?, NULL, 'project_intake')
         ON CONFLICT (name) DO NOTHING",
    )
    .bind(&form_id)
    .bind(INTAKE_FORM_NAME)
    .execute(&mut *tx)
    .await
    .map_err(StorageError::Sqlx)?;

    let form_id: String = sqlx::query_scalar("SELECT id FROM forms WHERE name = ?")
        .bind(INTAKE_FORM_NAME)
        .fetch_one(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

    // Replace the question set on every run so prompt edits take effect.
    sqlx::query("DELETE FROM form_items WHERE form_id = ?")
        .bind(&form_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

    for question in INTAKE_QUESTIONS {
        let options = serde_json::to_string(question.options)?;
        sqlx::query(
            "INSERT INTO form_items (id, form_id, question, question_type, options, position)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(question.id)
        .bind(&form_id)
        .bind(question.prompt)
        .bind(question.question_type)
        .bind(options)
        .bind(question.position)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;
    }

    tx.commit().await.map_err(StorageError::Sqlx)?;

    Ok(())
}
