// ABOUTME: Pure prompt-context builders: project, milestone, and task contexts
// ABOUTME: No I/O; given the same inputs the serialized payload is identical

use serde::Serialize;

use formiq_core::{FocusItem, Milestone, Project, QuestionType};

/// One question/answer pair as the planner sees it. Option lists are folded
/// into the question text.
#[derive(Debug, Clone, Serialize)]
pub struct FocusItemContext {
    pub question: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContextBody {
    pub title: String,
    pub commitment: String,
    pub familiarity: String,
    pub work_style: String,
    pub focus_items: Vec<FocusItemContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub project: ProjectContextBody,
}

fn question_with_options(prompt: &str, question_type: QuestionType, options: &[String]) -> String {
    if question_type != QuestionType::FreeText && !options.is_empty() {
        format!("{} Options: {}", prompt, options.join(", "))
    } else {
        prompt.to_string()
    }
}

impl ProjectContext {
    /// Intake responses come first, then answered focus items. Unanswered
    /// focus items are omitted entirely.
    pub fn from_project(project: &Project, focus_items: &[FocusItem]) -> Self {
        let mut items: Vec<FocusItemContext> = project
            .responses
            .iter()
            .map(|entry| FocusItemContext {
                question: question_with_options(
                    &entry.question.prompt,
                    entry.question.question_type,
                    &entry.question.options,
                ),
                answers: entry.answer.values.clone(),
            })
            .collect();

        items.extend(focus_items.iter().filter_map(|item| {
            item.answer.as_ref().map(|answer| FocusItemContext {
                question: question_with_options(&item.question, item.question_type, &item.options),
                answers: vec![answer.clone()],
            })
        }));

        Self {
            project: ProjectContextBody {
                title: project.title.clone(),
                commitment: project.commitment.as_str().to_string(),
                familiarity: project.familiarity.as_str().to_string(),
                work_style: project.work_style.as_str().to_string(),
                focus_items: items,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MilestoneContext {
    pub title: String,
    pub summary: String,
}

impl From<&Milestone> for MilestoneContext {
    fn from(milestone: &Milestone) -> Self {
        Self {
            title: milestone.title.clone(),
            summary: milestone.summary.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneTaskContext {
    pub project_context: ProjectContext,
    pub milestone: MilestoneContext,
}

impl MilestoneTaskContext {
    pub fn new(project_context: ProjectContext, milestone: MilestoneContext) -> Self {
        Self {
            project_context,
            milestone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use formiq_core::{
        ProjectCommitment, ProjectFamiliarity, ProjectQuestion, ProjectStatus, ProjectWorkStyle,
        QuestionAnswer, QuestionResponse,
    };

    fn sample_project() -> Project {
        Project {
            id: "proj-1".to_string(),
            user_id: "test-user-id".to_string(),
            title: "EP launch".to_string(),
            commitment: ProjectCommitment::Moderate,
            familiarity: ProjectFamiliarity::SomeExperience,
            work_style: ProjectWorkStyle::FlexibleOrVaries,
            status: ProjectStatus::Draft,
            generated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            responses: vec![QuestionResponse {
                question: ProjectQuestion {
                    id: "timeline".to_string(),
                    prompt: "When do you need it?".to_string(),
                    question_type: QuestionType::SingleSelect,
                    options: vec!["This week".to_string(), "Flexible".to_string()],
                },
                answer: QuestionAnswer {
                    question_id: "timeline".to_string(),
                    values: vec!["Flexible".to_string()],
                    answered_at: Utc::now(),
                },
            }],
        }
    }

    fn focus_item(answer: Option<&str>) -> FocusItem {
        FocusItem {
            id: "item-1".to_string(),
            question: "What genre?".to_string(),
            question_type: QuestionType::FreeText,
            options: vec![],
            position: 0,
            answer: answer.map(str::to_string),
            answered_at: answer.map(|_| Utc::now()),
        }
    }

    #[test]
    fn options_are_folded_into_the_question_text() {
        let ctx = ProjectContext::from_project(&sample_project(), &[]);
        assert_eq!(
            ctx.project.focus_items[0].question,
            "When do you need it? Options: This week, Flexible"
        );
    }

    #[test]
    fn unanswered_focus_items_are_omitted() {
        let ctx = ProjectContext::from_project(
            &sample_project(),
            &[focus_item(None), focus_item(Some("Indie folk"))],
        );
        assert_eq!(ctx.project.focus_items.len(), 2);
        assert_eq!(ctx.project.focus_items[1].answers, vec!["Indie folk"]);
    }

    #[test]
    fn serializes_camel_case() {
        let ctx = ProjectContext::from_project(&sample_project(), &[]);
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["project"]["workStyle"], "flexible_or_varies");
        assert!(json["project"]["focusItems"].is_array());
    }
}
