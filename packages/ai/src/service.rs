// ABOUTME: AI service for schema-constrained generation calls to OpenAI
// ABOUTME: Invalid output earns exactly one repair call, then the error surfaces

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use formiq_core::IntakeAnswers;

use crate::contexts::{MilestoneTaskContext, ProjectContext};
use crate::prompts::{
    DEFAULT_MODEL, FOCUS_QUESTIONS_PROMPT, PROJECT_OUTLINE_PROMPT, TASK_GENERATION_PROMPT,
};
use crate::schemas::{
    focus_questions_schema, milestone_tasks_schema, project_context_schema,
    project_outline_schema, FocusQuestionsOutput, MilestoneTasksOutput, ProjectOutlineOutput,
    ValidatedOutput,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com";

// One repair call per generation, never more. The repair prompt carries the
// validation error; a second failure is terminal.
const MAX_REPAIR_ATTEMPTS: u32 = 1;

#[derive(Debug, Error)]
pub enum AiServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("API returned an empty response body")]
    EmptyResponse,

    #[error("Structured output invalid after retry: {0}")]
    InvalidOutput(String),
}

pub type AiServiceResult<T> = Result<T, AiServiceError>;

#[derive(Debug, Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OutputFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    name: &'a str,
    description: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Serialize)]
struct TextConfig<'a> {
    format: OutputFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: Vec<InputMessage<'a>>,
    store: bool,
    text: TextConfig<'a>,
}

#[derive(Debug, serde::Deserialize)]
struct ResponsesResponse {
    output: Vec<OutputItem>,
}

#[derive(Debug, serde::Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, serde::Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

/// Generation parameters for one stage.
struct GenerationSpec<'a> {
    schema_name: &'a str,
    description: &'a str,
    system_prompt: &'a str,
    user_prompt: String,
    schema: Value,
}

pub struct AiService {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl AiService {
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default()
    }

    pub fn new(api_key: String, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model != DEFAULT_MODEL {
            info!("Using custom OpenAI model: {}", model);
        }

        Self {
            client: Self::create_client(),
            base_url: OPENAI_BASE_URL.to_string(),
            api_key,
            model,
        }
    }

    /// Point the service at a different endpoint. Used by tests and local
    /// proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Follow-up questions tailored to the intake answers.
    pub async fn generate_focus_questions(
        &self,
        answers: &IntakeAnswers,
    ) -> AiServiceResult<FocusQuestionsOutput> {
        let schema = focus_questions_schema();
        let user_prompt = [
            format!("FOCUS_QUESTIONS_JSON_SCHEMA: {}", pretty(&schema)),
            "INTAKE_ANSWERS_JSON:".to_string(),
            pretty(&serde_json::to_value(answers).unwrap_or(Value::Null)),
        ]
        .join("\n");

        self.request_structured(GenerationSpec {
            schema_name: "focus_questions",
            description: "FormIQ focus question payload",
            system_prompt: FOCUS_QUESTIONS_PROMPT,
            user_prompt,
            schema,
        })
        .await
    }

    /// The milestone outline for a project.
    pub async fn generate_project_outline(
        &self,
        context: &ProjectContext,
    ) -> AiServiceResult<ProjectOutlineOutput> {
        let schema = project_outline_schema();
        let user_prompt = [
            format!(
                "PROJECT_CONTEXT_JSON_SCHEMA: {}",
                pretty(&project_context_schema())
            ),
            format!("PROJECT_OUTLINE_JSON_SCHEMA: {}", pretty(&schema)),
            "PROJECT_CONTEXT_JSON:".to_string(),
            pretty(&serde_json::to_value(context).unwrap_or(Value::Null)),
        ]
        .join("\n");

        self.request_structured(GenerationSpec {
            schema_name: "project_outline",
            description: "FormIQ project outline payload",
            system_prompt: PROJECT_OUTLINE_PROMPT,
            user_prompt,
            schema,
        })
        .await
    }

    /// The daily task schedule for one milestone.
    pub async fn generate_tasks_for_milestone(
        &self,
        context: &MilestoneTaskContext,
    ) -> AiServiceResult<MilestoneTasksOutput> {
        let schema = milestone_tasks_schema();
        let user_prompt = [
            format!(
                "PROJECT_CONTEXT_JSON_SCHEMA: {}",
                pretty(&project_context_schema())
            ),
            format!("MILESTONE_TASKS_JSON_SCHEMA: {}", pretty(&schema)),
            "MILESTONE_TASK_CONTEXT_JSON:".to_string(),
            pretty(&serde_json::to_value(context).unwrap_or(Value::Null)),
        ]
        .join("\n");

        self.request_structured(GenerationSpec {
            schema_name: "milestone_tasks",
            description: "FormIQ milestone task schedule payload",
            system_prompt: TASK_GENERATION_PROMPT,
            user_prompt,
            schema,
        })
        .await
    }

    async fn request_structured<T: ValidatedOutput>(
        &self,
        spec: GenerationSpec<'_>,
    ) -> AiServiceResult<T> {
        let raw = self.call_api(&spec, &spec.user_prompt).await?;

        let mut last_error = match parse_output::<T>(&raw) {
            Ok(value) => return Ok(value),
            Err(message) => message,
        };

        for _ in 0..MAX_REPAIR_ATTEMPTS {
            warn!(
                "{} output failed validation, issuing repair call: {}",
                spec.schema_name, last_error
            );

            let repair_prompt = format!(
                "{}\n\nThe last response failed schema validation: {}.\nReturn only JSON that matches the {} schema.",
                spec.user_prompt, last_error, spec.schema_name
            );

            let raw = self.call_api(&spec, &repair_prompt).await?;
            match parse_output::<T>(&raw) {
                Ok(value) => return Ok(value),
                Err(message) => last_error = message,
            }
        }

        error!(
            "{} output still invalid after repair: {}",
            spec.schema_name, last_error
        );
        Err(AiServiceError::InvalidOutput(last_error))
    }

    async fn call_api(&self, spec: &GenerationSpec<'_>, prompt: &str) -> AiServiceResult<String> {
        let request = ResponsesRequest {
            model: &self.model,
            instructions: spec.system_prompt,
            input: vec![InputMessage {
                role: "user",
                content: prompt,
            }],
            store: false,
            text: TextConfig {
                format: OutputFormat {
                    format_type: "json_schema",
                    name: spec.schema_name,
                    description: spec.description,
                    schema: &spec.schema,
                    strict: true,
                },
            },
        };

        info!(
            "Requesting {} generation: model={}",
            spec.schema_name, self.model
        );

        let response = self
            .client
            .post(format!("{}/v1/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("OpenAI request timed out");
                    AiServiceError::ApiError("Request timed out".to_string())
                } else if e.is_connect() {
                    error!("Failed to connect to OpenAI: {}", e);
                    AiServiceError::ApiError(format!("Connection failed: {e}"))
                } else {
                    AiServiceError::RequestFailed(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(AiServiceError::ApiError(format!(
                "API returned {status}: {error_text}"
            )));
        }

        let body: ResponsesResponse = response
            .json()
            .await
            .map_err(|e| AiServiceError::ApiError(format!("Malformed response body: {e}")))?;

        extract_output_text(&body).ok_or(AiServiceError::EmptyResponse)
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn extract_output_text(body: &ResponsesResponse) -> Option<String> {
    body.output
        .iter()
        .filter(|item| item.item_type == "message")
        .flat_map(|item| item.content.iter())
        .find(|content| content.content_type == "output_text" && !content.text.trim().is_empty())
        .map(|content| content.text.trim().to_string())
}

fn parse_output<T: ValidatedOutput>(raw: &str) -> Result<T, String> {
    let value: T = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    value.validate()?;
    Ok(value)
}
