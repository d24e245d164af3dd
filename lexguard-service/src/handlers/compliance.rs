use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::extract::ValidatedJson;
use validator::Validate;

use crate::prompts::{self, PromptPair, DEFAULT_TONE};
use crate::services::ProviderError;
use crate::startup::AppState;

/// Name of the completion service as reported in upstream error details.
pub const UPSTREAM_SERVICE: &str = "OpenAI";

#[derive(Debug, Deserialize, Validate)]
pub struct GenerationRequest {
    #[validate(length(min = 1, message = "Prompt cannot be empty"))]
    pub prompt: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub generated_text: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ComplianceCheckRequest {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ComplianceCheckResponse {
    pub analysis_report: String,
}

#[tracing::instrument(skip(state, request), fields(tone_len = request.tone.len(), prompt_len = request.prompt.len()))]
pub async fn generate_content(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<GenerationRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let prompt = prompts::build_generation_prompt(&request.prompt, &request.tone);
    let generated_text = complete(&state, &prompt).await?;

    Ok(Json(GenerationResponse { generated_text }))
}

#[tracing::instrument(skip(state, request), fields(text_len = request.text.len()))]
pub async fn check_content(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ComplianceCheckRequest>,
) -> Result<Json<ComplianceCheckResponse>, AppError> {
    let prompt = prompts::build_check_prompt(&request.text);
    let analysis_report = complete(&state, &prompt).await?;

    Ok(Json(ComplianceCheckResponse { analysis_report }))
}

async fn complete(state: &AppState, prompt: &PromptPair) -> Result<String, AppError> {
    state.provider.complete(prompt).await.map_err(|e| {
        tracing::error!(model = %state.provider.model(), error = %e, "Completion request failed");
        upstream_error(e)
    })
}

fn upstream_error(err: ProviderError) -> AppError {
    AppError::upstream(UPSTREAM_SERVICE, err.to_string())
}
