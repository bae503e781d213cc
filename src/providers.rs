use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Local, NaiveDate};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::{
    ai_structs::{suggested_file_name_schema, SuggestedFileName},
    config::{Config, NameStyle},
    mime_gate::{base_mime_type, is_textual},
    models::{RenameProposal, RenameRequest},
};


#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("failed to parse AI response: {source} (response: {response})")]
    Parse {
        #[source]
        source: serde_json::Error,
        response: String,
    },
    #[error("AI response contained empty filename")]
    EmptyFilename,
}

/// Anything that can turn file content into a proposed name.
#[allow(async_fn_in_trait)]
pub trait NameGenerator {
    async fn generate(&self, request: &RenameRequest) -> Result<RenameProposal, GenerationError>;
}

/// Talks to the Gemini `generateContent` REST endpoint.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    style: NameStyle,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        style: NameStyle,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            style,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
            config.style,
        )
    }

    pub fn get_model_name(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl NameGenerator for GeminiProvider {
    async fn generate(&self, request: &RenameRequest) -> Result<RenameProposal, GenerationError> {
        let prompt = build_prompt(Local::now().date_naive(), &request.extension, self.style);
        let body = GenerateContentRequest {
            system_instruction: Content::text(None, prompt),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::text("Analyze the following file content and generate a filename."),
                    content_part(request),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_json_schema: suggested_file_name_schema(),
            },
        };

        debug!(
            model = %self.model,
            mime_type = %request.mime_type,
            bytes = request.content.len(),
            inline_text = is_textual(&request.mime_type),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }

        let payload: GenerateContentResponse = response.json().await?;
        let text = payload.first_text().ok_or(GenerationError::EmptyResponse)?;
        parse_response(&text)
    }
}

/// System instruction asking for `YYYY-MM-DD_Subject-Title{ext}`.
pub fn build_prompt(today: NaiveDate, extension: &str, style: NameStyle) -> String {
    let separator = style.separator();
    let example_subject = format!("Budget{separator}Report");
    format!(
        "You are an intelligent file renaming assistant.\n\
         Context:\n\
         - Current Date: {today}\n\
         \n\
         Specific rules:\n\
         1. Analyze the attached content.\n\
         2. Summarize the content to identify its core subject and any relevant date.\n\
         3. Generate a filename adhering to the following structure: YYYY-MM-DD_Subject{separator}Title{extension}\n\
         \x20  - Always start with a date in ISO 8601 format (YYYY-MM-DD). If no specific date is found in the content, use the Current Date provided above as a fallback.\n\
         \x20  - Use underscores (_) to separate the date from the subject/title.\n\
         \x20  - Use '{separator}' to separate words within the subject/title ({style} style).\n\
         \x20  - Ensure the filename ends with the extension \"{extension}\".\n\
         4. Example: 2023-12-01_{example_subject}{extension}",
        today = today.format("%Y-%m-%d"),
    )
}

/// Parses the model's text into a proposal, tolerating a surrounding code fence.
pub fn parse_response(raw: &str) -> Result<RenameProposal, GenerationError> {
    let cleaned = strip_code_fence(raw);
    let suggestion: SuggestedFileName =
        serde_json::from_str(cleaned).map_err(|source| GenerationError::Parse {
            source,
            response: raw.to_string(),
        })?;

    if suggestion.filename.is_empty() {
        return Err(GenerationError::EmptyFilename);
    }

    Ok(RenameProposal {
        filename: suggestion.filename,
        reasoning: suggestion.reasoning,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = match trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    {
        Some(rest) => rest.strip_suffix("```").unwrap_or(rest),
        None => trimmed,
    };
    inner.trim()
}

fn content_part(request: &RenameRequest) -> Part {
    if is_textual(&request.mime_type) {
        Part::text(String::from_utf8_lossy(&request.content))
    } else {
        Part {
            text: None,
            inline_data: Some(Blob {
                mime_type: base_mime_type(&request.mime_type).to_string(),
                data: STANDARD.encode(&request.content),
            }),
        }
    }
}

fn api_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    GenerationError::Api {
        status: status.as_u16(),
        message,
    }
}

// Hand-written wire types: `inlineData` parts and `responseJsonSchema` have no
// equivalent in a generic completion client, so the REST body is built directly.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_json_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<String>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
