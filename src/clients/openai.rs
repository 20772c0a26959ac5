use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::chat::ChatMessage;

// Upstream error bodies are relayed to the caller, but never more than this.
const MAX_ERROR_DETAIL_CHARS: usize = 3000;

pub struct OpenAiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a [ChatMessage],
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesPayload {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::External(e.to_string()))?;
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    /// Forwards the composed conversation and returns the reply text, or
    /// `None` when the upstream payload carries no usable text.
    pub async fn respond(&self, input: &[ChatMessage]) -> Result<Option<String>> {
        tracing::debug!(model = %self.model, input_len = input.len(), "forwarding chat upstream");

        let request = ResponsesRequest {
            model: &self.model,
            input,
        };
        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::External(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "completion API returned an error");
            return Err(AppError::Upstream {
                status: status.to_string(),
                detail: truncate_detail(&detail),
            });
        }

        let payload: ResponsesPayload = response
            .json()
            .await
            .map_err(|e| AppError::External(e.to_string()))?;
        Ok(reply_text(&payload))
    }
}

// Empty strings count as "no text": the caller substitutes its fallback.
fn reply_text(payload: &ResponsesPayload) -> Option<String> {
    let from_output = payload.output_text.as_deref().filter(|s| !s.is_empty());
    let from_choices = payload
        .choices
        .first()
        .and_then(|c| c.message.as_ref())
        .and_then(|m| m.content.as_deref())
        .filter(|s| !s.is_empty());
    from_output.or(from_choices).map(str::to_string)
}

fn truncate_detail(body: &str) -> String {
    body.chars().take(MAX_ERROR_DETAIL_CHARS).collect()
}
