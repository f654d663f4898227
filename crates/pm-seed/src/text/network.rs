//! Network-backed text using an OpenAI-compatible chat completions API.

use std::time::Duration;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::{TemplateText, TextGenerator};
use crate::models::ProjectType;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

const COMMENT_KINDS: &[&str] = &[
    "Ask a question about the task",
    "Provide an update on progress",
    "Share a relevant link or resource",
    "Request clarification",
    "Note a blocker or issue",
];

#[derive(Debug, Error)]
pub enum TextError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Backend returned no content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Text generator backed by a remote language model.
///
/// Each call is bounded by a request timeout and retried a few times. Any
/// remaining failure is logged and answered with template text, so callers
/// always receive a string.
pub struct NetworkText {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl NetworkText {
    /// Creates a client for the given endpoint and model.
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Result<Self, TextError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn complete(
        &self,
        system: &str,
        prompt: String,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, TextError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            temperature,
            max_tokens,
        };

        let mut last_error = TextError::EmptyResponse;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.send(&request) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    debug!("Text request attempt {attempt}/{MAX_ATTEMPTS} failed: {e}");
                    last_error = e;
                    if attempt < MAX_ATTEMPTS {
                        std::thread::sleep(RETRY_BACKOFF * attempt);
                    }
                }
            }
        }

        Err(last_error)
    }

    fn send(&self, request: &ChatRequest<'_>) -> Result<String, TextError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()?;

        if !response.status().is_success() {
            return Err(TextError::Status(response.status()));
        }

        let body: ChatResponse = response.json()?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(TextError::EmptyResponse)
    }
}

fn task_name_prompt(project_type: ProjectType) -> &'static str {
    match project_type {
        ProjectType::Engineering => {
            "Generate a realistic engineering task name following the pattern \
             '[Component] - [Action] - [Detail]'. Examples: 'API Gateway - Implement rate \
             limiting - Add Redis caching', 'Frontend - Refactor authentication flow - Update \
             token handling'"
        }
        ProjectType::Marketing => {
            "Generate a realistic marketing task name following the pattern \
             '[Campaign/Initiative] - [Deliverable]'. Examples: 'Q2 Product Launch - Create \
             landing page', 'Social Media Campaign - Design Instagram posts'"
        }
        ProjectType::Operations => {
            "Generate a realistic operations task name. Examples: 'Update vendor contract for \
             AWS', 'Audit security compliance procedures', 'Onboard new team member'"
        }
    }
}

impl TextGenerator for NetworkText {
    fn task_name(&self, project_type: ProjectType, rng: &mut dyn RngCore) -> String {
        // Success and fallback must consume the same draws.
        let index = TemplateText::draw_task_name_index(project_type, rng);
        let result = self.complete(
            "You are a helpful assistant that generates realistic task names for project \
             management software.",
            task_name_prompt(project_type).to_string(),
            0.8,
            50,
        );

        match result {
            Ok(name) => name,
            Err(e) => {
                warn!("Task name generation failed, using template: {e}");
                TemplateText::task_name_for_index(project_type, index)
            }
        }
    }

    fn task_description(
        &self,
        task_name: &str,
        project_type: ProjectType,
        rng: &mut dyn RngCore,
    ) -> String {
        let roll: f64 = rng.r#gen();
        if roll < 0.20 {
            return String::new();
        }

        let brief = roll < 0.70;
        let detail = if brief { "brief" } else { "detailed" };
        let shape = if brief {
            "Provide 1-3 sentences."
        } else {
            "Provide a detailed description with 3-5 bullet points."
        };
        let prompt = format!(
            "Generate a {detail} task description for a {} project task: '{task_name}'. {shape}",
            project_type.as_str()
        );

        match self.complete(
            "You are a helpful assistant that generates realistic task descriptions for \
             project management.",
            prompt,
            0.7,
            if brief { 200 } else { 300 },
        ) {
            Ok(description) => description,
            Err(e) => {
                warn!("Description generation failed, using template: {e}");
                TemplateText::description_for_roll(task_name, roll)
            }
        }
    }

    fn comment(&self, task_name: &str, project_type: ProjectType, rng: &mut dyn RngCore) -> String {
        // One draw picks both the prompt kind and the fallback comment.
        let index = TemplateText::draw_comment_index(rng);
        let kind = COMMENT_KINDS[index % COMMENT_KINDS.len()];
        let prompt = format!(
            "Generate a realistic comment for a task '{task_name}' in a {} project. Comment \
             type: {kind}. Keep it concise (1-2 sentences).",
            project_type.as_str()
        );

        match self.complete(
            "You are a helpful assistant that generates realistic work comments.",
            prompt,
            0.8,
            100,
        ) {
            Ok(comment) => comment,
            Err(e) => {
                warn!("Comment generation failed, using template: {e}");
                TemplateText::comment_for_index(index)
            }
        }
    }
}
