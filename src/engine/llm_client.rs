use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

/// Hard ceiling on a single request. Exceeding it fails the generation;
/// there is no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("OPENAI_API_KEY is not set")]
    MissingCredential,

    #[error("request to text service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text service returned no completion")]
    EmptyResponse,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Send the composed prompt to the generative service and return the raw
/// assistant text. The key is read per request so that authored-only
/// navigation never needs a credential.
pub fn request_scene(prompt: &str) -> Result<String, GenerationError> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or(GenerationError::MissingCredential)?;

    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

    let req = ChatCompletionRequest {
        model: MODEL.into(),
        temperature: 0.7,
        messages: vec![ChatMessage {
            role: "user".into(),
            content: prompt.into(),
        }],
    };

    let resp = client
        .post(API_URL)
        .bearer_auth(&api_key)
        .json(&req)
        .send()?
        .error_for_status()?
        .json::<ChatCompletionResponse>()?;

    let completion = resp
        .choices
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyResponse)?;

    Ok(completion.message.content.trim().to_string())
}
