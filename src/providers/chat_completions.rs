//! OpenAI-style chat completions wire format
//!
//! Shared by OpenAI, DeepSeek and OpenAI-compatible third-party services.

use reqwest::Client as HttpClient;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::http::send_json;
use super::prompts::Prompt;
use crate::config::GenerationParams;
use crate::error::ProviderFailure;

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl<'a> ChatCompletionRequest<'a> {
    pub fn new(model: &'a str, prompt: &'a Prompt, params: GenerationParams) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        }
    }
}

impl ChatCompletionResponse {
    /// Text of the first choice.
    pub fn into_text(self) -> Result<String, ProviderFailure> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderFailure::Decode("No content in response".to_string()))
    }
}

/// POST a chat completion to `url` and return the generated text.
pub(crate) async fn complete(
    http: &HttpClient,
    url: &str,
    model: &str,
    credential: &SecretString,
    prompt: &Prompt,
    params: GenerationParams,
) -> Result<String, ProviderFailure> {
    let body = ChatCompletionRequest::new(model, prompt, params);
    let request = http
        .post(url)
        .bearer_auth(credential.expose_secret())
        .json(&body);
    let response: ChatCompletionResponse = send_json(request).await?;
    response.into_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;
    use serde_json::json;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let prompt = Prompt::new(Mode::Expand, "雨夜");
        let body = ChatCompletionRequest::new("gpt-4o-mini", &prompt, GenerationParams::default());
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], prompt.system);
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["messages"][1]["content"], prompt.user.as_str());
        assert_eq!(value["max_tokens"], 2000);
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_choice_text() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "done"}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "done");
    }

    #[test]
    fn empty_choices_are_a_decode_failure() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            response.into_text(),
            Err(ProviderFailure::Decode(_))
        ));
    }
}
