// anthropic integration - relays assembled conversations to the messages api

use crate::Error;
use crate::core::prompts::Profile;
use serde::{Deserialize, Serialize};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

pub struct Claude {
    client: reqwest::Client,
    api_key: String,
}

// one entry in the conversation; history from clients deserializes
// into this with a "user" role and empty content as fallbacks
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatMessage {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// what we send to anthropic
#[derive(Serialize)]
struct Request<'a> {
    model: &'static str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'static str>,
    messages: &'a [ChatMessage],
}

// what comes back
#[derive(Deserialize)]
struct Response {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    text: String,
}

impl Claude {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub async fn complete(
        &self,
        profile: &Profile,
        messages: &[ChatMessage],
    ) -> Result<String, Error> {
        let request = Request {
            model: profile.model,
            max_tokens: profile.max_tokens,
            system: profile.system,
            messages,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .timeout(profile.timeout)
            .json(&request)
            .send()
            .await
            .map_err(timeout_or_http)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::error!("anthropic api authentication failed");
            return Err(Error::UpstreamAuth);
        }

        if !status.is_success() {
            // detail stays in the logs, callers only see a generic error
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("anthropic api error: {status} - {detail}");
            return Err(Error::Upstream(status.as_u16()));
        }

        let response: Response = response.json().await.map_err(timeout_or_http)?;
        Ok(response
            .content
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default())
    }
}

fn timeout_or_http(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::UpstreamTimeout
    } else {
        Error::Http(e)
    }
}
