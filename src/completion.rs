use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::Message;

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Message],
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to completion service failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion service returned status {0}")]
    Status(StatusCode),

    #[error("could not decode completion reply: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the completion endpoint. One POST per call, no retries.
#[derive(Clone)]
pub struct CompletionClient {
    client: Client,
    url: String,
}

impl CompletionClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let request = ChatRequest { messages };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        // Body of a failed response is never read
        if !response.status().is_success() {
            return Err(CompletionError::Status(response.status()));
        }

        let reply: ChatReply = response.json().await.map_err(CompletionError::Decode)?;
        Ok(reply.content)
    }
}
