//! HTTP Chat Service
//!
//! reqwest implementation of the chat service protocol.
//!
//! # Wire Protocol
//!
//! The service exposes a small JSON API:
//! - `POST /api/chat` - send a message, receive the answer and the
//!   (possibly newly assigned) conversation identifier
//! - `GET /api/history` - list stored conversations
//! - `GET /api/conversation/{id}` - fetch one conversation's transcript
//!
//! Status is checked before any body parsing; a `404` on the conversation
//! endpoint maps to [`ServiceError::NotFound`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use super::traits::{ChatService, SendReply, ServiceError};
use crate::config::ClientConfig;
use crate::messages::{Conversation, ConversationSummary, SessionId};

/// HTTP client for the chat service.
#[derive(Clone)]
pub struct HttpChatService {
    /// Service base URL (no trailing slash)
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

/// Body of a `POST /api/chat` request.
#[derive(Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
    /// `null` asks the service to open a new conversation
    session_id: Option<&'a str>,
}

impl HttpChatService {
    /// Create a client for the configured service.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base_url: config.server_url.clone(),
            http_client: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("failed to create HTTP client"),
        }
    }

    /// Create a client from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(&ClientConfig::from_env())
    }

    /// Get the chat endpoint URL.
    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// Get the history endpoint URL.
    fn history_url(&self) -> String {
        format!("{}/api/history", self.base_url)
    }

    /// Get the conversation endpoint URL for an identifier.
    fn conversation_url(&self, id: &SessionId) -> String {
        format!("{}/api/conversation/{}", self.base_url, id)
    }

    /// Turn a non-success response into a [`ServiceError::Status`].
    async fn status_error(response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ServiceError::Status { status, body }
    }

    /// Read a success body and decode it as JSON.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    async fn send_message(
        &self,
        message: &str,
        session_id: Option<&SessionId>,
    ) -> Result<SendReply, ServiceError> {
        let payload = SendMessageRequest {
            message,
            session_id: session_id.map(SessionId::as_str),
        };

        let response = self
            .http_client
            .post(self.chat_url())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Self::decode(response).await
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ServiceError> {
        let response = self.http_client.get(self.history_url()).send().await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Self::decode(response).await
    }

    async fn fetch_conversation(&self, id: &SessionId) -> Result<Conversation, ServiceError> {
        let response = self
            .http_client
            .get(self.conversation_url(id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(id.clone()));
        }
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Self::decode(response).await
    }
}
