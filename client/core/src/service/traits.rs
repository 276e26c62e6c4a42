//! Chat Service Trait
//!
//! Trait definition for the remote chat service. This abstraction keeps the
//! session logic independent of the transport, and lets tests substitute a
//! scripted service.
//!
//! Each operation is a single request/response exchange with no retry; the
//! session decides what a failure means for the user.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::messages::{Conversation, ConversationSummary, SessionId};

/// What the service answers to a sent message.
#[derive(Clone, Debug, Deserialize)]
pub struct SendReply {
    /// The conversation this exchange was stored under. For a message sent
    /// without an identifier this is the newly assigned one.
    pub session_id: SessionId,
    /// The assistant's answer (markdown with citation markers)
    pub response: String,
}

/// Failures at the service boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested conversation no longer exists
    #[error("conversation {0} not found")]
    NotFound(SessionId),

    /// The service answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for the log
        body: String,
    },

    /// The request never completed (connect, timeout, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a body the client cannot understand
    #[error("unexpected payload from server: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ServiceError {
    /// Whether this failure means "the conversation is gone" rather than
    /// "the service is unwell".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The remote chat service.
///
/// Implement this trait to point the session at a different transport
/// (or at a scripted double in tests).
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send a user message, continuing the identified conversation or
    /// opening a new one when `session_id` is `None`.
    async fn send_message(
        &self,
        message: &str,
        session_id: Option<&SessionId>,
    ) -> Result<SendReply, ServiceError>;

    /// List stored conversations, in the service's order.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ServiceError>;

    /// Fetch one stored conversation's full transcript.
    ///
    /// Fails with [`ServiceError::NotFound`] when the identifier is unknown.
    async fn fetch_conversation(&self, id: &SessionId) -> Result<Conversation, ServiceError>;
}
