//! Session Messages
//!
//! Messages sent from the [`ChatSession`](crate::ChatSession) to UI surfaces,
//! plus the conversation data model they carry. These represent all the ways
//! the conversation layer can drive a connected UI (TUI, web, headless test).
//!
//! # Design Philosophy
//!
//! The session is the "brain" that owns the current conversation identifier
//! and talks to the remote service. UI surfaces are pure renderers that
//! display what the session tells them to. A surface that folds this enum
//! into its display state gets the transcript, the typing indicator, and the
//! sidebar highlight right by construction.

use serde::{Deserialize, Serialize};

/// Opaque conversation identifier assigned by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Who sent a transcript message.
///
/// The wire names match the original service ("bot" for the assistant,
/// "bot-error" for client-side failure notices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    /// User input
    #[serde(rename = "user")]
    User,
    /// Assistant response (markdown with citation markers)
    #[serde(rename = "bot")]
    Assistant,
    /// Client-side failure notice
    #[serde(rename = "bot-error")]
    Error,
}

/// A message in the conversation transcript.
///
/// Messages are immutable once emitted; transcript order is append order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent this message
    pub role: ChatRole,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a failure-notice message.
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Error,
            content: content.into(),
        }
    }
}

/// A sidebar entry for a stored conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    /// Conversation identifier
    pub id: SessionId,
    /// Display title (the service derives it from the opening message)
    pub title: String,
}

/// A full stored conversation as returned by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation identifier
    pub id: SessionId,
    /// Display title; the service always sends it, the session never reads it
    #[serde(default)]
    pub title: String,
    /// Transcript in chronological order
    pub messages: Vec<ChatMessage>,
}

/// Messages from the session to a UI surface.
///
/// These tell the UI what to display. The UI should not have any
/// conversation logic - just render what it's told. Every variant that
/// changes the transcript obliges the surface to scroll to the newest entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMessage {
    /// Append one message to the transcript
    TranscriptAppend {
        /// The message to append
        message: ChatMessage,
    },

    /// Replace the entire transcript
    TranscriptReplace {
        /// The new transcript, in order
        messages: Vec<ChatMessage>,
    },

    /// A response is in flight; show the composing indicator
    TypingStarted,

    /// The in-flight response resolved; remove the composing indicator
    TypingStopped,

    /// Replace the sidebar contents (no incremental diff)
    SidebarReplace {
        /// Known conversations in service order
        conversations: Vec<ConversationSummary>,
    },

    /// Mark exactly one sidebar entry active, or clear the highlight
    SidebarActive {
        /// The active conversation, if any
        id: Option<SessionId>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&ChatRole::Assistant).unwrap(), "\"bot\"");
        assert_eq!(
            serde_json::to_string(&ChatRole::Error).unwrap(),
            "\"bot-error\""
        );
    }

    #[test]
    fn test_conversation_from_wire() {
        let conversation: Conversation = serde_json::from_str(
            r#"{
                "id": "abc",
                "title": "Kerusakan alat",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "bot", "content": "hello [1]"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(conversation.id, SessionId::from("abc"));
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[0], ChatMessage::user("hi"));
        assert_eq!(conversation.messages[1], ChatMessage::assistant("hello [1]"));
    }

    #[test]
    fn test_conversation_title_optional() {
        let conversation: Conversation =
            serde_json::from_str(r#"{"id": "abc", "messages": []}"#).unwrap();
        assert_eq!(conversation.title, "");
    }
}
