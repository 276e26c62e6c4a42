//! Display State
//!
//! State the TUI renders, folded from `SessionMessage`s.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the session tells it
//! to. Display state is the bridge between session messages and rendering.
//! Nothing in here decides conversation semantics; it only accumulates what
//! arrived and animates the composing indicator.

use std::time::Duration;

use tanya_core::{ChatMessage, ChatRole, ConversationSummary, SessionId, SessionMessage};

/// Transcript prefix for a message role.
#[must_use]
pub fn role_prefix(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "Anda: ",
        ChatRole::Assistant | ChatRole::Error => "Tanya: ",
    }
}

/// Everything the TUI draws, as last told by the session.
pub struct DisplayState {
    /// Transcript messages, in order
    pub messages: Vec<ChatMessage>,
    /// Whether a response is in flight (composing indicator visible)
    pub typing: bool,
    /// Sidebar entries, in service order
    pub conversations: Vec<ConversationSummary>,
    /// Highlighted sidebar entry, if any
    pub active: Option<SessionId>,
    /// Time accumulator for the composing animation
    typing_elapsed: Duration,
}

impl DisplayState {
    /// Create an empty display state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            typing: false,
            conversations: Vec::new(),
            active: None,
            typing_elapsed: Duration::ZERO,
        }
    }

    /// Fold one session message into the display state.
    ///
    /// Returns `true` when the transcript (or the composing indicator at its
    /// end) changed, which obliges the caller to scroll to the newest entry.
    pub fn apply_message(&mut self, msg: SessionMessage) -> bool {
        match msg {
            SessionMessage::TranscriptAppend { message } => {
                self.messages.push(message);
                true
            }
            SessionMessage::TranscriptReplace { messages } => {
                self.messages = messages;
                true
            }
            SessionMessage::TypingStarted => {
                self.typing = true;
                self.typing_elapsed = Duration::ZERO;
                true
            }
            SessionMessage::TypingStopped => {
                self.typing = false;
                false
            }
            SessionMessage::SidebarReplace { conversations } => {
                self.conversations = conversations;
                false
            }
            SessionMessage::SidebarActive { id } => {
                self.active = id;
                false
            }
        }
    }

    /// Advance animations.
    pub fn update(&mut self, delta: Duration) {
        if self.typing {
            self.typing_elapsed += delta;
        }
    }

    /// Dots for the composing indicator, cycling with time.
    #[must_use]
    pub fn typing_dots(&self) -> &'static str {
        match (self.typing_elapsed.as_millis() / 400) % 3 {
            0 => ".",
            1 => "..",
            _ => "...",
        }
    }

    /// Index of the highlighted sidebar entry, if it is in the list.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active.as_ref()?;
        self.conversations.iter().position(|c| &c.id == active)
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_append_and_replace() {
        let mut display = DisplayState::new();

        assert!(display.apply_message(SessionMessage::TranscriptAppend {
            message: ChatMessage::user("hi"),
        }));
        assert_eq!(display.messages.len(), 1);

        assert!(display.apply_message(SessionMessage::TranscriptReplace {
            messages: vec![
                ChatMessage::user("hi"),
                ChatMessage::assistant("hello [1]"),
            ],
        }));
        assert_eq!(display.messages.len(), 2);
        assert_eq!(display.messages[1].role, ChatRole::Assistant);
    }

    #[test]
    fn test_typing_toggles() {
        let mut display = DisplayState::new();

        assert!(display.apply_message(SessionMessage::TypingStarted));
        assert!(display.typing);

        // Hiding the indicator does not move the transcript.
        assert!(!display.apply_message(SessionMessage::TypingStopped));
        assert!(!display.typing);
    }

    #[test]
    fn test_typing_started_is_idempotent() {
        let mut display = DisplayState::new();
        display.apply_message(SessionMessage::TypingStarted);
        display.apply_message(SessionMessage::TypingStarted);
        assert!(display.typing);
        display.apply_message(SessionMessage::TypingStopped);
        assert!(!display.typing);
    }

    #[test]
    fn test_sidebar_highlight_tracks_active() {
        let mut display = DisplayState::new();
        let list = vec![
            ConversationSummary {
                id: SessionId::from("a"),
                title: "satu".to_string(),
            },
            ConversationSummary {
                id: SessionId::from("b"),
                title: "dua".to_string(),
            },
        ];

        display.apply_message(SessionMessage::SidebarReplace {
            conversations: list.clone(),
        });
        display.apply_message(SessionMessage::SidebarActive {
            id: Some(SessionId::from("b")),
        });
        assert_eq!(display.active_index(), Some(1));

        // Re-rendering the same list keeps the highlight.
        display.apply_message(SessionMessage::SidebarReplace {
            conversations: list,
        });
        assert_eq!(display.active_index(), Some(1));

        display.apply_message(SessionMessage::SidebarActive { id: None });
        assert_eq!(display.active_index(), None);
    }

    #[test]
    fn test_typing_dots_cycle() {
        let mut display = DisplayState::new();
        display.apply_message(SessionMessage::TypingStarted);
        assert_eq!(display.typing_dots(), ".");

        display.update(Duration::from_millis(450));
        assert_eq!(display.typing_dots(), "..");

        display.update(Duration::from_millis(400));
        assert_eq!(display.typing_dots(), "...");

        display.update(Duration::from_millis(400));
        assert_eq!(display.typing_dots(), ".");
    }
}
