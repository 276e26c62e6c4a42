//! Session Events
//!
//! Events sent from UI surfaces to the [`ChatSession`](crate::ChatSession).
//! These represent all the ways a UI can report user actions to the
//! conversation layer.
//!
//! # Design Philosophy
//!
//! UI surfaces are "dumb" renderers that forward user actions to the session.
//! They don't interpret what actions mean - they just report what happened.
//! The session responds with [`SessionMessage`](crate::SessionMessage)s.

use serde::{Deserialize, Serialize};

use crate::messages::SessionId;

/// Events from a UI surface to the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// User submitted the input field
    SubmitMessage {
        /// Raw input content (the session trims and validates it)
        content: String,
    },

    /// User asked for a fresh conversation
    StartNewChat,

    /// User clicked a sidebar entry
    LoadConversation {
        /// Which stored conversation to load
        id: SessionId,
    },

    /// Surface wants the conversation list re-fetched
    RefreshSidebar,
}
