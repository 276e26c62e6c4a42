//! Session Client
//!
//! Thin wrapper around the conversation core for TUI integration.
//! This client embeds the session directly (no network between the two)
//! and provides a convenient interface for sending events and receiving
//! messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any conversation logic.
//! All of that happens in the core session task. The TUI's job is:
//! 1. Convert terminal events to `SessionEvent`s
//! 2. Send them to the session
//! 3. Receive `SessionMessage`s
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use tanya_core::{
    ChatSession, ClientConfig, HttpChatService, SessionEvent, SessionId, SessionMessage,
};

/// Client for communicating with the embedded session task.
pub struct SessionClient {
    /// Sender for events to the session
    events: mpsc::Sender<SessionEvent>,
    /// Receiver for messages from the session
    rx: mpsc::Receiver<SessionMessage>,
}

impl SessionClient {
    /// Spawn the session task for the configured service and connect to it.
    pub fn connect(config: &ClientConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(100);
        let (event_tx, event_rx) = mpsc::channel(100);

        let service = HttpChatService::new(config);
        let session = ChatSession::new(service, msg_tx);
        tokio::spawn(session.run(event_rx));

        Self {
            events: event_tx,
            rx: msg_rx,
        }
    }

    /// Submit user input.
    pub async fn submit(&self, content: String) -> anyhow::Result<()> {
        self.send(SessionEvent::SubmitMessage { content }).await
    }

    /// Ask for a fresh conversation.
    pub async fn start_new_chat(&self) -> anyhow::Result<()> {
        self.send(SessionEvent::StartNewChat).await
    }

    /// Load a stored conversation.
    pub async fn load_conversation(&self, id: SessionId) -> anyhow::Result<()> {
        self.send(SessionEvent::LoadConversation { id }).await
    }

    /// Ask for the conversation list to be re-fetched.
    pub async fn refresh_sidebar(&self) -> anyhow::Result<()> {
        self.send(SessionEvent::RefreshSidebar).await
    }

    /// Receive all pending messages from the session (non-blocking).
    pub fn recv_all(&mut self) -> Vec<SessionMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    async fn send(&self, event: SessionEvent) -> anyhow::Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("session task ended"))
    }
}
