//! Conversation Session
//!
//! The state machine owning "which conversation am I in". It sequences
//! optimistic transcript updates against service calls, reconciles
//! server-assigned identifiers, and keeps transcript, sidebar highlight,
//! and composing indicator mutually consistent.
//!
//! # Design Philosophy
//!
//! The session holds exactly two pieces of state: the service handle and the
//! current conversation identifier (`None` until the service assigns one or
//! a stored conversation is loaded). Everything visible lives in the surface,
//! fed through [`SessionMessage`]s. Sending the user's message before the
//! service confirms keeps perceived latency low; identifier adoption is the
//! only step deferred until success, so a failed call can never fabricate a
//! phantom sidebar entry.

use tokio::sync::mpsc;

use crate::events::SessionEvent;
use crate::messages::{ChatMessage, SessionId, SessionMessage};
use crate::service::ChatService;

/// Greeting shown when a new conversation starts.
pub const GREETING: &str = "Silakan ajukan pertanyaan baru Anda.";

/// Transcript notice when sending a message fails.
pub const SEND_ERROR: &str = "Maaf, terjadi kesalahan saat menghubungi server.";

/// Transcript notice when loading a stored conversation fails.
pub const LOAD_ERROR: &str = "Gagal memuat percakapan.";

/// The conversation state machine.
///
/// Surfaces drive it with [`SessionEvent`]s and render the
/// [`SessionMessage`]s it emits. One session exists per surface; its
/// identifier field is the only copy of "the current conversation".
pub struct ChatSession<S> {
    /// The remote service
    service: S,
    /// Sender for messages to the surface
    tx: mpsc::Sender<SessionMessage>,
    /// Current conversation identifier; `None` means the next message
    /// opens a new conversation
    current: Option<SessionId>,
}

impl<S: ChatService> ChatSession<S> {
    /// Create a session talking to `service` and rendering through `tx`.
    pub fn new(service: S, tx: mpsc::Sender<SessionMessage>) -> Self {
        Self {
            service,
            tx,
            current: None,
        }
    }

    /// The current conversation identifier, if one is bound.
    #[must_use]
    pub fn current_id(&self) -> Option<&SessionId> {
        self.current.as_ref()
    }

    /// Whether the next submitted message opens a new conversation.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.current.is_none()
    }

    /// Drive the session from a surface event channel until it closes.
    ///
    /// Renders the initial greeting and fetches the sidebar before the
    /// first event, then processes events one at a time. A second submit
    /// issued while one is in flight queues behind it.
    pub async fn run(mut self, mut events: mpsc::Receiver<SessionEvent>) {
        self.start().await;
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        tracing::debug!("surface event channel closed, session ending");
    }

    /// Initial render: greeting plus one sidebar fetch.
    pub async fn start(&mut self) {
        self.start_new_chat().await;
        self.refresh_sidebar().await;
    }

    /// Dispatch one surface event.
    pub async fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SubmitMessage { content } => self.submit(&content).await,
            SessionEvent::StartNewChat => self.start_new_chat().await,
            SessionEvent::LoadConversation { id } => self.load_conversation(id).await,
            SessionEvent::RefreshSidebar => self.refresh_sidebar().await,
        }
    }

    /// Reset to a fresh conversation: greeting only, no sidebar highlight.
    ///
    /// Idempotent; safe to call in any state.
    pub async fn start_new_chat(&mut self) {
        self.current = None;
        self.emit(SessionMessage::TranscriptReplace {
            messages: vec![ChatMessage::assistant(GREETING)],
        })
        .await;
        self.emit(SessionMessage::SidebarActive { id: None }).await;
    }

    /// Submit user input.
    ///
    /// Empty or whitespace-only input is rejected silently. Otherwise the
    /// message is appended optimistically, the composing indicator goes up,
    /// and the service is asked for an answer. On success the identifier
    /// returned by the service is adopted if none was bound (making the
    /// conversation appear in the sidebar); on failure a fixed notice is
    /// appended and the identifier is left untouched so the user can retry.
    pub async fn submit(&mut self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            return;
        }

        self.emit(SessionMessage::TranscriptAppend {
            message: ChatMessage::user(text),
        })
        .await;
        self.emit(SessionMessage::TypingStarted).await;

        let result = self.service.send_message(text, self.current.as_ref()).await;
        match result {
            Ok(reply) => {
                self.emit(SessionMessage::TypingStopped).await;

                if self.current.is_none() {
                    self.current = Some(reply.session_id.clone());
                    // The new conversation must show up in the sidebar.
                    self.refresh_sidebar().await;
                }

                self.emit(SessionMessage::SidebarActive {
                    id: self.current.clone(),
                })
                .await;
                self.emit(SessionMessage::TranscriptAppend {
                    message: ChatMessage::assistant(reply.response),
                })
                .await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "send failed");
                self.emit(SessionMessage::TypingStopped).await;
                self.emit(SessionMessage::TranscriptAppend {
                    message: ChatMessage::error(SEND_ERROR),
                })
                .await;
            }
        }
    }

    /// Load a stored conversation from the sidebar.
    ///
    /// On success the whole transcript is replaced and the identifier
    /// adopted. On failure the previous transcript stays in place and a
    /// notice is appended; the identifier is not adopted.
    pub async fn load_conversation(&mut self, id: SessionId) {
        let result = self.service.fetch_conversation(&id).await;
        match result {
            Ok(conversation) => {
                self.current = Some(conversation.id.clone());
                self.emit(SessionMessage::TranscriptReplace {
                    messages: conversation.messages,
                })
                .await;
                self.emit(SessionMessage::SidebarActive { id: Some(id) })
                    .await;
            }
            Err(err) => {
                if err.is_not_found() {
                    tracing::warn!(id = %id, "conversation no longer exists");
                } else {
                    tracing::warn!(error = %err, "failed to load conversation");
                }
                self.emit(SessionMessage::TranscriptAppend {
                    message: ChatMessage::error(LOAD_ERROR),
                })
                .await;
            }
        }
    }

    /// Re-fetch the conversation list and re-apply the current highlight.
    ///
    /// A failure here is logged and swallowed: the surface keeps whatever
    /// list it already shows.
    pub async fn refresh_sidebar(&mut self) {
        let result = self.service.list_conversations().await;
        match result {
            Ok(conversations) => {
                self.emit(SessionMessage::SidebarReplace { conversations })
                    .await;
                if self.current.is_some() {
                    self.emit(SessionMessage::SidebarActive {
                        id: self.current.clone(),
                    })
                    .await;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to refresh conversation list");
            }
        }
    }

    /// Send one message to the surface.
    async fn emit(&self, message: SessionMessage) {
        if self.tx.send(message).await.is_err() {
            tracing::warn!("surface channel closed, dropping session message");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::messages::{ChatRole, Conversation, ConversationSummary};
    use crate::service::{SendReply, ServiceError};

    /// Scripted service double: pops pre-queued results per operation and
    /// counts calls.
    #[derive(Default)]
    struct MockChatService {
        send_results: Mutex<VecDeque<Result<SendReply, ServiceError>>>,
        list_results: Mutex<VecDeque<Result<Vec<ConversationSummary>, ServiceError>>>,
        fetch_results: Mutex<VecDeque<Result<Conversation, ServiceError>>>,
        calls: AtomicUsize,
    }

    impl MockChatService {
        fn with_send(self, result: Result<SendReply, ServiceError>) -> Self {
            self.send_results.lock().unwrap().push_back(result);
            self
        }

        fn with_list(self, result: Result<Vec<ConversationSummary>, ServiceError>) -> Self {
            self.list_results.lock().unwrap().push_back(result);
            self
        }

        fn with_fetch(self, result: Result<Conversation, ServiceError>) -> Self {
            self.fetch_results.lock().unwrap().push_back(result);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatService for MockChatService {
        async fn send_message(
            &self,
            _message: &str,
            _session_id: Option<&SessionId>,
        ) -> Result<SendReply, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.send_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected send_message call")
        }

        async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.list_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected list_conversations call")
        }

        async fn fetch_conversation(
            &self,
            _id: &SessionId,
        ) -> Result<Conversation, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fetch_results
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch_conversation call")
        }
    }

    fn session_with(
        service: MockChatService,
    ) -> (
        ChatSession<MockChatService>,
        mpsc::Receiver<SessionMessage>,
    ) {
        let (tx, rx) = mpsc::channel(100);
        (ChatSession::new(service, tx), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<SessionMessage>) -> Vec<SessionMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    fn reply(id: &str, response: &str) -> SendReply {
        SendReply {
            session_id: SessionId::from(id),
            response: response.to_string(),
        }
    }

    fn summary(id: &str, title: &str) -> ConversationSummary {
        ConversationSummary {
            id: SessionId::from(id),
            title: title.to_string(),
        }
    }

    fn service_down() -> ServiceError {
        ServiceError::Status {
            status: 500,
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_submit_is_silent() {
        let (mut session, mut rx) = session_with(MockChatService::default());

        session.submit("").await;
        session.submit("   \t\n").await;

        assert_eq!(drain(&mut rx), vec![]);
        assert_eq!(session.service.call_count(), 0);
        assert!(session.is_new());
    }

    #[tokio::test]
    async fn test_successful_send_from_new_adopts_id() {
        let service = MockChatService::default()
            .with_send(Ok(reply("abc", "Jawaban [1].")))
            .with_list(Ok(vec![summary("abc", "Pertanyaan pertama")]));
        let (mut session, mut rx) = session_with(service);

        session.submit("Pertanyaan pertama").await;

        assert_eq!(session.current_id(), Some(&SessionId::from("abc")));
        assert_eq!(
            drain(&mut rx),
            vec![
                SessionMessage::TranscriptAppend {
                    message: ChatMessage::user("Pertanyaan pertama"),
                },
                SessionMessage::TypingStarted,
                SessionMessage::TypingStopped,
                SessionMessage::SidebarReplace {
                    conversations: vec![summary("abc", "Pertanyaan pertama")],
                },
                SessionMessage::SidebarActive {
                    id: Some(SessionId::from("abc")),
                },
                SessionMessage::SidebarActive {
                    id: Some(SessionId::from("abc")),
                },
                SessionMessage::TranscriptAppend {
                    message: ChatMessage::assistant("Jawaban [1]."),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_successful_send_when_bound_skips_sidebar_refresh() {
        let service = MockChatService::default()
            .with_send(Ok(reply("abc", "Lanjutan.")));
        let (mut session, mut rx) = session_with(service);
        session.current = Some(SessionId::from("abc"));

        session.submit("lanjut").await;

        let messages = drain(&mut rx);
        assert!(!messages
            .iter()
            .any(|m| matches!(m, SessionMessage::SidebarReplace { .. })));
        assert_eq!(
            messages.last(),
            Some(&SessionMessage::TranscriptAppend {
                message: ChatMessage::assistant("Lanjutan."),
            })
        );
        // One send, no list call.
        assert_eq!(session.service.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_send_appends_one_error_and_keeps_state() {
        let service = MockChatService::default().with_send(Err(service_down()));
        let (mut session, mut rx) = session_with(service);

        session.submit("halo").await;

        assert!(session.is_new());
        assert_eq!(
            drain(&mut rx),
            vec![
                SessionMessage::TranscriptAppend {
                    message: ChatMessage::user("halo"),
                },
                SessionMessage::TypingStarted,
                SessionMessage::TypingStopped,
                SessionMessage::TranscriptAppend {
                    message: ChatMessage::error(SEND_ERROR),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_send_keeps_bound_id() {
        let service = MockChatService::default().with_send(Err(service_down()));
        let (mut session, mut rx) = session_with(service);
        session.current = Some(SessionId::from("abc"));

        session.submit("halo").await;

        assert_eq!(session.current_id(), Some(&SessionId::from("abc")));
        let messages = drain(&mut rx);
        let errors = messages
            .iter()
            .filter(|m| {
                matches!(
                    m,
                    SessionMessage::TranscriptAppend {
                        message: ChatMessage {
                            role: ChatRole::Error,
                            ..
                        },
                    }
                )
            })
            .count();
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_load_replaces_transcript_and_highlights() {
        let stored = Conversation {
            id: SessionId::from("abc"),
            title: "hi".to_string(),
            messages: vec![
                ChatMessage::user("hi"),
                ChatMessage::assistant("hello [1]"),
            ],
        };
        let service = MockChatService::default().with_fetch(Ok(stored.clone()));
        let (mut session, mut rx) = session_with(service);

        session.load_conversation(SessionId::from("abc")).await;

        assert_eq!(session.current_id(), Some(&SessionId::from("abc")));
        assert_eq!(
            drain(&mut rx),
            vec![
                SessionMessage::TranscriptReplace {
                    messages: stored.messages,
                },
                SessionMessage::SidebarActive {
                    id: Some(SessionId::from("abc")),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_load_keeps_transcript_and_id() {
        let service = MockChatService::default()
            .with_fetch(Err(ServiceError::NotFound(SessionId::from("gone"))));
        let (mut session, mut rx) = session_with(service);
        session.current = Some(SessionId::from("abc"));

        session.load_conversation(SessionId::from("gone")).await;

        // Identifier not adopted, transcript only gains the notice.
        assert_eq!(session.current_id(), Some(&SessionId::from("abc")));
        assert_eq!(
            drain(&mut rx),
            vec![SessionMessage::TranscriptAppend {
                message: ChatMessage::error(LOAD_ERROR),
            }]
        );
    }

    #[tokio::test]
    async fn test_new_chat_is_idempotent() {
        let (mut session, mut rx) = session_with(MockChatService::default());
        session.current = Some(SessionId::from("abc"));

        session.start_new_chat().await;
        let first = drain(&mut rx);
        session.start_new_chat().await;
        let second = drain(&mut rx);

        assert!(session.is_new());
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                SessionMessage::TranscriptReplace {
                    messages: vec![ChatMessage::assistant(GREETING)],
                },
                SessionMessage::SidebarActive { id: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_sidebar_refresh_reapplies_highlight() {
        let list = vec![summary("abc", "satu"), summary("def", "dua")];
        let service = MockChatService::default()
            .with_list(Ok(list.clone()))
            .with_list(Ok(list.clone()));
        let (mut session, mut rx) = session_with(service);
        session.current = Some(SessionId::from("def"));

        session.refresh_sidebar().await;
        let first = drain(&mut rx);
        session.refresh_sidebar().await;
        let second = drain(&mut rx);

        // Same data twice renders identically.
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                SessionMessage::SidebarReplace {
                    conversations: list,
                },
                SessionMessage::SidebarActive {
                    id: Some(SessionId::from("def")),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_sidebar_refresh_failure_is_swallowed() {
        let service = MockChatService::default().with_list(Err(service_down()));
        let (mut session, mut rx) = session_with(service);

        session.refresh_sidebar().await;

        assert_eq!(drain(&mut rx), vec![]);
    }

    #[tokio::test]
    async fn test_sidebar_refresh_without_id_skips_highlight() {
        let service = MockChatService::default().with_list(Ok(vec![summary("abc", "satu")]));
        let (mut session, mut rx) = session_with(service);

        session.refresh_sidebar().await;

        assert_eq!(
            drain(&mut rx),
            vec![SessionMessage::SidebarReplace {
                conversations: vec![summary("abc", "satu")],
            }]
        );
    }

    #[tokio::test]
    async fn test_start_renders_greeting_then_sidebar() {
        let service = MockChatService::default().with_list(Ok(vec![summary("abc", "satu")]));
        let (mut session, mut rx) = session_with(service);

        session.start().await;

        assert_eq!(
            drain(&mut rx),
            vec![
                SessionMessage::TranscriptReplace {
                    messages: vec![ChatMessage::assistant(GREETING)],
                },
                SessionMessage::SidebarActive { id: None },
                SessionMessage::SidebarReplace {
                    conversations: vec![summary("abc", "satu")],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_handle_event_dispatch() {
        let service = MockChatService::default().with_send(Ok(reply("abc", "ok")))
            .with_list(Ok(vec![summary("abc", "halo")]));
        let (mut session, mut rx) = session_with(service);

        session
            .handle_event(SessionEvent::SubmitMessage {
                content: "halo".to_string(),
            })
            .await;

        assert_eq!(session.current_id(), Some(&SessionId::from("abc")));
        assert!(!drain(&mut rx).is_empty());
    }
}
