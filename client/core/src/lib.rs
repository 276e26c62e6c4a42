//! Tanya Core - Headless Conversation Client for the Report Assistant
//!
//! This crate provides the conversation logic for the Tanya chat client,
//! completely independent of any UI framework. It can drive a TUI, a web
//! surface, or run headless for testing/automation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       UI Surfaces                            │
//! │   ┌─────────┐   ┌──────────┐   ┌────────────────────────┐   │
//! │   │   TUI   │   │  WebUI   │   │       Headless         │   │
//! │   │(ratatui)│   │          │   │                        │   │
//! │   └────┬────┘   └────┬─────┘   └───────────┬────────────┘   │
//! │        │             │                     │                │
//! │        └─────────────┴─────────────────────┘                │
//! │                         │                                   │
//! │                 SessionEvent (up)                           │
//! │                SessionMessage (down)                        │
//! │                         │                                   │
//! └─────────────────────────┼───────────────────────────────────┘
//!                           │
//! ┌─────────────────────────┼───────────────────────────────────┐
//! │                    TANYA CORE                               │
//! │   ┌─────────────────────┴─────────────────────────────┐     │
//! │   │                  ChatSession                      │     │
//! │   │   ┌────────────┐  ┌───────────┐  ┌────────────┐   │     │
//! │   │   │ Current Id │  │ Built-in  │  │ChatService │   │     │
//! │   │   │ (NEW/BOUND)│  │  Strings  │  │  (HTTP)    │   │     │
//! │   │   └────────────┘  └───────────┘  └────────────┘   │     │
//! │   └───────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ChatSession`]: the conversation state machine
//! - [`SessionMessage`]: messages sent from the session to UI surfaces
//! - [`SessionEvent`]: events sent from UI surfaces to the session
//! - [`ChatService`]: the remote chat service boundary
//! - [`HttpChatService`]: reqwest implementation of the service protocol
//!
//! # Quick Start
//!
//! ```ignore
//! use tanya_core::{ChatSession, ClientConfig, HttpChatService, SessionEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (msg_tx, mut msg_rx) = mpsc::channel(100);
//!     let (event_tx, event_rx) = mpsc::channel(100);
//!
//!     let service = HttpChatService::new(&ClientConfig::from_env());
//!     let session = ChatSession::new(service, msg_tx);
//!     tokio::spawn(session.run(event_rx));
//!
//!     event_tx
//!         .send(SessionEvent::SubmitMessage { content: "Halo".into() })
//!         .await
//!         .unwrap();
//!
//!     while let Some(msg) = msg_rx.recv().await {
//!         // Render message to the surface
//!     }
//! }
//! ```
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure conversation logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod citation;
pub mod config;
pub mod events;
pub mod messages;
pub mod service;
pub mod session;

// Re-exports for convenience
pub use citation::rewrite_citation_markers;
pub use config::ClientConfig;
pub use events::SessionEvent;
pub use messages::{
    ChatMessage, ChatRole, Conversation, ConversationSummary, SessionId, SessionMessage,
};
pub use service::{ChatService, HttpChatService, SendReply, ServiceError};
pub use session::{ChatSession, GREETING, LOAD_ERROR, SEND_ERROR};
