//! Chat Service Boundary
//!
//! The remote chat service as seen by the client: three request/response
//! operations and a typed failure taxonomy. The [`ChatService`] trait keeps
//! the session testable without a network; [`HttpChatService`] speaks the
//! real wire protocol.

mod http;
mod traits;

pub use http::HttpChatService;
pub use traits::{ChatService, SendReply, ServiceError};
