//! Session domain module.
//!
//! # Module Structure
//!
//! - `id`: client-generated session identifier (`SessionId`)
//! - `message`: transcript entries (`MessageRole`, `MessageId`, `ChatMessage`)
//! - `model`: the session object owning transcript and confirmation state (`ChatSession`)

mod id;
mod message;
mod model;

pub use id::SessionId;
pub use message::{ChatMessage, MessageId, MessageRole};
pub use model::ChatSession;
