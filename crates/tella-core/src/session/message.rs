//! Transcript message types.

use crate::confirmation::ConfirmationData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message from the remote assistant, including locally built error replies.
    Assistant,
}

/// Position of a message in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single transcript entry.
///
/// `requires_confirmation` is true exactly when `confirmation_data` is
/// present; [`crate::session::ChatSession`] maintains that on append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub requires_confirmation: bool,
    #[serde(default)]
    pub confirmation_data: Option<ConfirmationData>,
    /// The message whose request produced this reply.
    #[serde(default)]
    pub in_reply_to: Option<MessageId>,
    /// Timestamp when the message was appended (RFC 3339).
    pub created_at: String,
}

