//! Remote chat API contract.
//!
//! The backend is an external collaborator; this module defines the wire
//! types it speaks and the [`ChatApi`] trait the chat controller depends on,
//! decoupling the conversation logic from the concrete transport.

use crate::category::PromptCategory;
use crate::confirmation::ConfirmationData;
use crate::error::Result;
use crate::serde_util::null_as_default;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Reply of `POST /api/chat`.
///
/// Every field except `response` is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_confirmation: bool,
    #[serde(default)]
    pub confirmation_data: Option<ConfirmationData>,
}

impl ChatReply {
    /// The confirmation payload, if this reply asks for one.
    ///
    /// A reply flagged `requires_confirmation` without a payload asks for
    /// nothing, and a payload without the flag is ignored.
    pub fn confirmation(&self) -> Option<&ConfirmationData> {
        if self.requires_confirmation {
            self.confirmation_data.as_ref()
        } else {
            None
        }
    }
}

/// Body of `POST /api/chat/confirm-action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmActionRequest {
    pub session_id: String,
    /// Backend tool name taken from the confirmation payload.
    pub action_type: String,
    /// The confirmation payload exactly as received.
    pub action_data: Value,
    pub confirmed: bool,
}

/// Reply of `POST /api/chat/confirm-action`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfirmActionReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub risks: Option<Vec<String>>,
}

/// Reply of `GET /api/chat/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoriesReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<PromptCategory>,
}

/// One entry of the server-side conversation log.
///
/// Roles are free-form here: the server also records `tool` and `system`
/// turns that never appear in the local transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_confirmation: bool,
}

/// Reply of `GET /api/chat/history/{session_id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatHistory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<HistoryEntry>,
}

/// Reply of `DELETE /api/chat/history/{session_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClearHistoryReply {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// The remote assistant, as seen by the chat controller.
///
/// # Implementation Notes
///
/// Implementations map every failure (transport, non-success status,
/// undecodable body) into [`crate::TellaError`]; they do not retry.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Sends one user message and returns the assistant's reply.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply>;

    /// Submits an approve/reject decision for a pending action.
    async fn confirm_action(&self, request: &ConfirmActionRequest) -> Result<ConfirmActionReply>;

    /// Fetches the example prompt categories.
    async fn categories(&self) -> Result<Vec<PromptCategory>>;

    /// Fetches the server-side conversation log of a session.
    async fn history(&self, session_id: &str) -> Result<ChatHistory>;

    /// Asks the server to forget a session's conversation log.
    async fn clear_history(&self, session_id: &str) -> Result<ClearHistoryReply>;
}
