//! Conversation orchestration for the Tella chat client.
//!
//! [`ChatController`] plays the role of the chat view's controller: it
//! dispatches user messages, opens and resolves action confirmations, and
//! turns every remote failure into an assistant message. The remote side is
//! reached through [`tella_core::api::ChatApi`]; [`HttpChatApi`] is the REST
//! implementation.

pub mod http_chat_api;

pub use http_chat_api::HttpChatApi;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tella_core::Locale;
use tella_core::api::{ChatApi, ChatHistory, ChatRequest, ClearHistoryReply};
use tella_core::category::{PromptCategory, example_prompt, fallback_categories};
use tella_core::confirmation::{ConfirmationState, Decision, DecisionBlocked, PendingConfirmation};
use tella_core::session::{ChatMessage, ChatSession, SessionId};
use tokio::sync::RwLock;

/// Result of [`ChatController::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input; nothing was appended or sent.
    Ignored,
    /// The assistant answered.
    Replied {
        /// The appended assistant message.
        message: ChatMessage,
        /// The confirmation this reply opened, if any.
        confirmation: Option<PendingConfirmation>,
    },
    /// The request failed; `message` is the appended error explanation.
    Failed { message: ChatMessage },
}

impl SendOutcome {
    /// The appended assistant message, unless the input was ignored.
    pub fn message(&self) -> Option<&ChatMessage> {
        match self {
            Self::Ignored => None,
            Self::Replied { message, .. } | Self::Failed { message } => Some(message),
        }
    }
}

/// Result of [`ChatController::decide`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecisionOutcome {
    /// The decision was not submitted.
    Ignored(DecisionBlocked),
    /// The decision round trip finished and the confirmation was cleared.
    Resolved {
        /// The appended follow-up message.
        message: ChatMessage,
        /// False when the request failed or the server reported failure.
        succeeded: bool,
        /// Risks the server attached to its answer.
        risks: Vec<String>,
    },
}

/// Counts outstanding sends; decrements on drop so early returns and
/// panics inside a send cannot leave the input disabled.
struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Drives one chat session against the remote assistant.
///
/// Cloning is cheap and every clone shares the same session, so a front-end
/// can spawn a send and keep reading input.
///
/// The session lock is never held across a network call: the user turn is
/// appended before the request goes out, and the reply is appended under a
/// fresh lock once it resolves, linked to its question by `in_reply_to`.
/// Concurrent sends therefore append replies in resolution order.
#[derive(Clone)]
pub struct ChatController {
    session: Arc<RwLock<ChatSession>>,
    api: Arc<dyn ChatApi>,
    locale: Locale,
    in_flight: Arc<AtomicUsize>,
}

impl ChatController {
    pub fn new(session: ChatSession, api: Arc<dyn ChatApi>, locale: Locale) -> Self {
        tracing::info!(target: "tella::chat", "Chat session {} started", session.id());
        Self {
            session: Arc::new(RwLock::new(session)),
            api,
            locale,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn session_id(&self) -> SessionId {
        self.session.read().await.id().clone()
    }

    /// A snapshot of the transcript.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.read().await.messages().to_vec()
    }

    /// The confirmation currently shown, if any.
    pub async fn pending(&self) -> Option<PendingConfirmation> {
        self.session.read().await.pending_confirmation().cloned()
    }

    pub async fn confirmation_state(&self) -> ConfirmationState {
        self.session.read().await.confirmation().clone()
    }

    /// Whether a send is outstanding.
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Whether the input box would accept `input` right now.
    pub fn can_send(&self, input: &str) -> bool {
        !input.trim().is_empty() && !self.is_sending()
    }

    // ============================================================================
    // Message dispatch
    // ============================================================================

    /// Sends a user message and appends the assistant's answer.
    ///
    /// Blank input is ignored. The user turn is appended immediately and is
    /// never rolled back. Failures become an assistant message explaining
    /// the error; nothing is returned as `Err`.
    pub async fn send(&self, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let _guard = InFlightGuard::enter(&self.in_flight);

        let (request, question) = {
            let mut session = self.session.write().await;
            let question = session.append_user(text);
            let request = ChatRequest {
                session_id: session.id().as_str().to_string(),
                message: text.to_string(),
            };
            (request, question)
        };

        tracing::debug!(
            target: "tella::chat",
            "Sending {} ({} chars) in {}",
            question,
            text.chars().count(),
            request.session_id
        );
        let result = self.api.send_message(&request).await;

        let mut session = self.session.write().await;
        match result {
            Ok(reply) => {
                let data = reply.confirmation().cloned();
                if reply.requires_confirmation && data.is_none() {
                    tracing::warn!(
                        target: "tella::chat",
                        "Reply to {} asks for confirmation without a payload; ignoring flag",
                        question
                    );
                }

                let message = session
                    .append_assistant(reply.response, data.clone(), Some(question))
                    .clone();

                let confirmation = data.and_then(|data| {
                    let pending = PendingConfirmation::new(
                        &data,
                        self.locale.labels().action_approval,
                        message.id,
                    );
                    if !session.open_confirmation(pending.clone()) {
                        return None;
                    }
                    tracing::info!(
                        target: "tella::chat",
                        "Confirmation '{}' ({}) opened by {}",
                        pending.kind,
                        data.tool_name,
                        message.id
                    );
                    Some(pending)
                });

                SendOutcome::Replied {
                    message,
                    confirmation,
                }
            }
            Err(err) => {
                tracing::warn!(target: "tella::chat", "Send of {} failed: {}", question, err);
                let text = self.locale.send_failed(err.user_detail().as_deref());
                let message = session.append_assistant(text, None, Some(question)).clone();
                SendOutcome::Failed { message }
            }
        }
    }

    /// Sends the `index`-th example prompt as if it had been typed.
    pub async fn send_example(&self, categories: &[PromptCategory], index: usize) -> SendOutcome {
        match example_prompt(categories, index) {
            Some(prompt) => {
                let prompt = prompt.to_string();
                self.send(&prompt).await
            }
            None => {
                tracing::debug!(target: "tella::chat", "No example prompt at index {}", index);
                SendOutcome::Ignored
            }
        }
    }

    // ============================================================================
    // Confirmation
    // ============================================================================

    /// Submits approve or reject for the pending confirmation.
    ///
    /// The action is taken from the latest transcript message's payload.
    /// Once the call resolves this decision's confirmation is cleared and
    /// exactly one follow-up assistant message is appended, whatever the
    /// outcome.
    pub async fn decide(&self, decision: Decision) -> DecisionOutcome {
        let (request, source) = {
            let mut session = self.session.write().await;
            let Some(source) = session.pending_confirmation().map(|pending| pending.source) else {
                tracing::debug!(
                    target: "tella::chat",
                    "Decision ignored: {}",
                    DecisionBlocked::NothingPending
                );
                return DecisionOutcome::Ignored(DecisionBlocked::NothingPending);
            };
            match session.begin_decision(decision) {
                Ok(request) => (request, source),
                Err(blocked) => {
                    tracing::debug!(target: "tella::chat", "Decision ignored: {}", blocked);
                    return DecisionOutcome::Ignored(blocked);
                }
            }
        };

        tracing::info!(
            target: "tella::chat",
            "Submitting {:?} for '{}' in {}",
            decision,
            request.action_type,
            request.session_id
        );
        let result = self.api.confirm_action(&request).await;

        let mut session = self.session.write().await;
        if session.finish_decision(source).is_none() {
            tracing::warn!(
                target: "tella::chat",
                "Confirmation from {} was no longer submitting when its decision resolved",
                source
            );
        }
        match result {
            Ok(reply) => {
                let succeeded = reply.success.unwrap_or(true);
                let risks = reply.risks.unwrap_or_default();
                if !succeeded {
                    tracing::warn!(
                        target: "tella::chat",
                        "Server reported failure for '{}': {}",
                        request.action_type,
                        reply.message
                    );
                }
                let message = session
                    .append_assistant(reply.message, None, Some(source))
                    .clone();
                DecisionOutcome::Resolved {
                    message,
                    succeeded,
                    risks,
                }
            }
            Err(err) => {
                tracing::warn!(
                    target: "tella::chat",
                    "Decision for '{}' failed: {}",
                    request.action_type,
                    err
                );
                let text = self.locale.decision_failed(err.user_detail().as_deref());
                let message = session.append_assistant(text, None, Some(source)).clone();
                DecisionOutcome::Resolved {
                    message,
                    succeeded: false,
                    risks: Vec::new(),
                }
            }
        }
    }

    /// Closes the pending confirmation without deciding. No request is made.
    pub async fn dismiss(&self) -> bool {
        let dismissed = self.session.write().await.dismiss_confirmation();
        if dismissed {
            tracing::debug!(target: "tella::chat", "Confirmation dismissed");
        }
        dismissed
    }

    // ============================================================================
    // Supplementary calls
    // ============================================================================

    /// Example prompt categories, or the built-in set when the fetch fails.
    pub async fn load_categories(&self) -> Vec<PromptCategory> {
        match self.api.categories().await {
            Ok(categories) => categories,
            Err(err) => {
                tracing::warn!(
                    target: "tella::chat",
                    "Failed to load categories, using built-in examples: {}",
                    err
                );
                fallback_categories(self.locale)
            }
        }
    }

    /// The server-side log of this session. The local transcript is untouched.
    pub async fn history(&self) -> tella_core::Result<ChatHistory> {
        let session_id = self.session_id().await;
        self.api.history(session_id.as_str()).await
    }

    /// Asks the server to forget this session's context. The local
    /// transcript is untouched.
    pub async fn forget(&self) -> tella_core::Result<ClearHistoryReply> {
        let session_id = self.session_id().await;
        let reply = self.api.clear_history(session_id.as_str()).await?;
        tracing::info!(target: "tella::chat", "Server history of {} cleared", session_id);
        Ok(reply)
    }
}
