//! Chat session model.
//!
//! [`ChatSession`] owns everything the chat view mutates: the session id,
//! the append-only transcript and the confirmation state. All mutation goes
//! through explicit methods so the state machine can be exercised without a
//! front-end.

use super::id::SessionId;
use super::message::{ChatMessage, MessageId, MessageRole};
use crate::api::ConfirmActionRequest;
use crate::confirmation::{
    ConfirmationData, ConfirmationState, Decision, DecisionBlocked, PendingConfirmation,
};

/// A single chat view's conversation with the assistant.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: SessionId,
    messages: Vec<ChatMessage>,
    confirmation: ConfirmationState,
}

impl ChatSession {
    /// Creates an empty session with the given id.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            confirmation: ConfirmationState::Idle,
        }
    }

    /// Creates an empty session with a freshly generated id.
    pub fn start() -> Self {
        Self::new(SessionId::generate())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The transcript, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.get(id.0 as usize)
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn confirmation(&self) -> &ConfirmationState {
        &self.confirmation
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.confirmation.pending()
    }

    // ============================================================================
    // Transcript
    // ============================================================================

    /// Appends a user turn and returns its id.
    pub fn append_user(&mut self, content: impl Into<String>) -> MessageId {
        self.push(MessageRole::User, content.into(), None, None).id
    }

    /// Appends an assistant turn.
    ///
    /// The message is flagged `requires_confirmation` iff `confirmation` is
    /// `Some`. Opening the dialog is a separate step
    /// ([`ChatSession::open_confirmation`]).
    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        confirmation: Option<ConfirmationData>,
        in_reply_to: Option<MessageId>,
    ) -> &ChatMessage {
        self.push(MessageRole::Assistant, content.into(), confirmation, in_reply_to)
    }

    fn push(
        &mut self,
        role: MessageRole,
        content: String,
        confirmation_data: Option<ConfirmationData>,
        in_reply_to: Option<MessageId>,
    ) -> &ChatMessage {
        let id = MessageId(self.messages.len() as u64);
        self.messages.push(ChatMessage {
            id,
            role,
            content,
            requires_confirmation: confirmation_data.is_some(),
            confirmation_data,
            in_reply_to,
            created_at: chrono::Utc::now().to_rfc3339(),
        });
        &self.messages[self.messages.len() - 1]
    }

    // ============================================================================
    // Confirmation state machine
    // ============================================================================

    /// Opens the dialog, replacing whatever was pending before.
    ///
    /// Refused while a decision is submitting: the in-flight decision owns
    /// the dialog until it resolves. Returns whether the dialog was opened.
    pub fn open_confirmation(&mut self, pending: PendingConfirmation) -> bool {
        match &self.confirmation {
            ConfirmationState::Submitting { pending: current, .. } => {
                tracing::warn!(
                    target: "tella::session",
                    "Not opening '{}' confirmation from {} while the decision on {} is submitting",
                    pending.kind,
                    pending.source,
                    current.source
                );
                return false;
            }
            ConfirmationState::Pending(previous) => {
                tracing::debug!(
                    target: "tella::session",
                    "Replacing pending '{}' confirmation from {}",
                    previous.kind,
                    previous.source
                );
            }
            ConfirmationState::Idle => {}
        }
        self.confirmation = ConfirmationState::Pending(pending);
        true
    }

    /// Pending → Submitting.
    ///
    /// Builds the confirm-action request from the most recent transcript
    /// message. Nothing changes when the transition is not allowed.
    pub fn begin_decision(
        &mut self,
        decision: Decision,
    ) -> Result<ConfirmActionRequest, DecisionBlocked> {
        let pending = match &self.confirmation {
            ConfirmationState::Idle => return Err(DecisionBlocked::NothingPending),
            ConfirmationState::Submitting { .. } => return Err(DecisionBlocked::AlreadySubmitting),
            ConfirmationState::Pending(pending) => pending.clone(),
        };

        let data = self
            .last_message()
            .and_then(|message| message.confirmation_data.as_ref())
            .ok_or(DecisionBlocked::NoConfirmationData)?;

        let request = ConfirmActionRequest {
            session_id: self.id.as_str().to_string(),
            action_type: data.tool_name.clone(),
            action_data: data.raw().clone(),
            confirmed: decision.confirmed(),
        };

        self.confirmation = ConfirmationState::Submitting { pending, decision };
        Ok(request)
    }

    /// Submitting → Idle for the decision on `source`.
    ///
    /// Any other state is left alone and `None` is returned.
    pub fn finish_decision(&mut self, source: MessageId) -> Option<PendingConfirmation> {
        match &self.confirmation {
            ConfirmationState::Submitting { pending, .. } if pending.source == source => {
                self.clear_confirmation()
            }
            _ => None,
        }
    }

    /// Any state → Idle. Returns what was shown, if anything.
    pub fn clear_confirmation(&mut self) -> Option<PendingConfirmation> {
        match std::mem::take(&mut self.confirmation) {
            ConfirmationState::Idle => None,
            ConfirmationState::Pending(pending) | ConfirmationState::Submitting { pending, .. } => {
                Some(pending)
            }
        }
    }

    /// Pending → Idle without a decision. Ignored while submitting.
    pub fn dismiss_confirmation(&mut self) -> bool {
        if self.confirmation.accepts_decision() {
            self.confirmation = ConfirmationState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reassignment_data() -> ConfirmationData {
        ConfirmationData::from(json!({
            "confirmation_type": "task_reassignment",
            "tool_name": "reassign_task",
            "tool_result": {"new_assignee": "Ayşe", "confidence_score": 0.9}
        }))
    }

    fn session_with_pending() -> ChatSession {
        let mut session = ChatSession::new(SessionId::from("session_test"));
        let question = session.append_user("Görevi Ayşe'ye ver");
        let data = reassignment_data();
        let source = session
            .append_assistant("Onay gerekli", Some(data.clone()), Some(question))
            .id;
        session.open_confirmation(PendingConfirmation::new(&data, "Aksiyon Onayı", source));
        session
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut session = ChatSession::start();
        let first = session.append_user("merhaba");
        let reply = session.append_assistant("selam", None, Some(first)).clone();

        assert_eq!(first, MessageId(0));
        assert_eq!(reply.id, MessageId(1));
        assert_eq!(reply.in_reply_to, Some(first));
        assert!(!reply.requires_confirmation);
        assert_eq!(session.len(), 2);
        assert_eq!(session.message(first).map(|m| m.content.as_str()), Some("merhaba"));
    }

    #[test]
    fn test_confirmation_flag_follows_payload() {
        let session = session_with_pending();
        let last = session.last_message().unwrap();
        assert!(last.requires_confirmation);
        assert!(last.confirmation_data.is_some());
        assert!(session.confirmation().accepts_decision());
    }

    #[test]
    fn test_begin_decision_builds_request() {
        let mut session = session_with_pending();
        let request = session.begin_decision(Decision::Approve).unwrap();

        assert_eq!(request.session_id, "session_test");
        assert_eq!(request.action_type, "reassign_task");
        assert!(request.confirmed);
        assert_eq!(request.action_data["tool_result"]["new_assignee"], "Ayşe");
        assert!(session.confirmation().is_submitting());
        assert!(session.pending_confirmation().is_some());
    }

    #[test]
    fn test_begin_decision_blocked_while_submitting() {
        let mut session = session_with_pending();
        session.begin_decision(Decision::Reject).unwrap();
        assert_eq!(
            session.begin_decision(Decision::Approve),
            Err(DecisionBlocked::AlreadySubmitting)
        );
    }

    #[test]
    fn test_begin_decision_without_pending() {
        let mut session = ChatSession::start();
        assert_eq!(
            session.begin_decision(Decision::Approve),
            Err(DecisionBlocked::NothingPending)
        );
    }

    #[test]
    fn test_begin_decision_requires_payload_on_last_message() {
        let mut session = session_with_pending();
        session.append_user("bir dakika");

        assert_eq!(
            session.begin_decision(Decision::Approve),
            Err(DecisionBlocked::NoConfirmationData)
        );
        // still pending, nothing submitted
        assert!(session.confirmation().accepts_decision());
    }

    #[test]
    fn test_dismiss_only_from_pending() {
        let mut session = session_with_pending();
        assert!(session.dismiss_confirmation());
        assert!(session.confirmation().is_idle());
        assert!(!session.dismiss_confirmation());

        let mut submitting = session_with_pending();
        submitting.begin_decision(Decision::Approve).unwrap();
        assert!(!submitting.dismiss_confirmation());
        assert!(submitting.confirmation().is_submitting());
    }

    #[test]
    fn test_clear_returns_shown_confirmation() {
        let mut session = session_with_pending();
        session.begin_decision(Decision::Approve).unwrap();
        let cleared = session.clear_confirmation().unwrap();
        assert_eq!(cleared.kind, "task_reassignment");
        assert!(session.confirmation().is_idle());
        assert!(session.clear_confirmation().is_none());
    }

    #[test]
    fn test_open_refused_while_submitting() {
        let mut session = session_with_pending();
        session.begin_decision(Decision::Approve).unwrap();

        let data = ConfirmationData::from(json!({"tool_name": "replan_sprints"}));
        let source = session.append_assistant("Yeni onay", Some(data.clone()), None).id;
        assert!(!session.open_confirmation(PendingConfirmation::new(&data, "Aksiyon Onayı", source)));

        assert!(session.confirmation().is_submitting());
        assert_eq!(session.pending_confirmation().unwrap().source, MessageId(1));
    }

    #[test]
    fn test_finish_decision_matches_source() {
        let mut session = session_with_pending();
        session.begin_decision(Decision::Approve).unwrap();

        assert!(session.finish_decision(MessageId(7)).is_none());
        assert!(session.confirmation().is_submitting());

        let finished = session.finish_decision(MessageId(1)).unwrap();
        assert_eq!(finished.kind, "task_reassignment");
        assert!(session.confirmation().is_idle());
        assert!(session.finish_decision(MessageId(1)).is_none());
    }

    #[test]
    fn test_finish_decision_ignores_pending() {
        let mut session = session_with_pending();
        assert!(session.finish_decision(MessageId(1)).is_none());
        assert!(session.confirmation().accepts_decision());
    }

    #[test]
    fn test_open_replaces_previous_pending() {
        let mut session = session_with_pending();
        let data = ConfirmationData::from(json!({"tool_name": "replan_sprints"}));
        let source = session.append_assistant("Yeni onay", Some(data.clone()), None).id;
        assert!(session.open_confirmation(PendingConfirmation::new(&data, "Aksiyon Onayı", source)));

        let pending = session.pending_confirmation().unwrap();
        assert_eq!(pending.kind, "general");
        assert_eq!(pending.source, source);
    }
}
