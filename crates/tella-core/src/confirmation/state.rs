//! Confirmation state machine.
//!
//! ```text
//!            open                 begin_decision
//!   Idle ───────────▶ Pending ───────────────────▶ Submitting
//!    ▲  ◀──────────── │  ▲ │                          │
//!    │     dismiss    │  └─┘ open (replaces)          │
//!    └────────────────┴───────────────────────────────┘
//!                       clear (success or failure)
//! ```

use super::payload::{ConfirmationData, ConfirmationDetails};
use crate::session::MessageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transient dialog state derived from a confirmation-bearing message.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirmation {
    /// Confirmation type label (`task_assignment`, `general`, ...).
    pub kind: String,
    /// Dialog title.
    pub title: String,
    pub details: ConfirmationDetails,
    /// Transcript message that opened this confirmation.
    pub source: MessageId,
}

impl PendingConfirmation {
    pub fn new(data: &ConfirmationData, title: impl Into<String>, source: MessageId) -> Self {
        Self {
            kind: data.confirmation_type.clone(),
            title: title.into(),
            details: data.details.clone(),
            source,
        }
    }
}

/// The user's answer to a pending confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Value of the `confirmed` flag sent to the server.
    pub fn confirmed(self) -> bool {
        matches!(self, Decision::Approve)
    }
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Decision::Approve
        } else {
            Decision::Reject
        }
    }
}

/// Where the confirmation dialog currently is.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfirmationState {
    /// No dialog.
    #[default]
    Idle,
    /// Dialog open, decision buttons enabled.
    Pending(PendingConfirmation),
    /// A decision was sent; buttons disabled, dialog still visible.
    Submitting {
        pending: PendingConfirmation,
        decision: Decision,
    },
}

impl ConfirmationState {
    /// The dialog contents, while a dialog is visible.
    pub fn pending(&self) -> Option<&PendingConfirmation> {
        match self {
            Self::Idle => None,
            Self::Pending(pending) | Self::Submitting { pending, .. } => Some(pending),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Whether approve/reject may be pressed.
    pub fn accepts_decision(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Why a decision was not submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionBlocked {
    /// No confirmation is open.
    NothingPending,
    /// A decision is already in flight.
    AlreadySubmitting,
    /// The latest transcript message carries no confirmation payload.
    NoConfirmationData,
}

impl fmt::Display for DecisionBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingPending => write!(f, "no confirmation is pending"),
            Self::AlreadySubmitting => write!(f, "a decision is already being submitted"),
            Self::NoConfirmationData => {
                write!(f, "the latest message carries no confirmation data")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending() -> PendingConfirmation {
        let data = ConfirmationData::from(json!({"tool_name": "update_availability"}));
        PendingConfirmation::new(&data, "Aksiyon Onayı", MessageId(1))
    }

    #[test]
    fn test_default_is_idle() {
        let state = ConfirmationState::default();
        assert!(state.is_idle());
        assert!(state.pending().is_none());
        assert!(!state.accepts_decision());
    }

    #[test]
    fn test_submitting_keeps_dialog_visible() {
        let state = ConfirmationState::Submitting {
            pending: pending(),
            decision: Decision::Reject,
        };
        assert!(state.is_submitting());
        assert_eq!(state.pending().map(|p| p.kind.as_str()), Some("general"));
        assert!(!state.accepts_decision());
    }

    #[test]
    fn test_decision_flag() {
        assert!(Decision::Approve.confirmed());
        assert!(!Decision::Reject.confirmed());
        assert_eq!(Decision::from(true), Decision::Approve);
    }
}
