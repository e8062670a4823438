//! Action-confirmation domain module.
//!
//! # Module Structure
//!
//! - `payload`: server confirmation payloads (`ConfirmationData`, `ConfirmationDetails`)
//! - `state`: dialog state machine (`ConfirmationState`, `PendingConfirmation`, `Decision`)
//! - `view`: display projection (`ConfirmationView`, `ViewRow`)

mod payload;
mod state;
mod view;

pub use payload::{
    AlternativeCandidate, ConfirmationData, ConfirmationDetails, GENERAL_CONFIRMATION_TYPE,
    TASK_ASSIGNMENT_TYPE, TASK_REASSIGNMENT_TYPE, TaskAssignmentDetails, TaskReassignmentDetails,
};
pub use state::{ConfirmationState, Decision, DecisionBlocked, PendingConfirmation};
pub use view::{
    ConfidenceBadge, ConfirmationView, HIGH_CONFIDENCE_THRESHOLD, MAX_ALTERNATIVES, ViewRow,
    confidence_percent,
};
