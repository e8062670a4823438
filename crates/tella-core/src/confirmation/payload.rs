//! Confirmation payloads attached to assistant messages.
//!
//! The server sends an untyped `confirmation_data` object. It is decoded
//! into a typed [`ConfirmationDetails`] union while the raw object is kept
//! untouched, because the confirm/reject call must echo it back verbatim.

use crate::serde_util::null_as_default;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used when the server omits `confirmation_type`.
pub const GENERAL_CONFIRMATION_TYPE: &str = "general";
/// Confirmation type of a proposed first assignment.
pub const TASK_ASSIGNMENT_TYPE: &str = "task_assignment";
/// Confirmation type of a proposed reassignment.
pub const TASK_REASSIGNMENT_TYPE: &str = "task_reassignment";

/// The `confirmation_data` object of an assistant reply.
///
/// Deserialization never fails for a JSON object: missing fields fall back
/// to defaults (`general` type, empty tool name, empty `tool_result`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct ConfirmationData {
    /// `confirmation_type`, or [`GENERAL_CONFIRMATION_TYPE`] when absent.
    pub confirmation_type: String,
    /// Backend tool that proposed the action; routes the decision call.
    pub tool_name: String,
    /// Typed view of `tool_result`.
    pub details: ConfirmationDetails,
    raw: Value,
}

impl ConfirmationData {
    /// The payload exactly as received from the server.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl From<Value> for ConfirmationData {
    fn from(raw: Value) -> Self {
        let confirmation_type = raw
            .get("confirmation_type")
            .and_then(Value::as_str)
            .filter(|kind| !kind.is_empty())
            .unwrap_or(GENERAL_CONFIRMATION_TYPE)
            .to_string();

        let tool_name = raw
            .get("tool_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let tool_result = raw
            .get("tool_result")
            .filter(|value| !value.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));

        let details = ConfirmationDetails::parse(&confirmation_type, tool_result);

        Self {
            confirmation_type,
            tool_name,
            details,
            raw,
        }
    }
}

impl From<ConfirmationData> for Value {
    fn from(data: ConfirmationData) -> Self {
        data.raw
    }
}

/// Strongly-typed details of a pending action, keyed by confirmation type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationDetails {
    TaskAssignment(TaskAssignmentDetails),
    TaskReassignment(TaskReassignmentDetails),
    /// Any other type, or a known type whose fields did not decode.
    Generic { kind: String, fields: Value },
}

impl ConfirmationDetails {
    /// Decodes `tool_result` according to `kind`.
    pub fn parse(kind: &str, tool_result: Value) -> Self {
        let parsed = match kind {
            TASK_ASSIGNMENT_TYPE => {
                serde_json::from_value::<TaskAssignmentDetails>(tool_result.clone())
                    .map(Self::TaskAssignment)
            }
            TASK_REASSIGNMENT_TYPE => {
                serde_json::from_value::<TaskReassignmentDetails>(tool_result.clone())
                    .map(Self::TaskReassignment)
            }
            _ => {
                return Self::Generic {
                    kind: kind.to_string(),
                    fields: tool_result,
                };
            }
        };

        parsed.unwrap_or_else(|err| {
            tracing::debug!(
                target: "tella::confirmation",
                "tool_result of '{}' did not decode ({}), using generic details",
                kind,
                err
            );
            Self::Generic {
                kind: kind.to_string(),
                fields: tool_result,
            }
        })
    }

    /// The confirmation type these details were decoded for.
    pub fn kind(&self) -> &str {
        match self {
            Self::TaskAssignment(_) => TASK_ASSIGNMENT_TYPE,
            Self::TaskReassignment(_) => TASK_REASSIGNMENT_TYPE,
            Self::Generic { kind, .. } => kind,
        }
    }
}

/// `tool_result` of an `assign_task_to_employee` proposal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskAssignmentDetails {
    #[serde(default)]
    pub task_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_to: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternatives: Vec<AlternativeCandidate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub potential_risks: Vec<String>,
}

/// `tool_result` of a `reassign_task_to_employee` proposal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskReassignmentDetails {
    #[serde(default)]
    pub task_title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_assignee: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cascade_risks: Vec<String>,
}

/// Another employee the assistant considered for a task.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlternativeCandidate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}
