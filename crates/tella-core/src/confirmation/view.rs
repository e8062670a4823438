//! Display projection of a pending confirmation.
//!
//! [`ConfirmationView`] is what the dialog shows; [`ConfirmationView::rows`]
//! flattens it into labelled rows so any front-end (terminal, tests) can
//! render it without knowing the payload shapes.

use super::payload::{AlternativeCandidate, ConfirmationDetails};
use super::state::PendingConfirmation;
use crate::locale::Locale;

/// Scores strictly above this are shown as high confidence.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;
/// The assignment dialog lists at most this many alternatives.
pub const MAX_ALTERNATIVES: usize = 3;

/// Converts a `0.0..=1.0` score to the nearest whole percent.
///
/// Halfway cases round away from zero: `0.805` gives `81`.
pub fn confidence_percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

/// Confidence score as shown in the dialog badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceBadge {
    pub percent: i64,
    pub high: bool,
}

impl ConfidenceBadge {
    pub fn from_score(score: f64) -> Self {
        Self {
            percent: confidence_percent(score),
            high: score > HIGH_CONFIDENCE_THRESHOLD,
        }
    }

    pub fn label(&self, locale: Locale) -> String {
        locale.format_percent(self.percent)
    }
}

/// What the confirmation dialog displays, one layout per confirmation type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationView {
    TaskAssignment {
        task_title: Option<String>,
        assignee: String,
        confidence: ConfidenceBadge,
        reason: String,
        alternatives: Vec<AlternativeCandidate>,
        risks: Vec<String>,
    },
    TaskReassignment {
        task_title: Option<String>,
        new_assignee: String,
        confidence: ConfidenceBadge,
        reason: String,
        cascade_risks: Vec<String>,
    },
    Generic {
        title: String,
        /// Pretty-printed JSON of the details.
        dump: String,
    },
}

impl ConfirmationView {
    pub fn from_pending(pending: &PendingConfirmation) -> Self {
        match &pending.details {
            ConfirmationDetails::TaskAssignment(details) => Self::TaskAssignment {
                task_title: details.task_title.clone(),
                assignee: details.assigned_to.clone(),
                confidence: ConfidenceBadge::from_score(details.confidence_score),
                reason: details.reason.clone(),
                alternatives: details
                    .alternatives
                    .iter()
                    .take(MAX_ALTERNATIVES)
                    .cloned()
                    .collect(),
                risks: details.potential_risks.clone(),
            },
            ConfirmationDetails::TaskReassignment(details) => Self::TaskReassignment {
                task_title: details.task_title.clone(),
                new_assignee: details.new_assignee.clone(),
                confidence: ConfidenceBadge::from_score(details.confidence_score),
                reason: details.reason.clone(),
                cascade_risks: details.cascade_risks.clone(),
            },
            ConfirmationDetails::Generic { fields, .. } => Self::Generic {
                title: pending.title.clone(),
                dump: serde_json::to_string_pretty(fields).unwrap_or_else(|_| fields.to_string()),
            },
        }
    }

    /// Flattens the view into display rows using `locale` labels.
    pub fn rows(&self, locale: Locale) -> Vec<ViewRow> {
        let labels = locale.labels();
        let mut rows = Vec::new();

        match self {
            Self::TaskAssignment {
                task_title,
                assignee,
                confidence,
                reason,
                alternatives,
                risks,
            } => {
                rows.push(ViewRow::Heading(labels.task_assignment.to_string()));
                if let Some(title) = task_title {
                    rows.push(ViewRow::Subtitle(title.clone()));
                }
                rows.push(ViewRow::field(labels.suggested_assignee, assignee));
                rows.push(ViewRow::Confidence {
                    label: labels.confidence_score.to_string(),
                    value: confidence.label(locale),
                    high: confidence.high,
                });
                rows.push(ViewRow::field(labels.reason, reason));
                if !alternatives.is_empty() {
                    rows.push(ViewRow::Section(labels.alternatives.to_string()));
                    rows.extend(alternatives.iter().map(|alt| ViewRow::Candidate {
                        name: alt.name.clone(),
                        reason: alt.reason.clone(),
                    }));
                }
                if !risks.is_empty() {
                    rows.push(ViewRow::Section(labels.potential_risks.to_string()));
                    rows.extend(risks.iter().cloned().map(ViewRow::Risk));
                }
            }
            Self::TaskReassignment {
                task_title,
                new_assignee,
                confidence,
                reason,
                cascade_risks,
            } => {
                rows.push(ViewRow::Heading(labels.task_reassignment.to_string()));
                if let Some(title) = task_title {
                    rows.push(ViewRow::Subtitle(title.clone()));
                }
                rows.push(ViewRow::field(labels.new_assignee, new_assignee));
                rows.push(ViewRow::Confidence {
                    label: labels.confidence_score.to_string(),
                    value: confidence.label(locale),
                    high: confidence.high,
                });
                rows.push(ViewRow::field(labels.reason, reason));
                if !cascade_risks.is_empty() {
                    rows.push(ViewRow::Section(labels.cascade_effects.to_string()));
                    rows.extend(cascade_risks.iter().cloned().map(ViewRow::Risk));
                }
            }
            Self::Generic { title, dump } => {
                rows.push(ViewRow::Heading(labels.action_approval.to_string()));
                rows.push(ViewRow::Subtitle(title.clone()));
                rows.push(ViewRow::Preformatted(dump.clone()));
            }
        }

        rows
    }
}

/// One line of the rendered dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRow {
    Heading(String),
    Subtitle(String),
    Field { label: String, value: String },
    Confidence { label: String, value: String, high: bool },
    Section(String),
    Candidate { name: String, reason: String },
    Risk(String),
    Preformatted(String),
}

impl ViewRow {
    fn field(label: &str, value: &str) -> Self {
        Self::Field {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::payload::ConfirmationData;
    use crate::session::MessageId;
    use serde_json::json;

    fn pending_from(value: serde_json::Value) -> PendingConfirmation {
        let data = ConfirmationData::from(value);
        PendingConfirmation::new(&data, "Action Approval", MessageId(1))
    }

    #[test]
    fn test_confidence_percent_rounding() {
        assert_eq!(confidence_percent(0.83), 83);
        assert_eq!(confidence_percent(0.805), 81);
        assert_eq!(confidence_percent(0.9), 90);
        assert_eq!(confidence_percent(0.0), 0);
        assert_eq!(confidence_percent(1.0), 100);
    }

    #[test]
    fn test_confidence_badge_threshold() {
        assert!(ConfidenceBadge::from_score(0.81).high);
        assert!(!ConfidenceBadge::from_score(0.8).high);
        assert_eq!(ConfidenceBadge::from_score(0.83).label(Locale::English), "83%");
    }

    #[test]
    fn test_reassignment_rows() {
        let pending = pending_from(json!({
            "confirmation_type": "task_reassignment",
            "tool_name": "reassign_task",
            "tool_result": {
                "new_assignee": "Ayşe",
                "confidence_score": 0.9,
                "reason": "uygun",
                "cascade_risks": ["Sprint gecikebilir"]
            }
        }));

        let rows = ConfirmationView::from_pending(&pending).rows(Locale::English);
        assert_eq!(
            rows,
            vec![
                ViewRow::Heading("Task Reassignment".to_string()),
                ViewRow::Field {
                    label: "New Assignee".to_string(),
                    value: "Ayşe".to_string()
                },
                ViewRow::Confidence {
                    label: "Confidence Score".to_string(),
                    value: "90%".to_string(),
                    high: true
                },
                ViewRow::Field {
                    label: "Reason".to_string(),
                    value: "uygun".to_string()
                },
                ViewRow::Section("Cascade Effects".to_string()),
                ViewRow::Risk("Sprint gecikebilir".to_string()),
            ]
        );
    }

    #[test]
    fn test_assignment_caps_alternatives() {
        let pending = pending_from(json!({
            "confirmation_type": "task_assignment",
            "tool_name": "assign_task_to_employee",
            "tool_result": {
                "task_title": "Ödeme API entegrasyonu",
                "assigned_to": "Mert Koç",
                "confidence_score": 0.72,
                "reason": "Backend deneyimi",
                "alternatives": [
                    {"name": "A", "reason": "1"},
                    {"name": "B", "reason": "2"},
                    {"name": "C", "reason": "3"},
                    {"name": "D", "reason": "4"}
                ],
                "potential_risks": []
            }
        }));

        let view = ConfirmationView::from_pending(&pending);
        match &view {
            ConfirmationView::TaskAssignment {
                alternatives,
                confidence,
                task_title,
                ..
            } => {
                assert_eq!(alternatives.len(), MAX_ALTERNATIVES);
                assert_eq!(alternatives[2].name, "C");
                assert_eq!(confidence.percent, 72);
                assert!(!confidence.high);
                assert_eq!(task_title.as_deref(), Some("Ödeme API entegrasyonu"));
            }
            other => panic!("expected assignment view, got {:?}", other),
        }

        let rows = view.rows(Locale::Turkish);
        assert!(rows.contains(&ViewRow::Subtitle("Ödeme API entegrasyonu".to_string())));
        assert!(!rows.contains(&ViewRow::Section("Potansiyel Riskler".to_string())));
        assert!(rows.contains(&ViewRow::Confidence {
            label: "Güven Skoru".to_string(),
            value: "%72".to_string(),
            high: false
        }));
    }

    #[test]
    fn test_generic_view_dumps_details() {
        let pending = pending_from(json!({
            "confirmation_type": "availability_update",
            "tool_result": {"employee_name": "Ayşe Yılmaz"}
        }));

        match ConfirmationView::from_pending(&pending) {
            ConfirmationView::Generic { title, dump } => {
                assert_eq!(title, "Action Approval");
                assert!(dump.contains("\"employee_name\": \"Ayşe Yılmaz\""));
            }
            other => panic!("expected generic view, got {:?}", other),
        }
    }
}
