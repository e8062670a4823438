//! Confirmation flow through the domain types only, from wire JSON to rows.

use serde_json::json;
use tella_core::Locale;
use tella_core::api::ChatReply;
use tella_core::confirmation::{
    ConfirmationView, Decision, DecisionBlocked, PendingConfirmation, ViewRow,
};
use tella_core::session::{ChatSession, MessageRole, SessionId};

fn assignment_reply() -> ChatReply {
    serde_json::from_value(json!({
        "response": "**Görev Ataması Önerisi**\n- Ali uygun görünüyor",
        "requires_confirmation": true,
        "confirmation_data": {
            "confirmation_type": "task_assignment",
            "tool_name": "assign_task",
            "tool_args": {"task_id": 7},
            "tool_result": {
                "task_title": "API entegrasyonu",
                "assigned_to": "Ali",
                "confidence_score": 0.805,
                "reason": "Backend deneyimi",
                "alternatives": [
                    {"name": "Ayşe", "reason": "müsait"},
                    {"name": "Mert", "reason": "yakın görev"},
                    {"name": "Zeynep", "reason": "deneyimli"},
                    {"name": "Can", "reason": "yedek"}
                ],
                "potential_risks": ["Ali'nin iş yükü yüksek"]
            }
        }
    }))
    .unwrap()
}

#[test]
fn test_assignment_reply_to_dialog_rows() {
    let mut session = ChatSession::new(SessionId::from("session_flow"));
    let question = session.append_user("Bu görevi en uygun kişiye ata");
    let reply = assignment_reply();
    let data = reply.confirmation().cloned().unwrap();
    let source = session
        .append_assistant(reply.response.clone(), Some(data.clone()), Some(question))
        .id;
    session.open_confirmation(PendingConfirmation::new(&data, "Aksiyon Onayı", source));

    let pending = session.pending_confirmation().unwrap();
    let rows = ConfirmationView::from_pending(pending).rows(Locale::Turkish);

    assert_eq!(rows[0], ViewRow::Heading("Görev Ataması".to_string()));
    assert_eq!(rows[1], ViewRow::Subtitle("API entegrasyonu".to_string()));
    assert!(rows.contains(&ViewRow::Confidence {
        label: "Güven Skoru".to_string(),
        value: "%81".to_string(),
        high: true,
    }));
    let candidates = rows
        .iter()
        .filter(|row| matches!(row, ViewRow::Candidate { .. }))
        .count();
    assert_eq!(candidates, 3);
    assert!(rows.contains(&ViewRow::Risk("Ali'nin iş yükü yüksek".to_string())));
}

#[test]
fn test_decision_echoes_raw_payload_then_clears() {
    let mut session = ChatSession::start();
    let question = session.append_user("Bu görevi en uygun kişiye ata");
    let reply = assignment_reply();
    let data = reply.confirmation().cloned().unwrap();
    let source = session
        .append_assistant(reply.response.clone(), Some(data.clone()), Some(question))
        .id;
    session.open_confirmation(PendingConfirmation::new(&data, "Aksiyon Onayı", source));

    let request = session.begin_decision(Decision::Reject).unwrap();
    assert_eq!(request.session_id, session.id().as_str());
    assert_eq!(request.action_type, "assign_task");
    assert!(!request.confirmed);
    assert_eq!(request.action_data["tool_args"]["task_id"], json!(7));

    assert_eq!(
        session.begin_decision(Decision::Approve),
        Err(DecisionBlocked::AlreadySubmitting)
    );

    let finished = session.finish_decision(source).unwrap();
    session.append_assistant("Atama iptal edildi", None, Some(finished.source));

    assert!(session.confirmation().is_idle());
    let roles: Vec<MessageRole> = session.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![MessageRole::User, MessageRole::Assistant, MessageRole::Assistant]
    );
}
