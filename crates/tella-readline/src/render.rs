//! Terminal rendering of messages, confirmation dialogs and example prompts.
//!
//! Every function returns the lines to print so the layout can be tested
//! with colors disabled.

use colored::Colorize;
use tella_core::Locale;
use tella_core::api::ChatHistory;
use tella_core::category::PromptCategory;
use tella_core::confirmation::{ConfirmationView, PendingConfirmation, ViewRow};
use tella_core::markup::{DisplayBlock, inline_spans, parse_blocks};
use tella_core::session::{ChatMessage, MessageRole};

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Renders `**bold**` runs inside a line.
fn styled_inline(line: &str) -> String {
    inline_spans(line)
        .into_iter()
        .map(|span| {
            if span.bold {
                span.text.bold().to_string()
            } else {
                span.text
            }
        })
        .collect()
}

pub fn assistant_lines(content: &str) -> Vec<String> {
    parse_blocks(content)
        .into_iter()
        .flat_map(|block| match block {
            DisplayBlock::Heading(text) => vec![text.bright_white().bold().to_string()],
            DisplayBlock::Bullet(text) => vec![format!("  • {}", styled_inline(&text))],
            DisplayBlock::SubBullet(text) => vec![format!("      ◦ {}", styled_inline(&text))],
            DisplayBlock::Paragraph(text) => text
                .lines()
                .map(|line| styled_inline(line).bright_blue().to_string())
                .collect(),
        })
        .collect()
}

pub fn message_lines(message: &ChatMessage, locale: Locale) -> Vec<String> {
    match message.role {
        MessageRole::User => vec![format!("> {}", message.content).green().to_string()],
        MessageRole::Assistant => {
            let mut lines = assistant_lines(&message.content);
            if message.requires_confirmation {
                lines.push(
                    format!("[{}]", locale.labels().approval_needed_badge)
                        .bright_yellow()
                        .to_string(),
                );
            }
            lines
        }
    }
}

/// Error bubbles are plain text, shown in red.
pub fn error_lines(message: &ChatMessage) -> Vec<String> {
    message
        .content
        .lines()
        .map(|line| line.red().to_string())
        .collect()
}

/// The follow-up to a decision, with any risks the server attached.
pub fn decision_lines(
    message: &ChatMessage,
    succeeded: bool,
    risks: &[String],
    locale: Locale,
) -> Vec<String> {
    let mut lines = if succeeded {
        message_lines(message, locale)
    } else {
        error_lines(message)
    };
    if !risks.is_empty() {
        lines.push(
            locale
                .labels()
                .potential_risks
                .bright_black()
                .underline()
                .to_string(),
        );
        lines.extend(risks.iter().map(|risk| format!("  ! {risk}").red().to_string()));
    }
    lines
}

pub fn confirmation_lines(pending: &PendingConfirmation, locale: Locale) -> Vec<String> {
    let labels = locale.labels();
    let mut lines = vec![format!("── {} ──", labels.confirmation_required)
        .bright_yellow()
        .bold()
        .to_string()];

    for row in ConfirmationView::from_pending(pending).rows(locale) {
        let line = match row {
            ViewRow::Heading(text) => text.yellow().bold().to_string(),
            ViewRow::Subtitle(text) => text.bright_white().to_string(),
            ViewRow::Field { label, value } => format!("{}: {}", label.bright_black(), value),
            ViewRow::Confidence { label, value, high } => {
                let value = if high {
                    value.bright_green().bold()
                } else {
                    value.yellow()
                };
                format!("{}: {}", label.bright_black(), value)
            }
            ViewRow::Section(text) => text.bright_black().underline().to_string(),
            ViewRow::Candidate { name, reason } => {
                format!("  - {}: {}", name.bold(), reason)
            }
            ViewRow::Risk(text) => format!("  ! {}", text).red().to_string(),
            ViewRow::Preformatted(text) => text
                .lines()
                .map(|line| format!("    {line}"))
                .collect::<Vec<_>>()
                .join("\n")
                .bright_black()
                .to_string(),
        };
        lines.push(line);
    }

    lines.push(
        format!(
            "/approve ({})  /reject ({})  /dismiss",
            labels.approve, labels.reject
        )
        .bright_black()
        .to_string(),
    );
    lines
}

pub fn categories_lines(categories: &[PromptCategory], locale: Locale) -> Vec<String> {
    let labels = locale.labels();
    let mut lines = vec![
        labels.examples_heading.bright_magenta().bold().to_string(),
        labels.examples_hint.bright_black().to_string(),
    ];

    let mut number = 0;
    for category in categories {
        lines.push(String::new());
        lines.push(category.category.bright_white().bold().to_string());
        if let Some(kind) = category.kind_label(locale) {
            lines.push(kind.bright_black().to_string());
        }
        for prompt in &category.prompts {
            number += 1;
            lines.push(format!("  {:>2}. {}", number, prompt));
        }
    }
    lines
}

pub fn history_lines(history: &ChatHistory) -> Vec<String> {
    if history.messages.is_empty() {
        return vec!["(empty)".bright_black().to_string()];
    }

    history
        .messages
        .iter()
        .map(|entry| {
            let content = entry.content.as_deref().unwrap_or("");
            format!("[{}] {}", entry.role, content)
                .bright_black()
                .to_string()
        })
        .collect()
}

pub fn help_lines() -> Vec<String> {
    [
        "/examples          show example prompts",
        "/example <n>       send example prompt n",
        "/approve           approve the pending action",
        "/reject            reject the pending action",
        "/dismiss           close the dialog without deciding",
        "/pending           show the pending action again",
        "/transcript        reprint the conversation",
        "/history           show the server-side conversation log",
        "/forget            ask the server to forget this conversation",
        "quit | exit        leave",
    ]
    .iter()
    .map(|line| line.bright_black().to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tella_core::confirmation::ConfirmationData;
    use tella_core::session::ChatSession;

    fn no_colors() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_assistant_markup() {
        no_colors();
        let lines = assistant_lines("**Sprint Durumu**\n- **Tamamlanan:** 12\n   Backend: 7");
        assert_eq!(
            lines,
            vec!["Sprint Durumu", "  • Tamamlanan: 12", "      ◦ Backend: 7"]
        );
    }

    #[test]
    fn test_reassignment_dialog() {
        no_colors();
        let mut session = ChatSession::start();
        let data = ConfirmationData::from(serde_json::json!({
            "confirmation_type": "task_reassignment",
            "tool_name": "reassign_task",
            "tool_result": {
                "new_assignee": "Ayşe",
                "confidence_score": 0.9,
                "reason": "uygun",
                "cascade_risks": ["Sprint gecikebilir"]
            }
        }));
        let source = session.append_assistant("Onay gerekli", Some(data.clone()), None).id;
        let pending = PendingConfirmation::new(&data, "Action Approval", source);

        let lines = confirmation_lines(&pending, Locale::English);
        assert!(lines.contains(&"New Assignee: Ayşe".to_string()));
        assert!(lines.contains(&"Confidence Score: 90%".to_string()));
        assert!(lines.contains(&"Reason: uygun".to_string()));
        assert!(lines.contains(&"  ! Sprint gecikebilir".to_string()));
    }

    #[test]
    fn test_failed_decision_lists_risks() {
        no_colors();
        let mut session = ChatSession::start();
        let message = session.append_assistant("Atama yapılamadı", None, None).clone();

        let lines = decision_lines(
            &message,
            false,
            &["Ayşe izinde".to_string()],
            Locale::English,
        );
        assert_eq!(
            lines,
            vec!["Atama yapılamadı", "Potential Risks", "  ! Ayşe izinde"]
        );
    }

    #[test]
    fn test_categories_are_numbered_across_groups() {
        no_colors();
        let categories = vec![
            PromptCategory::new("A", &["birinci", "ikinci"]),
            PromptCategory::new("B", &["üçüncü"]),
        ];
        let lines = categories_lines(&categories, Locale::Turkish);
        assert!(lines.contains(&"   3. üçüncü".to_string()));
    }
}
