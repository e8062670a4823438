//! User-visible strings.
//!
//! Every string that ends up in the transcript or on screen goes through
//! [`Locale`], so the chat core never hardcodes presentation text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language of the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Turkish, the language the assistant answers in.
    #[default]
    #[serde(alias = "tr")]
    Turkish,
    #[serde(alias = "en")]
    English,
}

impl Locale {
    /// Short language code (`tr`, `en`).
    pub fn code(self) -> &'static str {
        match self {
            Locale::Turkish => "tr",
            Locale::English => "en",
        }
    }

    /// Builds the assistant bubble shown when sending a message fails.
    pub fn send_failed(self, detail: Option<&str>) -> String {
        let detail = detail.unwrap_or(self.unknown_error());
        match self {
            Locale::Turkish => {
                format!("Üzgünüm, bir hata oluştu: {detail}. Lütfen tekrar deneyin.")
            }
            Locale::English => format!("Sorry, something went wrong: {detail}. Please try again."),
        }
    }

    /// Builds the assistant bubble shown when submitting a decision fails.
    pub fn decision_failed(self, detail: Option<&str>) -> String {
        let detail = detail.unwrap_or(self.unknown_error());
        match self {
            Locale::Turkish => {
                format!("Onay işlemi sırasında hata oluştu: {detail}. Lütfen tekrar deneyin.")
            }
            Locale::English => format!(
                "An error occurred while processing the confirmation: {detail}. Please try again."
            ),
        }
    }

    pub fn unknown_error(self) -> &'static str {
        match self {
            Locale::Turkish => "Bilinmeyen hata",
            Locale::English => "Unknown error",
        }
    }

    /// Formats an integer percentage the way the locale writes it.
    pub fn format_percent(self, percent: i64) -> String {
        match self {
            Locale::Turkish => format!("%{percent}"),
            Locale::English => format!("{percent}%"),
        }
    }

    /// Static labels of the confirmation dialog and chat view.
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Turkish => &TURKISH_LABELS,
            Locale::English => &ENGLISH_LABELS,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tr" | "turkish" | "tr-tr" => Ok(Locale::Turkish),
            "en" | "english" | "en-us" | "en-gb" => Ok(Locale::English),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Fixed labels for one locale.
#[derive(Debug)]
pub struct Labels {
    pub confirmation_required: &'static str,
    pub action_approval: &'static str,
    pub task_assignment: &'static str,
    pub task_reassignment: &'static str,
    pub suggested_assignee: &'static str,
    pub new_assignee: &'static str,
    pub confidence_score: &'static str,
    pub reason: &'static str,
    pub alternatives: &'static str,
    pub potential_risks: &'static str,
    pub cascade_effects: &'static str,
    pub approve: &'static str,
    pub reject: &'static str,
    pub processing: &'static str,
    pub approval_needed_badge: &'static str,
    pub assistant_title: &'static str,
    pub assistant_subtitle: &'static str,
    pub examples_heading: &'static str,
    pub examples_hint: &'static str,
    pub input_placeholder: &'static str,
    pub waiting_for_reply: &'static str,
}

static TURKISH_LABELS: Labels = Labels {
    confirmation_required: "Onay Gerekiyor",
    action_approval: "Aksiyon Onayı",
    task_assignment: "Görev Ataması",
    task_reassignment: "Görev Yeniden Ataması",
    suggested_assignee: "Önerilen Kişi",
    new_assignee: "Yeni Atanan",
    confidence_score: "Güven Skoru",
    reason: "Gerekçe",
    alternatives: "Alternatif Adaylar",
    potential_risks: "Potansiyel Riskler",
    cascade_effects: "Cascade Etkileri",
    approve: "Onayla",
    reject: "Reddet",
    processing: "İşleniyor...",
    approval_needed_badge: "Onay Gerekli",
    assistant_title: "Tella AI Asistanı",
    assistant_subtitle: "Dinamik Sprint Yönetimi",
    examples_heading: "Proje Yönetimi Asistanınız",
    examples_hint: "Aşağıdaki kategorilerden birini seçerek başlayabilirsiniz",
    input_placeholder: "Mesajınızı yazın...",
    waiting_for_reply: "Yanıt bekleniyor, lütfen bekleyin...",
};

static ENGLISH_LABELS: Labels = Labels {
    confirmation_required: "Confirmation Required",
    action_approval: "Action Approval",
    task_assignment: "Task Assignment",
    task_reassignment: "Task Reassignment",
    suggested_assignee: "Suggested Assignee",
    new_assignee: "New Assignee",
    confidence_score: "Confidence Score",
    reason: "Reason",
    alternatives: "Alternative Candidates",
    potential_risks: "Potential Risks",
    cascade_effects: "Cascade Effects",
    approve: "Approve",
    reject: "Reject",
    processing: "Processing...",
    approval_needed_badge: "Approval Needed",
    assistant_title: "Tella AI Assistant",
    assistant_subtitle: "Dynamic Sprint Management",
    examples_heading: "Your Project Management Assistant",
    examples_hint: "Pick one of the categories below to get started",
    input_placeholder: "Type your message...",
    waiting_for_reply: "Waiting for a reply, please hold on...",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_failed_embeds_detail() {
        let text = Locale::Turkish.send_failed(Some("Chat hatası: timeout"));
        assert_eq!(
            text,
            "Üzgünüm, bir hata oluştu: Chat hatası: timeout. Lütfen tekrar deneyin."
        );
    }

    #[test]
    fn test_missing_detail_uses_unknown_error() {
        assert!(Locale::Turkish.send_failed(None).contains("Bilinmeyen hata"));
        assert!(Locale::English.decision_failed(None).contains("Unknown error"));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(Locale::Turkish.format_percent(90), "%90");
        assert_eq!(Locale::English.format_percent(83), "83%");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("tr".parse::<Locale>(), Ok(Locale::Turkish));
        assert_eq!("English".parse::<Locale>(), Ok(Locale::English));
        assert!("de".parse::<Locale>().is_err());
    }
}
