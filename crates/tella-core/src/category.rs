//! Example prompt categories shown before the first message.

use crate::locale::Locale;
use crate::serde_util::null_as_default;
use serde::{Deserialize, Serialize};

/// A group of example prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCategory {
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompts: Vec<String>,
    /// Server-side category type, e.g. `sprint_planning`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl PromptCategory {
    pub fn new(category: impl Into<String>, prompts: &[&str]) -> Self {
        Self {
            category: category.into(),
            prompts: prompts.iter().map(|p| p.to_string()).collect(),
            kind: None,
        }
    }

    /// Short description of the category type, if the type is known.
    pub fn kind_label(&self, locale: Locale) -> Option<&'static str> {
        let kind = self.kind.as_deref()?;
        let label = match (locale, kind) {
            (Locale::Turkish, "project_analysis") => "Proje bazlı analiz",
            (Locale::Turkish, "sprint_planning") => "Sprint planlama ve revizyon",
            (Locale::Turkish, "task_management") => "Görev atama ve yönetimi",
            (Locale::Turkish, "emergency_management") => "Acil durum yönetimi",
            (Locale::Turkish, "resource_analysis") => "Kaynak ve performans analizi",
            (Locale::English, "project_analysis") => "Project-level analysis",
            (Locale::English, "sprint_planning") => "Sprint planning and revision",
            (Locale::English, "task_management") => "Task assignment and management",
            (Locale::English, "emergency_management") => "Emergency management",
            (Locale::English, "resource_analysis") => "Resource and performance analysis",
            _ => return None,
        };
        Some(label)
    }
}

/// Categories shown when the server's list cannot be fetched.
pub fn fallback_categories(locale: Locale) -> Vec<PromptCategory> {
    match locale {
        Locale::Turkish => vec![
            PromptCategory::new(
                "Acil Durum Yönetimi",
                &[
                    "Mert Koç acil durumu var, 5 gün çalışamayacak. Görevlerini yeniden ata.",
                    "Ayşe Yılmaz izne çıktı, görevlerini başkasına ver.",
                ],
            ),
            PromptCategory::new(
                "Sprint Planlama",
                &[
                    "Bu proje için 2 haftalık sprint planı oluştur",
                    "Sprint planını revize et, 3 gün gecikme var",
                    "Sprint sağlık durumunu analiz et",
                ],
            ),
            PromptCategory::new(
                "Gecikme Tahmini",
                &[
                    "Proje zamanında biter mi?",
                    "Hangi görevler gecikme riski taşıyor?",
                    "Bu projenin risk analizi nedir?",
                ],
            ),
            PromptCategory::new(
                "Görev Yönetimi",
                &[
                    "Hangi çalışanlar müsait?",
                    "Bu görevi en uygun kişiye ata",
                    "Tüm görevleri listele",
                ],
            ),
        ],
        Locale::English => vec![
            PromptCategory::new(
                "Emergency Management",
                &[
                    "Mert Koç has an emergency and will be out for 5 days. Reassign his tasks.",
                    "Ayşe Yılmaz is on leave, hand her tasks to someone else.",
                ],
            ),
            PromptCategory::new(
                "Sprint Planning",
                &[
                    "Create a 2-week sprint plan for this project",
                    "Revise the sprint plan, we are 3 days behind",
                    "Analyze sprint health",
                ],
            ),
            PromptCategory::new(
                "Delay Forecasting",
                &[
                    "Will the project finish on time?",
                    "Which tasks are at risk of delay?",
                    "What is the risk analysis for this project?",
                ],
            ),
            PromptCategory::new(
                "Task Management",
                &[
                    "Which employees are available?",
                    "Assign this task to the best-fitting person",
                    "List all tasks",
                ],
            ),
        ],
    }
}

/// Looks up the `index`-th prompt (0-based) across all categories in order.
pub fn example_prompt(categories: &[PromptCategory], index: usize) -> Option<&str> {
    categories
        .iter()
        .flat_map(|category| category.prompts.iter())
        .nth(index)
        .map(String::as_str)
}
