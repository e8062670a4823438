//! Lightweight markup used in assistant replies.
//!
//! The assistant formats structured answers line by line:
//!
//! ```text
//! **Sprint Durumu**
//! - Tamamlanan görevler: 12
//!    Backend: 7
//! Genel ilerleme iyi.
//! ```
//!
//! Lines are classified only when the text contains a `**` marker at all;
//! plain replies stay a single paragraph with their line breaks intact.

/// A display block produced from assistant text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    /// A whole line wrapped in `**`.
    Heading(String),
    /// A line starting with `- `.
    Bullet(String),
    /// A line indented by at least three spaces.
    SubBullet(String),
    /// Any other non-blank line (or the whole text when unformatted).
    Paragraph(String),
}

const BOLD_MARKER: &str = "**";
const BULLET_PREFIX: &str = "- ";
const SUB_BULLET_INDENT: &str = "   ";

/// Parses assistant text into display blocks.
pub fn parse_blocks(text: &str) -> Vec<DisplayBlock> {
    if !text.contains(BOLD_MARKER) {
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![DisplayBlock::Paragraph(text.to_string())];
    }

    text.lines().filter_map(classify_line).collect()
}

fn classify_line(line: &str) -> Option<DisplayBlock> {
    if line.starts_with(BOLD_MARKER) && line.ends_with(BOLD_MARKER) {
        let title = line.replace(BOLD_MARKER, "");
        return (!title.trim().is_empty()).then_some(DisplayBlock::Heading(title));
    }

    if let Some(item) = line.strip_prefix(BULLET_PREFIX) {
        return Some(DisplayBlock::Bullet(item.to_string()));
    }

    if line.starts_with(SUB_BULLET_INDENT) {
        let item = line.trim();
        return (!item.is_empty()).then(|| DisplayBlock::SubBullet(item.to_string()));
    }

    (!line.trim().is_empty()).then(|| DisplayBlock::Paragraph(line.to_string()))
}

/// A run of text inside a line, bold or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    pub text: String,
    pub bold: bool,
}

/// Splits a line on `**` pairs, e.g. `**Görev:** API` → bold `Görev:`, plain ` API`.
///
/// An unmatched trailing `**` is kept as literal text.
pub fn inline_spans(line: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut rest = line;
    let mut bold = false;

    while let Some(index) = rest.find(BOLD_MARKER) {
        let (before, after) = rest.split_at(index);
        let after = &after[BOLD_MARKER.len()..];

        if !bold && !after.contains(BOLD_MARKER) {
            break;
        }
        if !before.is_empty() {
            spans.push(InlineSpan {
                text: before.to_string(),
                bold,
            });
        }
        bold = !bold;
        rest = after;
    }

    if !rest.is_empty() {
        spans.push(InlineSpan {
            text: rest.to_string(),
            bold,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_single_paragraph() {
        let text = "3 çalışan müsait\nAyrıntı için sorun.";
        assert_eq!(
            parse_blocks(text),
            vec![DisplayBlock::Paragraph(text.to_string())]
        );
        assert!(parse_blocks("  \n ").is_empty());
    }

    #[test]
    fn test_structured_reply() {
        let text = "**Sprint Durumu**\n\n- Tamamlanan: 12\n   Backend: 7\nGenel ilerleme iyi.\n";
        assert_eq!(
            parse_blocks(text),
            vec![
                DisplayBlock::Heading("Sprint Durumu".to_string()),
                DisplayBlock::Bullet("Tamamlanan: 12".to_string()),
                DisplayBlock::SubBullet("Backend: 7".to_string()),
                DisplayBlock::Paragraph("Genel ilerleme iyi.".to_string()),
            ]
        );
    }

    #[test]
    fn test_label_line_is_paragraph() {
        let blocks = parse_blocks("**Görev Ataması Önerisi**\n**Görev:** API");
        assert_eq!(
            blocks[1],
            DisplayBlock::Paragraph("**Görev:** API".to_string())
        );
    }

    #[test]
    fn test_inline_spans() {
        assert_eq!(
            inline_spans("**Görev:** API"),
            vec![
                InlineSpan {
                    text: "Görev:".to_string(),
                    bold: true
                },
                InlineSpan {
                    text: " API".to_string(),
                    bold: false
                },
            ]
        );
        assert_eq!(
            inline_spans("yarım ** işaret"),
            vec![InlineSpan {
                text: "yarım ** işaret".to_string(),
                bold: false
            }]
        );
    }
}
