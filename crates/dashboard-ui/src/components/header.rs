use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Width of the separator beneath the title.
const SEPARATOR_WIDTH: usize = 60;

/// Dashboard header rendering four lines:
///
/// 1. Application title with sparkle decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Upload information in `[ source | N valid rows ]` format.
/// 4. An empty line.
pub struct Header<'a> {
    /// Name of the uploaded file, or `None` before the first upload.
    pub source: Option<&'a str>,
    /// Rows that survived cleaning.
    pub valid_rows: usize,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(source: Option<&'a str>, valid_rows: usize, theme: &'a Theme) -> Self {
        Self {
            source,
            valid_rows,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let rows = if self.valid_rows == 1 {
            "1 valid row".to_string()
        } else {
            format!(
                "{} valid rows",
                dashboard_core::formatting::format_number(self.valid_rows as f64, 0)
            )
        };

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(" MEDIA INTELLIGENCE DASHBOARD ", self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.source.unwrap_or("no file"), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(rows, self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new(Some("media.csv"), 2, &theme).to_lines();
        assert_eq!(lines.len(), 4, "header must produce exactly 4 lines");
    }

    #[test]
    fn test_header_title_line_content() {
        let theme = Theme::dark();
        let lines = Header::new(Some("media.csv"), 2, &theme).to_lines();
        let title = text(&lines[0]);
        assert!(title.contains("MEDIA INTELLIGENCE DASHBOARD"), "got: {title}");
        assert!(title.contains(SPARKLES), "got: {title}");
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new(None, 0, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_info_line() {
        let theme = Theme::dark();
        let lines = Header::new(Some("Media Export.csv"), 12_345, &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ Media Export.csv | 12,345 valid rows ]");
        assert_eq!(lines[2].spans.len(), 5);
    }

    #[test]
    fn test_header_info_line_singular_and_missing_source() {
        let theme = Theme::dark();
        let lines = Header::new(None, 1, &theme).to_lines();
        assert_eq!(text(&lines[2]), "[ no file | 1 valid row ]");
    }

    #[test]
    fn test_header_empty_fourth_line() {
        let theme = Theme::dark();
        let lines = Header::new(None, 0, &theme).to_lines();
        assert!(text(&lines[3]).is_empty());
    }
}
