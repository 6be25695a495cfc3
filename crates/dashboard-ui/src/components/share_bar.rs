use crate::themes::Theme;
use dashboard_core::formatting;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Configuration controlling visual appearance of a share bar.
pub struct ShareBarConfig {
    /// Width in terminal columns of the bar portion.
    pub width: u16,
    /// Display columns reserved for the category label.
    pub label_width: usize,
    /// Character used for the category's share.
    pub filled_char: char,
    /// Character used for the remainder.
    pub empty_char: char,
}

impl Default for ShareBarConfig {
    fn default() -> Self {
        Self {
            width: 40,
            label_width: 18,
            filled_char: '\u{2588}', // █  FULL BLOCK
            empty_char: '\u{2591}',  // ░  LIGHT SHADE
        }
    }
}

/// Truncate or pad `label` to exactly `width` display columns.
///
/// Wide characters count double; a truncated label ends in `…`.
pub fn fit_label(label: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let label_width = UnicodeWidthStr::width(label);
    if label_width <= width {
        return format!("{}{}", label, " ".repeat(width - label_width));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

// ── ShareBar ─────────────────────────────────────────────────────────────────

/// One category's slice of a part-to-whole view, drawn as a horizontal bar.
///
/// Renders as `label  ████░░░░  62.5% (5)`; the fill is coloured with the
/// category's series colour so neighbouring rows stay distinguishable.
pub struct ShareBar<'a> {
    pub label: &'a str,
    pub value: f64,
    /// Share of the whole, clamped to `[0.0, 100.0]`.
    pub percentage: f64,
    /// Position of the category in its view; selects the series colour.
    pub index: usize,
    pub theme: &'a Theme,
    pub config: ShareBarConfig,
}

impl<'a> ShareBar<'a> {
    /// Construct a new bar, computing the share of `total` automatically.
    pub fn new(label: &'a str, value: f64, total: f64, index: usize, theme: &'a Theme) -> Self {
        let percentage = formatting::percentage(value, total, 1).clamp(0.0, 100.0);
        Self {
            label,
            value,
            percentage,
            index,
            theme,
            config: ShareBarConfig::default(),
        }
    }

    /// Render the bar as a [`Line`].
    pub fn to_line(&self) -> Line<'a> {
        let filled = ((self.percentage / 100.0) * self.config.width as f64).round() as u16;
        let filled = filled.min(self.config.width);
        let empty = self.config.width.saturating_sub(filled);

        let filled_str: String =
            std::iter::repeat_n(self.config.filled_char, filled as usize).collect();
        let empty_str: String =
            std::iter::repeat_n(self.config.empty_char, empty as usize).collect();

        Line::from(vec![
            Span::styled(
                fit_label(self.label, self.config.label_width),
                self.theme.label,
            ),
            Span::raw(" "),
            Span::styled(filled_str, self.theme.series_style(self.index)),
            Span::styled(empty_str, self.theme.share_empty),
            Span::styled(format!(" {:>5.1}%", self.percentage), self.theme.value),
            Span::styled(
                format!(" ({})", formatting::format_engagements(self.value)),
                self.theme.dim,
            ),
        ])
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
