//! Report exporters: chart specifications (JSON), Markdown, plain text and a
//! canonical CSV rendering of cleaned records.

use std::path::Path;

use dashboard_core::error::DashboardError;
use dashboard_core::formatting::{format_engagements, format_number, format_share};
use dashboard_core::models::{ChartKind, Measure, NormalizedRecord, ViewKind};
use serde::Serialize;

use crate::analysis::{AnalysisMetadata, DashboardReport, ViewPanel};
use crate::insights::CONCLUDING_RECOMMENDATIONS;

/// Column headers written by [`records_to_csv`].
pub const CSV_HEADER: [&str; 6] = [
    "Date",
    "Platform",
    "Sentiment",
    "Location",
    "Engagements",
    "Media Type",
];

// ── Chart specifications ──────────────────────────────────────────────────────

/// Everything an external chart library needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ViewKind,
    pub title: String,
    pub chart: ChartKind,
    pub dimension_label: String,
    pub value_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Insight sentences shown beneath the chart.
    pub captions: Vec<String>,
}

impl From<&ViewPanel> for ChartSpec {
    fn from(panel: &ViewPanel) -> Self {
        let kind = panel.kind();
        Self {
            kind,
            title: kind.title().to_string(),
            chart: kind.chart(),
            dimension_label: kind.dimension_label().to_string(),
            value_label: kind.value_label().to_string(),
            labels: panel.view.rows.iter().map(|r| r.label.clone()).collect(),
            values: panel.view.values(),
            captions: panel.insights.lines.clone(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    metadata: &'a AnalysisMetadata,
    total_engagements: f64,
    charts: Vec<ChartSpec>,
    concluding_recommendations: &'a [&'static str],
}

/// One [`ChartSpec`] per panel, in dashboard order.
pub fn chart_specs(report: &DashboardReport) -> Vec<ChartSpec> {
    report.panels.iter().map(ChartSpec::from).collect()
}

/// Pretty-printed JSON document with metadata and chart specifications.
pub fn to_json(report: &DashboardReport) -> Result<String, DashboardError> {
    let doc = JsonReport {
        source: &report.source,
        metadata: &report.metadata,
        total_engagements: report.totals.engagements,
        charts: chart_specs(report),
        concluding_recommendations: if report.is_empty() {
            &[]
        } else {
            &CONCLUDING_RECOMMENDATIONS[..]
        },
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

// ── Markdown ──────────────────────────────────────────────────────────────────

/// Generate a complete Markdown report.
pub fn to_markdown(report: &DashboardReport) -> String {
    let mut output = String::new();

    output.push_str("# Media Intelligence Dashboard\n\n");
    output.push_str(&markdown_summary(report));

    if report.is_empty() {
        output.push_str("No valid rows remained after cleaning, so no charts were produced.\n");
        return output;
    }

    for panel in &report.panels {
        output.push_str(&markdown_panel(panel));
    }

    output.push_str("## Concluding Recommendations\n\n");
    for (i, text) in CONCLUDING_RECOMMENDATIONS.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, text));
    }
    output.push('\n');

    output
}

fn markdown_summary(report: &DashboardReport) -> String {
    let meta = &report.metadata;
    let mut section = String::new();
    section.push_str("## Summary\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", report.source));
    section.push_str(&format!("- **Generated:** {}\n", meta.generated_at));
    section.push_str(&format!("- **Rows Read:** {}\n", meta.rows_read));
    section.push_str(&format!("- **Valid Rows:** {}\n", meta.rows_valid));
    if meta.rows_dropped > 0 {
        section.push_str(&format!(
            "- **Dropped (unparseable date):** {}\n",
            meta.rows_dropped
        ));
    }
    if meta.engagements_defaulted > 0 {
        section.push_str(&format!(
            "- **Engagements Defaulted to 0:** {}\n",
            meta.engagements_defaulted
        ));
    }
    section.push_str(&format!(
        "- **Total Engagements:** {}\n\n",
        format_engagements(report.totals.engagements)
    ));
    section
}

fn markdown_panel(panel: &ViewPanel) -> String {
    let kind = panel.kind();
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", kind.title()));
    section.push_str(&format!(
        "| {} | {} |\n|---|---:|\n",
        kind.dimension_label(),
        kind.value_label()
    ));
    let total = panel.view.total();
    for row in &panel.view.rows {
        section.push_str(&format!(
            "| {} | {} |\n",
            row.label.replace('|', "\\|"),
            display_value(kind, row.value, total)
        ));
    }
    section.push('\n');

    for line in panel.insights.iter() {
        section.push_str(&format!("- {}\n", line));
    }
    section.push('\n');

    section
}

// ── Plain text ────────────────────────────────────────────────────────────────

/// Terminal-friendly report for `--output text` and pipes.
pub fn to_text(report: &DashboardReport) -> String {
    let meta = &report.metadata;
    let mut out = String::new();

    out.push_str("MEDIA INTELLIGENCE DASHBOARD\n");
    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!(
        "Rows: {} read, {} valid, {} dropped | Total engagements: {}\n",
        meta.rows_read,
        meta.rows_valid,
        meta.rows_dropped,
        format_engagements(report.totals.engagements)
    ));

    if report.is_empty() {
        out.push_str("\nNo valid rows remained after cleaning.\n");
        return out;
    }

    for (i, panel) in report.panels.iter().enumerate() {
        let kind = panel.kind();
        out.push_str(&format!("\n[{}] {}\n", i + 1, kind.title()));

        let width = panel
            .view
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0);
        let total = panel.view.total();
        for row in &panel.view.rows {
            out.push_str(&format!(
                "    {:<width$}  {}\n",
                row.label,
                display_value(kind, row.value, total),
                width = width
            ));
        }
        out.push('\n');
        for line in panel.insights.iter() {
            out.push_str(&format!("  * {}\n", line));
        }
    }

    out.push_str("\nCONCLUDING RECOMMENDATIONS\n");
    for (i, text) in CONCLUDING_RECOMMENDATIONS.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, text));
    }
    out
}

/// Counts carry their share, sums are shown as whole engagements.
fn display_value(kind: ViewKind, value: f64, total: f64) -> String {
    match kind.measure() {
        Measure::Count => format!(
            "{} ({}%)",
            format_number(value, 0),
            format_share(value, total)
        ),
        Measure::Sum => format_engagements(value),
    }
}

// ── Export format ─────────────────────────────────────────────────────────────

/// File format for `--export`, chosen from the target's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Markdown,
    Json,
}

impl ExportFormat {
    /// `.md`/`.markdown` → Markdown, `.json` → JSON, anything else → text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("md") | Some("markdown") => ExportFormat::Markdown,
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Text,
        }
    }
}

/// Render `report` in `format`.
pub fn render(report: &DashboardReport, format: ExportFormat) -> Result<String, DashboardError> {
    match format {
        ExportFormat::Text => Ok(to_text(report)),
        ExportFormat::Markdown => Ok(to_markdown(report)),
        ExportFormat::Json => to_json(report),
    }
}

/// Render `report` for `path` and write it there.
pub fn write_report(report: &DashboardReport, path: &Path) -> Result<(), DashboardError> {
    let body = render(report, ExportFormat::from_path(path))?;
    std::fs::write(path, body)?;
    Ok(())
}

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Serialize cleaned records back to CSV with the canonical headers.
///
/// Cleaning the output again yields the same records.
pub fn records_to_csv(records: &[NormalizedRecord]) -> Result<String, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(std::io::Error::from)?;
    for record in records {
        writer
            .write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.platform.clone(),
                record.sentiment.clone(),
                record.location.clone(),
                engagement_cell(record.engagements),
                record.media_type.clone(),
            ])
            .map_err(std::io::Error::from)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| DashboardError::Io(std::io::Error::other(e)))
}

fn engagement_cell(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::reader::{clean, CleaningOptions};

    const SAMPLE: &str = "\
Date,Platform,Sentiment,Location,Engagements,Media Type
2024-01-01,TV,Positive,NY,10,Video
2024-01-01,TV,Negative,NY,5,Video
2024-01-02,Radio,Neutral,LA,2.5,Audio
bad-date,Radio,Positive,LA,3,Audio
";

    fn report() -> DashboardReport {
        analyze("sample.csv", SAMPLE.as_bytes(), &AnalysisOptions::default()).unwrap()
    }

    fn empty_report() -> DashboardReport {
        let input = "Date,Platform,Sentiment,Location,Engagements,Media Type\n";
        analyze("empty.csv", input.as_bytes(), &AnalysisOptions::default()).unwrap()
    }

    // ── chart specs / JSON ────────────────────────────────────────────────────

    #[test]
    fn test_chart_specs_match_panels() {
        let specs = chart_specs(&report());
        assert_eq!(specs.len(), 5);
        let platform = &specs[2];
        assert_eq!(platform.kind, ViewKind::Platform);
        assert_eq!(platform.chart, ChartKind::Bar);
        assert_eq!(platform.labels, vec!["Radio", "TV"]);
        assert_eq!(platform.values, vec![2.5, 15.0]);
        assert!(!platform.captions.is_empty());
    }

    #[test]
    fn test_to_json_shape() {
        let json = to_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "sample.csv");
        assert_eq!(value["charts"].as_array().unwrap().len(), 5);
        assert_eq!(value["charts"][0]["kind"], "sentiment");
        assert_eq!(value["charts"][1]["chart"], "line");
        assert_eq!(value["metadata"]["rows_valid"], 3);
        assert_eq!(value["concluding_recommendations"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_to_json_empty_report() {
        let json = to_json(&empty_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["charts"].as_array().unwrap().is_empty());
        assert!(value["concluding_recommendations"].as_array().unwrap().is_empty());
    }

    // ── Markdown / text ───────────────────────────────────────────────────────

    #[test]
    fn test_to_markdown_sections() {
        let md = to_markdown(&report());
        assert!(md.starts_with("# Media Intelligence Dashboard"));
        assert!(md.contains("- **Dropped (unparseable date):** 1"));
        assert!(md.contains("## Sentiment Breakdown"));
        assert!(md.contains("| Platform | Total Engagements |"));
        assert!(md.contains("| TV | 15 |"));
        assert!(md.contains("## Concluding Recommendations"));
        assert!(md.contains("5. Continuous Monitoring & Adaptation"));
    }

    #[test]
    fn test_to_markdown_empty_report() {
        let md = to_markdown(&empty_report());
        assert!(md.contains("No valid rows remained after cleaning"));
        assert!(!md.contains("## Concluding Recommendations"));
    }

    #[test]
    fn test_to_text_lists_views() {
        let text = to_text(&report());
        assert!(text.starts_with("MEDIA INTELLIGENCE DASHBOARD"));
        assert!(text.contains("Rows: 4 read, 3 valid, 1 dropped | Total engagements: 18"));
        assert!(text.contains("[5] Top 5 Locations by Engagements"));
        assert!(text.contains("Positive"));
        assert!(text.contains("CONCLUDING RECOMMENDATIONS"));
    }

    // ── export format ─────────────────────────────────────────────────────────

    #[test]
    fn test_export_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("r.md")), ExportFormat::Markdown);
        assert_eq!(ExportFormat::from_path(Path::new("r.JSON")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("r.txt")), ExportFormat::Text);
        assert_eq!(ExportFormat::from_path(Path::new("report")), ExportFormat::Text);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.md");
        write_report(&report(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Media Intelligence Dashboard"));
    }

    // ── CSV ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_records_to_csv_canonical_header() {
        let ds = clean(SAMPLE.as_bytes(), &CleaningOptions::default()).unwrap();
        let csv = records_to_csv(&ds.records).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Platform,Sentiment,Location,Engagements,Media Type")
        );
        assert_eq!(lines.next(), Some("2024-01-01,TV,Positive,NY,10,Video"));
        assert_eq!(lines.nth(1), Some("2024-01-02,Radio,Neutral,LA,2.5,Audio"));
    }

    #[test]
    fn test_records_to_csv_is_stable_under_cleaning() {
        let first = clean(SAMPLE.as_bytes(), &CleaningOptions::default()).unwrap();
        let csv = records_to_csv(&first.records).unwrap();
        let second = clean(csv.as_bytes(), &CleaningOptions::default()).unwrap();
        assert_eq!(first.records, second.records);
    }
}
