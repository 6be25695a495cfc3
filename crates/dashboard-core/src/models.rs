use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Label substituted for blank category cells so every record lands in a group.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One cleaned media-monitoring record.
///
/// Produced once per upload by the reader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Calendar day the record belongs to.
    pub date: NaiveDate,
    /// Source channel, e.g. `"Twitter"` or `"Online News"`.
    pub platform: String,
    /// Sentiment category, used verbatim.
    pub sentiment: String,
    /// Free-text location label.
    pub location: String,
    /// Audience interactions attributed to the record (never negative).
    pub engagements: f64,
    /// Media format category, e.g. `"Video"`.
    pub media_type: String,
}

/// How a view reduces the records of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Number of records per group.
    Count,
    /// Sum of `engagements` per group.
    Sum,
}

/// Presentation hint handed to the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Proportional chart (pie / donut).
    Pie,
    /// Time series.
    Line,
    /// Categorical bars.
    Bar,
}

/// The five aggregate views rendered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    Sentiment,
    EngagementTrend,
    Platform,
    MediaType,
    TopLocations,
}

impl ViewKind {
    /// All views in dashboard order.
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Sentiment,
        ViewKind::EngagementTrend,
        ViewKind::Platform,
        ViewKind::MediaType,
        ViewKind::TopLocations,
    ];

    /// Chart title shown above the view.
    pub fn title(self) -> &'static str {
        match self {
            ViewKind::Sentiment => "Sentiment Breakdown",
            ViewKind::EngagementTrend => "Engagement Trend Over Time",
            ViewKind::Platform => "Platform Engagements",
            ViewKind::MediaType => "Media Type Mix",
            ViewKind::TopLocations => "Top 5 Locations by Engagements",
        }
    }

    pub fn measure(self) -> Measure {
        match self {
            ViewKind::Sentiment | ViewKind::MediaType => Measure::Count,
            ViewKind::EngagementTrend | ViewKind::Platform | ViewKind::TopLocations => {
                Measure::Sum
            }
        }
    }

    pub fn chart(self) -> ChartKind {
        match self {
            ViewKind::Sentiment | ViewKind::MediaType => ChartKind::Pie,
            ViewKind::EngagementTrend => ChartKind::Line,
            ViewKind::Platform | ViewKind::TopLocations => ChartKind::Bar,
        }
    }

    /// Axis / column label for the grouping dimension.
    pub fn dimension_label(self) -> &'static str {
        match self {
            ViewKind::Sentiment => "Sentiment",
            ViewKind::EngagementTrend => "Date",
            ViewKind::Platform => "Platform",
            ViewKind::MediaType => "Media Type",
            ViewKind::TopLocations => "Location",
        }
    }

    /// Axis / column label for the measured value.
    pub fn value_label(self) -> &'static str {
        match self.measure() {
            Measure::Count => "Count",
            Measure::Sum => "Total Engagements",
        }
    }
}

/// A single `(category-or-date, total)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Category label, or a `%Y-%m-%d` date for the trend view.
    pub label: String,
    /// Count or summed engagements for the group.
    pub value: f64,
}

impl AggregateRow {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A named, ordered list of grouped totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub kind: ViewKind,
    pub rows: Vec<AggregateRow>,
}

impl AggregateView {
    pub fn new(kind: ViewKind, rows: Vec<AggregateRow>) -> Self {
        Self { kind, rows }
    }

    /// Number of groups in the view.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all group values.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.value).sum()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.value).collect()
    }

    /// Value for `label`, if the group exists.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.value)
    }

    /// Rows ranked by descending value.
    ///
    /// The sort is stable, so equal values keep the view's own order.
    pub fn ranked(&self) -> Vec<&AggregateRow> {
        let mut ranked: Vec<&AggregateRow> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Ordered insight sentences derived from one [`AggregateView`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightSet {
    pub lines: Vec<String>,
}

impl InsightSet {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.lines.iter()
    }
}

impl From<Vec<String>> for InsightSet {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Output of the cleaning pipeline plus data-quality counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedDataset {
    /// Records that survived date filtering, in input order.
    pub records: Vec<NormalizedRecord>,
    /// Data rows read from the input (header excluded).
    pub rows_read: usize,
    /// Rows excluded because their date could not be parsed.
    pub rows_dropped: usize,
    /// Retained rows whose engagements value was defaulted to `0.0`.
    pub engagements_defaulted: usize,
}

impl CleanedDataset {
    /// Number of valid records.
    pub fn valid_rows(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
