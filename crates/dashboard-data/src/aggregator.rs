//! Grouped totals behind the five dashboard views.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use dashboard_core::models::{AggregateRow, AggregateView, NormalizedRecord, ViewKind};

/// Maximum number of rows in the top-locations view.
pub const TOP_LOCATION_LIMIT: usize = 5;

// ── DatasetTotals ─────────────────────────────────────────────────────────────

/// Record count and engagement sum over a whole dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DatasetTotals {
    pub records: usize,
    pub engagements: f64,
}

// ── GroupTotals ───────────────────────────────────────────────────────────────

/// Running totals keyed by label, remembering first-appearance order.
#[derive(Debug, Default)]
struct GroupTotals {
    order: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl GroupTotals {
    fn add(&mut self, label: &str, amount: f64) {
        match self.index.get(label) {
            Some(&i) => self.order[i].1 += amount,
            None => {
                self.index.insert(label.to_string(), self.order.len());
                self.order.push((label.to_string(), amount));
            }
        }
    }

    /// Rows sorted by descending value; equal values keep first-appearance order.
    fn into_ranked_rows(self) -> Vec<AggregateRow> {
        let mut rows: Vec<AggregateRow> = self
            .order
            .into_iter()
            .map(|(label, value)| AggregateRow::new(label, value))
            .collect();
        rows.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }
}

// ── ViewAggregator ────────────────────────────────────────────────────────────

/// Stateless helper that reduces records into [`AggregateView`]s.
///
/// Every function is total: an empty slice yields an empty view.
pub struct ViewAggregator;

impl ViewAggregator {
    /// Build the view named by `kind`.
    pub fn aggregate(kind: ViewKind, records: &[NormalizedRecord]) -> AggregateView {
        match kind {
            ViewKind::Sentiment => Self::sentiment_distribution(records),
            ViewKind::EngagementTrend => Self::engagement_trend(records),
            ViewKind::Platform => Self::platform_totals(records),
            ViewKind::MediaType => Self::media_type_distribution(records),
            ViewKind::TopLocations => Self::top_locations(records),
        }
    }

    /// Record count per sentiment, most frequent first.
    pub fn sentiment_distribution(records: &[NormalizedRecord]) -> AggregateView {
        Self::count_by(ViewKind::Sentiment, records, |r| &r.sentiment)
    }

    /// Engagement sum per calendar day, oldest first. Days without records
    /// are absent.
    pub fn engagement_trend(records: &[NormalizedRecord]) -> AggregateView {
        let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in records {
            *days.entry(record.date).or_insert(0.0) += record.engagements;
        }
        let rows = days
            .into_iter()
            .map(|(day, total)| AggregateRow::new(day.format("%Y-%m-%d").to_string(), total))
            .collect();
        AggregateView::new(ViewKind::EngagementTrend, rows)
    }

    /// Engagement sum per platform, ordered by platform name.
    pub fn platform_totals(records: &[NormalizedRecord]) -> AggregateView {
        let mut platforms: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *platforms.entry(record.platform.as_str()).or_insert(0.0) += record.engagements;
        }
        let rows = platforms
            .into_iter()
            .map(|(platform, total)| AggregateRow::new(platform, total))
            .collect();
        AggregateView::new(ViewKind::Platform, rows)
    }

    /// Record count per media type, most frequent first.
    pub fn media_type_distribution(records: &[NormalizedRecord]) -> AggregateView {
        Self::count_by(ViewKind::MediaType, records, |r| &r.media_type)
    }

    /// The [`TOP_LOCATION_LIMIT`] locations with the highest engagement sum.
    ///
    /// A tie at the cut keeps the location that appeared first in the input.
    pub fn top_locations(records: &[NormalizedRecord]) -> AggregateView {
        let mut groups = GroupTotals::default();
        for record in records {
            groups.add(&record.location, record.engagements);
        }
        let mut rows = groups.into_ranked_rows();
        rows.truncate(TOP_LOCATION_LIMIT);
        AggregateView::new(ViewKind::TopLocations, rows)
    }

    /// All five views in dashboard order.
    pub fn all_views(records: &[NormalizedRecord]) -> Vec<AggregateView> {
        ViewKind::ALL
            .iter()
            .map(|kind| Self::aggregate(*kind, records))
            .collect()
    }

    /// Record count and engagement sum for the whole dataset.
    pub fn totals(records: &[NormalizedRecord]) -> DatasetTotals {
        DatasetTotals {
            records: records.len(),
            engagements: records.iter().map(|r| r.engagements).sum(),
        }
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn count_by<F>(kind: ViewKind, records: &[NormalizedRecord], key: F) -> AggregateView
    where
        F: Fn(&NormalizedRecord) -> &String,
    {
        let mut groups = GroupTotals::default();
        for record in records {
            groups.add(key(record), 1.0);
        }
        AggregateView::new(kind, groups.into_ranked_rows())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
