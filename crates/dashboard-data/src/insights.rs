//! Templated insight sentences for each aggregate view.
//!
//! Wording lives in [`ViewTemplates`] tables; [`InsightEngine`] decides which
//! sentences apply to a given view and fills the `{label}`, `{value}`,
//! `{pct}` and `{date}` placeholders.

use dashboard_core::formatting::{format_engagements, format_share};
use dashboard_core::models::{AggregateRow, AggregateView, InsightSet, ViewKind};
pub use dashboard_core::settings::RecommendationMode;

// ── Templates ─────────────────────────────────────────────────────────────────

/// Fixed wording for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTemplates {
    /// What the chart shows. Always emitted.
    pub intro: &'static str,
    /// First-ranked group (peak day for the trend view).
    pub leader: &'static str,
    /// Second-ranked group (lowest day for the trend view).
    pub runner_up: &'static str,
    /// Qualitative remark for views with at least three groups. The trend
    /// view uses [`TrendDirection`] sentences instead.
    pub commentary: Option<&'static str>,
    /// General-purpose closing recommendation.
    pub recommendation: &'static str,
}

const SENTIMENT: ViewTemplates = ViewTemplates {
    intro: "This chart describes the distribution of sentiment (positive/negative/neutral) towards a brand, campaign, or topic, providing a quick snapshot of public perception.",
    leader: "1. The dominant sentiment is \"{label}\" accounting for {pct}% of all entries. This indicates the primary public opinion.",
    runner_up: "2. \"{label}\" is the second most common sentiment, showing varied public opinion.",
    commentary: Some(
        "3. Understanding the sentiment distribution is crucial for crafting effective communication strategies.",
    ),
    recommendation: "Recommendation: If dominant sentiment is negative, develop a crisis communication plan. If positive, amplify successful content. If neutral, engage to convert to positive advocates.",
};

const ENGAGEMENT_TREND: ViewTemplates = ViewTemplates {
    intro: "This chart shows fluctuations in content engagement over time, ideal for tracking media campaign performance and identifying peaks or declines. It provides a dynamic view of audience interaction.",
    leader: "1. Peak engagement occurred around {date}, reaching {value} total engagements. Analyze this date to identify triggers for the surge.",
    runner_up: "2. The lowest engagement period was around {date}, with only {value} engagements. Investigate this decline to prevent similar issues.",
    commentary: None,
    recommendation: "Recommendation: Replicate successful content strategies during peak periods. Analyze content from low engagement periods to identify weaknesses and adjust your content calendar. Continue current strategies for growth, or explore new tactics to break stagnation.",
};

const PLATFORM: ViewTemplates = ViewTemplates {
    intro: "This chart compares engagement performance across social media platforms or news portals, helping to identify the most effective platforms for reach and interaction. This is crucial for optimizing resource allocation.",
    leader: "1. \"{label}\" is the leading platform, generating {value} engagements. This highlights your most effective channel.",
    runner_up: "2. \"{label}\" also shows strong performance with {value} engagements, indicating significant potential for diversification.",
    commentary: Some(
        "3. Disparities in engagement across platforms emphasize the importance of strategically allocating resources for the highest engagement ROI.",
    ),
    recommendation: "Recommendation: Allocate more budget/resources to leading platforms and analyze successful content types for cross-platform adaptation. Consider reducing investment in underperforming platforms or re-evaluating their role in your overall media strategy.",
};

const MEDIA_TYPE: ViewTemplates = ViewTemplates {
    intro: "This chart analyzes the proportion of media types, providing insight into your audience's most preferred content formats. This is key for an audience-centric content strategy.",
    leader: "1. \"{label}\" is the most frequently used media type, accounting for {pct}% of content. This indicates a clear audience preference.",
    runner_up: "2. \"{label}\" is the second most common, indicating audiences also respond well to this format.",
    commentary: Some(
        "3. Analyzing engagement rates per media type is crucial for optimizing content strategy and discovering new opportunities.",
    ),
    recommendation: "Recommendation: Prioritize creating more content in preferred formats. Maintain a healthy mix of content by continuing to produce other media types, and explore ways to enhance their impact. Experiment with converting high-performing content between formats.",
};

const TOP_LOCATIONS: ViewTemplates = ViewTemplates {
    intro: "This chart identifies geographical locations with the highest total engagement, relevant for audience targeting or localized content production. This helps inform regional marketing decisions.",
    leader: "1. The top location for engagements is \"{label}\" with {value} total engagements. This indicates audiences in this region are highly active.",
    runner_up: "2. \"{label}\" is the second highest, indicating key geographical areas for focus.",
    commentary: Some(
        "3. Knowing high-engagement locations allows you to design more targeted marketing campaigns or develop culturally relevant content.",
    ),
    recommendation: "Recommendation: Launch localized campaigns, run geo-targeted ads, or create region-specific content to deepen engagement in top locations. Explore expanding your presence or tailoring content for secondary high-engagement locations.",
};

impl ViewTemplates {
    /// Wording table for `kind`.
    pub fn for_view(kind: ViewKind) -> &'static ViewTemplates {
        match kind {
            ViewKind::Sentiment => &SENTIMENT,
            ViewKind::EngagementTrend => &ENGAGEMENT_TREND,
            ViewKind::Platform => &PLATFORM,
            ViewKind::MediaType => &MEDIA_TYPE,
            ViewKind::TopLocations => &TOP_LOCATIONS,
        }
    }
}

/// Dashboard-wide closing recommendations shown after all views.
pub const CONCLUDING_RECOMMENDATIONS: [&str; 5] = [
    "Focus on High-Performing Channels & Content: Prioritize your efforts on platforms and media types that consistently show higher engagement. Allocate resources where your audience is most responsive.",
    "Address Sentiment Gaps: If negative sentiment is significant, develop targeted strategies for reputation management. For neutral sentiment, consider engaging content to foster stronger positive connections.",
    "Capitalize on Engagement Peaks & Learn from Dips: Use historical engagement trends to plan future content releases or campaign launches around peak times. Analyze factors contributing to dips to refine future strategies.",
    "Tailor Content to Key Locations: Leverage insights from top-performing locations to create localized campaigns, content, or product offerings that resonate deeply with regional audiences.",
    "Continuous Monitoring & Adaptation: Media landscapes evolve rapidly. Continuously monitor these metrics and be prepared to adapt your strategies based on emerging trends and audience feedback.",
];

// ── Data-driven variants ──────────────────────────────────────────────────────

/// Movement of the second half of the trend series relative to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increase,
    Decline,
    Stable,
}

impl TrendDirection {
    /// Compare the sum of the first `n / 2` values against the sum of the rest.
    pub fn of(values: &[f64]) -> Self {
        let (first, second) = values.split_at(values.len() / 2);
        let first: f64 = first.iter().sum();
        let second: f64 = second.iter().sum();
        if second > first {
            TrendDirection::Increase
        } else if second < first {
            TrendDirection::Decline
        } else {
            TrendDirection::Stable
        }
    }

    pub fn sentence(self) -> &'static str {
        match self {
            TrendDirection::Increase => "3. Engagement trends show an increase in the latter half, indicating positive results from your content strategy.",
            TrendDirection::Decline => "3. A decline in engagement is observed in the latter half, suggesting deeper analysis into content performance is needed.",
            TrendDirection::Stable => "3. Engagement levels remained relatively stable, indicating consistent audience interaction.",
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            TrendDirection::Increase => "Recommendation: Continue current strategies for growth and replicate the content that drove the peak periods.",
            TrendDirection::Decline => "Recommendation: Analyze content from low engagement periods to identify weaknesses and adjust your content calendar.",
            TrendDirection::Stable => "Recommendation: Explore new tactics to break stagnation, starting with the content strategies that worked during peak periods.",
        }
    }
}

/// Closing recommendation matched to the dominant sentiment label, if it
/// names one of the three standard sentiments.
fn sentiment_recommendation(label: &str) -> Option<&'static str> {
    let label = label.to_lowercase();
    if label.contains("negative") {
        Some(
            "Recommendation: Negative sentiment dominates, so develop a crisis communication plan.",
        )
    } else if label.contains("positive") {
        Some("Recommendation: Positive sentiment dominates, so amplify successful content.")
    } else if label.contains("neutral") {
        Some(
            "Recommendation: Neutral sentiment dominates, so engage the audience to convert them to positive advocates.",
        )
    } else {
        None
    }
}

// ── InsightEngine ─────────────────────────────────────────────────────────────

/// Turns an [`AggregateView`] into its [`InsightSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsightEngine {
    mode: RecommendationMode,
}

impl InsightEngine {
    pub fn new(mode: RecommendationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RecommendationMode {
        self.mode
    }

    /// Sentences for `view`, in display order.
    ///
    /// A view with no groups yields only the introductory sentence.
    pub fn insights(&self, view: &AggregateView) -> InsightSet {
        let templates = ViewTemplates::for_view(view.kind);
        let mut lines = vec![templates.intro.to_string()];
        if view.is_empty() {
            return lines.into();
        }

        match view.kind {
            ViewKind::EngagementTrend => self.trend_lines(view, templates, &mut lines),
            _ => self.ranked_lines(view, templates, &mut lines),
        }
        lines.into()
    }

    fn ranked_lines(
        &self,
        view: &AggregateView,
        templates: &ViewTemplates,
        lines: &mut Vec<String>,
    ) {
        let ranked = view.ranked();
        let total = view.total();

        lines.push(fill(templates.leader, ranked[0], total));
        if let Some(second) = ranked.get(1) {
            lines.push(fill(templates.runner_up, second, total));
        }
        if ranked.len() >= 3 {
            if let Some(commentary) = templates.commentary {
                lines.push(commentary.to_string());
            }
        }

        let adaptive = match (self.mode, view.kind) {
            (RecommendationMode::Adaptive, ViewKind::Sentiment) => {
                sentiment_recommendation(&ranked[0].label)
            }
            _ => None,
        };
        lines.push(adaptive.unwrap_or(templates.recommendation).to_string());
    }

    fn trend_lines(
        &self,
        view: &AggregateView,
        templates: &ViewTemplates,
        lines: &mut Vec<String>,
    ) {
        let (peak, lowest) = extremes(&view.rows);
        let total = view.total();

        lines.push(fill(templates.leader, peak, total));
        if view.len() >= 2 {
            lines.push(fill(templates.runner_up, lowest, total));
        }

        let direction = TrendDirection::of(&view.values());
        lines.push(direction.sentence().to_string());

        let recommendation = match self.mode {
            RecommendationMode::Adaptive => direction.recommendation(),
            RecommendationMode::Consolidated => templates.recommendation,
        };
        lines.push(recommendation.to_string());
    }
}

/// Substitute the placeholders of `template` from `row`.
///
/// `{value}` is whole engagements with separators, `{pct}` is the row's share
/// of `total` to one decimal, `{label}` and `{date}` are the row label.
///
/// Placeholders are expanded in a single pass over the template, so braces
/// inside the substituted label are copied verbatim. Unknown `{...}` text is
/// left as is.
pub fn fill(template: &str, row: &AggregateRow, total: f64) -> String {
    let mut out = String::with_capacity(template.len() + row.label.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        match &tail[1..close] {
            "label" | "date" => out.push_str(&row.label),
            "value" => out.push_str(&format_engagements(row.value)),
            "pct" => out.push_str(&format_share(row.value, total)),
            _ => {
                out.push('{');
                rest = &tail[1..];
                continue;
            }
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

/// First maximum and first minimum in chronological order.
fn extremes(rows: &[AggregateRow]) -> (&AggregateRow, &AggregateRow) {
    let mut peak = &rows[0];
    let mut lowest = &rows[0];
    for row in &rows[1..] {
        if row.value > peak.value {
            peak = row;
        }
        if row.value < lowest.value {
            lowest = row;
        }
    }
    (peak, lowest)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
