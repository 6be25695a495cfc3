//! End-to-end behaviour of cleaning, aggregation and insights.

use std::collections::HashSet;

use chrono::NaiveDate;
use dashboard_data::aggregator::ViewAggregator;
use dashboard_data::analysis::{analyze, AnalysisOptions};
use dashboard_data::core::error::CleaningError;
use dashboard_data::core::models::{ViewKind, UNKNOWN_LABEL};
use dashboard_data::export::records_to_csv;
use dashboard_data::reader::{clean, CleaningOptions, REQUIRED_COLUMNS};

const HEADER: &str = "Date,Platform,Sentiment,Location,Engagements,Media Type";

fn csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(row);
        out.push('\n');
    }
    out
}

fn opts() -> CleaningOptions {
    CleaningOptions::default()
}

// ── schema ────────────────────────────────────────────────────────────────────

#[test]
fn test_every_missing_required_column_is_named() {
    let headers = ["Date", "Platform", "Sentiment", "Location", "Engagements", "Media Type"];
    for (skip, expected) in REQUIRED_COLUMNS.iter().enumerate() {
        let header: Vec<&str> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, h)| *h)
            .collect();
        let input = format!("{}\n", header.join(","));
        let err = clean(input.as_bytes(), &opts()).unwrap_err();
        assert_eq!(err, CleaningError::MissingColumn(expected.to_string()));
    }
}

#[test]
fn test_column_names_are_case_and_space_insensitive() {
    let input = "DATE,platform, SENTIMENT ,Location,engagements,MEDIATYPE\n2024-02-01,Web,Positive,Paris,7,Text\n";
    let ds = clean(input.as_bytes(), &opts()).unwrap();
    assert_eq!(ds.valid_rows(), 1);
}

// ── row filtering ─────────────────────────────────────────────────────────────

#[test]
fn test_output_count_equals_rows_with_parseable_dates() {
    let input = csv(&[
        "2024-01-01,TV,Positive,NY,1,Video",
        "01/02/2024,TV,Positive,NY,1,Video",
        "Jan 3 2024,TV,Positive,NY,1,Video",
        "yesterday,TV,Positive,NY,1,Video",
        ",TV,Positive,NY,1,Video",
        "2024-02-30,TV,Positive,NY,1,Video",
    ]);
    let ds = clean(input.as_bytes(), &opts()).unwrap();
    assert_eq!(ds.valid_rows(), 3);
    assert_eq!(ds.rows_dropped, 3);
    assert_eq!(ds.rows_read, 6);
}

#[test]
fn test_bad_engagements_become_exactly_zero() {
    let input = csv(&[
        "2024-01-01,TV,Positive,NY,,Video",
        "2024-01-01,TV,Positive,NY,abc,Video",
        "2024-01-01,TV,Positive,NY,12,Video",
    ]);
    let ds = clean(input.as_bytes(), &opts()).unwrap();
    assert_eq!(ds.valid_rows(), 3);
    assert_eq!(ds.records[0].engagements, 0.0);
    assert_eq!(ds.records[1].engagements, 0.0);
    assert_eq!(ds.records[2].engagements, 12.0);
}

// ── idempotence ───────────────────────────────────────────────────────────────

#[test]
fn test_cleaning_is_idempotent() {
    let input = csv(&[
        "2024-03-05T10:00:00Z,Twitter,Positive,Jakarta,120,Image",
        "March 6th 2024,Instagram,Negative,,n/a,Video",
        "2024/03/07,\"News, Online\",Neutral,Bandung,\"1,050\",Text",
        "garbage,TV,Positive,NY,1,Video",
    ]);
    let first = clean(input.as_bytes(), &opts()).unwrap();
    let second = clean(records_to_csv(&first.records).unwrap().as_bytes(), &opts()).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(second.rows_dropped, 0);
    assert_eq!(first.records[1].location, UNKNOWN_LABEL);
    assert_eq!(first.records[2].platform, "News, Online");
}

// ── aggregation properties ────────────────────────────────────────────────────

#[test]
fn test_top_locations_bounded_descending_and_from_input() {
    let rows: Vec<String> = (0..12)
        .map(|i| format!("2024-01-{:02},TV,Positive,City{},{},Video", i % 28 + 1, i % 8, i * 3))
        .collect();
    let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let ds = clean(csv(&row_refs).as_bytes(), &opts()).unwrap();

    let view = ViewAggregator::top_locations(&ds.records);
    assert!(view.len() <= 5);
    assert!(view.rows.windows(2).all(|w| w[0].value >= w[1].value));

    let inputs: HashSet<&str> = ds.records.iter().map(|r| r.location.as_str()).collect();
    assert!(view.labels().iter().all(|l| inputs.contains(l)));
}

#[test]
fn test_category_counts_sum_to_record_count() {
    let input = csv(&[
        "2024-01-01,TV,Positive,NY,1,Video",
        "2024-01-02,TV,,NY,1,",
        "2024-01-03,Radio,Negative,LA,1,Audio",
        "2024-01-04,Web,Positive,SF,1,Video",
    ]);
    let ds = clean(input.as_bytes(), &opts()).unwrap();
    let sentiment = ViewAggregator::sentiment_distribution(&ds.records);
    let media = ViewAggregator::media_type_distribution(&ds.records);
    assert_eq!(sentiment.total() as usize, ds.valid_rows());
    assert_eq!(media.total() as usize, ds.valid_rows());
}

#[test]
fn test_fifth_place_tie_keeps_earlier_location() {
    let input = csv(&[
        "2024-01-01,TV,Positive,A,60,Video",
        "2024-01-01,TV,Positive,B,50,Video",
        "2024-01-01,TV,Positive,C,40,Video",
        "2024-01-01,TV,Positive,D,30,Video",
        "2024-01-01,TV,Positive,Early,20,Video",
        "2024-01-01,TV,Positive,Late,20,Video",
    ]);
    let ds = clean(input.as_bytes(), &opts()).unwrap();
    let view = ViewAggregator::top_locations(&ds.records);
    assert_eq!(view.labels(), vec!["A", "B", "C", "D", "Early"]);
}

// ── scenario ──────────────────────────────────────────────────────────────────

#[test]
fn test_reference_scenario() {
    let input = csv(&[
        "2024-01-01,TV,Positive,NY,10,Video",
        "2024-01-01,TV,Negative,NY,5,Video",
        "bad-date,Radio,Positive,LA,3,Audio",
    ]);
    let report = analyze("scenario.csv", input.as_bytes(), &AnalysisOptions::default()).unwrap();
    assert_eq!(report.valid_rows(), 2);

    let sentiment = &report.panel(ViewKind::Sentiment).unwrap().view;
    assert_eq!(sentiment.len(), 2);
    assert_eq!(sentiment.get("Positive"), Some(1.0));
    assert_eq!(sentiment.get("Negative"), Some(1.0));

    let platform = &report.panel(ViewKind::Platform).unwrap().view;
    assert_eq!(platform.len(), 1);
    assert_eq!(platform.get("TV"), Some(15.0));

    let trend = &report.panel(ViewKind::EngagementTrend).unwrap().view;
    assert_eq!(trend.len(), 1);
    assert_eq!(trend.get("2024-01-01"), Some(15.0));
    assert_eq!(
        report.dataset.records[0].date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );

    let locations = &report.panel(ViewKind::TopLocations).unwrap();
    assert_eq!(locations.view.labels(), vec!["NY"]);
    assert!(locations.insights.lines[1].contains("\"NY\" with 15 total engagements"));
}

#[test]
fn test_zero_surviving_rows_is_empty_state() {
    let input = csv(&["nope,TV,Positive,NY,10,Video", "also nope,TV,Negative,NY,5,Video"]);
    let report = analyze("empty.csv", input.as_bytes(), &AnalysisOptions::default()).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.valid_rows(), 0);
    assert_eq!(report.metadata.rows_dropped, 2);
}

// ── dates ─────────────────────────────────────────────────────────────────────

#[test]
fn test_short_year_dates_land_in_their_century() {
    let input = csv(&[
        "01/02/24,TV,Positive,NY,1,Video",
        "1/5/24 10:00,TV,Positive,NY,2,Video",
        "15-02-24,TV,Positive,NY,3,Video",
        "5 Jan 24,TV,Positive,NY,4,Video",
    ]);
    let report = analyze("short.csv", input.as_bytes(), &AnalysisOptions::default()).unwrap();
    let trend = &report.panel(ViewKind::EngagementTrend).unwrap().view;
    assert_eq!(
        trend.labels(),
        vec!["2024-01-02", "2024-01-05", "2024-02-15"]
    );
    assert_eq!(trend.get("2024-01-05"), Some(6.0));
}

#[test]
fn test_offset_timestamps_keep_their_written_day() {
    let input = csv(&[
        "2024-01-15T23:30:00-05:00,TV,Positive,NY,4,Video",
        "2024-01-15T00:15:00+09:00,TV,Positive,NY,6,Video",
    ]);
    let report = analyze("tz.csv", input.as_bytes(), &AnalysisOptions::default()).unwrap();
    let trend = &report.panel(ViewKind::EngagementTrend).unwrap().view;
    assert_eq!(trend.labels(), vec!["2024-01-15"]);
    assert_eq!(trend.get("2024-01-15"), Some(10.0));
}

// ── labels ────────────────────────────────────────────────────────────────────

#[test]
fn test_placeholder_like_labels_are_quoted_verbatim() {
    let input = csv(&["2024-01-01,{pct} News,Positive,{value} City,10,Video"]);
    let report = analyze("labels.csv", input.as_bytes(), &AnalysisOptions::default()).unwrap();

    let platform = report.panel(ViewKind::Platform).unwrap();
    assert!(platform.insights.lines[1].contains("\"{pct} News\""));

    let locations = report.panel(ViewKind::TopLocations).unwrap();
    assert!(locations.insights.lines[1].contains("\"{value} City\" with 10 total engagements"));
}
