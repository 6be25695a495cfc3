//! CSV ingestion and cleaning.
//!
//! Turns the raw bytes of an uploaded media-monitoring export into
//! [`NormalizedRecord`]s. Format problems (not text, no columns, a required
//! column missing) fail the whole upload with a [`CleaningError`]; row-level
//! problems never do. Rows with an unparseable date are dropped, bad
//! engagement counts become `0.0`, and both are counted on the returned
//! [`CleanedDataset`].

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;
use dashboard_core::dates::DateParser;
use dashboard_core::error::{CleaningError, DashboardError};
use dashboard_core::models::{CleanedDataset, NormalizedRecord, UNKNOWN_LABEL};
use tracing::{debug, info, warn};

/// Normalized names of the columns every upload must carry, in the order
/// they are checked.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "date",
    "platform",
    "sentiment",
    "location",
    "engagements",
    "mediatype",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ── Options ───────────────────────────────────────────────────────────────────

/// Knobs for [`clean`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleaningOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Parser used for the `date` column.
    pub date_parser: DateParser,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_parser: DateParser::as_written(),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Clean one upload.
///
/// Zero surviving rows is not an error: the returned dataset is simply empty.
pub fn clean(raw: &[u8], opts: &CleaningOptions) -> Result<CleanedDataset, CleaningError> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let text = std::str::from_utf8(raw)
        .map_err(|e| CleaningError::Unparseable(format!("input is not UTF-8 text ({e})")))?;

    if text.trim().is_empty() {
        return Err(CleaningError::Unparseable(
            "no columns to parse from input".to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CleaningError::Unparseable(format!("failed to read header row: {e}")))?
        .clone();

    if headers.iter().all(|h| normalize_header(h).is_empty()) {
        return Err(CleaningError::Unparseable(
            "no columns to parse from input".to_string(),
        ));
    }

    let columns = ColumnIndex::resolve(&headers)?;

    let mut dataset = CleanedDataset::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            CleaningError::Unparseable(format!("failed to read row {}: {e}", row_no + 1))
        })?;
        dataset.rows_read += 1;

        let raw_date = field(&record, columns.date);
        let Some(date) = opts.date_parser.parse(raw_date) else {
            debug!("Dropping row {}: unparseable date {:?}", row_no + 1, raw_date);
            dataset.rows_dropped += 1;
            continue;
        };

        let raw_engagements = field(&record, columns.engagements);
        let engagements = match parse_engagements(raw_engagements) {
            Some(value) => value,
            None => {
                debug!(
                    "Row {}: engagements {:?} defaulted to 0",
                    row_no + 1,
                    raw_engagements
                );
                dataset.engagements_defaulted += 1;
                0.0
            }
        };

        dataset.records.push(NormalizedRecord {
            date,
            platform: category(field(&record, columns.platform)),
            sentiment: category(field(&record, columns.sentiment)),
            location: category(field(&record, columns.location)),
            engagements,
            media_type: category(field(&record, columns.media_type)),
        });
    }

    info!(
        "Cleaned {} rows: {} valid, {} dropped for bad dates, {} engagements defaulted",
        dataset.rows_read,
        dataset.valid_rows(),
        dataset.rows_dropped,
        dataset.engagements_defaulted
    );

    Ok(dataset)
}

/// Read `path` from disk and [`clean`] its contents.
pub fn load_csv(path: &Path, opts: &CleaningOptions) -> Result<CleanedDataset, DashboardError> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(clean(&bytes, opts)?)
}

/// Trim, lowercase and drop all whitespace: `" Media Type "` → `"mediatype"`.
pub fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse an engagement cell. `None` for blank, non-numeric, negative or
/// non-finite input.
pub fn parse_engagements(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Some(v),
        Ok(v) if v == 0.0 => Some(0.0),
        _ => None,
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Positions of the required columns in the header row.
#[derive(Debug)]
struct ColumnIndex {
    date: usize,
    platform: usize,
    sentiment: usize,
    location: usize,
    engagements: usize,
    media_type: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, CleaningError> {
        let map = build_header_map(headers);
        let find = |name: &str| {
            map.get(name)
                .copied()
                .ok_or_else(|| CleaningError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find(REQUIRED_COLUMNS[0])?,
            platform: find(REQUIRED_COLUMNS[1])?,
            sentiment: find(REQUIRED_COLUMNS[2])?,
            location: find(REQUIRED_COLUMNS[3])?,
            engagements: find(REQUIRED_COLUMNS[4])?,
            media_type: find(REQUIRED_COLUMNS[5])?,
        })
    }
}

/// Normalized header name → column position. The first occurrence wins.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        let key = normalize_header(name);
        if key.is_empty() {
            continue;
        }
        if map.contains_key(&key) {
            warn!(
                "Duplicate column {:?} at position {} ignored; using the first occurrence",
                name,
                idx + 1
            );
            continue;
        }
        map.insert(key, idx);
    }
    map
}

/// Short rows are allowed; a missing cell reads as empty.
fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

fn category(raw: &str) -> String {
    if raw.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        raw.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Date,Platform,Sentiment,Location,Engagements,Media Type";

    fn clean_str(input: &str) -> Result<CleanedDataset, CleaningError> {
        clean(input.as_bytes(), &CleaningOptions::default())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── normalize_header ──────────────────────────────────────────────────────

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Media Type"), "mediatype");
        assert_eq!(normalize_header("  ENGAGEMENTS "), "engagements");
        assert_eq!(normalize_header("\u{feff}Date"), "date");
        assert_eq!(normalize_header("media\ttype"), "mediatype");
    }

    // ── parse_engagements ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_engagements_values() {
        assert_eq!(parse_engagements("10"), Some(10.0));
        assert_eq!(parse_engagements(" 2.5 "), Some(2.5));
        assert_eq!(parse_engagements("1,234"), Some(1234.0));
        assert_eq!(parse_engagements("0"), Some(0.0));
    }

    #[test]
    fn test_parse_engagements_rejects_bad_input() {
        assert_eq!(parse_engagements(""), None);
        assert_eq!(parse_engagements("n/a"), None);
        assert_eq!(parse_engagements("-5"), None);
        assert_eq!(parse_engagements("NaN"), None);
        assert_eq!(parse_engagements("inf"), None);
    }

    // ── schema validation ─────────────────────────────────────────────────────

    #[test]
    fn test_clean_normalizes_headers_in_any_order() {
        let input = "\
 media type ,ENGAGEMENTS,Location,Sentiment,Extra,Platform,DATE
Video,10,NY,Positive,x,TV,2024-01-01
";
        let ds = clean_str(input).unwrap();
        assert_eq!(ds.valid_rows(), 1);
        let r = &ds.records[0];
        assert_eq!(r.media_type, "Video");
        assert_eq!(r.platform, "TV");
        assert_eq!(r.location, "NY");
        assert_eq!(r.engagements, 10.0);
        assert_eq!(r.date, ymd(2024, 1, 1));
    }

    #[test]
    fn test_clean_missing_column_reported_by_name() {
        let input = "Date,Platform,Sentiment,Location,Engagements\n2024-01-01,TV,Positive,NY,1\n";
        assert_eq!(
            clean_str(input),
            Err(CleaningError::MissingColumn("mediatype".to_string()))
        );
    }

    #[test]
    fn test_clean_first_missing_column_wins() {
        let input = "Location,Media Type\nNY,Video\n";
        assert_eq!(
            clean_str(input),
            Err(CleaningError::MissingColumn("date".to_string()))
        );
    }

    #[test]
    fn test_clean_duplicate_header_uses_first_occurrence() {
        let input = format!("{HEADER},Platform\n2024-01-01,TV,Positive,NY,1,Video,Radio\n");
        let ds = clean_str(&input).unwrap();
        assert_eq!(ds.records[0].platform, "TV");
    }

    #[test]
    fn test_clean_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        let body = format!("{HEADER}\n2024-01-01,TV,Positive,NY,1,Video\n");
        bytes.extend_from_slice(body.as_bytes());
        let ds = clean(&bytes, &CleaningOptions::default()).unwrap();
        assert_eq!(ds.valid_rows(), 1);
    }

    // ── unparseable input ─────────────────────────────────────────────────────

    #[test]
    fn test_clean_empty_input_is_unparseable() {
        assert!(matches!(clean_str(""), Err(CleaningError::Unparseable(_))));
        assert!(matches!(clean_str("\n\n"), Err(CleaningError::Unparseable(_))));
    }

    #[test]
    fn test_clean_binary_input_is_unparseable() {
        let bytes = [0xff, 0xfe, 0x00, 0x41, 0x9f];
        assert!(matches!(
            clean(&bytes, &CleaningOptions::default()),
            Err(CleaningError::Unparseable(_))
        ));
    }

    // ── row handling ──────────────────────────────────────────────────────────

    #[test]
    fn test_clean_header_only_is_empty_success() {
        let ds = clean_str(&format!("{HEADER}\n")).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.rows_read, 0);
    }

    #[test]
    fn test_clean_drops_unparseable_dates() {
        let input = format!(
            "{HEADER}\n2024-01-01,TV,Positive,NY,10,Video\nbad-date,Radio,Positive,LA,3,Audio\n,TV,Neutral,NY,1,Video\n"
        );
        let ds = clean_str(&input).unwrap();
        assert_eq!(ds.rows_read, 3);
        assert_eq!(ds.valid_rows(), 1);
        assert_eq!(ds.rows_dropped, 2);
    }

    #[test]
    fn test_clean_defaults_bad_engagements_to_zero() {
        let input = format!(
            "{HEADER}\n2024-01-01,TV,Positive,NY,,Video\n2024-01-02,TV,Positive,NY,lots,Video\n2024-01-03,TV,Positive,NY,-4,Video\n"
        );
        let ds = clean_str(&input).unwrap();
        assert_eq!(ds.valid_rows(), 3);
        assert_eq!(ds.engagements_defaulted, 3);
        assert!(ds.records.iter().all(|r| r.engagements == 0.0));
    }

    #[test]
    fn test_clean_blank_categories_become_unknown() {
        let input = format!("{HEADER}\n2024-01-01, ,Positive,,5,Video\n");
        let ds = clean_str(&input).unwrap();
        assert_eq!(ds.records[0].platform, UNKNOWN_LABEL);
        assert_eq!(ds.records[0].location, UNKNOWN_LABEL);
    }

    #[test]
    fn test_clean_short_rows_are_tolerated() {
        let input = format!("{HEADER}\n2024-01-01,TV,Positive\n");
        let ds = clean_str(&input).unwrap();
        assert_eq!(ds.valid_rows(), 1);
        let r = &ds.records[0];
        assert_eq!(r.location, UNKNOWN_LABEL);
        assert_eq!(r.media_type, UNKNOWN_LABEL);
        assert_eq!(r.engagements, 0.0);
        assert_eq!(ds.engagements_defaulted, 1);
    }

    #[test]
    fn test_clean_preserves_category_case() {
        let input = format!("{HEADER}\n2024-01-01,twitter,POSITIVE,new york,1,video\n");
        let ds = clean_str(&input).unwrap();
        assert_eq!(ds.records[0].platform, "twitter");
        assert_eq!(ds.records[0].sentiment, "POSITIVE");
    }

    #[test]
    fn test_clean_custom_delimiter() {
        let input = "Date;Platform;Sentiment;Location;Engagements;Media Type\n2024-01-01;TV;Positive;NY;\"1,500\";Video\n";
        let opts = CleaningOptions {
            delimiter: b';',
            ..CleaningOptions::default()
        };
        let ds = clean(input.as_bytes(), &opts).unwrap();
        assert_eq!(ds.records[0].engagements, 1500.0);
    }

    // ── load_csv ──────────────────────────────────────────────────────────────

    #[test]
    fn test_load_csv_reads_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "{HEADER}").unwrap();
        writeln!(file, "2024-01-01,TV,Positive,NY,10,Video").unwrap();
        let ds = load_csv(file.path(), &CleaningOptions::default()).unwrap();
        assert_eq!(ds.valid_rows(), 1);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_csv(&dir.path().join("absent.csv"), &CleaningOptions::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::FileRead { .. }));
    }

    #[test]
    fn test_load_csv_propagates_cleaning_error() {
        let mut file = NamedTempFile::new().expect("tempfile");
        writeln!(file, "Date,Platform").unwrap();
        let err = load_csv(file.path(), &CleaningOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::Cleaning(CleaningError::MissingColumn(_))
        ));
    }
}
